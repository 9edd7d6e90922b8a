#![forbid(unsafe_code)]
//! Data-driven frame execution.
//!
//! A renderer config lists render steps (image barriers, generic passes, named singleton
//! passes). [`FrameEngine::load_renderer_config`] classifies and builds them into a compact
//! [`StepSequence`]; [`FrameEngine::render_frame`] runs the fixed per-frame pipeline around it
//! against host-provided collaborators.

mod config;
mod engine;
mod foundation;
mod passes;
mod step;
mod visibility;

pub mod headless;

pub use config::document::RendererConfig;
pub use config::settings::Settings;
pub use engine::collaborators::{FrameServices, RenderSystem, SceneSystem, UniformManager};
pub use engine::frame::FrameStats;
pub use engine::{FrameEngine, LoadOutcome};
pub use foundation::core::{FrameIndex, FrustumRef, ImageRef, PoolIndex, Ref};
pub use foundation::error::{RenderProcError, RenderProcResult};
pub use foundation::intern::{Name, NameTable};
pub use passes::pool::PassPools;
pub use passes::registry::PassRegistry;
pub use passes::{GenericPass, GenericPassFactory, PassContext, RenderPass};
pub use step::layout::ImageLayout;
pub use step::sequence::StepSequence;
pub use step::{GenericPassKind, IMAGE_MEMORY_BARRIER, NamedPass, RenderStep, RenderStepKind};
pub use visibility::stack::LockFreeStack;
pub use visibility::{VisibilityBuffers, VisibilityLimits};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
