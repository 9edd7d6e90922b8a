//! Pass capability traits and the context handed to them while a frame executes.

pub(crate) mod pool;
pub(crate) mod registry;

use crate::foundation::core::{FrameIndex, FrustumRef, Ref};
use crate::visibility::VisibilityBuffers;

/// Read-only frame state visible to passes during step execution.
pub struct PassContext<'a> {
    /// Culling results of the current frame.
    pub visibility: &'a VisibilityBuffers,
    /// Frustums culled this frame; index 0 is the active camera.
    pub frustums: &'a [FrustumRef],
    /// Index of the frame being rendered.
    pub frame: FrameIndex,
}

impl PassContext<'_> {
    /// Visible draw calls of `material_pass` as seen from frustum `frustum_idx`.
    pub fn visible_draw_calls(&self, frustum_idx: usize, material_pass: usize) -> Vec<Ref> {
        self.visibility.draw_calls(frustum_idx, material_pass)
    }

    pub fn visible_mesh_components(&self, frustum_idx: usize) -> Vec<Ref> {
        self.visibility.mesh_components(frustum_idx)
    }
}

/// Capabilities of a named singleton pass (`RenderPassShadow`, `RenderPassBloom`, ...).
pub trait RenderPass {
    /// Record this pass for the current frame.
    fn render(&mut self, ctx: &PassContext<'_>, delta_t: f32);

    /// (Re)create resolution-dependent resources. Called at load time for every config step
    /// naming this pass.
    fn on_reinit_rendering(&mut self) -> anyhow::Result<()>;

    /// Append auxiliary culling frustums for the coming frame.
    ///
    /// Only invoked on the pass registered as [`crate::NamedPass::Shadow`], once per frame before
    /// culling.
    fn prepare_frustums(&mut self, _out: &mut Vec<FrustumRef>) {}
}

/// A parameterized pass instance owned by one of the generic pools.
pub trait GenericPass {
    /// Initialize from the step descriptor that created this instance.
    fn init(&mut self, desc: &serde_json::Value) -> anyhow::Result<()>;

    fn render(&mut self, ctx: &PassContext<'_>, delta_t: f32);

    /// Release GPU resources. Called exactly once, before the pool drops the instance.
    fn destroy(&mut self);
}

/// Constructs fresh, uninitialized generic pass instances for the pools.
pub trait GenericPassFactory {
    type Fullscreen: GenericPass;
    type Mesh: GenericPass;
    type Blur: GenericPass;

    fn create_fullscreen(&mut self) -> Self::Fullscreen;
    fn create_mesh(&mut self) -> Self::Mesh;
    fn create_blur(&mut self) -> Self::Blur;
}
