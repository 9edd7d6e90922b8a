//! The frame engine: owns the pass pools, the step sequence and the visibility buffers.
//!
//! Lifecycle: construct at renderer init, [`FrameEngine::load_renderer_config`] to (re)build
//! the pipeline, [`FrameEngine::render_frame`] once per frame, drop at shutdown. Both entry
//! points take `&mut self`, so a reload can never overlap a frame and frames never nest.

pub(crate) mod collaborators;
pub(crate) mod frame;

use std::path::PathBuf;

use smallvec::SmallVec;

use crate::config::document::{RendererConfig, open_renderer_config};
use crate::config::loader::StepBuilder;
use crate::config::settings::Settings;
use crate::foundation::core::{FrameIndex, FrustumRef};
use crate::foundation::error::{RenderProcError, RenderProcResult};
use crate::foundation::intern::NameTable;
use crate::passes::GenericPassFactory;
use crate::passes::pool::PassPools;
use crate::passes::registry::PassRegistry;
use crate::step::sequence::StepSequence;
use crate::visibility::{VisibilityBuffers, VisibilityLimits};
use collaborators::UniformManager;

/// Result of a successful [`FrameEngine::load_renderer_config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The config file could not be opened; the pipeline is empty.
    Missing { path: PathBuf },
    /// The config was built into `steps` render steps.
    Loaded { name: String, steps: usize },
}

/// Data-driven frame executor.
pub struct FrameEngine<F: GenericPassFactory> {
    settings: Settings,
    registry: PassRegistry,
    pools: PassPools<F>,
    steps: StepSequence,
    names: NameTable,
    visibility: VisibilityBuffers,
    active_frustums: SmallVec<[FrustumRef; 8]>,
    shadow_frustums: Vec<FrustumRef>,
    config_name: Option<String>,
    frame: FrameIndex,
}

impl<F: GenericPassFactory> FrameEngine<F> {
    pub fn new(settings: Settings, registry: PassRegistry, factory: F) -> Self {
        Self::with_limits(settings, registry, factory, VisibilityLimits::default())
    }

    pub fn with_limits(
        settings: Settings,
        registry: PassRegistry,
        factory: F,
        limits: VisibilityLimits,
    ) -> Self {
        Self {
            settings,
            registry,
            pools: PassPools::new(factory),
            steps: StepSequence::new(),
            names: NameTable::new(),
            visibility: VisibilityBuffers::new(limits),
            active_frustums: SmallVec::new(),
            shadow_frustums: Vec::new(),
            config_name: None,
            frame: FrameIndex::default(),
        }
    }

    /// Replace the settings used by the next [`FrameEngine::load_renderer_config`].
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Tear down the current pipeline and rebuild it from the config named by the settings.
    ///
    /// A config file that cannot be opened is logged and leaves an empty pipeline. On error the
    /// pipeline is empty as well: nothing of a partially-built config survives.
    #[tracing::instrument(skip_all, fields(config = %self.settings.renderer_config))]
    pub fn load_renderer_config(
        &mut self,
        uniforms: &mut dyn UniformManager,
    ) -> RenderProcResult<LoadOutcome> {
        self.teardown();

        let path = self.settings.renderer_config_path();
        let Some(config) = open_renderer_config(&path)? else {
            return Ok(LoadOutcome::Missing { path });
        };
        self.load_document(&config, uniforms)?;
        Ok(LoadOutcome::Loaded {
            name: config.name,
            steps: self.steps.len(),
        })
    }

    /// Tear down the current pipeline and rebuild it from an already-parsed document.
    pub fn load_document(
        &mut self,
        config: &RendererConfig,
        uniforms: &mut dyn UniformManager,
    ) -> RenderProcResult<()> {
        self.teardown();
        tracing::info!(
            name = %config.name,
            steps = config.render_steps.len(),
            "loading renderer config"
        );

        let built = uniforms
            .load(&config.uniform_buffers)
            .map_err(|e| RenderProcError::collaborator(format!("uniform buffers: {e:#}")))
            .and_then(|()| {
                StepBuilder {
                    pools: &mut self.pools,
                    registry: &mut self.registry,
                    names: &mut self.names,
                    steps: &mut self.steps,
                }
                .build_all(config)
            });

        match built {
            Ok(()) => {
                self.config_name = Some(config.name.clone());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "renderer config rejected, pipeline left empty");
                self.teardown();
                Err(e)
            }
        }
    }

    /// Destroy every generic pass instance and clear the step sequence.
    fn teardown(&mut self) {
        self.pools.destroy_all();
        self.steps.clear();
        self.names = NameTable::new();
        self.config_name = None;
    }

    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn pools(&self) -> &PassPools<F> {
        &self.pools
    }

    pub fn registry(&self) -> &PassRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PassRegistry {
        &mut self.registry
    }

    pub fn visibility(&self) -> &VisibilityBuffers {
        &self.visibility
    }

    /// Frustums culled during the last rendered frame.
    pub fn active_frustums(&self) -> &[FrustumRef] {
        &self.active_frustums
    }

    /// Name of the loaded config, `None` while the pipeline is empty.
    pub fn config_name(&self) -> Option<&str> {
        self.config_name.as_deref()
    }

    pub fn frame_index(&self) -> FrameIndex {
        self.frame
    }

    /// Deterministic listing of the current step sequence.
    pub fn dump(&self) -> String {
        self.steps.dump(&self.names)
    }
}

impl<F: GenericPassFactory> Drop for FrameEngine<F> {
    fn drop(&mut self) {
        self.pools.destroy_all();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/mod.rs"]
mod tests;
