use serde::Deserialize as _;

use super::document::{BarrierDesc, RendererConfig};
use crate::foundation::error::{RenderProcError, RenderProcResult};
use crate::foundation::intern::NameTable;
use crate::passes::GenericPassFactory;
use crate::passes::pool::PassPools;
use crate::passes::registry::PassRegistry;
use crate::step::layout::ImageLayout;
use crate::step::sequence::StepSequence;
use crate::step::{GenericPassKind, IMAGE_MEMORY_BARRIER, NamedPass, RenderStep};

/// Mutable build targets of a config load.
pub(crate) struct StepBuilder<'a, F: GenericPassFactory> {
    pub(crate) pools: &'a mut PassPools<F>,
    pub(crate) registry: &'a mut PassRegistry,
    pub(crate) names: &'a mut NameTable,
    pub(crate) steps: &'a mut StepSequence,
}

impl<F: GenericPassFactory> StepBuilder<'_, F> {
    /// Classify and build every step of `config`, in document order.
    pub(crate) fn build_all(&mut self, config: &RendererConfig) -> RenderProcResult<()> {
        for (index, desc) in config.render_steps.iter().enumerate() {
            let step = self.build(index, desc)?;
            tracing::debug!(index, kind = ?step.kind(), "built render step");
            self.steps.push(step);
        }
        Ok(())
    }

    fn build(&mut self, index: usize, desc: &serde_json::Value) -> RenderProcResult<RenderStep> {
        let ty = desc
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                RenderProcError::step(index, "<missing>", "descriptor has no string field 'type'")
            })?;

        if ty == IMAGE_MEMORY_BARRIER {
            return self.build_barrier(index, ty, desc);
        }

        if let Some(kind) = GenericPassKind::from_type_name(ty) {
            let slot = self
                .pools
                .create(kind, desc)
                .map_err(|e| RenderProcError::step(index, ty, format!("{e:#}")))?;
            return Ok(RenderStep::generic(kind, slot));
        }

        if let Some(pass) = NamedPass::from_type_name(ty) {
            let imp = self
                .registry
                .get_mut(pass)
                .ok_or_else(|| RenderProcError::step(index, ty, "no pass registered for type"))?;
            imp.on_reinit_rendering().map_err(|e| {
                RenderProcError::step(index, ty, format!("on_reinit_rendering failed: {e:#}"))
            })?;
            return Ok(RenderStep::named(pass));
        }

        Err(RenderProcError::step(index, ty, "unknown render step type"))
    }

    fn build_barrier(
        &mut self,
        index: usize,
        ty: &str,
        desc: &serde_json::Value,
    ) -> RenderProcResult<RenderStep> {
        let barrier =
            BarrierDesc::deserialize(desc).map_err(|e| RenderProcError::step(index, ty, e))?;
        let layout = |name: &str| {
            ImageLayout::from_name(name).ok_or_else(|| {
                RenderProcError::step(index, ty, format!("unknown image layout '{name}'"))
            })
        };
        let source = layout(&barrier.source_image_layout)?;
        let target = layout(&barrier.target_image_layout)?;
        let image = self
            .names
            .intern(&barrier.image)
            .ok_or_else(|| RenderProcError::step(index, ty, "name table exhausted"))?;
        Ok(RenderStep::barrier(source, target, image))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/loader.rs"]
mod tests;
