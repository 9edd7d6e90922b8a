use super::FrameEngine;
use super::collaborators::{FrameServices, RenderSystem};
use crate::foundation::core::FrameIndex;
use crate::foundation::intern::NameTable;
use crate::passes::pool::PassPools;
use crate::passes::registry::PassRegistry;
use crate::passes::{GenericPassFactory, PassContext};
use crate::step::{NamedPass, RenderStep};
use crate::step::sequence::StepSequence;

/// Counters of one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: FrameIndex,
    pub steps: usize,
    pub frustums: usize,
    pub draw_calls: usize,
    pub mesh_components: usize,
    /// Visibility pushes rejected because a buffer was full.
    pub dropped: usize,
}

impl<F: GenericPassFactory> FrameEngine<F> {
    /// Run one frame: resize check, begin, prepare and cull, collect visibility, replay the
    /// step sequence, end.
    ///
    /// # Panics
    ///
    /// If a step cannot be dispatched: its pool instance, registered pass or image is gone.
    pub fn render_frame(&mut self, delta_t: f32, services: &mut FrameServices<'_>) -> FrameStats {
        let _span = tracing::info_span!("render_frame", frame = self.frame.0).entered();

        services.render_system.resize_swap_chain();
        services.render_system.begin_frame();

        self.prepare_and_cull(services);
        self.collect_visibility(services);
        self.execute_render_steps(delta_t, &mut *services.render_system);

        services.render_system.end_frame();

        let stats = FrameStats {
            frame: self.frame,
            steps: self.steps.len(),
            frustums: self.active_frustums.len(),
            draw_calls: self.visibility.total_draw_calls(),
            mesh_components: self.visibility.total_mesh_components(),
            dropped: self.visibility.dropped(),
        };
        self.frame = FrameIndex(self.frame.0 + 1);
        stats
    }

    fn prepare_and_cull(&mut self, services: &mut FrameServices<'_>) {
        let _span = tracing::info_span!("preparation_and_culling").entered();
        let scene = &mut *services.scene;

        scene.update_camera_frustums();

        self.shadow_frustums.clear();
        if let Some(shadow) = self.registry.get_mut(NamedPass::Shadow) {
            shadow.prepare_frustums(&mut self.shadow_frustums);
        }

        scene.prepare_frustums_for_rendering();

        let camera = scene.active_camera();
        services.uniforms.reset_allocator();
        services.uniforms.update_per_frame_uniform_buffer_data(camera);
        services.uniforms.update_uniform_buffers();

        self.active_frustums.clear();
        self.active_frustums.push(scene.camera_frustum(camera));
        self.active_frustums
            .extend_from_slice(&self.shadow_frustums);

        let cap = self.visibility.limits().max_frustums_per_frame;
        if self.active_frustums.len() > cap {
            tracing::warn!(
                frustums = self.active_frustums.len(),
                capacity = cap,
                "frustum list exceeds visibility capacity, excess frustums are not culled"
            );
            self.active_frustums.truncate(cap);
        }

        scene.cull_nodes(&self.active_frustums);
    }

    fn collect_visibility(&mut self, services: &mut FrameServices<'_>) {
        let _span = tracing::info_span!("collect_visibility").entered();
        self.visibility.clear();
        services
            .scene
            .collect_draw_calls_and_mesh_components(&self.active_frustums, &self.visibility);
        services.scene.update_per_instance_data(0, &self.visibility);
    }

    fn execute_render_steps(&mut self, delta_t: f32, render_system: &mut dyn RenderSystem) {
        let _span = tracing::info_span!("execute_render_steps", steps = self.steps.len()).entered();
        let Self {
            registry,
            pools,
            steps,
            names,
            visibility,
            active_frustums,
            frame,
            ..
        } = self;
        let ctx = PassContext {
            visibility: &*visibility,
            frustums: &active_frustums[..],
            frame: *frame,
        };
        replay(steps, names, pools, registry, &ctx, delta_t, render_system);
    }
}

fn replay<F: GenericPassFactory>(
    steps: &StepSequence,
    names: &NameTable,
    pools: &mut PassPools<F>,
    registry: &mut PassRegistry,
    ctx: &PassContext<'_>,
    delta_t: f32,
    render_system: &mut dyn RenderSystem,
) {
    for (i, step) in steps.iter().enumerate() {
        match *step {
            RenderStep::ImageMemoryBarrier {
                source,
                target,
                image,
            } => {
                let Some(image) = names.get(image).and_then(|n| render_system.image_by_name(n))
                else {
                    panic!("render step #{i}: barrier image {image:?} does not resolve");
                };
                render_system.insert_image_memory_barrier(image, source, target);
            }
            RenderStep::Generic { kind, index } => {
                if !pools.render(kind, index, ctx, delta_t) {
                    panic!(
                        "render step #{i}: no {} instance at pool index {}",
                        kind.type_name(),
                        index.0
                    );
                }
            }
            RenderStep::Named(pass) => match registry.get_mut(pass) {
                Some(imp) => imp.render(ctx, delta_t),
                None => panic!("render step #{i}: {} is not registered", pass.type_name()),
            },
        }
    }
}
