//! Interfaces of the systems a frame is orchestrated across.
//!
//! None of these are implemented by the engine. A host wires in its graphics backend, scene
//! managers and uniform allocator; [`crate::headless`] provides GPU-less stand-ins.

use crate::foundation::core::{FrustumRef, ImageRef, Ref};
use crate::step::layout::ImageLayout;
use crate::visibility::VisibilityBuffers;

/// Presentation surface, frame bracketing and image barriers.
pub trait RenderSystem {
    /// Recreate the swap chain if the surface changed size.
    fn resize_swap_chain(&mut self);

    fn begin_frame(&mut self);

    fn end_frame(&mut self);

    /// Resolve a config-authored image name to a live image.
    fn image_by_name(&self, name: &str) -> Option<ImageRef>;

    fn insert_image_memory_barrier(
        &mut self,
        image: ImageRef,
        source: ImageLayout,
        target: ImageLayout,
    );
}

/// Camera, frustum and mesh managers.
pub trait SceneSystem {
    fn update_camera_frustums(&mut self);

    fn active_camera(&self) -> Ref;

    fn camera_frustum(&self, camera: Ref) -> FrustumRef;

    fn prepare_frustums_for_rendering(&mut self);

    /// Cull scene nodes against `frustums` (camera first, then shadow frustums).
    fn cull_nodes(&mut self, frustums: &[FrustumRef]);

    /// Fill `visibility` for `frustums`. May push from several worker threads.
    fn collect_draw_calls_and_mesh_components(
        &mut self,
        frustums: &[FrustumRef],
        visibility: &VisibilityBuffers,
    );

    fn update_per_instance_data(&mut self, frustum_idx: usize, visibility: &VisibilityBuffers);
}

/// Uniform buffer layout and per-frame allocator.
pub trait UniformManager {
    /// Load the `uniformBuffers` section of a renderer config.
    fn load(&mut self, uniform_buffers: &serde_json::Value) -> anyhow::Result<()>;

    fn reset_allocator(&mut self);

    fn update_per_frame_uniform_buffer_data(&mut self, camera: Ref);

    fn update_uniform_buffers(&mut self);
}

/// Collaborators borrowed for the duration of one `render_frame` call.
pub struct FrameServices<'a> {
    pub render_system: &'a mut dyn RenderSystem,
    pub scene: &'a mut dyn SceneSystem,
    pub uniforms: &'a mut dyn UniformManager,
}
