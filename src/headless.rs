//! GPU-less collaborators for dry runs.
//!
//! [`HeadlessWorld`] bundles one implementation of each collaborator trait. Images resolve from
//! a name table filled by [`HeadlessRenderSystem::register_pipeline_images`], the scene is a
//! synthetic object set culled in parallel on a dedicated rayon pool, and passes only count
//! what they were asked to do.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::engine::collaborators::{FrameServices, RenderSystem, SceneSystem, UniformManager};
use crate::foundation::core::{FrustumRef, ImageRef, Ref};
use crate::foundation::error::{RenderProcError, RenderProcResult};
use crate::foundation::intern::NameTable;
use crate::passes::registry::PassRegistry;
use crate::passes::{GenericPass, GenericPassFactory, PassContext, RenderPass};
use crate::step::layout::ImageLayout;
use crate::step::sequence::StepSequence;
use crate::step::{GenericPassKind, NamedPass};
use crate::visibility::VisibilityBuffers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadlessOptions {
    /// Number of synthetic scene objects.
    pub objects: usize,
    /// Objects are spread round-robin over this many material passes.
    pub material_passes: usize,
    /// Frustums the headless shadow pass contributes each frame.
    pub shadow_cascades: usize,
    /// Culling worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            objects: 1024,
            material_passes: 4,
            shadow_cascades: 2,
            threads: None,
        }
    }
}

/// One recorded layout transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierRecord {
    pub image: ImageRef,
    pub source: ImageLayout,
    pub target: ImageLayout,
}

#[derive(Debug, Default)]
pub struct HeadlessRenderSystem {
    images: HashMap<String, ImageRef>,
    barriers: Vec<BarrierRecord>,
    pub resizes: u64,
    pub frames_begun: u64,
    pub frames_ended: u64,
}

impl HeadlessRenderSystem {
    pub fn register_image(&mut self, name: &str) -> ImageRef {
        let next = ImageRef(self.images.len() as u32);
        *self.images.entry(name.to_owned()).or_insert(next)
    }

    /// Register every image a barrier step of `steps` names.
    pub fn register_pipeline_images(&mut self, steps: &StepSequence, names: &NameTable) {
        for name in steps.iter().filter_map(|s| s.resource_name()) {
            if let Some(s) = names.get(name) {
                self.register_image(s);
            }
        }
    }

    pub fn barriers(&self) -> &[BarrierRecord] {
        &self.barriers
    }
}

impl RenderSystem for HeadlessRenderSystem {
    fn resize_swap_chain(&mut self) {
        self.resizes += 1;
    }

    fn begin_frame(&mut self) {
        self.frames_begun += 1;
        self.barriers.clear();
    }

    fn end_frame(&mut self) {
        self.frames_ended += 1;
    }

    fn image_by_name(&self, name: &str) -> Option<ImageRef> {
        self.images.get(name).copied()
    }

    fn insert_image_memory_barrier(
        &mut self,
        image: ImageRef,
        source: ImageLayout,
        target: ImageLayout,
    ) {
        tracing::trace!(image = image.0, %source, %target, "image barrier");
        self.barriers.push(BarrierRecord {
            image,
            source,
            target,
        });
    }
}

/// Synthetic scene. Object `i` is seen by the camera unless `i % 3 == 0`, and by shadow
/// frustum `f` when `(i + f) % 4 == 0`.
pub struct HeadlessScene {
    objects: usize,
    material_passes: usize,
    pool: rayon::ThreadPool,
    pub culled_frustums: usize,
    pub instance_updates: usize,
}

impl HeadlessScene {
    pub fn new(opts: &HeadlessOptions) -> RenderProcResult<Self> {
        Ok(Self {
            objects: opts.objects,
            material_passes: opts.material_passes.max(1),
            pool: build_thread_pool(opts.threads)?,
            culled_frustums: 0,
            instance_updates: 0,
        })
    }

    pub fn is_visible(object: usize, frustum_idx: usize) -> bool {
        if frustum_idx == 0 {
            object % 3 != 0
        } else {
            (object + frustum_idx) % 4 == 0
        }
    }
}

impl SceneSystem for HeadlessScene {
    fn update_camera_frustums(&mut self) {}

    fn active_camera(&self) -> Ref {
        Ref(0)
    }

    fn camera_frustum(&self, camera: Ref) -> FrustumRef {
        FrustumRef(camera.0)
    }

    fn prepare_frustums_for_rendering(&mut self) {}

    fn cull_nodes(&mut self, frustums: &[FrustumRef]) {
        self.culled_frustums = frustums.len();
    }

    fn collect_draw_calls_and_mesh_components(
        &mut self,
        frustums: &[FrustumRef],
        visibility: &VisibilityBuffers,
    ) {
        let (objects, material_passes) = (self.objects, self.material_passes);
        let frustum_count = frustums.len();
        self.pool.install(|| {
            (0..objects).into_par_iter().for_each(|i| {
                let handle = Ref(i as u32);
                for f in 0..frustum_count {
                    if Self::is_visible(i, f) {
                        visibility.push_draw_call(f, i % material_passes, handle);
                        visibility.push_mesh_component(f, handle);
                    }
                }
            });
        });
    }

    fn update_per_instance_data(&mut self, frustum_idx: usize, visibility: &VisibilityBuffers) {
        self.instance_updates = visibility.mesh_components(frustum_idx).len();
    }
}

#[derive(Debug, Default)]
pub struct HeadlessUniforms {
    pub buffers: usize,
    pub allocations: u64,
    pub last_camera: Option<Ref>,
}

impl UniformManager for HeadlessUniforms {
    fn load(&mut self, uniform_buffers: &serde_json::Value) -> anyhow::Result<()> {
        self.buffers = match uniform_buffers {
            serde_json::Value::Array(v) => v.len(),
            serde_json::Value::Object(m) => m.len(),
            serde_json::Value::Null => 0,
            other => anyhow::bail!("uniformBuffers must be an array or object, got {other}"),
        };
        Ok(())
    }

    fn reset_allocator(&mut self) {
        self.allocations = 0;
    }

    fn update_per_frame_uniform_buffer_data(&mut self, camera: Ref) {
        self.last_camera = Some(camera);
        self.allocations += 1;
    }

    fn update_uniform_buffers(&mut self) {
        self.allocations += self.buffers as u64;
    }
}

/// All headless collaborators of one renderer.
pub struct HeadlessWorld {
    pub render_system: HeadlessRenderSystem,
    pub scene: HeadlessScene,
    pub uniforms: HeadlessUniforms,
}

impl HeadlessWorld {
    pub fn new(opts: &HeadlessOptions) -> RenderProcResult<Self> {
        Ok(Self {
            render_system: HeadlessRenderSystem::default(),
            scene: HeadlessScene::new(opts)?,
            uniforms: HeadlessUniforms::default(),
        })
    }

    pub fn services(&mut self) -> FrameServices<'_> {
        FrameServices {
            render_system: &mut self.render_system,
            scene: &mut self.scene,
            uniforms: &mut self.uniforms,
        }
    }
}

/// Generic pass that counts renders and remembers what it last saw.
#[derive(Debug)]
pub struct HeadlessPass {
    pub kind: GenericPassKind,
    pub label: Option<String>,
    pub renders: u64,
    pub last_visible: usize,
    pub destroyed: bool,
}

impl HeadlessPass {
    fn new(kind: GenericPassKind) -> Self {
        Self {
            kind,
            label: None,
            renders: 0,
            last_visible: 0,
            destroyed: false,
        }
    }
}

impl GenericPass for HeadlessPass {
    fn init(&mut self, desc: &serde_json::Value) -> anyhow::Result<()> {
        self.label = desc
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        tracing::debug!(kind = ?self.kind, label = ?self.label, "headless pass init");
        Ok(())
    }

    fn render(&mut self, ctx: &PassContext<'_>, _delta_t: f32) {
        self.renders += 1;
        self.last_visible = match self.kind {
            GenericPassKind::Mesh => ctx.visible_mesh_components(0).len(),
            GenericPassKind::Fullscreen | GenericPassKind::Blur => 0,
        };
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

#[derive(Debug, Default)]
pub struct HeadlessPassFactory {
    pub created: usize,
}

impl HeadlessPassFactory {
    fn make(&mut self, kind: GenericPassKind) -> HeadlessPass {
        self.created += 1;
        HeadlessPass::new(kind)
    }
}

impl GenericPassFactory for HeadlessPassFactory {
    type Fullscreen = HeadlessPass;
    type Mesh = HeadlessPass;
    type Blur = HeadlessPass;

    fn create_fullscreen(&mut self) -> HeadlessPass {
        self.make(GenericPassKind::Fullscreen)
    }

    fn create_mesh(&mut self) -> HeadlessPass {
        self.make(GenericPassKind::Mesh)
    }

    fn create_blur(&mut self) -> HeadlessPass {
        self.make(GenericPassKind::Blur)
    }
}

/// Named singleton pass. As [`NamedPass::Shadow`] it contributes `cascades` frustums.
#[derive(Debug)]
pub struct HeadlessNamedPass {
    pass: NamedPass,
    cascades: usize,
    reinits: u64,
    renders: u64,
}

impl HeadlessNamedPass {
    pub fn new(pass: NamedPass, cascades: usize) -> Self {
        Self {
            pass,
            cascades,
            reinits: 0,
            renders: 0,
        }
    }

    pub fn reinits(&self) -> u64 {
        self.reinits
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl RenderPass for HeadlessNamedPass {
    fn render(&mut self, ctx: &PassContext<'_>, _delta_t: f32) {
        self.renders += 1;
        tracing::trace!(
            pass = self.pass.type_name(),
            frustums = ctx.frustums.len(),
            "named pass render"
        );
    }

    fn on_reinit_rendering(&mut self) -> anyhow::Result<()> {
        self.reinits += 1;
        tracing::debug!(pass = self.pass.type_name(), reinits = self.reinits, "reinit rendering");
        Ok(())
    }

    fn prepare_frustums(&mut self, out: &mut Vec<FrustumRef>) {
        out.extend((1..=self.cascades).map(|c| FrustumRef(c as u32)));
    }
}

/// Registry with a headless implementation of every named pass.
pub fn headless_registry(shadow_cascades: usize) -> PassRegistry {
    NamedPass::ALL
        .into_iter()
        .fold(PassRegistry::new(), |registry, pass| {
            let cascades = if pass == NamedPass::Shadow {
                shadow_cascades
            } else {
                0
            };
            registry.with(pass, HeadlessNamedPass::new(pass, cascades))
        })
}

fn build_thread_pool(threads: Option<usize>) -> RenderProcResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RenderProcError::config("headless 'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RenderProcError::collaborator(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/headless.rs"]
mod tests;
