use super::{GenericPass, GenericPassFactory, PassContext};
use crate::foundation::core::PoolIndex;
use crate::step::GenericPassKind;

/// The three generic pass pools plus the factory that fills them.
///
/// Pools exclusively own their instances. An instance is destroyed before it is dropped; the
/// only way to drop instances is [`PassPools::destroy_all`].
pub struct PassPools<F: GenericPassFactory> {
    factory: F,
    fullscreen: Vec<F::Fullscreen>,
    mesh: Vec<F::Mesh>,
    blur: Vec<F::Blur>,
}

impl<F: GenericPassFactory> PassPools<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            fullscreen: Vec::new(),
            mesh: Vec::new(),
            blur: Vec::new(),
        }
    }

    /// Construct a new `kind` instance at the end of its pool and initialize it from `desc`.
    ///
    /// The instance stays in the pool even if `init` fails, so the next teardown destroys it.
    pub(crate) fn create(
        &mut self,
        kind: GenericPassKind,
        desc: &serde_json::Value,
    ) -> anyhow::Result<PoolIndex> {
        match kind {
            GenericPassKind::Fullscreen => {
                let pass = self.factory.create_fullscreen();
                push_and_init(&mut self.fullscreen, pass, desc)
            }
            GenericPassKind::Mesh => {
                let pass = self.factory.create_mesh();
                push_and_init(&mut self.mesh, pass, desc)
            }
            GenericPassKind::Blur => {
                let pass = self.factory.create_blur();
                push_and_init(&mut self.blur, pass, desc)
            }
        }
    }

    /// Destroy every instance (fullscreen, mesh, then blur; each in pool order) and clear.
    pub(crate) fn destroy_all(&mut self) {
        destroy_pool(&mut self.fullscreen);
        destroy_pool(&mut self.mesh);
        destroy_pool(&mut self.blur);
    }

    /// Returns `false` when `index` does not name a live instance.
    pub(crate) fn render(
        &mut self,
        kind: GenericPassKind,
        index: PoolIndex,
        ctx: &PassContext<'_>,
        delta_t: f32,
    ) -> bool {
        let i = index.as_usize();
        match kind {
            GenericPassKind::Fullscreen => render_in(&mut self.fullscreen, i, ctx, delta_t),
            GenericPassKind::Mesh => render_in(&mut self.mesh, i, ctx, delta_t),
            GenericPassKind::Blur => render_in(&mut self.blur, i, ctx, delta_t),
        }
    }

    pub fn len(&self, kind: GenericPassKind) -> usize {
        match kind {
            GenericPassKind::Fullscreen => self.fullscreen.len(),
            GenericPassKind::Mesh => self.mesh.len(),
            GenericPassKind::Blur => self.blur.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        GenericPassKind::ALL.into_iter().all(|k| self.len(k) == 0)
    }

    pub fn fullscreen(&self) -> &[F::Fullscreen] {
        &self.fullscreen
    }

    pub fn mesh(&self) -> &[F::Mesh] {
        &self.mesh
    }

    pub fn blur(&self) -> &[F::Blur] {
        &self.blur
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

fn push_and_init<P: GenericPass>(
    pool: &mut Vec<P>,
    pass: P,
    desc: &serde_json::Value,
) -> anyhow::Result<PoolIndex> {
    let index = PoolIndex::from_len(pool.len()).ok_or_else(|| {
        anyhow::anyhow!("pool is full ({} instances)", PoolIndex::CAPACITY)
    })?;
    pool.push(pass);
    let slot = pool.len() - 1;
    pool[slot].init(desc)?;
    Ok(index)
}

fn render_in<P: GenericPass>(
    pool: &mut [P],
    i: usize,
    ctx: &PassContext<'_>,
    delta_t: f32,
) -> bool {
    match pool.get_mut(i) {
        Some(pass) => {
            pass.render(ctx, delta_t);
            true
        }
        None => false,
    }
}

fn destroy_pool<P: GenericPass>(pool: &mut Vec<P>) {
    for pass in pool.iter_mut() {
        pass.destroy();
    }
    pool.clear();
}

#[cfg(test)]
#[path = "../../tests/unit/passes/pool.rs"]
mod tests;
