use super::RenderPass;
use crate::step::NamedPass;

/// Capability table for named passes, indexed by [`NamedPass`].
///
/// Entries are resolved once at registration; dispatch is an array index, never a string
/// lookup.
#[derive(Default)]
pub struct PassRegistry {
    passes: [Option<Box<dyn RenderPass>>; NamedPass::COUNT],
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `imp` for `pass`, returning the implementation it replaces.
    pub fn register(
        &mut self,
        pass: NamedPass,
        imp: Box<dyn RenderPass>,
    ) -> Option<Box<dyn RenderPass>> {
        self.passes[pass.index()].replace(imp)
    }

    pub fn with(mut self, pass: NamedPass, imp: impl RenderPass + 'static) -> Self {
        self.register(pass, Box::new(imp));
        self
    }

    pub fn is_registered(&self, pass: NamedPass) -> bool {
        self.passes[pass.index()].is_some()
    }

    pub fn get_mut(&mut self, pass: NamedPass) -> Option<&mut (dyn RenderPass + 'static)> {
        self.passes[pass.index()].as_deref_mut()
    }

    pub fn registered(&self) -> impl Iterator<Item = NamedPass> + '_ {
        NamedPass::ALL
            .into_iter()
            .filter(|p| self.is_registered(*p))
    }
}

impl std::fmt::Debug for PassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassRegistry")
            .field("registered", &self.registered().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/passes/registry.rs"]
mod tests;
