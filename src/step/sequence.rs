use super::{RenderStep, RenderStepKind};
use crate::foundation::intern::NameTable;

/// Ordered list of render steps. Insertion order is execution order.
///
/// Built wholesale by the config loader and replayed unchanged every frame; there is no
/// incremental mutation besides [`StepSequence::clear`] followed by a rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepSequence {
    steps: Vec<RenderStep>,
}

impl StepSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, step: RenderStep) {
        self.steps.push(step);
    }

    pub(crate) fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_slice(&self) -> &[RenderStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderStep> {
        self.steps.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = RenderStepKind> + '_ {
        self.steps.iter().map(RenderStep::kind)
    }

    /// Deterministic text listing, one line per step.
    pub fn dump(&self, names: &NameTable) -> String {
        let mut s = String::new();
        s.push_str(&format!("steps: {}\n", self.steps.len()));
        for (i, step) in self.steps.iter().enumerate() {
            let line = match *step {
                RenderStep::ImageMemoryBarrier {
                    source,
                    target,
                    image,
                } => format!(
                    "  #{i}: ImageMemoryBarrier image={} {source} -> {target}\n",
                    names.get(image).unwrap_or("<unnamed>")
                ),
                RenderStep::Generic { kind, index } => {
                    format!("  #{i}: {} index={}\n", kind.type_name(), index.0)
                }
                RenderStep::Named(pass) => format!("  #{i}: {}\n", pass.type_name()),
            };
            s.push_str(&line);
        }
        s
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a RenderStep;
    type IntoIter = std::slice::Iter<'a, RenderStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/step/sequence.rs"]
mod tests;
