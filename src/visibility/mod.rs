//! Per-frame culling results.
//!
//! Draw calls are bucketed by `[frustum][material pass]`, mesh components by `[frustum]`. All
//! buckets are [`LockFreeStack`]s sized from [`VisibilityLimits`] once, at engine construction.

pub(crate) mod stack;

use crate::foundation::core::Ref;
use stack::LockFreeStack;

/// Capacity constants of the visibility buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisibilityLimits {
    /// Frustums per frame (camera plus shadow frustums).
    pub max_frustums_per_frame: usize,
    pub max_material_passes: usize,
    /// Draw calls per `(frustum, material pass)` bucket.
    pub max_draw_calls: usize,
    /// Mesh components per frustum.
    pub max_mesh_components: usize,
}

impl Default for VisibilityLimits {
    fn default() -> Self {
        Self {
            max_frustums_per_frame: 8,
            max_material_passes: 16,
            max_draw_calls: 4096,
            max_mesh_components: 4096,
        }
    }
}

/// Fixed-capacity visibility result containers.
#[derive(Debug)]
pub struct VisibilityBuffers {
    limits: VisibilityLimits,
    draw_calls: Vec<LockFreeStack>,
    mesh_components: Vec<LockFreeStack>,
}

impl VisibilityBuffers {
    pub fn new(limits: VisibilityLimits) -> Self {
        let buckets = limits
            .max_frustums_per_frame
            .saturating_mul(limits.max_material_passes);
        Self {
            limits,
            draw_calls: (0..buckets)
                .map(|_| LockFreeStack::with_capacity(limits.max_draw_calls))
                .collect(),
            mesh_components: (0..limits.max_frustums_per_frame)
                .map(|_| LockFreeStack::with_capacity(limits.max_mesh_components))
                .collect(),
        }
    }

    pub fn limits(&self) -> VisibilityLimits {
        self.limits
    }

    /// Reset every bucket to empty. Must run before the frame's collection phase.
    pub fn clear(&mut self) {
        for s in self
            .draw_calls
            .iter_mut()
            .chain(self.mesh_components.iter_mut())
        {
            s.clear();
        }
    }

    fn bucket(&self, frustum_idx: usize, material_pass: usize) -> Option<usize> {
        (frustum_idx < self.limits.max_frustums_per_frame
            && material_pass < self.limits.max_material_passes)
            .then(|| frustum_idx * self.limits.max_material_passes + material_pass)
    }

    pub fn draw_call_stack(&self, frustum_idx: usize, material_pass: usize) -> Option<&LockFreeStack> {
        self.bucket(frustum_idx, material_pass)
            .map(|b| &self.draw_calls[b])
    }

    pub fn mesh_component_stack(&self, frustum_idx: usize) -> Option<&LockFreeStack> {
        self.mesh_components.get(frustum_idx)
    }

    /// Safe to call from many threads at once. Returns `false` if the entry was dropped
    /// (bucket full or indices out of range).
    pub fn push_draw_call(&self, frustum_idx: usize, material_pass: usize, draw_call: Ref) -> bool {
        self.draw_call_stack(frustum_idx, material_pass)
            .is_some_and(|s| s.push(draw_call))
    }

    pub fn push_mesh_component(&self, frustum_idx: usize, component: Ref) -> bool {
        self.mesh_component_stack(frustum_idx)
            .is_some_and(|s| s.push(component))
    }

    pub fn draw_calls(&self, frustum_idx: usize, material_pass: usize) -> Vec<Ref> {
        self.draw_call_stack(frustum_idx, material_pass)
            .map(LockFreeStack::to_vec)
            .unwrap_or_default()
    }

    pub fn mesh_components(&self, frustum_idx: usize) -> Vec<Ref> {
        self.mesh_component_stack(frustum_idx)
            .map(LockFreeStack::to_vec)
            .unwrap_or_default()
    }

    pub fn total_draw_calls(&self) -> usize {
        self.draw_calls.iter().map(LockFreeStack::len).sum()
    }

    pub fn total_mesh_components(&self) -> usize {
        self.mesh_components.iter().map(LockFreeStack::len).sum()
    }

    /// Entries rejected by full buckets since the last `clear`.
    pub fn dropped(&self) -> usize {
        self.draw_calls
            .iter()
            .chain(self.mesh_components.iter())
            .map(LockFreeStack::dropped)
            .sum()
    }
}

impl Default for VisibilityBuffers {
    fn default() -> Self {
        Self::new(VisibilityLimits::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/mod.rs"]
mod tests;
