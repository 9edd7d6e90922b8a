/// Opaque handle to a scene object (draw call, mesh component or scene node).
///
/// The engine never interprets the value; it only moves handles between the scene
/// collaborators and the passes reading the visibility buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ref(pub u32);

impl Ref {
    /// Reserved value that never names a live object.
    pub const INVALID: Self = Self(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Handle to a culling frustum owned by the scene collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrustumRef(pub u32);

/// Handle to a live GPU image owned by the graphics collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRef(pub u32);

/// Position of a generic pass instance inside its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolIndex(pub u8);

impl PoolIndex {
    /// Number of addressable slots per pool.
    pub const CAPACITY: usize = u8::MAX as usize + 1;

    pub fn from_len(len: usize) -> Option<Self> {
        u8::try_from(len).ok().map(Self)
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

/// Monotonic count of frames rendered by an engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
