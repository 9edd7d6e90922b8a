//! Render step encoding.
//!
//! A [`RenderStep`] is one entry of the per-frame execution sequence. Each kind carries exactly
//! one payload: a pool index for generic passes, a layout pair plus image name for barriers, or
//! nothing for named passes resolved through the registry.

pub(crate) mod layout;
pub(crate) mod sequence;

use crate::foundation::core::PoolIndex;
use crate::foundation::intern::Name;
use layout::ImageLayout;

/// Config `type` of the built-in image layout transition step.
pub const IMAGE_MEMORY_BARRIER: &str = "ImageMemoryBarrier";

/// Built-in singleton passes resolved through the [`crate::PassRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedPass {
    Debug,
    PerPixelPicking,
    Shadow,
    Lighting,
    VolumetricLighting,
    Bloom,
}

impl NamedPass {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Debug,
        Self::PerPixelPicking,
        Self::Shadow,
        Self::Lighting,
        Self::VolumetricLighting,
        Self::Bloom,
    ];

    /// Config `type` string naming this pass.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Debug => "RenderPassDebug",
            Self::PerPixelPicking => "RenderPassPerPixelPicking",
            Self::Shadow => "RenderPassShadow",
            Self::Lighting => "RenderPassLighting",
            Self::VolumetricLighting => "RenderPassVolumetricLighting",
            Self::Bloom => "RenderPassBloom",
        }
    }

    /// Exact, case-sensitive match against [`NamedPass::type_name`].
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.type_name() == name)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Parameterized pass families owning one pool each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericPassKind {
    Fullscreen,
    Mesh,
    Blur,
}

impl GenericPassKind {
    pub const ALL: [Self; 3] = [Self::Fullscreen, Self::Mesh, Self::Blur];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Fullscreen => "RenderPassGenericFullscreen",
            Self::Mesh => "RenderPassGenericMesh",
            Self::Blur => "RenderPassGenericBlur",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }
}

/// Kind tag of a [`RenderStep`], without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStepKind {
    ImageMemoryBarrier,
    GenericFullscreen,
    GenericMesh,
    GenericBlur,
    Named(NamedPass),
}

/// One entry of the execution sequence.
///
/// `Copy` and at most eight bytes wide so the sequence replays as a flat array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStep {
    /// Transition `image` from `source` to `target` layout.
    ImageMemoryBarrier {
        source: ImageLayout,
        target: ImageLayout,
        image: Name,
    },
    /// Render the instance at `index` of the `kind` pool.
    Generic {
        kind: GenericPassKind,
        index: PoolIndex,
    },
    /// Render a registry-resolved singleton pass.
    Named(NamedPass),
}

impl RenderStep {
    pub fn barrier(source: ImageLayout, target: ImageLayout, image: Name) -> Self {
        Self::ImageMemoryBarrier {
            source,
            target,
            image,
        }
    }

    pub fn generic(kind: GenericPassKind, index: PoolIndex) -> Self {
        Self::Generic { kind, index }
    }

    pub fn named(pass: NamedPass) -> Self {
        Self::Named(pass)
    }

    pub fn kind(&self) -> RenderStepKind {
        match *self {
            Self::ImageMemoryBarrier { .. } => RenderStepKind::ImageMemoryBarrier,
            Self::Generic {
                kind: GenericPassKind::Fullscreen,
                ..
            } => RenderStepKind::GenericFullscreen,
            Self::Generic {
                kind: GenericPassKind::Mesh,
                ..
            } => RenderStepKind::GenericMesh,
            Self::Generic {
                kind: GenericPassKind::Blur,
                ..
            } => RenderStepKind::GenericBlur,
            Self::Named(pass) => RenderStepKind::Named(pass),
        }
    }

    pub fn pool_index(&self) -> Option<PoolIndex> {
        match *self {
            Self::Generic { index, .. } => Some(index),
            _ => None,
        }
    }

    /// `(source, target)` for barrier steps.
    pub fn layouts(&self) -> Option<(ImageLayout, ImageLayout)> {
        match *self {
            Self::ImageMemoryBarrier { source, target, .. } => Some((source, target)),
            _ => None,
        }
    }

    pub fn resource_name(&self) -> Option<Name> {
        match *self {
            Self::ImageMemoryBarrier { image, .. } => Some(image),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/step/mod.rs"]
mod tests;
