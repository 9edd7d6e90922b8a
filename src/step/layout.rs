/// GPU image layout tag carried by barrier steps.
///
/// Discriminants match the core Vulkan `VkImageLayout` values for the first nine entries so a
/// graphics collaborator can forward them directly. `PresentSrc` does not fit the one-byte code
/// and is mapped by [`ImageLayout::vk_code`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageLayout {
    Undefined = 0,
    General = 1,
    ColorAttachment = 2,
    DepthStencilAttachment = 3,
    DepthStencilReadOnly = 4,
    ShaderReadOnly = 5,
    TransferSrc = 6,
    TransferDst = 7,
    Preinitialized = 8,
    PresentSrc = 9,
}

const LAYOUT_NAMES: [(&str, ImageLayout); 10] = [
    ("Undefined", ImageLayout::Undefined),
    ("General", ImageLayout::General),
    ("ColorAttachment", ImageLayout::ColorAttachment),
    ("DepthStencilAttachment", ImageLayout::DepthStencilAttachment),
    ("DepthStencilReadOnly", ImageLayout::DepthStencilReadOnly),
    ("ShaderReadOnly", ImageLayout::ShaderReadOnly),
    ("TransferSrc", ImageLayout::TransferSrc),
    ("TransferDst", ImageLayout::TransferDst),
    ("Preinitialized", ImageLayout::Preinitialized),
    ("PresentSrc", ImageLayout::PresentSrc),
];

const VK_IMAGE_LAYOUT_PRESENT_SRC_KHR: u32 = 1_000_001_002;

impl ImageLayout {
    /// Map a config-authored layout name through the fixed layout table.
    pub fn from_name(name: &str) -> Option<Self> {
        LAYOUT_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, layout)| *layout)
    }

    pub fn name(self) -> &'static str {
        LAYOUT_NAMES[self.code() as usize].0
    }

    /// One-byte code stored in barrier steps.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        LAYOUT_NAMES.get(usize::from(code)).map(|(_, layout)| *layout)
    }

    /// Value of the equivalent `VkImageLayout`.
    pub fn vk_code(self) -> u32 {
        match self {
            Self::PresentSrc => VK_IMAGE_LAYOUT_PRESENT_SRC_KHR,
            other => u32::from(other.code()),
        }
    }
}

impl std::fmt::Display for ImageLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/step/layout.rs"]
mod tests;
