use super::*;

#[test]
fn layout_table_is_indexed_by_code() {
    for (i, (name, layout)) in LAYOUT_NAMES.iter().enumerate() {
        assert_eq!(usize::from(layout.code()), i);
        assert_eq!(layout.name(), *name);
        assert_eq!(ImageLayout::from_name(name).unwrap(), *layout);
        assert_eq!(ImageLayout::from_code(layout.code()), Some(*layout));
    }
    assert_eq!(ImageLayout::from_code(10), None);
}

#[test]
fn layout_names_are_case_sensitive() {
    assert_eq!(ImageLayout::from_name("shaderReadOnly"), None);
    assert_eq!(ImageLayout::from_name("Sideways"), None);
}

#[test]
fn vk_codes_match_core_layouts() {
    assert_eq!(ImageLayout::Undefined.vk_code(), 0);
    assert_eq!(ImageLayout::ColorAttachment.vk_code(), 2);
    assert_eq!(ImageLayout::ShaderReadOnly.vk_code(), 5);
    assert_eq!(ImageLayout::PresentSrc.vk_code(), 1_000_001_002);
}
