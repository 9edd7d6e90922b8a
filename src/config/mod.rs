pub(crate) mod document;
pub(crate) mod loader;
pub(crate) mod settings;
