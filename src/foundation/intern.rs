use std::collections::HashMap;

/// Interned string key.
///
/// Barrier steps carry a `Name` instead of an owned string so a step stays a small `Copy`
/// value. The matching text lives in the owning [`NameTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(pub(crate) u32);

impl Name {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Append-only string interner.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    ids_by_str: HashMap<String, Name>,
    strs_by_id: Vec<String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` only once `u32::MAX` distinct strings have been interned.
    pub fn intern(&mut self, s: &str) -> Option<Name> {
        if let Some(&id) = self.ids_by_str.get(s) {
            return Some(id);
        }
        let id = Name(u32::try_from(self.strs_by_id.len()).ok()?);
        self.strs_by_id.push(s.to_owned());
        self.ids_by_str.insert(s.to_owned(), id);
        Some(id)
    }

    pub fn lookup(&self, s: &str) -> Option<Name> {
        self.ids_by_str.get(s).copied()
    }

    pub fn get(&self, id: Name) -> Option<&str> {
        self.strs_by_id.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strs_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strs_by_id.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/intern.rs"]
mod tests;
