use std::collections::HashMap;
use std::sync::RwLock;

/// Process-wide cache version table.
///
/// Names are interface names for listing entries and detail class names for
/// detail entries. A name without an entry is version 0.
#[derive(Debug, Default)]
pub struct Versions {
    table: RwLock<HashMap<String, u32>>,
}

impl Versions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let table = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            table: RwLock::new(table),
        }
    }

    pub fn get(&self, name: &str) -> u32 {
        match self.table.read() {
            Ok(table) => table.get(name).copied().unwrap_or(0),
            Err(poisoned) => poisoned.into_inner().get(name).copied().unwrap_or(0),
        }
    }

    pub fn set(&self, name: &str, version: u32) {
        let mut table = match self.table.write() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        table.insert(name.to_string(), version);
    }

    /// Increments the version of `name` and returns the new value.
    pub fn bump(&self, name: &str) -> u32 {
        let mut table = match self.table.write() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        let version = table.entry(name.to_string()).or_insert(0);
        *version += 1;
        *version
    }
}
