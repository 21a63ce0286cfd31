pub mod builtin;

use std::collections::HashSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("shader catalog must contain at least one shader")]
    Empty,
    #[error("shader at position {0} has an empty name")]
    EmptyName(usize),
    #[error("shader '{0}' has an empty source")]
    EmptySource(String),
    #[error("shader name '{0}' appears more than once")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderEntry {
    pub name: String,
    pub source: String,
}

impl ShaderEntry {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Ordered, immutable list of fragment shaders. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCatalog {
    entries: Vec<ShaderEntry>,
}

impl ShaderCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    pub fn from_entries(entries: Vec<ShaderEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (position, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(position));
            }
            if entry.source.trim().is_empty() {
                return Err(CatalogError::EmptySource(entry.name.clone()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShaderEntry> {
        self.entries.get(index)
    }

    /// Source of the shader at `index`, wrapping around the catalog length.
    pub fn source(&self, index: usize) -> &str {
        &self.entries[index % self.entries.len()].source
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderEntry> {
        self.entries.iter()
    }
}

impl Default for ShaderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn builtin_entries() -> Vec<ShaderEntry> {
    builtin::BUILTIN
        .iter()
        .map(|(name, source)| ShaderEntry::new(*name, *source))
        .collect()
}
