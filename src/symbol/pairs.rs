// Thu Oct 15 2026 - Alex

use crate::symbol::error::SymbolError;

/// A decorated linker name together with its human readable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub decorated: String,
    pub undecorated: String,
}

impl SymbolRecord {
    pub fn new(decorated: impl Into<String>, undecorated: impl Into<String>) -> Self {
        Self {
            decorated: decorated.into(),
            undecorated: undecorated.into(),
        }
    }
}

/// Decoder requests paired with their responses. Only constructible from
/// sequences of equal length.
#[derive(Debug, Clone, Default)]
pub struct SymbolPairs {
    records: Vec<SymbolRecord>,
}

impl SymbolPairs {
    pub fn zip(decorated: Vec<String>, undecorated: Vec<String>) -> Result<Self, SymbolError> {
        if decorated.len() != undecorated.len() {
            return Err(SymbolError::CardinalityMismatch {
                requested: decorated.len(),
                decoded: undecorated.len(),
            });
        }

        let records = decorated
            .into_iter()
            .zip(undecorated)
            .map(|(decorated, undecorated)| SymbolRecord { decorated, undecorated })
            .collect();

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.records.iter()
    }
}

impl IntoIterator for SymbolPairs {
    type Item = SymbolRecord;
    type IntoIter = std::vec::IntoIter<SymbolRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
