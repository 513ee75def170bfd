//! The fetched munro collection and the load-state machine around it.

use crate::domain::model::Munro;

/// Ordered collection of munro records, insertion order = API response
/// order. Fetched once per run and never mutated afterwards, so positional
/// indices are stable selection keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Catalog {
    munros: Vec<Munro>,
}

impl Catalog {
    /// Wrap a fetched collection.
    pub fn new(munros: Vec<Munro>) -> Self {
        Self { munros }
    }

    /// Number of records in the collection.
    pub fn len(&self) -> usize {
        self.munros.len()
    }

    /// Returns whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.munros.is_empty()
    }

    /// Bounds-checked positional access. Out-of-range indices yield `None`
    /// rather than an undefined read.
    pub fn get(&self, index: usize) -> Option<&Munro> {
        self.munros.get(index)
    }

    /// Access the records in response order.
    pub fn munros(&self) -> &[Munro] {
        &self.munros
    }
}

/// Container-level load state.
///
/// `Loading` holds until the single fetch reports. Success moves to `Ready`
/// and never leaves it; failure moves to `Failed`, from which a user retry
/// may start a new fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Failed { reason: String },
    Ready(Catalog),
}

impl LoadState {
    /// Whether the initial fetch is still pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// The collection, if loaded.
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            LoadState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }
}
