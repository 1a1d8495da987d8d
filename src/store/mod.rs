//! Keyed package storage.
//!
//! [`ChainedTable`] is a from-scratch separate-chaining index; [`PackageStore`]
//! wraps it with the package-id keyed contract the engine and the query
//! layer rely on.

mod table;

pub use table::ChainedTable;

use crate::models::Package;

/// All packages of the day, keyed by package id.
#[derive(Debug, Clone, Default)]
pub struct PackageStore {
    table: ChainedTable<u32, Package>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a package under its own id, replacing any previous record.
    pub fn insert(&mut self, package: Package) -> Option<Package> {
        self.table.insert(package.id(), package)
    }

    pub fn lookup(&self, id: u32) -> Option<&Package> {
        self.table.get(&id)
    }

    pub(crate) fn lookup_mut(&mut self, id: u32) -> Option<&mut Package> {
        self.table.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Package ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.table.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Packages in ascending id order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.ids().into_iter().filter_map(move |id| self.table.get(&id))
    }
}
