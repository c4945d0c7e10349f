//! Laptop record store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::CallContext;
use crate::types::{Filter, Laptop};
use crate::{PcbookError, Result};

/// Keyed store of laptop records.
///
/// Implementations hand out independent copies: nothing a caller does to a
/// saved or returned [`Laptop`] is visible through the store.
pub trait LaptopStore: Send + Sync {
    /// Store a copy of `laptop`. Fails with [`PcbookError::AlreadyExists`]
    /// if its id is taken.
    fn save(&self, laptop: &Laptop) -> Result<()>;

    /// Copy of the record with `id`, if any.
    fn find(&self, id: &str) -> Result<Option<Laptop>>;

    /// Call `found` with a copy of every record matching `filter`.
    ///
    /// `ctx` is checked before each candidate; a cancelled or expired call
    /// stops the scan with the matching error. An error from `found` stops
    /// the scan and is returned unchanged.
    fn search(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<()>,
    ) -> Result<()>;
}

/// [`LaptopStore`] backed by an in-memory ordered map.
///
/// Reads share the lock; saves take it exclusively. Search order is id order.
#[derive(Debug, Default)]
pub struct InMemoryLaptopStore {
    data: RwLock<BTreeMap<String, Laptop>>,
}

impl InMemoryLaptopStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Laptop>>> {
        self.data
            .read()
            .map_err(|e| PcbookError::Internal(format!("laptop store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Laptop>>> {
        self.data
            .write()
            .map_err(|e| PcbookError::Internal(format!("laptop store lock poisoned: {e}")))
    }
}

impl LaptopStore for InMemoryLaptopStore {
    fn save(&self, laptop: &Laptop) -> Result<()> {
        let mut data = self.write()?;
        if data.contains_key(&laptop.id) {
            return Err(PcbookError::AlreadyExists(format!(
                "laptop {} already exists",
                laptop.id
            )));
        }
        data.insert(laptop.id.clone(), laptop.clone());
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Option<Laptop>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn search(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<()>,
    ) -> Result<()> {
        // Snapshot the keys so `found` runs without the lock held.
        let ids: Vec<String> = self.read()?.keys().cloned().collect();

        for id in ids {
            ctx.check()?;

            let candidate = self
                .read()?
                .get(&id)
                .filter(|laptop| filter.matches(laptop))
                .cloned();

            if let Some(laptop) = candidate {
                found(laptop)?;
            }
        }
        Ok(())
    }
}
