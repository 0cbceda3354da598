//! Pools of still-unassigned tables, one per [`TableClass`].
//!
//! Pools hold copies of the plan's tables in plan order. Removing a table from
//! its pool is how the placement run marks it taken; the plan itself is not
//! touched.

use crate::capacity::effective_capacity;
use crate::model::{Table, TableClass};

#[derive(Debug, Clone, Default)]
pub struct TablePool {
    tables: Vec<Table>,
}

impl TablePool {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn available(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn remove(&mut self, id: &str) -> Option<Table> {
        let idx = self.tables.iter().position(|t| t.id == id)?;
        Some(self.tables.remove(idx))
    }

    /// Smallest table (by effective capacity) accepted by `fits`.
    /// Ties go to the table that comes first in plan order.
    pub fn best_fit(&self, fits: impl Fn(&Table) -> bool) -> Option<&Table> {
        self.tables
            .iter()
            .filter(|t| fits(t))
            .min_by_key(|t| effective_capacity(t))
    }

    /// [`best_fit`](Self::best_fit), removing the chosen table from the pool.
    pub fn take_best_fit(&mut self, fits: impl Fn(&Table) -> bool) -> Option<Table> {
        let id = self.best_fit(fits)?.id.clone();
        self.remove(&id)
    }
}

/// The five disjoint pools a run draws existing tables from.
#[derive(Debug, Clone, Default)]
pub struct TablePools {
    pub fixed: TablePool,
    pub rect: TablePool,
    pub round: TablePool,
    pub sofa: TablePool,
    pub standing: TablePool,
}

impl TablePools {
    /// Split tables by class. Tables of unknown kind join no pool.
    pub fn partition(tables: &[Table]) -> Self {
        let mut pools = Self::default();
        for table in tables {
            if let Some(class) = table.class() {
                pools.pool_mut(class).tables.push(table.clone());
            }
        }
        pools
    }

    pub fn pool(&self, class: TableClass) -> &TablePool {
        match class {
            TableClass::Fixed => &self.fixed,
            TableClass::Rect => &self.rect,
            TableClass::Round => &self.round,
            TableClass::Sofa => &self.sofa,
            TableClass::Standing => &self.standing,
        }
    }

    pub fn pool_mut(&mut self, class: TableClass) -> &mut TablePool {
        match class {
            TableClass::Fixed => &mut self.fixed,
            TableClass::Rect => &mut self.rect,
            TableClass::Round => &mut self.round,
            TableClass::Sofa => &mut self.sofa,
            TableClass::Standing => &mut self.standing,
        }
    }

    pub fn total(&self) -> usize {
        TableClass::ALL.iter().map(|c| self.pool(*c).len()).sum()
    }
}
