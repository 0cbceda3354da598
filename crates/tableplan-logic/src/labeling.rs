//! Human-facing table labels.
//!
//! Within each class, tables are numbered from the bottom of the room up,
//! left to right within a row: fixed tables get plain numbers, the others a
//! class prefix (`T`, `R`, `C`, `D`). The order is what staff see on the
//! printed plan, so it must not drift.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LABELS_PER_CLASS;
use crate::model::{FloorPlan, Table, TableClass};

/// Table id → label.
pub type TableLabels = BTreeMap<String, String>;

/// Maximum labels handed out per class. Tables past the cap stay unlabelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLimits {
    pub fixed: usize,
    pub rect: usize,
    pub round: usize,
    pub sofa: usize,
    pub standing: usize,
}

impl Default for LabelLimits {
    fn default() -> Self {
        Self {
            fixed: DEFAULT_LABELS_PER_CLASS,
            rect: DEFAULT_LABELS_PER_CLASS,
            round: DEFAULT_LABELS_PER_CLASS,
            sofa: DEFAULT_LABELS_PER_CLASS,
            standing: DEFAULT_LABELS_PER_CLASS,
        }
    }
}

impl LabelLimits {
    pub fn limit(&self, class: TableClass) -> usize {
        match class {
            TableClass::Fixed => self.fixed,
            TableClass::Rect => self.rect,
            TableClass::Round => self.round,
            TableClass::Sofa => self.sofa,
            TableClass::Standing => self.standing,
        }
    }
}

pub fn label_prefix(class: TableClass) -> &'static str {
    match class {
        TableClass::Fixed => "",
        TableClass::Rect => "T",
        TableClass::Round => "R",
        TableClass::Sofa => "C",
        TableClass::Standing => "D",
    }
}

/// y descending, then x ascending.
fn reading_order(a: &Table, b: &Table) -> Ordering {
    let (ax, ay) = a.shape.anchor();
    let (bx, by) = b.shape.anchor();
    by.total_cmp(&ay).then(ax.total_cmp(&bx))
}

/// Labels for every table of a known class, without touching the plan.
pub fn compute_labels(plan: &FloorPlan, limits: &LabelLimits) -> TableLabels {
    let mut labels = TableLabels::new();
    for class in TableClass::ALL {
        let mut tables: Vec<&Table> = plan
            .tables
            .iter()
            .filter(|t| t.class() == Some(class))
            .collect();
        tables.sort_by(|a, b| reading_order(a, b));
        for (n, table) in tables.into_iter().take(limits.limit(class)).enumerate() {
            labels.insert(table.id.clone(), format!("{}{}", label_prefix(class), n + 1));
        }
    }
    labels
}

/// [`compute_labels`], written onto the tables. Tables without a label are cleared.
pub fn persist_labels(plan: &mut FloorPlan, limits: &LabelLimits) -> TableLabels {
    let labels = compute_labels(plan, limits);
    for table in &mut plan.tables {
        table.label = labels.get(&table.id).cloned();
    }
    labels
}
