//! Seating capacity per table.
//!
//! A table's declared capacity wins when it is positive; otherwise the kind
//! default applies. These defaults decide whether a party fits at all, so
//! they live here as named constants and nowhere else.

use crate::model::{Table, TableKind};

/// Seats assumed when a table declares no capacity.
pub mod defaults {
    pub const RECT: u32 = 6;
    pub const ROUND: u32 = 10;
    pub const FIXED: u32 = 4;
    pub const SOFA: u32 = 5;
    pub const STANDING: u32 = 8;
    pub const OTHER: u32 = 2;
}

/// Extra "head" seats a single rectangle can take.
pub const RECT_HEAD_SEATS: u32 = 2;
/// Hard cap on a rectangle seated with head extension.
pub const RECT_EXTENDED_MAX: u32 = 8;

/// Seats per unit of a synthesized rectangle cluster.
pub const CLUSTER_UNIT_SEATS: u32 = 6;
/// Longest cluster the engine will build.
pub const CLUSTER_MAX_UNITS: u32 = 4;

pub fn default_capacity(kind: &TableKind) -> u32 {
    match kind {
        TableKind::Rect => defaults::RECT,
        TableKind::Round => defaults::ROUND,
        TableKind::Fixed => defaults::FIXED,
        TableKind::Sofa => defaults::SOFA,
        TableKind::Standing => defaults::STANDING,
        TableKind::Other(_) => defaults::OTHER,
    }
}

pub fn effective_capacity(table: &Table) -> u32 {
    match table.capacity {
        Some(c) if c > 0 => c,
        _ => default_capacity(&table.kind),
    }
}

/// Capacity of a rectangle seated with head extension.
///
/// `min(8, base + 2)`, never below the base capacity. Non-rectangle kinds
/// have no extension.
pub fn extended_capacity(table: &Table) -> u32 {
    let base = effective_capacity(table);
    if table.kind != TableKind::Rect {
        return base;
    }
    base.max((base + RECT_HEAD_SEATS).min(RECT_EXTENDED_MAX))
}

/// Units needed for one cluster seating `pax`, capped at [`CLUSTER_MAX_UNITS`].
pub fn cluster_units_for(pax: u32) -> u32 {
    pax.div_ceil(CLUSTER_UNIT_SEATS).clamp(1, CLUSTER_MAX_UNITS)
}

pub fn cluster_capacity(units: u32) -> u32 {
    units * CLUSTER_UNIT_SEATS
}
