//! Placement constants: dynamic table dimensions and party-size thresholds.
//!
//! The thresholds were tuned by hand against real service nights and are not
//! derived from any model. Changing one changes which tables small groups get.

/// Geometry of tables the engine synthesizes (plan units, 1 unit ≈ 1 cm).
pub mod dynamic {
    /// Width of one six-seat rectangle unit.
    pub const UNIT_WIDTH: f64 = 120.0;
    /// Depth of a rectangle unit.
    pub const UNIT_HEIGHT: f64 = 60.0;
    /// Gap between units inside one aligned cluster.
    pub const UNIT_GAP: f64 = 10.0;
    /// Radius of a synthesized round table.
    pub const ROUND_RADIUS: f64 = 50.0;
    /// Seats at a synthesized round table.
    pub const ROUND_CAPACITY: u32 = 10;

    pub const RECT_ID_PREFIX: &str = "dyn-rect";
    pub const ROUND_ID_PREFIX: &str = "dyn-round";

    /// Total width of a cluster of `units` rectangles laid end to end.
    pub fn cluster_width(units: u32) -> f64 {
        let units = units.max(1) as f64;
        units * UNIT_WIDTH + (units - 1.0) * UNIT_GAP
    }
}

/// Party-size cutoffs that select placement tactics.
pub mod thresholds {
    /// Parties up to this size are served from the fixed-table area.
    pub const SMALL_PARTY_MAX: u32 = 4;
    /// Parties of at least this size get a dedicated cluster before any existing table.
    pub const EARLY_CLUSTER_MIN_PAX: u32 = 13;
    /// Parties of at least this size get a cluster once single rectangles fail.
    pub const CLUSTER_MIN_PAX: u32 = 9;
}

/// Grid cell used by the spot finder when the room does not declare one.
pub const DEFAULT_GRID: f64 = 50.0;

/// Labels handed out per table class unless configured otherwise.
pub const DEFAULT_LABELS_PER_CLASS: usize = 20;

#[cfg(test)]
mod tests {
    use super::dynamic::*;

    #[test]
    fn test_cluster_width() {
        assert_eq!(cluster_width(1), 120.0);
        assert_eq!(cluster_width(2), 250.0);
        assert_eq!(cluster_width(3), 380.0);
        assert_eq!(cluster_width(4), 510.0);
    }
}
