//! Per-run diagnostics returned alongside the assignment.

use serde::Serialize;

use crate::placement::Tactic;

/// How one reservation fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationOutcome {
    pub reservation_id: String,
    pub pax: u32,
    /// Tactic that seated the party; `None` when unplaced.
    pub tactic: Option<Tactic>,
    pub tables: Vec<String>,
}

impl ReservationOutcome {
    pub fn is_placed(&self) -> bool {
        self.tactic.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// One entry per reservation, in input order.
    pub outcomes: Vec<ReservationOutcome>,
    pub placed: usize,
    pub unplaced: usize,
    pub covers_placed: u32,
    pub covers_unplaced: u32,
    /// Six-seat rectangle units created this run; a three-unit cluster is
    /// one table but counts 3 here.
    pub rect_units_created: u32,
    /// Budget in the same six-seat units.
    pub rect_budget: u32,
    /// Round tables created this run.
    pub rounds_created: u32,
    pub round_budget: u32,
    /// A rectangle request was refused for lack of stock at least once.
    pub rect_stock_exhausted: bool,
    pub round_stock_exhausted: bool,
    pub fixed_chairs_used: u32,
    pub fixed_chair_stock: Option<u32>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn unplaced_outcomes(&self) -> impl Iterator<Item = &ReservationOutcome> {
        self.outcomes.iter().filter(|o| !o.is_placed())
    }

    pub fn count_by_tactic(&self, tactic: Tactic) -> usize {
        self.outcomes.iter().filter(|o| o.tactic == Some(tactic)).count()
    }

    pub fn summary(&self) -> String {
        let chairs = match self.fixed_chair_stock {
            Some(stock) => format!("{}/{}", self.fixed_chairs_used, stock),
            None => format!("{}", self.fixed_chairs_used),
        };
        format!(
            "{} placed ({} covers), {} unplaced ({} covers); 6-seat rect units {}/{}, round tables {}/{}, fixed chairs {}",
            self.placed,
            self.covers_placed,
            self.unplaced,
            self.covers_unplaced,
            self.rect_units_created,
            self.rect_budget,
            self.rounds_created,
            self.round_budget,
            chairs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let report = RunReport {
            placed: 3,
            covers_placed: 18,
            unplaced: 1,
            covers_unplaced: 30,
            rect_units_created: 3,
            rect_budget: 10,
            round_budget: 5,
            fixed_chairs_used: 4,
            fixed_chair_stock: Some(20),
            ..Default::default()
        };
        assert_eq!(
            report.summary(),
            "3 placed (18 covers), 1 unplaced (30 covers); 6-seat rect units 3/10, round tables 0/5, fixed chairs 4/20"
        );
    }

    #[test]
    fn test_count_by_tactic() {
        let outcome = |id: &str, tactic| ReservationOutcome {
            reservation_id: id.into(),
            pax: 2,
            tactic,
            tables: vec![],
        };
        let report = RunReport {
            outcomes: vec![
                outcome("a", Some(Tactic::FixedPrepass)),
                outcome("b", Some(Tactic::FixedPrepass)),
                outcome("c", None),
            ],
            ..Default::default()
        };
        assert_eq!(report.count_by_tactic(Tactic::FixedPrepass), 2);
        assert_eq!(report.unplaced_outcomes().count(), 1);
    }
}
