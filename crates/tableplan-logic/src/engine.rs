//! Assignment runs: validate, place, report.
//!
//! A run never touches the caller's plan. It validates everything up front,
//! places reservations on a private copy and hands the copy back; discarding
//! the outcome leaves the persisted plan as it was.

use std::collections::HashSet;

use crate::config::{validate_config, EngineConfig};
use crate::error::EngineError;
use crate::geometry::{validate_plan, Severity};
use crate::labeling::{compute_labels, LabelLimits, TableLabels};
use crate::model::{Assignment, FloorPlan, Reservation, Table};
use crate::placement::place_reservations;
use crate::report::RunReport;
use crate::spot::grid_cell;

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct AssignOutcome {
    /// Input plan plus the dynamic tables created by the run.
    pub plan: FloorPlan,
    pub assignment: Assignment,
    pub report: RunReport,
}

impl AssignOutcome {
    /// Labels for the output plan, not written onto it.
    pub fn labels(&self, limits: &LabelLimits) -> TableLabels {
        compute_labels(&self.plan, limits)
    }

    /// Tables added by this run.
    pub fn created_tables<'a>(&'a self, input: &'a FloorPlan) -> impl Iterator<Item = &'a Table> {
        self.plan.tables.iter().skip(input.tables.len())
    }
}

fn check_reservations(reservations: &[Reservation]) -> Result<(), EngineError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for r in reservations {
        if r.pax == 0 {
            return Err(EngineError::InvalidPartySize {
                reservation_id: r.id.clone(),
            });
        }
        if !seen.insert(r.id.as_str()) {
            return Err(EngineError::DuplicateReservation(r.id.clone()));
        }
    }
    Ok(())
}

/// Seat `reservations` on a copy of `plan`.
///
/// Fails before placing anything if the configuration, the plan geometry or
/// a reservation is invalid. Parties that cannot be seated are not an error;
/// they are counted in [`RunReport::unplaced`].
pub fn assign(
    plan: &FloorPlan,
    reservations: &[Reservation],
    config: &EngineConfig,
) -> Result<AssignOutcome, EngineError> {
    let config_errors = validate_config(config);
    if !config_errors.is_empty() {
        return Err(EngineError::InvalidConfig(config_errors));
    }

    let (errors, warnings): (Vec<_>, Vec<_>) = validate_plan(plan)
        .into_iter()
        .partition(|e| e.severity == Severity::Error);
    if !errors.is_empty() {
        return Err(EngineError::InvalidPlan(errors));
    }
    check_reservations(reservations)?;

    for w in &warnings {
        log::warn!("{}", w);
    }
    log::info!(
        "Assigning {} reservations ({} covers), tables before: {:?}",
        reservations.len(),
        reservations.iter().map(|r| r.pax).sum::<u32>(),
        plan.class_counts()
    );

    let cell = grid_cell(&plan.room, config.fallback_grid);
    let mut placement = place_reservations(plan.clone(), reservations, cell);
    let mut all_warnings: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
    all_warnings.append(&mut placement.report.warnings);
    placement.report.warnings = all_warnings;

    log::info!("Tables after: {:?}", placement.plan.class_counts());
    log::info!("{}", placement.report.summary());

    Ok(AssignOutcome {
        plan: placement.plan,
        assignment: placement.assignment,
        report: placement.report,
    })
}

/// Remove every dynamic table and start from an empty assignment.
///
/// Safe on a plan that was never assigned; applying it twice changes nothing.
pub fn reset(plan: &FloorPlan) -> (FloorPlan, Assignment) {
    let mut plan = plan.clone();
    let before = plan.tables.len();
    plan.tables.retain(|t| !t.dynamic);
    let removed = before - plan.tables.len();
    if removed > 0 {
        log::info!("Reset removed {} dynamic tables", removed);
    }
    (plan, Assignment::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Room, TableKind};
    use crate::scenarios;
    use chrono::NaiveTime;

    fn make_res(id: &str, pax: u32) -> Reservation {
        Reservation::new(id, "x", pax, NaiveTime::from_hms_opt(20, 0, 0).unwrap())
    }

    #[test]
    fn test_input_plan_untouched() {
        let plan = scenarios::base_plan();
        let before = plan.clone();
        let outcome = assign(&plan, &scenarios::lunch_service(), &EngineConfig::default()).unwrap();
        assert_eq!(plan, before);
        assert!(outcome.plan.tables.len() > plan.tables.len());
        assert!(outcome.created_tables(&plan).all(|t| t.dynamic));
    }

    #[test]
    fn test_rejects_bad_room() {
        let plan = FloorPlan::new(Room::new(0.0, 600.0));
        let err = assign(&plan, &[make_res("a", 2)], &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPlan(_)));
    }

    #[test]
    fn test_rejects_grid_below_floor() {
        let mut plan = scenarios::base_plan();
        plan.room.grid = Some(1e-6);
        let err = assign(&plan, &[make_res("a", 6)], &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPlan(ref e) if e[0].category == "room_geometry"));
    }

    #[test]
    fn test_rejects_overlapping_tables() {
        let mut plan = FloorPlan::new(Room::new(1000.0, 600.0));
        plan.tables.push(Table::rect("a", TableKind::Rect, 0.0, 0.0, 120.0, 60.0));
        plan.tables.push(Table::round("b", TableKind::Round, 100.0, 30.0, 50.0));
        let err = assign(&plan, &[], &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPlan(ref e) if e.len() == 1));
    }

    #[test]
    fn test_rejects_zero_pax_and_duplicates() {
        let plan = scenarios::base_plan();
        let config = EngineConfig::default();
        let err = assign(&plan, &[make_res("a", 0)], &config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPartySize { .. }));
        let err = assign(&plan, &[make_res("a", 2), make_res("a", 3)], &config).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateReservation(ref id) if id == "a"));
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = EngineConfig {
            fallback_grid: -1.0,
            ..Default::default()
        };
        let err = assign(&scenarios::base_plan(), &[], &config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_plan_warnings_reach_report() {
        let mut plan = FloorPlan::new(Room::new(500.0, 500.0));
        plan.tables.push(Table::rect("out", TableKind::Sofa, 450.0, 0.0, 100.0, 50.0));
        let outcome = assign(&plan, &[], &EngineConfig::default()).unwrap();
        assert_eq!(outcome.report.warnings.len(), 1);
        assert!(outcome.report.warnings[0].contains("out"));
    }

    #[test]
    fn test_reset_idempotent() {
        let plan = scenarios::base_plan();
        let outcome = assign(&plan, &scenarios::lunch_service(), &EngineConfig::default()).unwrap();
        let (once, assignment) = reset(&outcome.plan);
        assert_eq!(once.tables, plan.tables);
        assert!(assignment.is_empty());
        let (twice, _) = reset(&once);
        assert_eq!(twice, once);
    }
}
