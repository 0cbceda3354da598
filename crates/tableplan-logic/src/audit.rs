//! Post-run checks on an assignment outcome.
//!
//! Findings use the same [`ValidationError`] shape as plan validation. A
//! correct run produces none; the harness and the tests treat any finding as
//! a failure.

use crate::capacity::extended_capacity;
use crate::engine::AssignOutcome;
use crate::geometry::{hits_obstacle, shapes_intersect, Severity, ValidationError};
use crate::model::{FloorPlan, Reservation};

fn finding(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

/// No two output tables overlap; created tables sit inside the room and clear
/// of every obstacle.
pub fn check_layout(input: &FloorPlan, outcome: &AssignOutcome) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let tables = &outcome.plan.tables;
    for i in 0..tables.len() {
        for j in (i + 1)..tables.len() {
            if shapes_intersect(&tables[i].shape, &tables[j].shape) {
                errors.push(finding(
                    "table_overlap",
                    format!("Tables {} and {} overlap", tables[i].id, tables[j].id),
                ));
            }
        }
    }
    for t in outcome.created_tables(input) {
        if !t.dynamic {
            errors.push(finding("dynamic_flag", format!("Created table {} is not dynamic", t.id)));
        }
        if !t.shape.within_room(&outcome.plan.room) {
            errors.push(finding("table_bounds", format!("Created table {} leaves the room", t.id)));
        }
        if hits_obstacle(&outcome.plan, &t.shape) {
            errors.push(finding("table_obstacle", format!("Created table {} hits an obstacle", t.id)));
        }
    }
    if !tables.starts_with(&input.tables) {
        errors.push(finding("table_identity", "Existing tables were modified".to_string()));
    }
    errors
}

/// Nobody sits at a table beyond its (extended) capacity, and every assigned
/// table exists.
pub fn check_capacity(outcome: &AssignOutcome) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (table_id, entry) in &outcome.assignment.tables {
        match outcome.plan.table(table_id) {
            Some(table) => {
                let cap = extended_capacity(table);
                if entry.pax > cap {
                    errors.push(finding(
                        "capacity",
                        format!("Table {} seats {} but holds {}", table_id, entry.pax, cap),
                    ));
                }
            }
            None => errors.push(finding(
                "capacity",
                format!("Assignment references unknown table {}", table_id),
            )),
        }
    }
    errors
}

/// Every party is seated whole or not at all, and the report agrees.
pub fn check_coverage(
    reservations: &[Reservation],
    outcome: &AssignOutcome,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (res, o) in reservations.iter().zip(&outcome.report.outcomes) {
        let seated = outcome.assignment.seated_for(&res.id);
        if o.is_placed() && seated < res.pax {
            errors.push(finding(
                "coverage",
                format!("Reservation {} placed with {} of {} pax", res.id, seated, res.pax),
            ));
        }
        if !o.is_placed() && seated > 0 {
            errors.push(finding(
                "coverage",
                format!("Unplaced reservation {} holds {} seats", res.id, seated),
            ));
        }
    }
    if outcome.report.outcomes.len() != reservations.len() {
        errors.push(finding(
            "coverage",
            format!(
                "Report lists {} outcomes for {} reservations",
                outcome.report.outcomes.len(),
                reservations.len()
            ),
        ));
    }
    errors
}

/// Run all outcome checks.
pub fn audit_outcome(
    input: &FloorPlan,
    reservations: &[Reservation],
    outcome: &AssignOutcome,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_layout(input, outcome));
    all.extend(check_capacity(outcome));
    all.extend(check_coverage(reservations, outcome));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::assign;
    use crate::model::AssignmentEntry;
    use crate::scenarios;

    #[test]
    fn test_clean_run_has_no_findings() {
        let plan = scenarios::base_plan();
        let res = scenarios::lunch_service();
        let outcome = assign(&plan, &res, &EngineConfig::default()).unwrap();
        assert!(audit_outcome(&plan, &res, &outcome).is_empty());
    }

    #[test]
    fn test_detects_overfull_table() {
        let plan = scenarios::base_plan();
        let mut outcome = assign(&plan, &[], &EngineConfig::default()).unwrap();
        outcome.assignment.seat(
            "f1",
            AssignmentEntry {
                reservation_id: "r1".into(),
                name: "X".into(),
                pax: 5,
                last_resort: false,
            },
        );
        let errors = check_capacity(&outcome);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "capacity");
    }
}
