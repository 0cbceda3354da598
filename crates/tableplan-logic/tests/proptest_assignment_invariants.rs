//! Property-based invariant tests for assignment runs.
//!
//! For any reservation list and stock budget on the reference room:
//!
//! 1. Output tables never overlap and new tables respect room and obstacles.
//! 2. No table is seated beyond its (extended) capacity.
//! 3. A party is seated whole or not at all.
//! 4. Identical inputs give identical outputs.
//! 5. Reset restores the input table set.
//! 6. Dynamic stock is never overspent.

use chrono::NaiveTime;
use proptest::prelude::*;

use tableplan_logic::audit::audit_outcome;
use tableplan_logic::config::EngineConfig;
use tableplan_logic::engine::{assign, reset};
use tableplan_logic::model::{Circle, FloorPlan, Rect, Reservation};
use tableplan_logic::scenarios;

// ── Helpers ─────────────────────────────────────────────────────────────

fn reservations_strategy() -> impl Strategy<Value = Vec<Reservation>> {
    prop::collection::vec((1u32..=30, 0u32..240), 0..20).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (pax, minutes))| {
                let arrival = NaiveTime::from_hms_opt(18 + minutes / 60, minutes % 60, 0).unwrap();
                Reservation::new(format!("r{}", i), format!("guest {}", i), pax, arrival)
            })
            .collect()
    })
}

fn plan_strategy() -> impl Strategy<Value = FloorPlan> {
    (0u32..=10, 0u32..=5, prop::option::of(0u32..=40), any::<bool>()).prop_map(
        |(rect, round, chairs, obstacles)| {
            let mut plan = scenarios::base_plan();
            plan.stock.max_dynamic_rect = rect;
            plan.stock.max_dynamic_round = round;
            plan.stock.fixed_chairs = chairs;
            if obstacles {
                plan.columns.push(Circle::new(700.0, 300.0, 30.0));
                plan.no_go.push(Rect::new(850.0, 0.0, 150.0, 150.0));
                plan.room.rect_only_zones.push(Rect::new(450.0, 400.0, 550.0, 200.0));
            }
            plan
        },
    )
}

fn config() -> EngineConfig {
    EngineConfig::default()
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Layout, capacity and coverage hold after every run
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outcome_passes_audit(plan in plan_strategy(), res in reservations_strategy()) {
        let outcome = assign(&plan, &res, &config()).unwrap();
        let findings = audit_outcome(&plan, &res, &outcome);
        prop_assert!(findings.is_empty(), "findings: {:?}", findings);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn runs_are_deterministic(plan in plan_strategy(), res in reservations_strategy()) {
        let a = assign(&plan, &res, &config()).unwrap();
        let b = assign(&plan, &res, &config()).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a.assignment).unwrap(),
            serde_json::to_string(&b.assignment).unwrap()
        );
        prop_assert_eq!(a.plan, b.plan);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Reset restores the input tables
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reset_restores_input(plan in plan_strategy(), res in reservations_strategy()) {
        let outcome = assign(&plan, &res, &config()).unwrap();
        let (restored, assignment) = reset(&outcome.plan);
        prop_assert_eq!(&restored.tables, &plan.tables);
        prop_assert!(assignment.is_empty());
        let (again, _) = reset(&restored);
        prop_assert_eq!(again, restored);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Stock budgets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stock_never_overspent(plan in plan_strategy(), res in reservations_strategy()) {
        let outcome = assign(&plan, &res, &config()).unwrap();
        let report = &outcome.report;
        prop_assert!(report.rect_units_created <= plan.stock.max_dynamic_rect);
        prop_assert!(report.rounds_created <= plan.stock.max_dynamic_round);
        if let Some(chairs) = plan.stock.fixed_chairs {
            prop_assert!(report.fixed_chairs_used <= chairs);
        }
        let covers: u32 = res.iter().map(|r| r.pax).sum();
        prop_assert_eq!(report.covers_placed + report.covers_unplaced, covers);
    }
}
