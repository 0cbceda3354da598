//! tableplan Headless Assignment Harness
//!
//! Runs the assignment engine on reference services and checks the plan
//! invariants on every result. Runs entirely in-process: no DB, no HTTP,
//! no PDF rendering.
//!
//! Usage:
//!   cargo run -p tableplan-simtest
//!   cargo run -p tableplan-simtest -- --verbose
//!   cargo run -p tableplan-simtest -- --plan plan.json --reservations reservations.json
//!
//! Engine logs go to stderr; set `RUST_LOG=tableplan_logic=debug` to see
//! every seating decision.

use std::path::PathBuf;

use tableplan_logic::audit::audit_outcome;
use tableplan_logic::config::EngineConfig;
use tableplan_logic::engine::{assign, reset, AssignOutcome};
use tableplan_logic::geometry::{validate_plan, Severity};
use tableplan_logic::labeling::LabelLimits;
use tableplan_logic::model::{FloorPlan, Reservation, TableClass};
use tableplan_logic::scenarios;
use tracing_subscriber::EnvFilter;

// ── Sample snapshot (same JSON shape the service persists) ──────────────
const SAMPLE_PLAN_JSON: &str = include_str!("../../../data/sample_plan.json");
const SAMPLE_RESERVATIONS_JSON: &str = include_str!("../../../data/sample_reservations.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Args {
    verbose: bool,
    plan: Option<PathBuf>,
    reservations: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        plan: None,
        reservations: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--plan" => args.plan = it.next().map(PathBuf::from),
            "--reservations" => args.reservations = it.next().map(PathBuf::from),
            other => eprintln!("ignoring unknown argument {}", other),
        }
    }
    args
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let verbose = args.verbose;
    println!("=== tableplan Assignment Harness ===\n");

    let mut results = Vec::new();

    if args.plan.is_some() || args.reservations.is_some() {
        // Persisted snapshot from disk
        results.extend(validate_snapshot_files(&args, verbose));
    } else {
        // 1. Reference plans
        results.extend(validate_reference_plans(verbose));

        // 2. Services that must fit
        results.extend(validate_full_services(verbose));

        // 3. Overbooked service
        results.extend(validate_dinner_rush(verbose));

        // 4. Determinism & reset
        results.extend(validate_determinism_and_reset(verbose));

        // 5. Labeling
        results.extend(validate_labels(verbose));

        // 6. Bundled JSON snapshot
        results.extend(validate_sample_snapshot(verbose));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Shared checks ───────────────────────────────────────────────────────

/// Run `assign` and audit the outcome. Returns the outcome when the run
/// itself succeeded so callers can add scenario-specific checks.
fn run_and_audit(
    prefix: &str,
    plan: &FloorPlan,
    reservations: &[Reservation],
    results: &mut Vec<TestResult>,
    verbose: bool,
) -> Option<AssignOutcome> {
    let outcome = match assign(plan, reservations, &EngineConfig::default()) {
        Ok(o) => o,
        Err(e) => {
            results.push(TestResult::new(&format!("{}_run", prefix), false, e.to_string()));
            return None;
        }
    };

    let findings = audit_outcome(plan, reservations, &outcome);
    results.push(TestResult::new(
        &format!("{}_audit", prefix),
        findings.is_empty(),
        if findings.is_empty() {
            "no overlap, capacity or coverage violations".to_string()
        } else {
            findings
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    let stock = &plan.stock;
    let report = &outcome.report;
    let within_budget = report.rect_units_created <= stock.max_dynamic_rect
        && report.rounds_created <= stock.max_dynamic_round
        && stock.fixed_chairs.map_or(true, |c| report.fixed_chairs_used <= c);
    results.push(TestResult::new(
        &format!("{}_stock", prefix),
        within_budget,
        report.summary(),
    ));

    if verbose {
        print_outcome(plan, &outcome);
    }
    Some(outcome)
}

fn print_outcome(input: &FloorPlan, outcome: &AssignOutcome) {
    println!("  {}", outcome.report.summary());
    for o in &outcome.report.outcomes {
        match o.tactic {
            Some(tactic) => println!(
                "    {:>4} {:>2} pax → {} [{}]",
                o.reservation_id,
                o.pax,
                o.tables.join(" + "),
                tactic
            ),
            None => println!("    {:>4} {:>2} pax → UNPLACED", o.reservation_id, o.pax),
        }
    }
    for t in outcome.created_tables(input) {
        let (x, y) = t.shape.anchor();
        println!(
            "    new {} ({}, {} seats) @ ({:.0}, {:.0})",
            t.id,
            t.kind.as_str(),
            t.capacity.unwrap_or(0),
            x,
            y
        );
    }
}

// ── 1. Reference plans ──────────────────────────────────────────────────

fn validate_reference_plans(verbose: bool) -> Vec<TestResult> {
    println!("--- Reference Plans ---");
    let mut results = Vec::new();

    for (name, plan) in [
        ("base_plan", scenarios::base_plan()),
        ("dinner_rush_plan", scenarios::dinner_rush_plan()),
        ("two_table_plan", scenarios::two_table_plan()),
    ] {
        let findings = validate_plan(&plan);
        let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
        results.push(TestResult::new(
            &format!("{}_valid", name),
            errors == 0,
            format!(
                "{} tables, {} errors, {} warnings",
                plan.tables.len(),
                errors,
                findings.len() - errors
            ),
        ));
    }

    let base = scenarios::base_plan();
    let fixed = base.class_counts().get(&TableClass::Fixed).copied().unwrap_or(0);
    results.push(TestResult::new(
        "base_plan_fixed_tables",
        fixed == 11,
        format!("{} fixed tables", fixed),
    ));

    if verbose {
        for t in &base.tables {
            let (x, y) = t.shape.anchor();
            println!("    {} @ ({:.0}, {:.0})", t.id, x, y);
        }
    }
    results
}

// ── 2. Services that must fit ───────────────────────────────────────────

fn validate_full_services(verbose: bool) -> Vec<TestResult> {
    println!("--- Full Services ---");
    let mut results = Vec::new();

    for (prefix, plan, res) in [
        ("lunch", scenarios::base_plan(), scenarios::lunch_service()),
        ("growing_groups", scenarios::two_table_plan(), scenarios::growing_groups()),
    ] {
        if let Some(outcome) = run_and_audit(prefix, &plan, &res, &mut results, verbose) {
            results.push(TestResult::new(
                &format!("{}_all_placed", prefix),
                outcome.report.unplaced == 0,
                format!(
                    "{}/{} reservations placed",
                    outcome.report.placed,
                    res.len()
                ),
            ));
        }
    }
    results
}

// ── 3. Overbooked service ───────────────────────────────────────────────

fn validate_dinner_rush(verbose: bool) -> Vec<TestResult> {
    println!("--- Dinner Rush ---");
    let mut results = Vec::new();
    let plan = scenarios::dinner_rush_plan();
    let res = scenarios::dinner_rush_reservations();

    let Some(outcome) = run_and_audit("dinner_rush", &plan, &res, &mut results, verbose) else {
        return results;
    };
    let report = &outcome.report;

    let covers: u32 = res.iter().map(|r| r.pax).sum();
    results.push(TestResult::new(
        "dinner_rush_covers_accounted",
        report.covers_placed + report.covers_unplaced == covers,
        format!(
            "{} placed + {} unplaced of {} covers",
            report.covers_placed, report.covers_unplaced, covers
        ),
    ));

    let unplaced_listed = report.unplaced_outcomes().count();
    results.push(TestResult::new(
        "dinner_rush_unplaced_reported",
        report.unplaced > 0 && unplaced_listed == report.unplaced,
        format!("{} reservations unplaced", report.unplaced),
    ));

    let last_resort_ok = outcome.assignment.tables.iter().all(|(id, e)| {
        !e.last_resort
            || outcome
                .plan
                .table(id)
                .and_then(|t| t.class())
                .is_some_and(|c| matches!(c, TableClass::Round | TableClass::Sofa))
    });
    results.push(TestResult::new(
        "dinner_rush_last_resort_flags",
        last_resort_ok,
        "last-resort entries sit at round or sofa tables",
    ));
    results
}

// ── 4. Determinism & reset ──────────────────────────────────────────────

fn validate_determinism_and_reset(_verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism & Reset ---");
    let mut results = Vec::new();
    let plan = scenarios::dinner_rush_plan();
    let res = scenarios::dinner_rush_reservations();
    let config = EngineConfig::default();

    let (a, b) = match (assign(&plan, &res, &config), assign(&plan, &res, &config)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            results.push(TestResult::new("determinism_run", false, e.to_string()));
            return results;
        }
    };

    let json = |o: &AssignOutcome| serde_json::to_string(&(&o.assignment, &o.plan)).ok();
    let (ja, jb) = (json(&a), json(&b));
    results.push(TestResult::new(
        "determinism_byte_identical",
        ja.is_some() && ja == jb,
        format!("{} bytes of assignment + plan", ja.map_or(0, |s| s.len())),
    ));

    let (restored, assignment) = reset(&a.plan);
    results.push(TestResult::new(
        "reset_restores_tables",
        restored.tables == plan.tables && assignment.is_empty(),
        format!(
            "{} tables after reset, {} before run",
            restored.tables.len(),
            plan.tables.len()
        ),
    ));

    let (again, _) = reset(&restored);
    results.push(TestResult::new(
        "reset_idempotent",
        again == restored,
        "second reset changes nothing",
    ));
    results
}

// ── 5. Labeling ─────────────────────────────────────────────────────────

fn validate_labels(verbose: bool) -> Vec<TestResult> {
    println!("--- Labeling ---");
    let mut results = Vec::new();
    let plan = scenarios::base_plan();

    let Ok(outcome) = assign(&plan, &scenarios::lunch_service(), &EngineConfig::default()) else {
        results.push(TestResult::new("labels_run", false, "lunch run failed"));
        return results;
    };
    let labels = outcome.labels(&LabelLimits::default());

    let mut values: Vec<&String> = labels.values().collect();
    values.sort();
    values.dedup();
    results.push(TestResult::new(
        "labels_unique",
        values.len() == labels.len(),
        format!("{} labels", labels.len()),
    ));

    // bottom-left fixed table comes first
    let first_fixed = labels
        .iter()
        .find(|(_, l)| l.as_str() == "1")
        .map(|(id, _)| id.as_str());
    results.push(TestResult::new(
        "labels_fixed_order",
        first_fixed == Some("f4"),
        format!("label 1 on {:?}", first_fixed),
    ));

    if verbose {
        for (id, label) in &labels {
            println!("    {} → {}", id, label);
        }
    }
    results
}

// ── 6. JSON snapshots ───────────────────────────────────────────────────

fn check_snapshot(
    prefix: &str,
    plan_json: &str,
    reservations_json: &str,
    verbose: bool,
) -> Vec<TestResult> {
    let mut results = Vec::new();

    let plan: FloorPlan = match serde_json::from_str(plan_json) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::new(
                &format!("{}_plan_parse", prefix),
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };
    let reservations: Vec<Reservation> = match serde_json::from_str(reservations_json) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::new(
                &format!("{}_reservations_parse", prefix),
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };
    results.push(TestResult::new(
        &format!("{}_parse", prefix),
        true,
        format!("{} tables, {} reservations", plan.tables.len(), reservations.len()),
    ));

    if let Some(outcome) = run_and_audit(prefix, &plan, &reservations, &mut results, verbose) {
        let round_trip = serde_json::to_string(&outcome.plan)
            .ok()
            .and_then(|s| serde_json::from_str::<FloorPlan>(&s).ok());
        results.push(TestResult::new(
            &format!("{}_round_trip", prefix),
            round_trip.as_ref() == Some(&outcome.plan),
            "output plan survives JSON round trip",
        ));
    }
    results
}

fn validate_sample_snapshot(verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Snapshot ---");
    check_snapshot("sample", SAMPLE_PLAN_JSON, SAMPLE_RESERVATIONS_JSON, verbose)
}

fn validate_snapshot_files(args: &Args, verbose: bool) -> Vec<TestResult> {
    println!("--- Snapshot Files ---");
    let (Some(plan_path), Some(res_path)) = (&args.plan, &args.reservations) else {
        return vec![TestResult::new(
            "snapshot_args",
            false,
            "--plan and --reservations must be given together",
        )];
    };

    let read = |path: &PathBuf| {
        std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))
    };
    match (read(plan_path), read(res_path)) {
        (Ok(plan_json), Ok(res_json)) => check_snapshot("snapshot", &plan_json, &res_json, verbose),
        (Err(e), _) | (_, Err(e)) => vec![TestResult::new("snapshot_read", false, e)],
    }
}
