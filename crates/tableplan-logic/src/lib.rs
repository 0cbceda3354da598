//! Pure table-assignment logic for restaurant floor plans.
//!
//! This crate contains the seating engine and nothing else: no database, no
//! HTTP, no PDF handling. Functions take a floor-plan snapshot and a list of
//! reservations as plain values and return new values, so the same code runs
//! behind the web service, in the headless harness and in unit tests.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`audit`] | Post-run invariant checks on an outcome |
//! | [`capacity`] | Effective seating capacity, head extension, cluster sizing |
//! | [`config`] | Engine configuration and its validation |
//! | [`constants`] | Dynamic table dimensions and placement thresholds |
//! | [`engine`] | Run orchestration: validate, place, report; `reset` |
//! | [`error`] | Fatal run errors |
//! | [`geometry`] | Collision tests and floor-plan validation |
//! | [`labeling`] | Human-facing table labels (`1`, `T1`, `R1`, `C1`, `D1`) |
//! | [`model`] | Floor plan, tables, obstacles, reservations, assignments |
//! | [`placement`] | The greedy placement heuristic |
//! | [`pool`] | Kind-based pools of still-unassigned tables |
//! | [`report`] | Per-run diagnostics returned alongside the assignment |
//! | [`scenarios`] | Reference floor plans and reservation lists |
//! | [`spot`] | Grid search for a collision-free spot for a new table |
//!
//! ```
//! use tableplan_logic::config::EngineConfig;
//! use tableplan_logic::engine::assign;
//! use tableplan_logic::scenarios;
//!
//! let plan = scenarios::base_plan();
//! let reservations = scenarios::lunch_service();
//! let outcome = assign(&plan, &reservations, &EngineConfig::default()).unwrap();
//! assert_eq!(outcome.report.unplaced, 0);
//! ```

pub mod audit;
pub mod capacity;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod labeling;
pub mod model;
pub mod placement;
pub mod pool;
pub mod report;
pub mod scenarios;
pub mod spot;

pub use engine::{assign, reset, AssignOutcome};
pub use error::EngineError;
