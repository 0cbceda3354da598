//! The greedy placement heuristic.
//!
//! Reservations are processed largest party first (earlier arrival breaks
//! ties). Small parties are first offered the fixed-table area in a pre-pass;
//! every other party then walks [`Tactic::ORDER`] and stops at the first
//! tactic that seats it. A party is always seated whole or not at all.
//!
//! Rectangle stock is counted in six-seat units, round stock in tables. Both
//! only count what this run creates.

use std::fmt;

use serde::Serialize;

use crate::capacity::{cluster_capacity, cluster_units_for, effective_capacity, extended_capacity};
use crate::constants::{dynamic, thresholds};
use crate::model::{
    Assignment, AssignmentEntry, FloorPlan, Reservation, Table, TableClass, TableKind,
};
use crate::pool::TablePools;
use crate::report::{ReservationOutcome, RunReport};
use crate::spot::{find_spot, SpotRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactic {
    /// Small party on a fixed table, before any large party is placed.
    FixedPrepass,
    /// Dedicated rectangle cluster for parties of 13 and more.
    EarlyCluster,
    FixedBestFit,
    /// Existing rectangle seated with two extra head seats.
    RectExtended,
    /// Dedicated rectangle cluster for parties of 9 to 12.
    Cluster,
    Standing,
    RoundLastResort,
    SofaLastResort,
    /// New cluster plus at most one new round table.
    DynamicFallback,
}

impl Tactic {
    /// Main-loop priority order. The fixed pre-pass runs before the loop.
    pub const ORDER: [Tactic; 8] = [
        Tactic::EarlyCluster,
        Tactic::FixedBestFit,
        Tactic::RectExtended,
        Tactic::Cluster,
        Tactic::Standing,
        Tactic::RoundLastResort,
        Tactic::SofaLastResort,
        Tactic::DynamicFallback,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tactic::FixedPrepass => "fixed pre-pass",
            Tactic::EarlyCluster => "early cluster",
            Tactic::FixedBestFit => "fixed best fit",
            Tactic::RectExtended => "rect with extension",
            Tactic::Cluster => "cluster",
            Tactic::Standing => "standing",
            Tactic::RoundLastResort => "round (last resort)",
            Tactic::SofaLastResort => "sofa (last resort)",
            Tactic::DynamicFallback => "dynamic fallback",
        }
    }

    pub fn is_last_resort(self) -> bool {
        matches!(self, Tactic::RoundLastResort | Tactic::SofaLastResort)
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one placement run.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Input plan with the tables created by this run appended.
    pub plan: FloorPlan,
    pub assignment: Assignment,
    pub report: RunReport,
}

/// Indices of `reservations` in processing order: pax descending, then
/// arrival ascending, then input order.
pub fn placement_order(reservations: &[Reservation]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..reservations.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (&reservations[a], &reservations[b]);
        rb.pax.cmp(&ra.pax).then(ra.arrival.cmp(&rb.arrival))
    });
    order
}

/// Seat `reservations` on `plan`, searching for new tables on a `cell` grid.
///
/// Reservations are assumed valid (non-zero pax, unique ids); the engine
/// checks that before calling.
pub fn place_reservations(plan: FloorPlan, reservations: &[Reservation], cell: f64) -> Placement {
    let mut run = PlacementRun::new(plan, cell);
    let order = placement_order(reservations);
    let mut results: Vec<Option<(Tactic, Vec<String>)>> = vec![None; reservations.len()];

    for &idx in &order {
        let res = &reservations[idx];
        if res.pax <= thresholds::SMALL_PARTY_MAX {
            results[idx] = run.take_fixed(res).map(|tables| (Tactic::FixedPrepass, tables));
        }
    }

    for &idx in &order {
        if results[idx].is_some() {
            continue;
        }
        let res = &reservations[idx];
        results[idx] = Tactic::ORDER
            .iter()
            .find_map(|&tactic| run.attempt(tactic, res).map(|tables| (tactic, tables)));
        if results[idx].is_none() {
            let msg = format!("Reservation {} ({} pax) left unplaced", res.id, res.pax);
            log::warn!("{}", msg);
            run.warnings.push(msg);
        }
    }

    run.finish(reservations, results)
}

struct PlacementRun {
    plan: FloorPlan,
    pools: TablePools,
    assignment: Assignment,
    cell: f64,
    chairs_used: u32,
    rect_units_created: u32,
    rounds_created: u32,
    rect_stock_exhausted: bool,
    round_stock_exhausted: bool,
    warnings: Vec<String>,
}

impl PlacementRun {
    fn new(plan: FloorPlan, cell: f64) -> Self {
        let pools = TablePools::partition(&plan.tables);
        Self {
            plan,
            pools,
            assignment: Assignment::new(),
            cell,
            chairs_used: 0,
            rect_units_created: 0,
            rounds_created: 0,
            rect_stock_exhausted: false,
            round_stock_exhausted: false,
            warnings: Vec::new(),
        }
    }

    fn attempt(&mut self, tactic: Tactic, res: &Reservation) -> Option<Vec<String>> {
        match tactic {
            Tactic::FixedPrepass | Tactic::FixedBestFit => self.take_fixed(res),
            Tactic::EarlyCluster if res.pax >= thresholds::EARLY_CLUSTER_MIN_PAX => {
                self.place_cluster(res)
            }
            Tactic::Cluster
                if (thresholds::CLUSTER_MIN_PAX..thresholds::EARLY_CLUSTER_MIN_PAX)
                    .contains(&res.pax) =>
            {
                self.place_cluster(res)
            }
            Tactic::EarlyCluster | Tactic::Cluster => None,
            Tactic::RectExtended => self.take_rect_extended(res),
            Tactic::Standing => self.take_standing(res),
            Tactic::RoundLastResort => self.take_last_resort(TableClass::Round, res),
            Tactic::SofaLastResort => self.take_last_resort(TableClass::Sofa, res),
            Tactic::DynamicFallback => self.place_fallback(res),
        }
    }

    // ── Existing tables ─────────────────────────────────────────────────

    fn chairs_allow(&self, pax: u32) -> bool {
        match self.plan.stock.fixed_chairs {
            Some(stock) => stock.saturating_sub(self.chairs_used) >= pax,
            None => true,
        }
    }

    fn take_fixed(&mut self, res: &Reservation) -> Option<Vec<String>> {
        if res.pax > thresholds::SMALL_PARTY_MAX || !self.chairs_allow(res.pax) {
            return None;
        }
        let table = self
            .pools
            .fixed
            .take_best_fit(|t| effective_capacity(t) >= res.pax)?;
        self.chairs_used += res.pax;
        self.seat(&table.id, res, res.pax, false);
        Some(vec![table.id])
    }

    fn take_rect_extended(&mut self, res: &Reservation) -> Option<Vec<String>> {
        let table = self
            .pools
            .rect
            .take_best_fit(|t| extended_capacity(t) >= res.pax)?;
        self.seat(&table.id, res, res.pax, false);
        Some(vec![table.id])
    }

    fn take_standing(&mut self, res: &Reservation) -> Option<Vec<String>> {
        let small = res.pax <= thresholds::SMALL_PARTY_MAX;
        if small && !self.chairs_allow(res.pax) {
            return None;
        }
        let table = self
            .pools
            .standing
            .take_best_fit(|t| effective_capacity(t) >= res.pax)?;
        if small {
            self.chairs_used += res.pax;
        }
        self.seat(&table.id, res, res.pax, false);
        Some(vec![table.id])
    }

    fn take_last_resort(&mut self, class: TableClass, res: &Reservation) -> Option<Vec<String>> {
        let table = self
            .pools
            .pool_mut(class)
            .take_best_fit(|t| effective_capacity(t) >= res.pax)?;
        self.seat(&table.id, res, res.pax, true);
        Some(vec![table.id])
    }

    fn seat(&mut self, table_id: &str, res: &Reservation, pax: u32, last_resort: bool) {
        log::debug!(
            "Seated {} ({} of {} pax) at {}{}",
            res.id,
            pax,
            res.pax,
            table_id,
            if last_resort { " [last resort]" } else { "" }
        );
        self.assignment.seat(
            table_id,
            AssignmentEntry {
                reservation_id: res.id.clone(),
                name: res.name.to_uppercase(),
                pax,
                last_resort,
            },
        );
    }

    // ── Dynamic tables ──────────────────────────────────────────────────

    fn place_cluster(&mut self, res: &Reservation) -> Option<Vec<String>> {
        let units = cluster_units_for(res.pax);
        if cluster_capacity(units) < res.pax {
            return None;
        }
        let id = self.spawn_cluster(units)?;
        self.seat(&id, res, res.pax, false);
        Some(vec![id])
    }

    /// One cluster for as much of the party as it holds, one round table
    /// for the rest. Nothing is kept unless the whole party is covered.
    fn place_fallback(&mut self, res: &Reservation) -> Option<Vec<String>> {
        let mark = self.plan.tables.len();
        let created = (self.rect_units_created, self.rounds_created);
        let mut seats: Vec<(String, u32)> = Vec::new();
        let mut remaining = res.pax;

        let units = cluster_units_for(remaining);
        if let Some(id) = self.spawn_cluster(units) {
            let seated = remaining.min(cluster_capacity(units));
            seats.push((id, seated));
            remaining -= seated;
        }
        if remaining > 0 && remaining <= dynamic::ROUND_CAPACITY {
            if let Some(id) = self.spawn_round() {
                seats.push((id, remaining));
                remaining = 0;
            }
        }

        if remaining > 0 {
            log::debug!(
                "Fallback for {} short by {} pax, discarding {} staged table(s)",
                res.id,
                remaining,
                seats.len()
            );
            self.plan.tables.truncate(mark);
            (self.rect_units_created, self.rounds_created) = created;
            return None;
        }

        for (id, pax) in &seats {
            self.seat(id, res, *pax, false);
        }
        Some(seats.into_iter().map(|(id, _)| id).collect())
    }

    fn spawn_cluster(&mut self, units: u32) -> Option<String> {
        let budget = self.plan.stock.max_dynamic_rect;
        if budget.saturating_sub(self.rect_units_created) < units {
            if !self.rect_stock_exhausted {
                let msg = format!(
                    "Rectangle stock exhausted: {} of {} units used, {} requested",
                    self.rect_units_created, budget, units
                );
                log::warn!("{}", msg);
                self.warnings.push(msg);
            }
            self.rect_stock_exhausted = true;
            return None;
        }
        let request = SpotRequest::rect(
            TableKind::Rect,
            dynamic::cluster_width(units),
            dynamic::UNIT_HEIGHT,
        )
        .in_rect_only_zone();
        let id = self.spawn(dynamic::RECT_ID_PREFIX, &request, cluster_capacity(units))?;
        self.rect_units_created += units;
        Some(id)
    }

    fn spawn_round(&mut self) -> Option<String> {
        let budget = self.plan.stock.max_dynamic_round;
        if self.rounds_created >= budget {
            if !self.round_stock_exhausted {
                let msg = format!(
                    "Round stock exhausted: {} of {} tables used",
                    self.rounds_created, budget
                );
                log::warn!("{}", msg);
                self.warnings.push(msg);
            }
            self.round_stock_exhausted = true;
            return None;
        }
        let request = SpotRequest::circle(TableKind::Round, dynamic::ROUND_RADIUS);
        let id = self.spawn(dynamic::ROUND_ID_PREFIX, &request, dynamic::ROUND_CAPACITY)?;
        self.rounds_created += 1;
        Some(id)
    }

    fn spawn(&mut self, prefix: &str, request: &SpotRequest, capacity: u32) -> Option<String> {
        let Some(shape) = find_spot(&self.plan, &self.plan.tables, request, self.cell) else {
            log::debug!("No spot for a new {:?} table", request.footprint);
            return None;
        };
        let id = self.next_dynamic_id(prefix);
        let mut table = Table::with_shape(id.clone(), request.kind.clone(), shape).with_capacity(capacity);
        table.dynamic = true;
        self.plan.tables.push(table);
        Some(id)
    }

    /// Smallest `{prefix}-{n}` not already in the plan.
    fn next_dynamic_id(&self, prefix: &str) -> String {
        let mut n = 1u32;
        loop {
            let id = format!("{}-{}", prefix, n);
            if self.plan.table(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    // ── Report ──────────────────────────────────────────────────────────

    fn finish(
        self,
        reservations: &[Reservation],
        results: Vec<Option<(Tactic, Vec<String>)>>,
    ) -> Placement {
        let outcomes: Vec<ReservationOutcome> = reservations
            .iter()
            .zip(results)
            .map(|(res, result)| {
                let (tactic, tables) = match result {
                    Some((tactic, tables)) => (Some(tactic), tables),
                    None => (None, Vec::new()),
                };
                ReservationOutcome {
                    reservation_id: res.id.clone(),
                    pax: res.pax,
                    tactic,
                    tables,
                }
            })
            .collect();

        let placed: Vec<&ReservationOutcome> = outcomes.iter().filter(|o| o.is_placed()).collect();
        let report = RunReport {
            placed: placed.len(),
            unplaced: outcomes.len() - placed.len(),
            covers_placed: placed.iter().map(|o| o.pax).sum(),
            covers_unplaced: outcomes.iter().filter(|o| !o.is_placed()).map(|o| o.pax).sum(),
            rect_units_created: self.rect_units_created,
            rect_budget: self.plan.stock.max_dynamic_rect,
            rounds_created: self.rounds_created,
            round_budget: self.plan.stock.max_dynamic_round,
            rect_stock_exhausted: self.rect_stock_exhausted,
            round_stock_exhausted: self.round_stock_exhausted,
            fixed_chairs_used: self.chairs_used,
            fixed_chair_stock: self.plan.stock.fixed_chairs,
            warnings: self.warnings,
            outcomes,
        };

        Placement {
            plan: self.plan,
            assignment: self.assignment,
            report,
        }
    }
}
