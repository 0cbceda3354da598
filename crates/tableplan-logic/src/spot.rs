//! Grid search for a collision-free spot for a new table.
//!
//! Exhaustive row-major scan: top row first, left to right. Candidate
//! positions come from integer step counters, so the same plan always yields
//! the same sequence of candidates.

use crate::geometry::shape_collides;
use crate::model::{Circle, FloorPlan, Rect, Room, Shape, Table, TableKind};

/// Footprint of the table being placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    Rect { w: f64, h: f64 },
    Circle { r: f64 },
}

impl Footprint {
    /// Bounding box size.
    fn extent(&self) -> (f64, f64) {
        match *self {
            Footprint::Rect { w, h } => (w, h),
            Footprint::Circle { r } => (2.0 * r, 2.0 * r),
        }
    }

    /// Shape whose bounding box starts at `(x, y)`.
    fn at(&self, x: f64, y: f64) -> Shape {
        match *self {
            Footprint::Rect { w, h } => Shape::Rect(Rect::new(x, y, w, h)),
            Footprint::Circle { r } => Shape::Circle(Circle::new(x + r, y + r, r)),
        }
    }
}

/// Where the search may look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneRule {
    #[default]
    Anywhere,
    /// Only inside the room's rect-only zones. Falls back to `Anywhere` when
    /// the room declares none.
    RectOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotRequest {
    pub kind: TableKind,
    pub footprint: Footprint,
    pub zone: ZoneRule,
}

impl SpotRequest {
    pub fn rect(kind: TableKind, w: f64, h: f64) -> Self {
        Self {
            kind,
            footprint: Footprint::Rect { w, h },
            zone: ZoneRule::Anywhere,
        }
    }

    pub fn circle(kind: TableKind, r: f64) -> Self {
        Self {
            kind,
            footprint: Footprint::Circle { r },
            zone: ZoneRule::Anywhere,
        }
    }

    pub fn in_rect_only_zone(mut self) -> Self {
        self.zone = ZoneRule::RectOnly;
        self
    }
}

/// Search step: the room's own grid when it declares a positive one, else `fallback`.
pub fn grid_cell(room: &Room, fallback: f64) -> f64 {
    match room.grid {
        Some(g) if g.is_finite() && g > 0.0 => g,
        _ => fallback,
    }
}

/// Restricted zones only admit their own kind, judged by the candidate's center.
fn zone_admits(room: &Room, kind: &TableKind, shape: &Shape) -> bool {
    let (cx, cy) = shape.center();
    let inside = |zones: &[Rect]| zones.iter().any(|z| z.contains_point(cx, cy));
    if *kind != TableKind::Round && inside(&room.round_only_zones) {
        return false;
    }
    !(*kind != TableKind::Rect && inside(&room.rect_only_zones))
}

fn accepts(plan: &FloorPlan, tables: &[Table], request: &SpotRequest, shape: &Shape) -> bool {
    zone_admits(&plan.room, &request.kind, shape) && !shape_collides(plan, shape, None, tables)
}

/// Number of grid steps that still leave room for `extent` inside `span`.
fn last_step(span: f64, extent: f64, cell: f64) -> Option<u64> {
    let slack = span - extent;
    if !slack.is_finite() || slack < 0.0 {
        return None;
    }
    Some((slack / cell).floor() as u64)
}

/// Row-major scan of the box `area`; first candidate `accept` takes wins.
fn scan(
    area: &Rect,
    footprint: &Footprint,
    cell: f64,
    accept: impl Fn(&Shape) -> bool,
) -> Option<Shape> {
    let (ew, eh) = footprint.extent();
    let cols = last_step(area.w, ew, cell)?;
    let rows = last_step(area.h, eh, cell)?;
    for j in 0..=rows {
        let y = area.y + j as f64 * cell;
        for i in 0..=cols {
            let x = area.x + i as f64 * cell;
            let shape = footprint.at(x, y);
            if accept(&shape) {
                return Some(shape);
            }
        }
    }
    None
}

/// First collision-free position for `request`, checked against `tables`
/// and the plan's obstacles.
pub fn find_spot(
    plan: &FloorPlan,
    tables: &[Table],
    request: &SpotRequest,
    cell: f64,
) -> Option<Shape> {
    if !(cell.is_finite() && cell > 0.0) {
        return None;
    }
    let accept = |shape: &Shape| accepts(plan, tables, request, shape);

    if request.zone == ZoneRule::RectOnly && !plan.room.rect_only_zones.is_empty() {
        let (ew, eh) = request.footprint.extent();
        for zone in &plan.room.rect_only_zones {
            if ew > zone.w || eh > zone.h {
                continue;
            }
            let centered = request
                .footprint
                .at(zone.x + (zone.w - ew) / 2.0, zone.y + (zone.h - eh) / 2.0);
            if accept(&centered) {
                return Some(centered);
            }
            if let Some(shape) = scan(zone, &request.footprint, cell, accept) {
                return Some(shape);
            }
        }
        return None;
    }

    scan(&plan.room.bounds(), &request.footprint, cell, accept)
}
