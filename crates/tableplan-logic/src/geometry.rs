//! Collision tests and floor-plan validation.
//!
//! Pure functions over plan values. Intersection tests treat rectangles that
//! only share an edge as clear; circle tests count tangency as a hit.

use std::collections::HashSet;
use std::fmt;

use crate::config::MIN_GRID;
use crate::model::{Circle, FloorPlan, Rect, Room, Shape, Table};

// ── Primitives ──────────────────────────────────────────────────────────

pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.x || b.right() <= a.x || a.bottom() <= b.y || b.bottom() <= a.y)
}

pub fn circle_rect_intersects(c: &Circle, r: &Rect) -> bool {
    let nx = r.x.max(c.x.min(r.right()));
    let ny = r.y.max(c.y.min(r.bottom()));
    let dx = c.x - nx;
    let dy = c.y - ny;
    dx * dx + dy * dy <= c.r * c.r
}

pub fn circle_circle_intersects(a: &Circle, b: &Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let rr = a.r + b.r;
    dx * dx + dy * dy <= rr * rr
}

pub fn shapes_intersect(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Rect(a), Shape::Rect(b)) => rects_intersect(a, b),
        (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
            circle_rect_intersects(c, r)
        }
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle_intersects(a, b),
    }
}

impl Shape {
    /// True when the whole footprint lies inside the room.
    pub fn within_room(&self, room: &Room) -> bool {
        match self {
            Shape::Rect(r) => {
                r.x >= 0.0 && r.y >= 0.0 && r.right() <= room.width && r.bottom() <= room.height
            }
            Shape::Circle(c) => {
                c.x - c.r >= 0.0
                    && c.y - c.r >= 0.0
                    && c.x + c.r <= room.width
                    && c.y + c.r <= room.height
            }
        }
    }
}

/// True if `shape` touches a no-go area, wall, fixture or column.
pub fn hits_obstacle(plan: &FloorPlan, shape: &Shape) -> bool {
    plan.no_go
        .iter()
        .chain(plan.walls.iter())
        .any(|r| shapes_intersect(shape, &Shape::Rect(*r)))
        || plan.fixtures.iter().any(|f| shapes_intersect(shape, f))
        || plan
            .columns
            .iter()
            .any(|c| shapes_intersect(shape, &Shape::Circle(*c)))
}

/// Collision test for a footprint against the room, its obstacles and `others`.
///
/// Tables whose id equals `skip_id` are ignored so a table never collides
/// with itself.
pub fn shape_collides(
    plan: &FloorPlan,
    shape: &Shape,
    skip_id: Option<&str>,
    others: &[Table],
) -> bool {
    if !shape.within_room(&plan.room) {
        return true;
    }
    if hits_obstacle(plan, shape) {
        return true;
    }
    others
        .iter()
        .filter(|t| Some(t.id.as_str()) != skip_id)
        .any(|t| shapes_intersect(shape, &t.shape))
}

/// Collision test for a table against the room, obstacles and every other table.
pub fn table_collides(plan: &FloorPlan, candidate: &Table, others: &[Table]) -> bool {
    shape_collides(plan, &candidate.shape, Some(candidate.id.as_str()), others)
}

// ── Validation ──────────────────────────────────────────────────────────

/// A floor-plan validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Error severity. Errors abort a run, warnings are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

fn warning(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Warning,
        message,
    }
}

/// Room must have positive dimensions, a grid no finer than [`MIN_GRID`] and
/// well-formed zones.
pub fn check_room(room: &Room) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !(room.width.is_finite() && room.height.is_finite() && room.width > 0.0 && room.height > 0.0)
    {
        errors.push(error(
            "room_geometry",
            format!("Room has non-positive dimensions: {}×{}", room.width, room.height),
        ));
    }
    if let Some(grid) = room.grid {
        if !(grid.is_finite() && grid > 0.0) {
            errors.push(error("room_geometry", format!("Room grid must be positive, got {}", grid)));
        } else if grid < MIN_GRID {
            errors.push(error(
                "room_geometry",
                format!("Room grid {} is finer than the minimum {}", grid, MIN_GRID),
            ));
        }
    }
    for (name, zones) in [
        ("round-only", &room.round_only_zones),
        ("rect-only", &room.rect_only_zones),
    ] {
        for (i, z) in zones.iter().enumerate() {
            if !z.has_valid_size() {
                errors.push(error(
                    "room_geometry",
                    format!("{} zone #{} has non-positive dimensions: {}×{}", name, i, z.w, z.h),
                ));
            }
        }
    }
    errors
}

/// Walls, no-go areas, fixtures and columns must have positive size.
pub fn check_obstacle_dimensions(plan: &FloorPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let rects = plan
        .walls
        .iter()
        .map(|r| ("wall", Shape::Rect(*r)))
        .chain(plan.no_go.iter().map(|r| ("no-go area", Shape::Rect(*r))));
    let round = plan.columns.iter().map(|c| ("column", Shape::Circle(*c)));
    let fixtures = plan.fixtures.iter().map(|f| ("fixture", *f));
    for (what, shape) in rects.chain(round).chain(fixtures) {
        if !shape.has_valid_size() {
            let (x, y) = shape.anchor();
            errors.push(error(
                "obstacle_geometry",
                format!("A {} at ({}, {}) has non-positive size", what, x, y),
            ));
        }
    }
    errors
}

/// Tables must have positive width/height or radius.
pub fn check_table_dimensions(tables: &[Table]) -> Vec<ValidationError> {
    tables
        .iter()
        .filter(|t| !t.shape.has_valid_size())
        .map(|t| {
            error(
                "table_geometry",
                format!("Table {} has non-positive or non-finite size", t.id),
            )
        })
        .collect()
}

/// Assignments are keyed by table id, so ids must be unique.
pub fn check_duplicate_table_ids(tables: &[Table]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for t in tables {
        if !seen.insert(t.id.as_str()) {
            errors.push(error("table_identity", format!("Duplicate table id {}", t.id)));
        }
    }
    errors
}

/// No two existing tables may overlap.
pub fn check_table_overlaps(tables: &[Table]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let valid: Vec<&Table> = tables.iter().filter(|t| t.shape.has_valid_size()).collect();
    for i in 0..valid.len() {
        for j in (i + 1)..valid.len() {
            let (a, b) = (valid[i], valid[j]);
            if shapes_intersect(&a.shape, &b.shape) {
                errors.push(error(
                    "table_overlap",
                    format!("Tables {} and {} overlap", a.id, b.id),
                ));
            }
        }
    }
    errors
}

/// Existing tables outside the room are reported but tolerated.
pub fn check_tables_within_room(tables: &[Table], room: &Room) -> Vec<ValidationError> {
    tables
        .iter()
        .filter(|t| t.shape.has_valid_size() && !t.shape.within_room(room))
        .map(|t| {
            let (x, y) = t.shape.anchor();
            warning(
                "table_bounds",
                format!(
                    "Table {} at ({:.1},{:.1}) extends outside the {}×{} room",
                    t.id, x, y, room.width, room.height
                ),
            )
        })
        .collect()
}

/// Existing tables touching an obstacle are reported but tolerated.
pub fn check_tables_clear_of_obstacles(plan: &FloorPlan) -> Vec<ValidationError> {
    plan.tables
        .iter()
        .filter(|t| t.shape.has_valid_size() && hits_obstacle(plan, &t.shape))
        .map(|t| warning("table_obstacle", format!("Table {} touches an obstacle", t.id)))
        .collect()
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all plan validations and return combined results.
pub fn validate_plan(plan: &FloorPlan) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room(&plan.room));
    all.extend(check_obstacle_dimensions(plan));
    all.extend(check_table_dimensions(&plan.tables));
    all.extend(check_duplicate_table_ids(&plan.tables));
    all.extend(check_table_overlaps(&plan.tables));
    all.extend(check_tables_within_room(&plan.tables, &plan.room));
    all.extend(check_tables_clear_of_obstacles(plan));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableKind;

    fn make_plan(w: f64, h: f64) -> FloorPlan {
        FloorPlan::new(Room::new(w, h))
    }

    fn make_rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Table {
        Table::rect(id, TableKind::Rect, x, y, w, h)
    }

    fn make_round(id: &str, x: f64, y: f64, r: f64) -> Table {
        Table::round(id, TableKind::Round, x, y, r)
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rects_intersect(&a, &b));
        assert!(rects_intersect(&b, &a));
    }

    #[test]
    fn test_rects_touching_edge_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!rects_intersect(&a, &right));
        assert!(!rects_intersect(&a, &below));
    }

    #[test]
    fn test_circle_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(circle_rect_intersects(&Circle::new(15.0, 5.0, 6.0), &r));
        assert!(!circle_rect_intersects(&Circle::new(15.0, 5.0, 4.0), &r));
        // center inside the rectangle
        assert!(circle_rect_intersects(&Circle::new(5.0, 5.0, 1.0), &r));
        // near a corner the distance is diagonal
        assert!(!circle_rect_intersects(&Circle::new(14.0, 14.0, 5.0), &r));
    }

    #[test]
    fn test_circle_circle() {
        let a = Circle::new(0.0, 0.0, 5.0);
        assert!(circle_circle_intersects(&a, &Circle::new(8.0, 0.0, 4.0)));
        assert!(!circle_circle_intersects(&a, &Circle::new(12.0, 0.0, 4.0)));
    }

    #[test]
    fn test_collides_with_room_bounds() {
        let plan = make_plan(200.0, 100.0);
        assert!(!table_collides(&plan, &make_rect("a", 80.0, 40.0, 120.0, 60.0), &[]));
        assert!(table_collides(&plan, &make_rect("a", 81.0, 40.0, 120.0, 60.0), &[]));
        assert!(table_collides(&plan, &make_round("b", 40.0, 50.0, 50.0), &[]));
        assert!(!table_collides(&plan, &make_round("b", 50.0, 50.0, 50.0), &[]));
    }

    #[test]
    fn test_collides_with_obstacles() {
        let mut plan = make_plan(1000.0, 1000.0);
        plan.walls.push(Rect::new(0.0, 500.0, 1000.0, 10.0));
        plan.columns.push(Circle::new(300.0, 300.0, 20.0));
        plan.no_go.push(Rect::new(800.0, 0.0, 200.0, 200.0));
        plan.fixtures.push(Shape::Circle(Circle::new(100.0, 800.0, 30.0)));

        assert!(table_collides(&plan, &make_rect("w", 0.0, 450.0, 120.0, 60.0), &[]));
        assert!(table_collides(&plan, &make_rect("c", 250.0, 250.0, 60.0, 60.0), &[]));
        assert!(table_collides(&plan, &make_round("n", 850.0, 100.0, 50.0), &[]));
        assert!(table_collides(&plan, &make_round("f", 100.0, 730.0, 50.0), &[]));
        assert!(!table_collides(&plan, &make_rect("ok", 0.0, 0.0, 120.0, 60.0), &[]));
    }

    #[test]
    fn test_table_ignores_itself() {
        let plan = make_plan(500.0, 500.0);
        let t = make_rect("a", 0.0, 0.0, 120.0, 60.0);
        let others = vec![t.clone(), make_rect("b", 200.0, 0.0, 120.0, 60.0)];
        assert!(!table_collides(&plan, &t, &others));
        let moved = make_rect("a", 150.0, 0.0, 120.0, 60.0);
        assert!(table_collides(&plan, &moved, &others));
    }

    #[test]
    fn test_zero_width_room() {
        let errs = check_room(&Room::new(0.0, 600.0));
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("non-positive"));
    }

    #[test]
    fn test_room_grid_floor() {
        let mut room = Room::new(1000.0, 600.0);
        room.grid = Some(1e-6);
        let errs = check_room(&room);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].category, "room_geometry");
        assert!(errs[0].message.contains("finer"));

        room.grid = Some(MIN_GRID);
        assert!(check_room(&room).is_empty());
        room.grid = Some(0.0);
        assert!(check_room(&room)[0].message.contains("positive"));
    }

    #[test]
    fn test_negative_table_radius() {
        let errs = check_table_dimensions(&[make_round("r1", 100.0, 100.0, -5.0)]);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Error);
    }

    #[test]
    fn test_overlapping_tables() {
        let tables = vec![
            make_rect("a", 0.0, 0.0, 120.0, 60.0),
            make_rect("b", 100.0, 0.0, 120.0, 60.0),
            make_rect("c", 220.0, 0.0, 120.0, 60.0), // touches b only
        ];
        let errs = check_table_overlaps(&tables);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("a and b"));
    }

    #[test]
    fn test_duplicate_ids() {
        let tables = vec![
            make_rect("a", 0.0, 0.0, 10.0, 10.0),
            make_rect("a", 50.0, 0.0, 10.0, 10.0),
        ];
        assert_eq!(check_duplicate_table_ids(&tables).len(), 1);
    }

    #[test]
    fn test_table_outside_room_is_warning() {
        let room = Room::new(100.0, 100.0);
        let errs = check_tables_within_room(&[make_rect("a", 50.0, 50.0, 120.0, 60.0)], &room);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Warning);
    }

    #[test]
    fn test_validate_plan_clean() {
        let mut plan = make_plan(1000.0, 600.0);
        plan.tables.push(make_rect("a", 0.0, 0.0, 120.0, 60.0));
        plan.tables.push(make_round("b", 300.0, 300.0, 50.0));
        let errs = validate_plan(&plan);
        assert!(errs.is_empty(), "Expected no errors, got: {:?}", errs);
    }
}
