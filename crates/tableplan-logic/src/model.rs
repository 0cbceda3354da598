//! Floor-plan snapshot, reservations and assignments.
//!
//! Plain serde records. The persistence layer loads and saves them as JSON;
//! the engine only ever sees them as values.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive point test: a point on the border is inside.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    pub fn has_valid_size(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w > 0.0
            && self.h > 0.0
    }
}

/// Circle anchored at its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn has_valid_size(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.r.is_finite() && self.r > 0.0
    }
}

/// Footprint of a table or fixture.
///
/// Written with an explicit `"shape"` tag. Records without the tag are read
/// the way the editor stores them: a non-zero `r` makes a circle, anything
/// else is a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case", try_from = "ShapeRecord")]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

#[derive(Deserialize)]
struct ShapeRecord {
    shape: Option<String>,
    x: f64,
    y: f64,
    w: Option<f64>,
    h: Option<f64>,
    r: Option<f64>,
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = String;

    fn try_from(rec: ShapeRecord) -> Result<Self, Self::Error> {
        let rect = |rec: &ShapeRecord| {
            Shape::Rect(Rect::new(rec.x, rec.y, rec.w.unwrap_or(0.0), rec.h.unwrap_or(0.0)))
        };
        let circle = |rec: &ShapeRecord| Shape::Circle(Circle::new(rec.x, rec.y, rec.r.unwrap_or(0.0)));
        match rec.shape.as_deref() {
            Some("rect") => Ok(rect(&rec)),
            Some("circle") => Ok(circle(&rec)),
            Some(other) => Err(format!("unknown shape `{}`", other)),
            None if rec.r.is_some_and(|r| r != 0.0) => Ok(circle(&rec)),
            None => Ok(rect(&rec)),
        }
    }
}

impl Shape {
    /// Stored position: top-left for rectangles, center for circles.
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            Shape::Rect(r) => (r.x, r.y),
            Shape::Circle(c) => (c.x, c.y),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        match self {
            Shape::Rect(r) => r.center(),
            Shape::Circle(c) => (c.x, c.y),
        }
    }

    pub fn has_valid_size(&self) -> bool {
        match self {
            Shape::Rect(r) => r.has_valid_size(),
            Shape::Circle(c) => c.has_valid_size(),
        }
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, Shape::Circle(_))
    }
}

// ── Tables ──────────────────────────────────────────────────────────────

/// What a table is, as drawn by the floor-plan editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableKind {
    Fixed,
    Rect,
    Round,
    Sofa,
    Standing,
    /// Any kind the engine does not know about, kept as written.
    Other(String),
}

impl TableKind {
    pub fn as_str(&self) -> &str {
        match self {
            TableKind::Fixed => "fixed",
            TableKind::Rect => "rect",
            TableKind::Round => "round",
            TableKind::Sofa => "sofa",
            TableKind::Standing => "standing",
            TableKind::Other(s) => s,
        }
    }
}

impl From<String> for TableKind {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => TableKind::Fixed,
            "rect" => TableKind::Rect,
            "round" => TableKind::Round,
            "sofa" => TableKind::Sofa,
            "standing" => TableKind::Standing,
            _ => TableKind::Other(s),
        }
    }
}

impl From<TableKind> for String {
    fn from(kind: TableKind) -> Self {
        match kind {
            TableKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// The pool a table is drawn from. Locked tables always count as fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableClass {
    Fixed,
    Rect,
    Round,
    Sofa,
    Standing,
}

impl TableClass {
    pub const ALL: [TableClass; 5] = [
        TableClass::Fixed,
        TableClass::Rect,
        TableClass::Round,
        TableClass::Sofa,
        TableClass::Standing,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub kind: TableKind,
    #[serde(flatten)]
    pub shape: Shape,
    /// Declared seats; `None` or 0 falls back to the kind default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Immovable table, served from the fixed pool whatever its kind.
    #[serde(default)]
    pub locked: bool,
    /// Created by the engine; removed by [`crate::engine::reset`].
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Table {
    pub fn rect(id: impl Into<String>, kind: TableKind, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::with_shape(id, kind, Shape::Rect(Rect::new(x, y, w, h)))
    }

    pub fn round(id: impl Into<String>, kind: TableKind, x: f64, y: f64, r: f64) -> Self {
        Self::with_shape(id, kind, Shape::Circle(Circle::new(x, y, r)))
    }

    pub fn with_shape(id: impl Into<String>, kind: TableKind, shape: Shape) -> Self {
        Self {
            id: id.into(),
            kind,
            shape,
            capacity: None,
            locked: false,
            dynamic: false,
            label: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn class(&self) -> Option<TableClass> {
        if self.locked {
            return Some(TableClass::Fixed);
        }
        match &self.kind {
            TableKind::Fixed => Some(TableClass::Fixed),
            TableKind::Rect => Some(TableClass::Rect),
            TableKind::Round => Some(TableClass::Round),
            TableKind::Sofa => Some(TableClass::Sofa),
            TableKind::Standing => Some(TableClass::Standing),
            TableKind::Other(_) => None,
        }
    }
}

// ── Room & plan ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub width: f64,
    pub height: f64,
    /// Search granularity for new tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<f64>,
    /// Areas where only round tables may be placed.
    #[serde(default)]
    pub round_only_zones: Vec<Rect>,
    /// Areas where only rectangular tables may be placed.
    #[serde(default)]
    pub rect_only_zones: Vec<Rect>,
}

impl Room {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            grid: None,
            round_only_zones: Vec::new(),
            rect_only_zones: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Per-run ceilings on what the engine may use or create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBudget {
    /// Six-seat rectangle units the engine may synthesize. A cluster of
    /// three units spends three, not one.
    #[serde(default = "default_max_dynamic_rect", alias = "rect")]
    pub max_dynamic_rect: u32,
    /// Round tables the engine may synthesize.
    #[serde(default = "default_max_dynamic_round", alias = "round")]
    pub max_dynamic_round: u32,
    /// Chairs small parties may draw from the fixed-table area (`None` = unbounded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_chairs: Option<u32>,
}

fn default_max_dynamic_rect() -> u32 {
    10
}

fn default_max_dynamic_round() -> u32 {
    5
}

impl Default for StockBudget {
    fn default() -> Self {
        Self {
            max_dynamic_rect: default_max_dynamic_rect(),
            max_dynamic_round: default_max_dynamic_round(),
            fixed_chairs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub room: Room,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub fixtures: Vec<Shape>,
    #[serde(default)]
    pub columns: Vec<Circle>,
    #[serde(default)]
    pub no_go: Vec<Rect>,
    #[serde(default, alias = "max_dynamic_tables")]
    pub stock: StockBudget,
}

impl FloorPlan {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            tables: Vec::new(),
            walls: Vec::new(),
            fixtures: Vec::new(),
            columns: Vec::new(),
            no_go: Vec::new(),
            stock: StockBudget::default(),
        }
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn dynamic_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| t.dynamic)
    }

    /// Number of tables per pool class. Tables of unknown kind are not counted.
    pub fn class_counts(&self) -> BTreeMap<TableClass, usize> {
        let mut counts = BTreeMap::new();
        for class in self.tables.iter().filter_map(Table::class) {
            *counts.entry(class).or_insert(0) += 1;
        }
        counts
    }
}

// ── Reservations & assignments ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    #[serde(default, alias = "client_name")]
    pub name: String,
    /// Party size.
    pub pax: u32,
    /// Only used to break ties between parties of the same size.
    #[serde(default, alias = "arrival_time")]
    pub arrival: NaiveTime,
}

impl Reservation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pax: u32, arrival: NaiveTime) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pax,
            arrival,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub reservation_id: String,
    pub name: String,
    /// Guests seated at this table.
    pub pax: u32,
    /// Seated at a round or sofa table because nothing better was left.
    #[serde(default, skip_serializing_if = "is_false")]
    pub last_resort: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Table id → who sits there. Ordered so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default)]
    pub tables: BTreeMap<String, AssignmentEntry>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn get(&self, table_id: &str) -> Option<&AssignmentEntry> {
        self.tables.get(table_id)
    }

    pub fn is_taken(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    pub(crate) fn seat(&mut self, table_id: impl Into<String>, entry: AssignmentEntry) {
        self.tables.insert(table_id.into(), entry);
    }

    /// Table ids seating a reservation, in id order.
    pub fn tables_for(&self, reservation_id: &str) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|(_, e)| e.reservation_id == reservation_id)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Total guests seated for a reservation across all its tables.
    pub fn seated_for(&self, reservation_id: &str) -> u32 {
        self.tables
            .values()
            .filter(|e| e.reservation_id == reservation_id)
            .map(|e| e.pax)
            .sum()
    }

    pub fn is_placed(&self, reservation: &Reservation) -> bool {
        self.seated_for(&reservation.id) >= reservation.pax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_json_shape_is_flattened() {
        let json = r#"{"id":"t1","kind":"round","shape":"circle","x":100,"y":80,"r":50,"capacity":10}"#;
        let t: Table = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TableKind::Round);
        assert_eq!(t.shape, Shape::Circle(Circle::new(100.0, 80.0, 50.0)));
        assert_eq!(t.capacity, Some(10));
        assert!(!t.locked && !t.dynamic);
    }

    #[test]
    fn test_unknown_kind_becomes_other() {
        let json = r#"{"id":"bar","kind":"high_stool","shape":"rect","x":0,"y":0,"w":40,"h":40}"#;
        let t: Table = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TableKind::Other("high_stool".into()));
        assert_eq!(t.class(), None);

        let out = serde_json::to_value(&t).unwrap();
        assert_eq!(out["kind"], "high_stool");
        let back: Table = serde_json::from_value(out).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_known_kind_is_written_lowercase() {
        let t: Table = serde_json::from_str(
            r#"{"id":"s","kind":"Sofa","shape":"rect","x":0,"y":0,"w":100,"h":50}"#,
        )
        .unwrap();
        assert_eq!(t.kind, TableKind::Sofa);
        assert_eq!(serde_json::to_value(&t).unwrap()["kind"], "sofa");
    }

    #[test]
    fn test_untagged_table_shape_is_inferred() {
        let round: Table =
            serde_json::from_str(r#"{"id":"o1","kind":"round","x":100,"y":100,"r":50}"#).unwrap();
        assert_eq!(round.shape, Shape::Circle(Circle::new(100.0, 100.0, 50.0)));

        let rect: Table =
            serde_json::from_str(r#"{"id":"t1","kind":"rect","x":10,"y":20,"w":120,"h":60}"#).unwrap();
        assert_eq!(rect.shape, Shape::Rect(Rect::new(10.0, 20.0, 120.0, 60.0)));

        // r = 0 does not make a circle
        let flat: Table =
            serde_json::from_str(r#"{"id":"t2","kind":"rect","x":0,"y":0,"w":80,"h":80,"r":0}"#).unwrap();
        assert!(!flat.shape.is_circular());

        // written back with the tag
        let out = serde_json::to_value(&round).unwrap();
        assert_eq!(out["shape"], "circle");
        assert_eq!(serde_json::from_value::<Table>(out).unwrap(), round);
    }

    #[test]
    fn test_unknown_shape_tag_is_rejected() {
        let json = r#"{"id":"t","kind":"rect","shape":"hexagon","x":0,"y":0,"w":1,"h":1}"#;
        assert!(serde_json::from_str::<Table>(json).is_err());
    }

    #[test]
    fn test_locked_table_is_fixed_class() {
        let t = Table::rect("t", TableKind::Rect, 0.0, 0.0, 120.0, 60.0).locked();
        assert_eq!(t.class(), Some(TableClass::Fixed));
    }

    #[test]
    fn test_stock_defaults_when_missing() {
        let json = r#"{"room":{"width":1000,"height":600}}"#;
        let plan: FloorPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.stock.max_dynamic_rect, 10);
        assert_eq!(plan.stock.max_dynamic_round, 5);
        assert_eq!(plan.stock.fixed_chairs, None);
        assert!(plan.tables.is_empty());
    }

    #[test]
    fn test_stock_reads_legacy_max_dynamic_tables() {
        let json = r#"{"room":{"width":1000,"height":600},"max_dynamic_tables":{"rect":4,"round":0}}"#;
        let plan: FloorPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.stock.max_dynamic_rect, 4);
        assert_eq!(plan.stock.max_dynamic_round, 0);
    }

    #[test]
    fn test_last_resort_omitted_when_false() {
        let mut a = Assignment::new();
        a.seat(
            "t1",
            AssignmentEntry {
                reservation_id: "r1".into(),
                name: "DUPONT".into(),
                pax: 4,
                last_resort: false,
            },
        );
        let json = serde_json::to_string(&a).unwrap();
        assert!(!json.contains("last_resort"));
    }

    #[test]
    fn test_seated_for_sums_tables() {
        let mut a = Assignment::new();
        for (id, pax) in [("a", 6), ("b", 4)] {
            a.seat(
                id,
                AssignmentEntry {
                    reservation_id: "r1".into(),
                    name: "X".into(),
                    pax,
                    last_resort: false,
                },
            );
        }
        assert_eq!(a.seated_for("r1"), 10);
        assert_eq!(a.tables_for("r1"), vec!["a", "b"]);
        assert_eq!(a.seated_for("r2"), 0);
    }
}
