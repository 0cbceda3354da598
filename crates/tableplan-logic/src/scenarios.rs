//! Reference floor plans and reservation lists.
//!
//! Used by the harness, the doc examples and the integration tests. The base
//! plan is the room a new restaurant starts from: eleven locked four-seat
//! tables in three columns on the left of a 1000×600 room.

use chrono::NaiveTime;

use crate::model::{Circle, FloorPlan, Rect, Reservation, Room, Table, TableKind};

const FIXED_SIZE: f64 = 80.0;
const FIXED_PITCH: f64 = 100.0;
/// (column x, tables in column)
const FIXED_COLUMNS: [(f64, usize); 3] = [(50.0, 4), (200.0, 4), (350.0, 3)];

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn reservations(rows: &[(&str, u32, u32, u32)]) -> Vec<Reservation> {
    rows.iter()
        .enumerate()
        .map(|(i, &(name, pax, h, m))| {
            Reservation::new(format!("r{}", i + 1), name, pax, at(h, m))
        })
        .collect()
}

/// Default room: 1000×600 with fixed tables `f1`..`f11` labelled `1`..`11`.
pub fn base_plan() -> FloorPlan {
    let mut plan = FloorPlan::new(Room::new(1000.0, 600.0));
    for &(x, count) in &FIXED_COLUMNS {
        for i in 0..count {
            let n = plan.tables.len() + 1;
            let y = 50.0 + i as f64 * FIXED_PITCH;
            let mut table =
                Table::rect(format!("f{}", n), TableKind::Fixed, x, y, FIXED_SIZE, FIXED_SIZE)
                    .with_capacity(4)
                    .locked();
            table.label = Some(n.to_string());
            plan.tables.push(table);
        }
    }
    plan
}

/// A quiet lunch that fits the base plan with room to spare.
pub fn lunch_service() -> Vec<Reservation> {
    reservations(&[
        ("Martin", 2, 12, 0),
        ("Bernard", 4, 12, 15),
        ("Dubois", 3, 12, 30),
        ("Thomas", 6, 12, 30),
        ("Robert", 8, 13, 0),
        ("Richard", 14, 12, 45),
        ("Petit", 2, 13, 15),
    ])
}

/// A Saturday night that overruns the base plan once the chair and table
/// stock run low.
pub fn dinner_rush_plan() -> FloorPlan {
    let mut plan = base_plan();
    plan.room.grid = Some(25.0);
    plan.room.rect_only_zones.push(Rect::new(500.0, 0.0, 500.0, 300.0));
    plan.room.round_only_zones.push(Rect::new(500.0, 350.0, 500.0, 250.0));
    plan.columns.push(Circle::new(470.0, 470.0, 20.0));
    plan.stock.max_dynamic_rect = 8;
    plan.stock.max_dynamic_round = 2;
    plan.stock.fixed_chairs = Some(30);
    plan
}

pub fn dinner_rush_reservations() -> Vec<Reservation> {
    reservations(&[
        ("Durand", 30, 20, 0),
        ("Leroy", 22, 19, 30),
        ("Moreau", 16, 20, 0),
        ("Simon", 12, 19, 45),
        ("Laurent", 10, 20, 15),
        ("Lefebvre", 9, 20, 30),
        ("Michel", 8, 19, 0),
        ("Garcia", 6, 19, 15),
        ("David", 6, 21, 0),
        ("Bertrand", 5, 20, 0),
        ("Roux", 4, 19, 0),
        ("Vincent", 4, 19, 30),
        ("Fournier", 4, 20, 0),
        ("Morel", 4, 20, 30),
        ("Girard", 4, 21, 0),
        ("Andre", 4, 21, 30),
        ("Lefevre", 3, 19, 0),
        ("Mercier", 3, 20, 0),
        ("Dupont", 3, 21, 0),
        ("Lambert", 2, 19, 0),
        ("Bonnet", 2, 19, 30),
        ("Francois", 2, 20, 0),
        ("Martinez", 2, 21, 0),
    ])
}

/// Two loose fixed tables in a 1200×800 room, far too few for the groups in
/// [`growing_groups`].
pub fn two_table_plan() -> FloorPlan {
    let mut room = Room::new(1200.0, 800.0);
    room.grid = Some(50.0);
    let mut plan = FloorPlan::new(room);
    for (id, x) in [("t1", 100.0), ("t2", 200.0)] {
        let table = Table::rect(id, TableKind::Fixed, x, 100.0, FIXED_SIZE, FIXED_SIZE);
        plan.tables.push(table.with_capacity(4));
    }
    plan
}

pub fn growing_groups() -> Vec<Reservation> {
    reservations(&[
        ("Client 1", 4, 11, 0),
        ("Client 2", 6, 11, 15),
        ("Client 3", 8, 11, 30),
        ("Client 4", 10, 11, 45),
        ("Client 5", 12, 12, 0),
    ])
}
