//! Built-in warehouse floor used when no map file is given.
//!
//! Three aisles (rows A to C) crossed by four cross-aisles (columns 1 to
//! 4), two metres apart.  Every binding is declared in both directions.  A
//! pallet block covers B2, so that node is dropped and routes bend around
//! it.
//!
//! ```text
//!        x=0   x=2   x=4   x=6
//! y=0    A1 ── A2 ── A3 ── A4
//!        │     │     │     │
//! y=2    B1 ── ██ ── B3 ── B4
//!        │     │     │     │
//! y=4    C1 ── C2 ── C3 ── C4
//! ```

use agv_spatial::{MapDescription, ObstacleRegion};

pub const START: &str = "A1";

/// Targets visited in order by the demo.
pub const TOUR: [&str; 4] = ["C4", "A4", "B1", "A1"];

const ROWS: [char; 3] = ['A', 'B', 'C'];
const COLS: u32 = 4;
const SPACING: f64 = 2.0;

fn id(row: usize, col: u32) -> String {
    format!("{}{}", ROWS[row], col + 1)
}

pub fn warehouse_map() -> MapDescription {
    let mut map = MapDescription::default();
    for r in 0..ROWS.len() {
        for c in 0..COLS {
            map = map.node(&id(r, c), f64::from(c) * SPACING, r as f64 * SPACING);
        }
    }
    for r in 0..ROWS.len() {
        for c in 0..COLS {
            let here = id(r, c);
            if c + 1 < COLS {
                map = map.edge(&here, "e", &id(r, c + 1)).edge(&id(r, c + 1), "w", &here);
            }
            if r + 1 < ROWS.len() {
                map = map.edge(&here, "s", &id(r + 1, c)).edge(&id(r + 1, c), "n", &here);
            }
        }
    }
    map
}

pub fn obstacles() -> Vec<ObstacleRegion> {
    vec![ObstacleRegion::new(1.0, 1.0, 3.0, 3.0)]
}
