//! Domain devices that drive Intcode programs.
//!
//! Each device is an ordinary port implementation that keeps its own model
//! of the world and updates it on every value the program reads or writes.

pub mod arcade;
pub mod robot;

pub use arcade::{Arcade, Tile};
pub use robot::{PanelColor, Robot};

/// A grid position. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Smallest rectangle `(top_left, bottom_right)` covering `points`.
pub(crate) fn bounds(points: impl IntoIterator<Item = Point>) -> Option<(Point, Point)> {
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((lo, hi)) => Some((
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )),
    })
}
