//! Hull painting robot.
//!
//! The robot is both ends of the program's I/O:
//! - Each read returns the color of the panel under the robot
//!   (0 black, 1 white). Unpainted panels are black.
//! - Writes come in pairs. The first is the color to paint the current
//!   panel; the second turns the robot (0 left, 1 right) and moves it one
//!   panel forward.

use super::{bounds, Point};
use crate::io::{Io, PortError};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelColor {
    #[default]
    Black,
    White,
}

impl PanelColor {
    pub fn from_value(value: &BigInt) -> Option<Self> {
        match value.to_u8()? {
            0 => Some(PanelColor::Black),
            1 => Some(PanelColor::White),
            _ => None,
        }
    }

    pub fn to_value(self) -> BigInt {
        match self {
            PanelColor::Black => BigInt::from(0),
            PanelColor::White => BigInt::from(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    fn turn_left(self) -> Self {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    fn turn_right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    fn forward(self, p: Point) -> Point {
        match self {
            Heading::Up => Point::new(p.x, p.y - 1),
            Heading::Right => Point::new(p.x + 1, p.y),
            Heading::Down => Point::new(p.x, p.y + 1),
            Heading::Left => Point::new(p.x - 1, p.y),
        }
    }

    fn glyph(self) -> char {
        match self {
            Heading::Up => '^',
            Heading::Right => '>',
            Heading::Down => 'v',
            Heading::Left => '<',
        }
    }
}

/// The painting robot and the hull it has painted.
#[derive(Debug, Clone)]
pub struct Robot {
    position: Point,
    heading: Heading,
    panels: HashMap<Point, PanelColor>,
    painted: HashSet<Point>,
    awaiting_paint: bool,
}

impl Robot {
    /// A robot at the origin, facing up, on an all-black hull.
    pub fn new() -> Self {
        Self {
            position: Point::ORIGIN,
            heading: Heading::Up,
            panels: HashMap::new(),
            painted: HashSet::new(),
            awaiting_paint: true,
        }
    }

    /// A robot whose starting panel is already `color`.
    ///
    /// The starting panel does not count as painted until the program paints it.
    pub fn starting_on(color: PanelColor) -> Self {
        let mut robot = Self::new();
        robot.panels.insert(Point::ORIGIN, color);
        robot
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Color of the panel at `point`.
    pub fn panel(&self, point: Point) -> PanelColor {
        self.panels.get(&point).copied().unwrap_or_default()
    }

    /// Number of distinct panels painted at least once.
    pub fn painted_panels(&self) -> usize {
        self.painted.len()
    }

    /// Render the hull: `#` white, `.` black, the robot as an arrow.
    pub fn render(&self) -> String {
        let points = self.panels.keys().copied().chain(std::iter::once(self.position));
        let Some((top_left, bottom_right)) = bounds(points) else {
            return String::new();
        };

        (top_left.y..=bottom_right.y)
            .map(|y| {
                (top_left.x..=bottom_right.x)
                    .map(|x| {
                        let p = Point::new(x, y);
                        if p == self.position {
                            self.heading.glyph()
                        } else {
                            match self.panel(p) {
                                PanelColor::White => '#',
                                PanelColor::Black => '.',
                            }
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn turn(&mut self, value: &BigInt) -> Result<(), PortError> {
        self.heading = match value.to_u8() {
            Some(0) => self.heading.turn_left(),
            Some(1) => self.heading.turn_right(),
            _ => {
                return Err(PortError::UnexpectedOutput {
                    value: value.clone(),
                    reason: "turn must be 0 (left) or 1 (right)".into(),
                })
            }
        };
        self.position = self.heading.forward(self.position);
        Ok(())
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::new()
    }
}

impl Io for Robot {
    fn ready(&self) -> bool {
        true
    }

    fn read(&mut self) -> Result<BigInt, PortError> {
        Ok(self.panel(self.position).to_value())
    }

    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        if self.awaiting_paint {
            let color = PanelColor::from_value(&value).ok_or_else(|| PortError::UnexpectedOutput {
                value: value.clone(),
                reason: "paint color must be 0 (black) or 1 (white)".into(),
            })?;
            self.panels.insert(self.position, color);
            self.painted.insert(self.position);
        } else {
            self.turn(&value)?;
        }
        self.awaiting_paint = !self.awaiting_paint;
        Ok(())
    }
}
