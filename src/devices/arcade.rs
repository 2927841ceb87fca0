//! Arcade cabinet screen.
//!
//! The program draws by writing triples: 1st = x, 2nd = y, 3rd = tile id.
//! The position `(-1, 0)` is not a tile; its third value is the score.
//! Drawing an empty tile erases the cell.
//!
//! To play, a driver runs the program on a [`BlockableExecutor`] and feeds
//! the joystick position (-1 left, 0 neutral, 1 right) whenever the program
//! blocks on input. [`play`] does exactly that, steering the paddle under
//! the ball.
//!
//! [`BlockableExecutor`]: crate::vm::BlockableExecutor

use super::{bounds, Point};
use crate::io::{OutputPort, PortError, Ports, ScriptedInput};
use crate::program::Program;
use crate::vm::ExecError;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::collections::HashMap;

/// Score position marker.
const SCORE_POSITION: Point = Point { x: -1, y: 0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
    Block,
    Paddle,
    Ball,
}

impl Tile {
    pub fn from_id(id: &BigInt) -> Option<Self> {
        match id.to_u8()? {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Block),
            3 => Some(Tile::Paddle),
            4 => Some(Tile::Ball),
            _ => None,
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Tile::Empty => "  ",
            Tile::Wall => "XX",
            Tile::Block => "[]",
            Tile::Paddle => "==",
            Tile::Ball => "()",
        }
    }
}

/// The cabinet's screen state.
#[derive(Debug, Clone, Default)]
pub struct Arcade {
    tiles: HashMap<Point, Tile>,
    pending: Vec<BigInt>,
    score: BigInt,
    ball: Option<Point>,
    paddle: Option<Point>,
}

impl Arcade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile(&self, point: Point) -> Tile {
        self.tiles.get(&point).copied().unwrap_or(Tile::Empty)
    }

    /// Number of cells currently showing `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.values().filter(|&&t| t == tile).count()
    }

    pub fn score(&self) -> &BigInt {
        &self.score
    }

    pub fn ball(&self) -> Option<Point> {
        self.ball
    }

    pub fn paddle(&self) -> Option<Point> {
        self.paddle
    }

    /// Joystick tilt that moves the paddle toward the ball.
    pub fn joystick(&self) -> i64 {
        match (self.ball, self.paddle) {
            (Some(ball), Some(paddle)) => (ball.x - paddle.x).signum(),
            _ => 0,
        }
    }

    /// Render the screen, two characters per tile.
    pub fn render(&self) -> String {
        let Some((_, bottom_right)) = bounds(self.tiles.keys().copied()) else {
            return String::new();
        };

        (0..=bottom_right.y)
            .map(|y| {
                (0..=bottom_right.x)
                    .map(|x| self.tile(Point::new(x, y)).glyph())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(&mut self, x: BigInt, y: BigInt, id: BigInt) -> Result<(), PortError> {
        let coordinate = |v: &BigInt| {
            v.to_i64().ok_or_else(|| PortError::UnexpectedOutput {
                value: v.clone(),
                reason: "screen coordinate out of range".into(),
            })
        };
        let point = Point::new(coordinate(&x)?, coordinate(&y)?);

        if point == SCORE_POSITION {
            self.score = id;
            return Ok(());
        }

        let tile = Tile::from_id(&id).ok_or_else(|| PortError::UnexpectedOutput {
            value: id.clone(),
            reason: "unknown tile id".into(),
        })?;
        match tile {
            Tile::Empty => {
                self.tiles.remove(&point);
            }
            Tile::Ball => self.ball = Some(point),
            Tile::Paddle => self.paddle = Some(point),
            _ => {}
        }
        if tile != Tile::Empty {
            self.tiles.insert(point, tile);
        }
        Ok(())
    }
}

impl OutputPort for Arcade {
    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        self.pending.push(value);
        if self.pending.len() < 3 {
            return Ok(());
        }

        let mut triple = std::mem::take(&mut self.pending).into_iter();
        match (triple.next(), triple.next(), triple.next()) {
            (Some(x), Some(y), Some(id)) => self.draw(x, y, id),
            _ => Ok(()),
        }
    }
}

/// Play a game to the end, inserting free-play quarters first.
///
/// Returns the final screen; its score is the game's result.
pub fn play(program: &Program) -> Result<Arcade, ExecError> {
    let program = program.with_patch(0, 2)?;
    let mut executor = program.blockable_executor(Ports::new(ScriptedInput::empty(), Arcade::new()));

    executor.execute_until_block()?;
    while !executor.is_halted() {
        let tilt = executor.output().joystick();
        executor.execute_until_block_with(ScriptedInput::new([tilt]))?;
    }

    log::debug!("game over, score {}", executor.output().score());
    Ok(executor.into_execution().into_parts().1.output)
}
