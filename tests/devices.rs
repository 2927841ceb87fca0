//! Devices driven by real programs.

use intcode::devices::arcade::{play, Tile};
use intcode::devices::robot::{PanelColor, Robot};
use intcode::devices::Point;
use intcode::{Arcade, Ports, Program, ScriptedInput};
use num_bigint::BigInt;

/// Read the panel, paint white, turn left; twice.
fn two_strokes() -> Program {
    Program::from(vec![3, 100, 104, 1, 104, 0, 3, 101, 104, 1, 104, 0, 99])
}

#[test]
fn test_robot_paints_and_moves() {
    let mut exec = two_strokes().execution(Robot::new());
    exec.run_to_completion().unwrap();

    let robot = exec.io();
    assert_eq!(robot.painted_panels(), 2);
    assert_eq!(robot.position(), Point::new(-1, 1));
    assert_eq!(robot.panel(Point::new(-1, 0)), PanelColor::White);
    assert_eq!(robot.render(), "##\nv.");
    assert_eq!(exec.memory().read(100), BigInt::from(0));
}

#[test]
fn test_robot_starting_on_white() {
    let mut exec = two_strokes().execution(Robot::starting_on(PanelColor::White));
    exec.run_to_completion().unwrap();

    assert_eq!(exec.memory().read(100), BigInt::from(1));
    assert_eq!(exec.memory().read(101), BigInt::from(0));
}

#[test]
fn test_arcade_draws_screen() {
    let program = Program::from(vec![
        104, 1, 104, 2, 104, 2,
        104, 3, 104, 2, 104, 2,
        104, -1, 104, 0, 104, 77,
        99,
    ]);
    let mut exec = program.execution(Ports::new(ScriptedInput::empty(), Arcade::new()));
    exec.run_to_completion().unwrap();

    let screen = exec.into_parts().1.output;
    assert_eq!(screen.count(Tile::Block), 2);
    assert_eq!(screen.score(), &BigInt::from(77));
}

#[test]
fn test_arcade_play_steers_paddle() {
    let program = Program::from(vec![
        1, 60, 60, 60,          // patched for free play
        104, 5, 104, 1, 104, 4, // ball at (5, 1)
        4, 50, 104, 1, 104, 3,  // paddle at ([50], 1)
        3, 51,                  // joystick
        1, 50, 51, 50,
        1008, 50, 5, 52,
        1006, 52, 10,           // until the paddle is under the ball
        104, -1, 104, 0, 4, 50,
        99,
    ]);
    let screen = play(&program).unwrap();

    assert_eq!(screen.score(), &BigInt::from(5));
    assert_eq!(screen.ball(), Some(Point::new(5, 1)));
    assert_eq!(screen.paddle(), Some(Point::new(4, 1)));
}
