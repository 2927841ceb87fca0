//! End-to-end behaviour of the machine on small, well-known programs.

use intcode::{
    BlockableExecutor, CapturedOutput, ExecError, Execution, MemoryError, Pause, Ports, Program, ScriptedInput,
};
use num_bigint::BigInt;
use proptest::prelude::*;

type TestPorts = Ports<ScriptedInput, CapturedOutput>;

fn ports(input: &[i64]) -> TestPorts {
    Ports::new(ScriptedInput::new(input.iter().copied()), CapturedOutput::new())
}

fn outputs(words: Vec<i64>, input: &[i64]) -> Vec<BigInt> {
    let mut exec = Program::from(words).execution(ports(input));
    exec.run_to_completion().unwrap();
    exec.into_parts().1.output.into_values()
}

fn big(values: &[i64]) -> Vec<BigInt> {
    values.iter().copied().map(BigInt::from).collect()
}

#[test]
fn test_halt_only() {
    let mut exec = Program::from(vec![99]).execution(ports(&[]));
    exec.run_to_completion().unwrap();

    assert!(exec.is_halted());
    assert_eq!(exec.steps(), 1);
    assert_eq!(exec.instruction_pointer(), 0);
    assert_eq!(exec.memory().cells(), big(&[99]).as_slice());
    assert!(exec.io().output.values().is_empty());
}

#[test]
fn test_self_modifying_programs() {
    let cases: [(Vec<i64>, Vec<i64>); 4] = [
        (vec![1, 0, 0, 0, 99], vec![2, 0, 0, 0, 99]),
        (vec![2, 3, 0, 3, 99], vec![2, 3, 0, 6, 99]),
        (vec![2, 4, 4, 5, 99, 0], vec![2, 4, 4, 5, 99, 9801]),
        (vec![1, 1, 1, 4, 99, 5, 6, 0, 99], vec![30, 1, 1, 4, 2, 5, 6, 0, 99]),
    ];

    for (program, expected) in cases {
        let memory = Program::from(program).run(ports(&[])).unwrap();
        assert_eq!(memory.cells(), big(&expected).as_slice());
    }
}

#[test]
fn test_comparisons_and_jumps() {
    let program = vec![
        3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0, 0, 1002, 21, 125,
        20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4, 20, 1105, 1, 46, 98, 99,
    ];

    assert_eq!(outputs(program.clone(), &[7]), big(&[999]));
    assert_eq!(outputs(program.clone(), &[8]), big(&[1000]));
    assert_eq!(outputs(program, &[9]), big(&[1001]));
}

#[test]
fn test_quine() {
    let program = vec![109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99];
    assert_eq!(outputs(program.clone(), &[]), big(&program));
}

#[test]
fn test_sixteen_digit_output() {
    let out = outputs(vec![1102, 34915192, 34915192, 7, 4, 7, 99, 0], &[]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to_string().len(), 16);
}

#[test]
fn test_large_immediate() {
    assert_eq!(outputs(vec![104, 1125899906842624, 99], &[]), big(&[1125899906842624]));
}

#[test]
fn test_products_beyond_64_bits() {
    // 2^62 * 2^62 stored at 7 and printed.
    let p = 1i64 << 62;
    let out = outputs(vec![1102, p, p, 7, 4, 7, 99], &[]);
    assert_eq!(out, vec![BigInt::from(1u8) << 124]);
}

#[test]
fn test_relative_base_round_trip() {
    let mut exec = Program::from(vec![109, 50, 203, -10, 204, -10, 99]).execution(ports(&[-3]));
    exec.run_to_completion().unwrap();

    assert_eq!(exec.relative_base(), &BigInt::from(50));
    assert_eq!(exec.memory().read(40), BigInt::from(-3));
    assert_eq!(exec.io().output.values(), big(&[-3]).as_slice());
}

#[test]
fn test_blocking_is_not_an_error() {
    // Echo forever.
    let program = Program::from(vec![3, 100, 4, 100, 1105, 1, 0]);
    let mut executor = program.blockable_executor(ports(&[]));

    assert_eq!(executor.resume().unwrap(), Pause::AwaitingInput);
    assert_eq!(executor.execution().instruction_pointer(), 0);
    assert_eq!(executor.execution().steps(), 0);

    for v in [4, -8, 15] {
        let out = executor.execute_until_block_with(ScriptedInput::new([v])).unwrap();
        assert_eq!(out.drain(), big(&[v]));
    }
    assert!(!executor.is_halted());
    assert_eq!(executor.execution().instruction_pointer(), 0);
}

#[test]
fn test_reading_exhausted_input_fails() {
    let mut exec = Program::from(vec![3, 0, 99]).execution(ports(&[]));
    assert!(matches!(exec.run_to_completion(), Err(ExecError::PortError(_))));
}

#[test]
fn test_memory_ceiling() {
    let mut exec = Program::from(vec![1101, 1, 1, 5_000_000, 99]).execution(ports(&[]));
    assert!(matches!(
        exec.run_to_completion(),
        Err(ExecError::MemoryError(MemoryError::AddressOutOfRange { .. }))
    ));
}

#[test]
fn test_snapshot_resume() {
    let program = Program::from(vec![3, 20, 1002, 20, 3, 20, 4, 20, 3, 21, 4, 21, 99]);
    let mut executor = program.blockable_executor(ports(&[5]));
    executor.execute_until_block().unwrap();

    let json = serde_json::to_string(&executor.execution().snapshot()).unwrap();
    let snapshot = serde_json::from_str(&json).unwrap();

    let mut resumed = BlockableExecutor::new(Execution::restore(snapshot, ports(&[7])));
    assert_eq!(resumed.resume().unwrap(), Pause::Halted);
    assert_eq!(resumed.io().output.values(), big(&[7]).as_slice());
    assert_eq!(executor.io().output.values(), big(&[15]).as_slice());
}

proptest! {
    #[test]
    fn prop_add_and_multiply_are_exact(a in any::<i64>(), b in any::<i64>()) {
        let sum = outputs(vec![1101, a, b, 5, 104, 0, 99], &[]);
        prop_assert_eq!(sum, vec![BigInt::from(a) + BigInt::from(b)]);

        let product = outputs(vec![1102, a, b, 5, 104, 0, 99], &[]);
        prop_assert_eq!(product, vec![BigInt::from(a) * BigInt::from(b)]);
    }

    #[test]
    fn prop_relative_store_and_load(base in 20i64..10_000, offset in -5i64..100) {
        let out = outputs(vec![109, base, 203, offset, 204, offset, 99], &[42]);
        prop_assert_eq!(out, big(&[42]));
    }

    #[test]
    fn prop_echo_preserves_input(values in proptest::collection::vec(any::<i64>(), 0..20)) {
        // Echo a counted list of values.
        let mut input = vec![values.len() as i64];
        input.extend(&values);
        let program = vec![
            3, 100,                 // count
            1006, 100, 16,          // done when zero
            3, 101, 4, 101,         // echo one
            1001, 100, -1, 100,     // count -= 1
            1105, 1, 2,             // loop
            99,
        ];
        prop_assert_eq!(outputs(program, &input), big(&values));
    }
}
