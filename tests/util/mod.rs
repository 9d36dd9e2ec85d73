use std::collections::HashSet;

use fstroke::codegen::{Bytecode, Generator, Opcode};
use fstroke::instruction::Mnemonic;
use fstroke::syntax::Parser;

/// Run a source string through the full pipeline at a given address
/// width.
pub fn compile(source: &str, width: usize) -> Bytecode {
    let tree = Parser::new(source).unwrap().parse().unwrap();
    Generator::new(width).unwrap().generate(&tree).unwrap()
}

/// The numeric value of an entry's immediate.
pub fn imm_value(op: &Opcode) -> usize {
    usize::from_str_radix(op.immediate().unwrap(), 16).unwrap()
}

/// The mnemonics of a generated sequence, in emission order.
pub fn mnemonics(code: &Bytecode) -> Vec<Mnemonic> {
    code.opcodes().iter().map(|op| op.mnemonic()).collect()
}

/// Count the entries carrying a given mnemonic.
pub fn count(code: &Bytecode, mnemonic: Mnemonic) -> usize {
    code.opcodes().iter().filter(|op| op.mnemonic() == mnemonic).count()
}

/// Count the occurrences of a mnemonic pattern, where each element
/// optionally constrains the entry's immediate value.
pub fn count_sequence(code: &Bytecode, pattern: &[(Mnemonic, Option<usize>)]) -> usize {
    let mut n = 0;
    for window in code.opcodes().windows(pattern.len()) {
        let hit = window.iter().zip(pattern).all(|(op, (mnemonic, imm))| {
            op.mnemonic() == *mnemonic && imm.map_or(true, |value| imm_value(op) == value)
        });
        if hit {
            n += 1;
        }
    }
    n
}

/// Check the universal well-formedness properties of a generated
/// sequence:
///
/// * every entry's id equals the summed widths of the entries before
///   it;
/// * every `PUSH` immediate has exactly `2 * width` hex characters,
///   and nothing else carries an immediate;
/// * every branch whose target was pushed directly in front of it
///   lands on a `JUMPDEST`;
/// * serialization is idempotent and has the exact expected length.
pub fn assert_well_formed(code: &Bytecode) {
    let width = code.address_width();
    // Byte-offset invariant
    let mut offset = 0;
    for op in code.opcodes() {
        assert_eq!(op.id(), offset, "entry {:?} has a stale offset", op);
        offset += op.mnemonic().length(width);
    }
    assert_eq!(code.byte_length(), offset);
    // Immediate widths
    for op in code.opcodes() {
        match op.mnemonic() {
            Mnemonic::PUSH => assert_eq!(op.immediate().unwrap().len(), 2 * width),
            _ => assert!(op.immediate().is_none()),
        }
    }
    // Jump closure
    let dests: HashSet<usize> = code
        .opcodes()
        .iter()
        .filter(|op| op.mnemonic() == Mnemonic::JUMPDEST)
        .map(|op| op.id())
        .collect();
    for window in code.opcodes().windows(2) {
        let branch = matches!(window[1].mnemonic(), Mnemonic::JUMP | Mnemonic::JUMPI);
        if branch && window[0].mnemonic() == Mnemonic::PUSH {
            let target = imm_value(&window[0]);
            assert!(
                dests.contains(&target),
                "branch at {:#x} targets {:#x}, which is not a JUMPDEST",
                window[1].id(),
                target
            );
        }
    }
    // Serialization
    let hex = code.to_hex_string();
    assert_eq!(hex, code.to_hex_string());
    assert_eq!(hex.len(), 2 * code.byte_length());
}
