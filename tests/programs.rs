use fstroke::instruction::Mnemonic::{self, *};

mod util;
use util::{assert_well_formed, compile, count, count_sequence, imm_value, mnemonics};

// The opcode pattern which discards the current frame (loading the
// previous frame pointer and making it current).
static POP_FRAME: &[(Mnemonic, Option<usize>)] = &[
    (PUSH, Some(0)),
    (MLOAD, None),
    (MLOAD, None),
    (PUSH, Some(0)),
    (MSTORE, None),
];

// The opcode pattern which captures the caller's resume address in a
// fresh frame's return slot; it occurs exactly once per `push_frame`.
static STORE_RETURN_ADDRESS: &[(Mnemonic, Option<usize>)] = &[
    (PUSH, Some(0)),
    (MLOAD, None),
    (PUSH, Some(0x40)),
    (ADD, None),
    (MSTORE, None),
];

#[test]
fn test_identity_prologue() {
    let code = compile("(prog ((return 42)))", 32);
    let mns = mnemonics(&code);
    // Frame region set-up
    let init = [
        PUSH, PUSH, MSTORE, PUSH, DUP1, PUSH, MSTORE, PUSH, MSTORE, PUSH, PUSH, MSTORE,
    ];
    assert_eq!(&mns[..12], &init);
    // Entry jump into the program body
    assert_eq!(&mns[12..15], &[PUSH, JUMP, JUMPDEST]);
    assert_eq!(imm_value(&code.opcodes()[12]), code.opcodes()[14].id());
    // No atoms are bound in the body
    assert_eq!(imm_value(&code.opcodes()[15]), 0);
}

#[test]
fn test_identity_epilogue() {
    let code = compile("(prog ((return 42)))", 32);
    let ops = code.opcodes();
    let n = ops.len();
    // The value lands at address zero and 32 bytes are returned
    assert_eq!(&mnemonics(&code)[n - 6..], &[PUSH, PUSH, MSTORE, PUSH, PUSH, RETURN]);
    assert_eq!(imm_value(&ops[n - 6]), 42);
    assert_eq!(imm_value(&ops[n - 5]), 0);
    assert_eq!(imm_value(&ops[n - 3]), 0x20);
    assert_eq!(imm_value(&ops[n - 2]), 0);
}

#[test]
fn test_identity_hex() {
    // The whole stream, checked byte-for-byte at a one-byte width
    let code = compile("(prog ((return 42)))", 1);
    assert_eq!(
        code.to_hex_string(),
        "604060005260008060405260805260006060526016565B600060005160200152602A60005260206000F3"
    );
}

#[test]
fn test_read_arith() {
    let source = "(prog ((setq x (read 0)) (setq y (read 1)) (return (plus x y))))";
    let code = compile(source, 32);
    assert_well_formed(&code);
    // One CALLDATALOAD per read, each scaling its index to a word
    // offset first
    assert_eq!(count(&code, CALLDATALOAD), 2);
    assert_eq!(count(&code, MUL), 2);
    assert_eq!(count(&code, RETURN), 1);
    // Two atoms are bound in the body
    assert_eq!(imm_value(&code.opcodes()[15]), 2);
}

#[test]
fn test_conditional() {
    let source = "(prog ((cond (equal (read 0) 0) (return 1) (return 2))))";
    let code = compile(source, 32);
    assert_well_formed(&code);
    // Both branches return out of the program
    assert_eq!(count(&code, RETURN), 2);
    // Landing pads: body entry, then true, false and end
    assert_eq!(count(&code, JUMPDEST), 4);
    assert_eq!(count(&code, JUMPI), 1);
}

#[test]
fn test_cond_without_else() {
    // The false landing pad exists even without an else body
    let code = compile("(prog ((cond (read 0) (setq x 1)) (return x)))", 32);
    assert_well_formed(&code);
    assert_eq!(count(&code, JUMPDEST), 4);
}

#[test]
fn test_loop_break() {
    let source = "(prog ((setq i 0) \
                  (while (less i 10) ((cond (equal i 5) (break) (setq i (plus i 1))))) \
                  (return i)))";
    let code = compile(source, 32);
    assert_well_formed(&code);
    // Landing pads: body entry, three for the while, three for the cond
    assert_eq!(count(&code, JUMPDEST), 7);
    // Every break resolves to the enclosing loop's end label, so both
    // the loop exit and the break target the final JUMPDEST; no entry
    // carries a leftover marker
    let ops = code.opcodes();
    let end = ops.iter().rev().find(|op| op.mnemonic() == JUMPDEST).unwrap().id();
    let exits = ops
        .windows(2)
        .filter(|w| {
            w[0].mnemonic() == PUSH && w[1].mnemonic() == JUMP && imm_value(&w[0]) == end
        })
        .count();
    assert_eq!(exits, 2);
}

#[test]
fn test_function_call() {
    let source = "(func add (a b) ((return (plus a b)))) (prog ((return (add 2 3))))";
    let code = compile(source, 32);
    assert_well_formed(&code);
    let entry = *code.functions().get("add").unwrap();
    let ops = code.opcodes();
    // Exactly one JUMPDEST sits at the declared entry offset
    let entries = ops
        .iter()
        .filter(|op| op.mnemonic() == JUMPDEST && op.id() == entry)
        .count();
    assert_eq!(entries, 1);
    // The call site pushes its resume address, then the entry offset,
    // and resumes at the JUMPDEST directly after its JUMP
    let mut found = false;
    for i in 0..ops.len() - 3 {
        if ops[i].mnemonic() == PUSH
            && ops[i + 1].mnemonic() == PUSH
            && imm_value(&ops[i + 1]) == entry
            && ops[i + 2].mnemonic() == JUMP
        {
            assert_eq!(ops[i + 3].mnemonic(), JUMPDEST);
            assert_eq!(imm_value(&ops[i]), ops[i + 3].id());
            found = true;
        }
    }
    assert!(found, "no call site found for 'add'");
    // One frame is opened on entry; the explicit return and the
    // fall-through epilogue each close it
    assert_eq!(count_sequence(&code, STORE_RETURN_ADDRESS), 1);
    assert_eq!(count_sequence(&code, POP_FRAME), 2);
}

#[test]
fn test_recursion() {
    let source = "(func fact (n) ((cond (equal n 0) (return 1) \
                  (return (times n (fact (minus n 1))))))) \
                  (prog ((return (fact 5))))";
    let code = compile(source, 32);
    assert_well_formed(&code);
    let entry = *code.functions().get("fact").unwrap();
    let ops = code.opcodes();
    // Two call sites target the entry point: one in the program body,
    // one recursive
    let calls = ops
        .windows(2)
        .filter(|w| {
            w[0].mnemonic() == PUSH && w[1].mnemonic() == JUMP && imm_value(&w[0]) == entry
        })
        .count();
    assert_eq!(calls, 2);
    // Both returns and the epilogue restore the caller's frame
    assert_eq!(count_sequence(&code, STORE_RETURN_ADDRESS), 1);
    assert_eq!(count_sequence(&code, POP_FRAME), 3);
}

#[test]
fn test_comparison_encodings() {
    // With operands lowered left-to-right, the second sits on top, so
    // the strict comparisons take the opposite mnemonic and the
    // non-strict ones negate it
    let less = compile("(prog ((return (less 1 2))))", 32);
    assert_eq!(count(&less, GT), 1);
    assert_eq!(count(&less, LT), 0);
    let greater = compile("(prog ((return (greater 1 2))))", 32);
    assert_eq!(count(&greater, LT), 1);
    let lesseq = compile("(prog ((return (lesseq 1 2))))", 32);
    assert_eq!(count(&lesseq, LT), 1);
    assert_eq!(count(&lesseq, ISZERO), 1);
    let greatereq = compile("(prog ((return (greatereq 1 2))))", 32);
    assert_eq!(count(&greatereq, GT), 1);
    assert_eq!(count(&greatereq, ISZERO), 1);
}

#[test]
fn test_subtraction_order() {
    // minus and divide swap their operands before the operation
    let code = compile("(prog ((return (minus 5 3))))", 32);
    let mns = mnemonics(&code);
    let at = mns.iter().position(|m| *m == SWAP1).unwrap();
    assert_eq!(mns[at + 1], SUB);
    let code = compile("(prog ((return (divide 6 3))))", 32);
    let mns = mnemonics(&code);
    let at = mns.iter().position(|m| *m == SWAP1).unwrap();
    assert_eq!(mns[at + 1], DIV);
}

#[test]
fn test_function_return_leaves_frame() {
    // A return inside a function jumps through the stored return
    // address rather than leaving the machine
    let source = "(func id (a) ((return a))) (prog ((return (id 7))))";
    let code = compile(source, 32);
    assert_well_formed(&code);
    // Only the program body's return uses the RETURN instruction
    assert_eq!(count(&code, RETURN), 1);
}

#[test]
fn test_deterministic_slots() {
    // Atom slots are assigned by first use, deterministically
    let source = "(prog ((setq b 1) (setq a 2) (setq b 3) (return a)))";
    let first = compile(source, 4);
    let second = compile(source, 4);
    assert_eq!(first.to_hex_string(), second.to_hex_string());
    // Two atoms in the frame
    assert_eq!(imm_value(&first.opcodes()[15]), 2);
}
