// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::fmt;

// ============================================================================
// Opcodes
// ============================================================================

// 0s: Stop and Arithmetic Operations
pub const STOP: u8 = 0x00;
pub const ADD: u8 = 0x01;
pub const MUL: u8 = 0x02;
pub const SUB: u8 = 0x03;
pub const DIV: u8 = 0x04;
pub const MOD: u8 = 0x06;
pub const ADDMOD: u8 = 0x08;
pub const MULMOD: u8 = 0x09;
pub const EXP: u8 = 0x0a;
// 10s: Comparison & Bitwise Logic Operations
pub const LT: u8 = 0x10;
pub const GT: u8 = 0x11;
pub const SLT: u8 = 0x12;
pub const SGT: u8 = 0x13;
pub const EQ: u8 = 0x14;
pub const ISZERO: u8 = 0x15;
pub const AND: u8 = 0x16;
pub const OR: u8 = 0x17;
pub const XOR: u8 = 0x18;
pub const NOT: u8 = 0x19;
// 30s: Environment Information
pub const CALLDATALOAD: u8 = 0x35;
// 50s: Stack, Memory Storage and Flow Operations
pub const MLOAD: u8 = 0x51;
pub const MSTORE: u8 = 0x52;
pub const JUMP: u8 = 0x56;
pub const JUMPI: u8 = 0x57;
pub const JUMPDEST: u8 = 0x5b;
// 60s & 70s: Push Operations
pub const PUSH1: u8 = 0x60;
// 80s: Duplication Operations
pub const DUP1: u8 = 0x80;
pub const DUP2: u8 = 0x81;
// 90s: Exchange Operations
pub const SWAP1: u8 = 0x90;
// f0s: System operations
pub const RETURN: u8 = 0xf3;

// ============================================================================
// Mnemonics
// ============================================================================

/// The instructions which the code generator can emit.  All of them
/// occupy a single byte in the final stream, except `PUSH` which is
/// followed by an immediate operand of the configured address width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mnemonic {
    // 0s: Stop and Arithmetic Operations
    STOP,
    ADD,
    MUL,
    SUB,
    DIV,
    MOD,
    ADDMOD,
    MULMOD,
    EXP,
    // 10s: Comparison & Bitwise Logic Operations
    LT,
    GT,
    SLT,
    SGT,
    EQ,
    ISZERO,
    AND,
    OR,
    XOR,
    NOT,
    // 30s: Environmental Information
    CALLDATALOAD,
    // 50s: Stack, Memory, Storage and Flow Operations
    MLOAD,
    MSTORE,
    JUMP,
    JUMPI,
    JUMPDEST,
    // 60s & 70s: Push Operations
    PUSH,
    // 80s: Duplication Operations
    DUP1,
    DUP2,
    // 90s: Swap Operations
    SWAP1,
    // f0s: System Operations
    RETURN,
}

impl Mnemonic {
    /// Determine the one-byte encoding of this instruction.  For
    /// `PUSH` the encoding depends on the address width `width` (in
    /// bytes), where `PUSH` with an `n` byte immediate encodes as
    /// `0x60 + n - 1`.
    pub fn opcode(&self, width: usize) -> u8 {
        match self {
            Mnemonic::STOP => STOP,
            Mnemonic::ADD => ADD,
            Mnemonic::MUL => MUL,
            Mnemonic::SUB => SUB,
            Mnemonic::DIV => DIV,
            Mnemonic::MOD => MOD,
            Mnemonic::ADDMOD => ADDMOD,
            Mnemonic::MULMOD => MULMOD,
            Mnemonic::EXP => EXP,
            Mnemonic::LT => LT,
            Mnemonic::GT => GT,
            Mnemonic::SLT => SLT,
            Mnemonic::SGT => SGT,
            Mnemonic::EQ => EQ,
            Mnemonic::ISZERO => ISZERO,
            Mnemonic::AND => AND,
            Mnemonic::OR => OR,
            Mnemonic::XOR => XOR,
            Mnemonic::NOT => NOT,
            Mnemonic::CALLDATALOAD => CALLDATALOAD,
            Mnemonic::MLOAD => MLOAD,
            Mnemonic::MSTORE => MSTORE,
            Mnemonic::JUMP => JUMP,
            Mnemonic::JUMPI => JUMPI,
            Mnemonic::JUMPDEST => JUMPDEST,
            Mnemonic::PUSH => PUSH1 + width as u8 - 1,
            Mnemonic::DUP1 => DUP1,
            Mnemonic::DUP2 => DUP2,
            Mnemonic::SWAP1 => SWAP1,
            Mnemonic::RETURN => RETURN,
        }
    }

    /// Returns the length of this instruction in the final byte
    /// stream: one byte for the opcode itself, plus the immediate for
    /// `PUSH`.
    pub fn length(&self, width: usize) -> usize {
        match self {
            Mnemonic::PUSH => 1 + width,
            _ => 1,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
