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
use std::collections::HashMap;
use std::fmt::Write;

use ruint::aliases::U256;

use crate::codegen::Error;
use crate::instruction::Mnemonic;
use crate::util::ToHexWord;

// ============================================================================
// Opcode entries
// ============================================================================

/// One emitted instruction.  Its `id` is the byte offset at which the
/// opcode appears in the final stream, assigned when the entry is
/// appended and never renumbered.  `PUSH` entries carry an immediate
/// of exactly `2 * width` hex characters; patching an immediate later
/// changes bytes but not layout, because the width is fixed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Opcode {
    id: usize,
    mnemonic: Mnemonic,
    immediate: Option<String>,
}

impl Opcode {
    /// Byte offset of this entry in the final stream.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    /// The immediate operand (upper-case hex), if this entry carries
    /// one.
    pub fn immediate(&self) -> Option<&str> {
        self.immediate.as_deref()
    }
}

// ============================================================================
// Push handles
// ============================================================================

/// An opaque handle onto a reserved `PUSH` whose immediate is not yet
/// known (a forward branch target, or a counter patched once a body
/// has been lowered).  Handles are single-use: resolving one consumes
/// it, so an immediate can be rewritten at most once.
#[derive(Debug)]
#[must_use]
pub struct PushHandle(usize);

// ============================================================================
// Bytecode
// ============================================================================

/// Represents a sequence of zero or more opcode entries under
/// construction, which can be turned into a hex string.  Entries are
/// append-only and their ids increase monotonically; the running byte
/// counter assigns the next id.
#[derive(Debug)]
pub struct Bytecode {
    /// The underlying opcode sequence.
    opcodes: Vec<Opcode>,
    /// Byte offset assigned to the next entry.
    offset: usize,
    /// The address width (in bytes) of every `PUSH` immediate.
    width: usize,
    /// Entry offsets of the declared functions, by name.
    functions: HashMap<String, usize>,
}

impl Bytecode {
    pub fn new(width: usize) -> Self {
        debug_assert!((1..=32).contains(&width));
        Bytecode {
            opcodes: Vec::new(),
            offset: 0,
            width,
            functions: HashMap::new(),
        }
    }

    /// The configured `PUSH` immediate width, in bytes.
    pub fn address_width(&self) -> usize {
        self.width
    }

    /// Total size of the encoded stream so far, in bytes.
    pub fn byte_length(&self) -> usize {
        self.offset
    }

    /// Get access to the raw sequence of entries.
    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }

    /// Entry offsets of the declared functions, by name.
    pub fn functions(&self) -> &HashMap<String, usize> {
        &self.functions
    }

    pub(crate) fn declare_function(&mut self, name: &str, id: usize) -> bool {
        self.functions.insert(name.to_string(), id).is_none()
    }

    /// The largest value an immediate of the configured width can
    /// hold.
    pub fn max_immediate(&self) -> U256 {
        U256::MAX >> (8 * (32 - self.width))
    }

    fn push_entry(&mut self, mnemonic: Mnemonic, immediate: Option<String>) -> usize {
        let id = self.offset;
        self.opcodes.push(Opcode { id, mnemonic, immediate });
        self.offset += mnemonic.length(self.width);
        id
    }

    /// Append an instruction, returning the byte offset assigned to
    /// it.  A `PUSH` appended this way carries a zero immediate.
    pub fn append(&mut self, mnemonic: Mnemonic) -> usize {
        let immediate = match mnemonic {
            Mnemonic::PUSH => Some(0usize.to_hex_word(self.width)),
            _ => None,
        };
        self.push_entry(mnemonic, immediate)
    }

    /// Append a `PUSH` of the given byte offset (e.g. a known branch
    /// target, or a frame constant), returning the id assigned to it.
    pub fn append_push(&mut self, value: usize) -> Result<usize, Error> {
        if U256::from(value) > self.max_immediate() {
            return Err(Error::ImmediateOverflow(value));
        }
        let immediate = value.to_hex_word(self.width);
        Ok(self.push_entry(Mnemonic::PUSH, Some(immediate)))
    }

    /// Append a `PUSH` of a full-width word.  The caller must have
    /// checked the value against `max_immediate`.
    pub fn append_push_word(&mut self, value: U256) -> usize {
        debug_assert!(value <= self.max_immediate());
        let immediate = value.to_hex_word(self.width);
        self.push_entry(Mnemonic::PUSH, Some(immediate))
    }

    /// Append a `PUSH` whose immediate is not yet known.  The entry
    /// is emitted with a zero immediate and its final value filled in
    /// later via `resolve`.
    pub fn reserve_push(&mut self) -> PushHandle {
        let index = self.opcodes.len();
        self.append(Mnemonic::PUSH);
        PushHandle(index)
    }

    /// Fill in a reserved `PUSH`, consuming the handle.
    pub fn resolve(&mut self, handle: PushHandle, value: usize) -> Result<(), Error> {
        if U256::from(value) > self.max_immediate() {
            return Err(Error::ImmediateOverflow(value));
        }
        let entry = &mut self.opcodes[handle.0];
        debug_assert_eq!(entry.mnemonic, Mnemonic::PUSH);
        entry.immediate = Some(value.to_hex_word(self.width));
        Ok(())
    }

    /// Serialize the entries into a single hex string: two characters
    /// per opcode byte, plus `2 * width` characters for each `PUSH`
    /// immediate.  No prefix, no separators.
    pub fn to_hex_string(&self) -> String {
        let mut hexstr = String::with_capacity(2 * self.offset);
        for op in &self.opcodes {
            write!(hexstr, "{:02X}", op.mnemonic.opcode(self.width)).unwrap();
            if let Some(imm) = &op.immediate {
                hexstr.push_str(imm);
            }
        }
        hexstr
    }
}
