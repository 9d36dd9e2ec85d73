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

use crate::codegen::Bytecode;
use crate::instruction::Mnemonic;
use crate::util::ToHexWord;

/// Render a generated opcode sequence in a human-readable form, one
/// entry per line:
///
/// ```text
/// <offset>: <opcode> <immediate>  <MNEMONIC> [0x<immediate>]
/// ```
///
/// Offsets are zero-padded to the configured address width.  Entries
/// which open a declared function are annotated with its name.
pub fn disassemble(code: &Bytecode) -> String {
    let width = code.address_width();
    // Invert the function registry for annotation
    let mut names: HashMap<usize, &str> = HashMap::new();
    for (name, &id) in code.functions() {
        names.insert(id, name);
    }
    //
    let blank = "  ".repeat(width);
    let mut out = String::new();
    for op in code.opcodes() {
        let imm = op.immediate().unwrap_or(&blank);
        write!(
            out,
            "{}: {:02X} {} {}",
            op.id().to_hex_word(width),
            op.mnemonic().opcode(width),
            imm,
            op.mnemonic()
        )
        .unwrap();
        if let Some(imm) = op.immediate() {
            write!(out, " 0x{}", imm).unwrap();
        }
        if op.mnemonic() == Mnemonic::JUMPDEST {
            if let Some(name) = names.get(&op.id()) {
                write!(out, " // {}", name).unwrap();
            }
        }
        out.push('\n');
    }
    out
}
