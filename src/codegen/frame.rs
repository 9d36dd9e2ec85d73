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

//! Emitters for the virtual call-stack which the generated code keeps
//! in the machine's linear memory, using only `PUSH`, `MLOAD` and
//! `MSTORE` primitives.
//!
//! Global memory layout:
//!
//! * `0x00`: byte offset of the current frame's start (the "gap").
//! * `0x20`: scratch word.
//! * `0x40`: start of the frame region; the program frame lives here.
//!
//! Frame layout, relative to the frame's start:
//!
//! * `+0x00`: start of the previous frame.
//! * `+0x20`: number of atoms bound in this frame.
//! * `+0x40`: return address (byte offset of the caller's resume
//!   `JUMPDEST`).
//! * `+0x60` onwards: one word per atom.
//!
//! Each emitter documents its effect on the machine stack as
//! `| EoS | ...` (end-of-stack on the left), the same convention the
//! built-in lowerings use.

use crate::codegen::{Bytecode, Error};
use crate::instruction::Mnemonic::*;

/// Absolute address holding the byte offset of the current frame.
pub const CURRENT_FRAME: usize = 0x00;
/// Absolute address of the initial (program) frame.
pub const FRAME_BASE: usize = 0x40;
/// Frame-relative offset of the previous-frame pointer.
pub const PREVIOUS_FRAME: usize = 0x00;
/// Frame-relative offset of the atom counter.
pub const ATOM_COUNTER: usize = 0x20;
/// Frame-relative offset of the return address.
pub const RETURN_ADDRESS: usize = 0x40;
/// Number of word slots at the start of every frame taken up by the
/// three fields above; atom slots begin after them.
pub const SERVICE_SLOTS: usize = 3;

type Result = std::result::Result<(), Error>;

/// Set up the frame region: the current-frame pointer points at the
/// program frame, whose previous-frame pointer, return address and
/// atom counter are all zeroed.
///
/// `| EoS |  =>  | EoS |`
pub fn init_stack(code: &mut Bytecode) -> Result {
    // Current frame starts at the frame base
    code.append_push(FRAME_BASE)?;
    code.append_push(CURRENT_FRAME)?;
    code.append(MSTORE);
    // Zero the program frame's previous-frame pointer and return
    // address
    code.append_push(0)?;
    code.append(DUP1);
    code.append_push(FRAME_BASE + PREVIOUS_FRAME)?;
    code.append(MSTORE);
    code.append_push(FRAME_BASE + RETURN_ADDRESS)?;
    code.append(MSTORE);
    // Zero the program frame's atom counter
    code.append_push(0)?;
    code.append_push(FRAME_BASE + ATOM_COUNTER)?;
    code.append(MSTORE);
    Ok(())
}

/// `| EoS |  =>  | EoS | start of current frame |`
pub fn load_current_frame(code: &mut Bytecode) -> Result {
    code.append_push(CURRENT_FRAME)?;
    code.append(MLOAD);
    Ok(())
}

/// `| EoS | new frame start |  =>  | EoS |`
pub fn store_current_frame(code: &mut Bytecode) -> Result {
    code.append_push(CURRENT_FRAME)?;
    code.append(MSTORE);
    Ok(())
}

/// `| EoS |  =>  | EoS | start of previous frame |`
pub fn load_previous_frame(code: &mut Bytecode) -> Result {
    load_current_frame(code)?;
    code.append(MLOAD);
    Ok(())
}

/// `| EoS |  =>  | EoS | address of atom |`
pub fn load_atom_address(code: &mut Bytecode, offset: usize) -> Result {
    load_current_frame(code)?;
    code.append_push(offset)?;
    code.append(ADD);
    Ok(())
}

/// `| EoS |  =>  | EoS | value of atom |`
pub fn load_atom_value(code: &mut Bytecode, offset: usize) -> Result {
    load_atom_address(code, offset)?;
    code.append(MLOAD);
    Ok(())
}

/// `| EoS | new value of atom |  =>  | EoS |`
pub fn store_atom_value(code: &mut Bytecode, offset: usize) -> Result {
    load_atom_address(code, offset)?;
    code.append(MSTORE);
    Ok(())
}

/// `| EoS |  =>  | EoS | address of atom counter |`
pub fn load_atom_counter_addr(code: &mut Bytecode) -> Result {
    load_current_frame(code)?;
    code.append_push(ATOM_COUNTER)?;
    code.append(ADD);
    Ok(())
}

/// `| EoS |  =>  | EoS | value of atom counter |`
pub fn load_atom_counter(code: &mut Bytecode) -> Result {
    load_atom_counter_addr(code)?;
    code.append(MLOAD);
    Ok(())
}

/// `| EoS |  =>  | EoS | address of return address |`
pub fn load_return_address_addr(code: &mut Bytecode) -> Result {
    load_current_frame(code)?;
    code.append_push(RETURN_ADDRESS)?;
    code.append(ADD);
    Ok(())
}

/// `| EoS |  =>  | EoS | return address |`
pub fn load_return_address(code: &mut Bytecode) -> Result {
    load_return_address_addr(code)?;
    code.append(MLOAD);
    Ok(())
}

/// `| EoS | new return address |  =>  | EoS |`
pub fn store_return_address(code: &mut Bytecode) -> Result {
    load_return_address_addr(code)?;
    code.append(MSTORE);
    Ok(())
}

/// `| EoS |  =>  | EoS | size of current frame |`
pub fn frame_size(code: &mut Bytecode) -> Result {
    code.append_push(SERVICE_SLOTS * 0x20)?;
    load_atom_counter(code)?;
    code.append_push(0x20)?;
    code.append(MUL);
    code.append(ADD);
    Ok(())
}

/// `| EoS |  =>  | EoS | start of next frame |`
pub fn new_frame_gap(code: &mut Bytecode) -> Result {
    load_current_frame(code)?;
    frame_size(code)?;
    code.append(ADD);
    Ok(())
}

/// Open a fresh frame directly after the current one.  The caller
/// must have pushed the function arguments followed by the return
/// address; the return address moves into the new frame's return slot
/// while the arguments stay on the machine stack.
///
/// `| EoS | arg 1 | .. | arg n | return address |  =>  | EoS | arg 1 | .. | arg n |`
pub fn push_frame(code: &mut Bytecode) -> Result {
    // Link the new frame back to the current one
    load_current_frame(code)?;
    new_frame_gap(code)?;
    code.append(MSTORE);
    // Move the frame pointer forward
    new_frame_gap(code)?;
    store_current_frame(code)?;
    // Return address gone
    store_return_address(code)?;
    Ok(())
}

/// Discard the current frame, making the previous one current again.
///
/// `| EoS |  =>  | EoS |`
pub fn pop_frame(code: &mut Bytecode) -> Result {
    load_previous_frame(code)?;
    store_current_frame(code)?;
    Ok(())
}
