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

// Defines the opcode container.
mod bytecode;
// Per-form symbol tables.
mod context;
// Emitters for the virtual call-stack.
mod frame;
// Responsible for lowering trees.
mod generator;

pub use bytecode::{Bytecode, Opcode, PushHandle};
pub use generator::Generator;

// ============================================================================
// Errors
// ============================================================================

/// Errors which can arise when lowering a syntax tree to bytecode.
/// The first error aborts the whole compilation; nothing is emitted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The configured address width lies outside `1..=32`.
    InvalidAddressWidth(usize),
    /// An integer literal exceeds `2^(8*width) - 1` and therefore
    /// cannot be pushed.
    LiteralOverflow(String),
    /// A branch target or counter does not fit the configured
    /// immediate width (the emitted code has outgrown the address
    /// space).
    ImmediateOverflow(usize),
    /// A built-in form was applied to the wrong number of arguments.
    InvalidArity(&'static str, usize),
    /// A list form whose head is neither an atom nor a nested block.
    InvalidApplication,
    /// A call references a name which is neither built-in nor a
    /// previously declared function.
    UnknownFunction(String),
    /// Two function declarations share one name.
    DuplicateFunction(String),
    /// The name or argument list of a `func` declaration is not made
    /// of atoms.
    InvalidFunctionSignature,
    /// A `func` declaration was encountered below the top level.
    MisplacedFunction,
    /// A `prog` form was encountered below the top level.
    MisplacedProgram,
    /// A `break` was encountered outside of any enclosing `while`.
    BreakOutsideLoop,
    /// A top-level form was neither a `func` declaration nor `prog`.
    InvalidTopLevelForm,
    /// The compilation unit contains no `prog` form.
    MissingProgram,
    /// The compilation unit contains more than one `prog` form.
    DuplicateProgram,
    /// The target of a `setq` is not an atom.
    InvalidAssignment,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}
