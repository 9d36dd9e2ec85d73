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

// Responsible for parsing.
mod parser;
// Support for tokenizing.
mod token;
// Defines the syntax tree.
mod tree;

pub use parser::Parser;
pub use token::{Terminal, Token, Tokens};
pub use tree::Tree;

// ============================================================================
// Errors
// ============================================================================

/// Errors which can arise when tokenizing source text and/or building
/// the syntax tree from it.  Positions are byte offsets into the
/// original input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A character was encountered which is not part of the source
    /// alphabet (parentheses, letters, digits, whitespace).
    UnexpectedCharacter(usize),
    /// A closing parenthesis was encountered with no matching opener.
    UnexpectedRightParen(usize),
    /// The input ended before an open list was closed.
    UnexpectedEof,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}
