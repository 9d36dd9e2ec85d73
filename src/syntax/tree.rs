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

// ============================================================================
// Trees
// ============================================================================

/// The syntax tree of an F-Stroke compilation unit.  A `Program` node
/// only ever appears at the root.  Literals keep their raw decimal
/// digit string, since their admissible range depends on the address
/// width configured at code-generation time, not on the syntax.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Tree {
    /// The whole compilation unit (a sequence of top-level forms).
    Program(Vec<Tree>),
    /// A parenthesized sequence of elements.
    List(Vec<Tree>),
    /// An identifier (always lower-case).
    Atom(String),
    /// An unsigned decimal integer, as written.
    Literal(String),
}
