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

use crate::codegen::frame;

// ============================================================================
// Compilation context
// ============================================================================

/// The symbol table of one top-level form (the program body or a
/// function).  Atoms are assigned dense frame slots in first-use
/// order, starting after the reserved frame-service slots.  Slots are
/// never freed within a context; the context's lifetime is the
/// lowering of its form.
pub struct Context {
    /// The next free slot index.
    next_slot: usize,
    /// Slot index of every known atom.
    slots: HashMap<String, usize>,
    /// Whether this context covers the `prog` body, whose `return`
    /// leaves the machine rather than the current frame.
    program_body: bool,
}

impl Context {
    pub fn new(program_body: bool) -> Self {
        Context {
            next_slot: frame::SERVICE_SLOTS,
            slots: HashMap::new(),
            program_body,
        }
    }

    pub fn is_program_body(&self) -> bool {
        self.program_body
    }

    /// Look up the frame byte offset of an atom, assigning the next
    /// free slot if the name is new.  Also reports whether the atom
    /// was just added.
    pub fn slot(&mut self, name: &str) -> (usize, bool) {
        match self.slots.get(name) {
            Some(&slot) => (slot * 0x20, false),
            None => {
                let slot = self.next_slot;
                self.slots.insert(name.to_string(), slot);
                self.next_slot += 1;
                (slot * 0x20, true)
            }
        }
    }

    /// The number of atoms bound in this context (excluding the
    /// frame-service slots).
    pub fn atom_count(&self) -> usize {
        self.next_slot - frame::SERVICE_SLOTS
    }
}

#[cfg(test)]
mod tests {
    use super::Context;

    #[test]
    fn test_context_01() {
        // slots are dense, in first-use order, after the service slots
        let mut ctx = Context::new(false);
        assert_eq!(ctx.slot("x"), (0x60, true));
        assert_eq!(ctx.slot("y"), (0x80, true));
        assert_eq!(ctx.slot("x"), (0x60, false));
        assert_eq!(ctx.atom_count(), 2);
    }

    #[test]
    fn test_context_02() {
        let mut ctx = Context::new(true);
        assert_eq!(ctx.atom_count(), 0);
        assert!(ctx.is_program_body());
        ctx.slot("i");
        assert_eq!(ctx.atom_count(), 1);
    }
}
