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
use log::{debug, info};
use ruint::aliases::U256;

use crate::codegen::bytecode::{Bytecode, PushHandle};
use crate::codegen::context::Context;
use crate::codegen::{frame, Error};
use crate::instruction::Mnemonic;
use crate::instruction::Mnemonic::*;
use crate::syntax::Tree;

type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Generator
// ============================================================================

/// Lowers a syntax tree into a linear opcode sequence.  All state of
/// one compilation run lives in the generator value, so independent
/// runs within one process cannot observe each other; a generator is
/// consumed by `generate`.
pub struct Generator {
    /// The opcode sequence being constructed by this generator.
    code: Bytecode,
    /// Unresolved break sites of every lexically enclosing `while`,
    /// innermost last.
    loops: Vec<Vec<PushHandle>>,
}

impl Generator {
    pub fn new(width: usize) -> Result<Self> {
        if !(1..=32).contains(&width) {
            return Err(Error::InvalidAddressWidth(width));
        }
        Ok(Self {
            code: Bytecode::new(width),
            loops: Vec::new(),
        })
    }

    /// Lower a whole compilation unit.  The module prologue sets up
    /// the frame region and jumps over the function definitions into
    /// the program body; each top-level form is then lowered in
    /// source order.
    pub fn generate(mut self, tree: &Tree) -> Result<Bytecode> {
        let forms = match tree {
            Tree::Program(forms) => forms,
            _ => {
                return Err(Error::InvalidTopLevelForm);
            }
        };
        info!("building contract header");
        frame::init_stack(&mut self.code)?;
        // Jump over the function definitions into the program body;
        // resolved once the body's entry point is known.
        let mut entry = Some(self.code.reserve_push());
        self.code.append(JUMP);
        //
        for form in forms {
            match form {
                Tree::List(children) => self.translate_top_level(children, &mut entry)?,
                _ => {
                    return Err(Error::InvalidTopLevelForm);
                }
            }
        }
        // The entry handle is consumed by the (unique) program body
        if entry.is_some() {
            return Err(Error::MissingProgram);
        }
        info!("emitted {} bytes of code", self.code.byte_length());
        Ok(self.code)
    }

    fn translate_top_level(&mut self, form: &[Tree], entry: &mut Option<PushHandle>) -> Result<()> {
        match form.first() {
            Some(Tree::Atom(name)) if name == "prog" => self.translate_program_body(form, entry),
            Some(Tree::Atom(name)) if name == "func" => self.translate_function(form),
            _ => Err(Error::InvalidTopLevelForm),
        }
    }

    // ============================================================================
    // Top-level forms
    // ============================================================================

    fn translate_program_body(&mut self, form: &[Tree], entry: &mut Option<PushHandle>) -> Result<()> {
        let handle = entry.take().ok_or(Error::DuplicateProgram)?;
        if form.len() != 2 {
            return Err(Error::InvalidArity("prog", form.len() - 1));
        }
        info!("building program body");
        let id = self.code.append(JUMPDEST);
        self.code.resolve(handle, id)?;
        let mut ctx = Context::new(true);
        // The frame's atom counter, patched once the body has been
        // lowered and the context knows every atom.
        let counter = self.code.reserve_push();
        frame::load_atom_counter_addr(&mut self.code)?;
        self.code.append(MSTORE);
        //
        self.translate(&form[1], &mut ctx)?;
        //
        self.code.resolve(counter, ctx.atom_count())
    }

    /// Lower a `func` declaration.  On entry the caller has pushed
    /// the arguments followed by the return address; a fresh frame
    /// captures the return address, and the arguments are bound
    /// right-to-left since the last one sits on top of the stack.
    fn translate_function(&mut self, form: &[Tree]) -> Result<()> {
        if form.len() != 4 {
            return Err(Error::InvalidArity("func", form.len() - 1));
        }
        let name = match &form[1] {
            Tree::Atom(name) => name,
            _ => {
                return Err(Error::InvalidFunctionSignature);
            }
        };
        let args = match &form[2] {
            Tree::List(args) => args,
            _ => {
                return Err(Error::InvalidFunctionSignature);
            }
        };
        // Set the entry point
        let id = self.code.append(JUMPDEST);
        if !self.code.declare_function(name, id) {
            return Err(Error::DuplicateFunction(name.clone()));
        }
        debug!("declaring function '{name}' at offset {id:#x}");
        let mut ctx = Context::new(false);
        frame::push_frame(&mut self.code)?;
        // The frame's atom counter, patched below
        let counter = self.code.reserve_push();
        frame::load_atom_counter_addr(&mut self.code)?;
        self.code.append(MSTORE);
        // Bind the arguments
        for arg in args.iter().rev() {
            let arg = match arg {
                Tree::Atom(name) => name,
                _ => {
                    return Err(Error::InvalidFunctionSignature);
                }
            };
            let (slot, _) = ctx.slot(arg);
            frame::store_atom_value(&mut self.code, slot)?;
        }
        //
        self.translate(&form[3], &mut ctx)?;
        //
        self.code.resolve(counter, ctx.atom_count())?;
        // Leave the function, should the body fall through
        frame::load_return_address(&mut self.code)?;
        frame::pop_frame(&mut self.code)?;
        self.code.append(JUMP);
        Ok(())
    }

    // ============================================================================
    // Dispatch
    // ============================================================================

    fn translate(&mut self, tree: &Tree, ctx: &mut Context) -> Result<()> {
        match tree {
            Tree::Literal(digits) => self.translate_literal(digits),
            Tree::Atom(name) => self.translate_atom(name, ctx),
            Tree::List(children) => self.translate_form(children, ctx),
            Tree::Program(_) => Err(Error::MisplacedProgram),
        }
    }

    fn translate_form(&mut self, form: &[Tree], ctx: &mut Context) -> Result<()> {
        match form.first() {
            // An empty list lowers to nothing
            None => Ok(()),
            // A list headed by another list is a block; lower each
            // statement in turn
            Some(Tree::List(_)) => {
                for child in form {
                    self.translate(child, ctx)?;
                }
                Ok(())
            }
            Some(Tree::Atom(name)) => self.translate_call(name, &form[1..], ctx),
            Some(_) => Err(Error::InvalidApplication),
        }
    }

    fn translate_call(&mut self, name: &str, args: &[Tree], ctx: &mut Context) -> Result<()> {
        match name {
            // Strict built-ins
            "plus" => self.translate_binary("plus", args, ctx, ADD),
            "times" => self.translate_binary("times", args, ctx, MUL),
            "equal" => self.translate_binary("equal", args, ctx, EQ),
            "or" => self.translate_binary("or", args, ctx, OR),
            "and" => self.translate_binary("and", args, ctx, AND),
            // The target machine takes its subtrahend on top, so the
            // operands swap just before the operation
            "minus" => self.translate_swapped("minus", args, ctx, SUB),
            "divide" => self.translate_swapped("divide", args, ctx, DIV),
            // With both operands lowered left-to-right, the second
            // sits on top, which inverts the comparison mnemonics
            "less" => self.translate_binary("less", args, ctx, GT),
            "greater" => self.translate_binary("greater", args, ctx, LT),
            "lesseq" => self.translate_negated("lesseq", args, ctx, LT),
            "greatereq" => self.translate_negated("greatereq", args, ctx, GT),
            "nonequal" => self.translate_nonequal(args, ctx),
            "not" => self.translate_not(args, ctx),
            "read" => self.translate_read(args, ctx),
            "setq" => self.translate_setq(args, ctx),
            "return" => self.translate_return(args, ctx),
            // Special forms
            "cond" => self.translate_cond(args, ctx),
            "while" => self.translate_while(args, ctx),
            "break" => self.translate_break(args),
            // Declarations never appear below the top level
            "func" => Err(Error::MisplacedFunction),
            "prog" => Err(Error::MisplacedProgram),
            // User-defined calls
            _ => self.translate_declared_call(name, args, ctx),
        }
    }

    // ============================================================================
    // Values
    // ============================================================================

    fn translate_literal(&mut self, digits: &str) -> Result<()> {
        let value = U256::from_str_radix(digits, 10)
            .map_err(|_| Error::LiteralOverflow(digits.to_string()))?;
        if value > self.code.max_immediate() {
            return Err(Error::LiteralOverflow(digits.to_string()));
        }
        self.code.append_push_word(value);
        Ok(())
    }

    fn translate_atom(&mut self, name: &str, ctx: &mut Context) -> Result<()> {
        let (slot, _) = ctx.slot(name);
        frame::load_atom_value(&mut self.code, slot)
    }

    // ============================================================================
    // Built-in operators
    // ============================================================================

    /// Lower the operands of a built-in left-to-right, having checked
    /// its arity.
    fn translate_operands(
        &mut self,
        name: &'static str,
        args: &[Tree],
        arity: usize,
        ctx: &mut Context,
    ) -> Result<()> {
        if args.len() != arity {
            return Err(Error::InvalidArity(name, args.len()));
        }
        for arg in args {
            self.translate(arg, ctx)?;
        }
        Ok(())
    }

    fn translate_binary(
        &mut self,
        name: &'static str,
        args: &[Tree],
        ctx: &mut Context,
        op: Mnemonic,
    ) -> Result<()> {
        self.translate_operands(name, args, 2, ctx)?;
        self.code.append(op);
        Ok(())
    }

    fn translate_swapped(
        &mut self,
        name: &'static str,
        args: &[Tree],
        ctx: &mut Context,
        op: Mnemonic,
    ) -> Result<()> {
        self.translate_operands(name, args, 2, ctx)?;
        self.code.append(SWAP1);
        self.code.append(op);
        Ok(())
    }

    /// Lower a non-strict comparison as the negation of its strict
    /// complement.
    fn translate_negated(
        &mut self,
        name: &'static str,
        args: &[Tree],
        ctx: &mut Context,
        op: Mnemonic,
    ) -> Result<()> {
        self.translate_operands(name, args, 2, ctx)?;
        self.code.append(op);
        self.code.append(ISZERO);
        Ok(())
    }

    fn translate_nonequal(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        self.translate_operands("nonequal", args, 2, ctx)?;
        self.code.append(EQ);
        self.code.append_push(0)?;
        self.code.append(EQ);
        Ok(())
    }

    fn translate_not(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        self.translate_operands("not", args, 1, ctx)?;
        self.code.append_push(0)?;
        self.code.append(EQ);
        Ok(())
    }

    /// `(read i)` loads the `i`-th 32-byte word of call data.
    fn translate_read(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        self.translate_operands("read", args, 1, ctx)?;
        self.code.append_push(0x20)?;
        self.code.append(MUL);
        self.code.append(CALLDATALOAD);
        Ok(())
    }

    fn translate_setq(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        if args.len() != 2 {
            return Err(Error::InvalidArity("setq", args.len()));
        }
        let name = match &args[0] {
            Tree::Atom(name) => name.clone(),
            _ => {
                return Err(Error::InvalidAssignment);
            }
        };
        self.translate(&args[1], ctx)?;
        let (slot, _) = ctx.slot(&name);
        frame::store_atom_value(&mut self.code, slot)
    }

    /// Inside the program body, `return` hands its value back to the
    /// machine's caller; inside a function it transfers control to
    /// the return address, leaving the value on the stack.
    fn translate_return(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        self.translate_operands("return", args, 1, ctx)?;
        if ctx.is_program_body() {
            self.code.append_push(0)?;
            self.code.append(MSTORE);
            self.code.append_push(0x20)?;
            self.code.append_push(0)?;
            self.code.append(RETURN);
        } else {
            frame::load_return_address(&mut self.code)?;
            frame::pop_frame(&mut self.code)?;
            self.code.append(JUMP);
        }
        Ok(())
    }

    // ============================================================================
    // Special forms
    // ============================================================================

    /// Lower `(cond test then [else])`.  The false landing pad is
    /// emitted even without an `else` body, so that the false-to-end
    /// jump is always well-formed.
    fn translate_cond(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        if args.len() != 2 && args.len() != 3 {
            return Err(Error::InvalidArity("cond", args.len()));
        }
        self.translate(&args[0], ctx)?;
        // Branch on the test
        let to_true = self.code.reserve_push();
        self.code.append(JUMPI);
        let to_false = self.code.reserve_push();
        self.code.append(JUMP);
        // True block
        let id = self.code.append(JUMPDEST);
        self.code.resolve(to_true, id)?;
        self.translate(&args[1], ctx)?;
        let true_to_end = self.code.reserve_push();
        self.code.append(JUMP);
        // False block
        let id = self.code.append(JUMPDEST);
        self.code.resolve(to_false, id)?;
        if let Some(other) = args.get(2) {
            self.translate(other, ctx)?;
        }
        let false_to_end = self.code.reserve_push();
        self.code.append(JUMP);
        // End
        let end = self.code.append(JUMPDEST);
        self.code.resolve(true_to_end, end)?;
        self.code.resolve(false_to_end, end)
    }

    /// Lower `(while test body)`.  Break sites inside the loop are
    /// collected as they are emitted and all resolved to the end
    /// label here.
    fn translate_while(&mut self, args: &[Tree], ctx: &mut Context) -> Result<()> {
        if args.len() != 2 {
            return Err(Error::InvalidArity("while", args.len()));
        }
        self.loops.push(Vec::new());
        // Condition check
        let cond = self.code.append(JUMPDEST);
        self.translate(&args[0], ctx)?;
        let to_body = self.code.reserve_push();
        self.code.append(JUMPI);
        let to_end = self.code.reserve_push();
        self.code.append(JUMP);
        // Loop body
        let id = self.code.append(JUMPDEST);
        self.code.resolve(to_body, id)?;
        self.translate(&args[1], ctx)?;
        self.code.append_push(cond)?;
        self.code.append(JUMP);
        // Loop end
        let end = self.code.append(JUMPDEST);
        self.code.resolve(to_end, end)?;
        for site in self.loops.pop().unwrap_or_default() {
            self.code.resolve(site, end)?;
        }
        Ok(())
    }

    fn translate_break(&mut self, args: &[Tree]) -> Result<()> {
        if !args.is_empty() {
            return Err(Error::InvalidArity("break", args.len()));
        }
        let sites = self.loops.last_mut().ok_or(Error::BreakOutsideLoop)?;
        let site = self.code.reserve_push();
        self.code.append(JUMP);
        sites.push(site);
        Ok(())
    }

    // ============================================================================
    // User-defined calls
    // ============================================================================

    /// Lower a call of a declared function: push the arguments
    /// left-to-right, then the resume address, and jump to the
    /// callee's entry point.
    fn translate_declared_call(
        &mut self,
        name: &str,
        args: &[Tree],
        ctx: &mut Context,
    ) -> Result<()> {
        let target = match self.code.functions().get(name) {
            Some(&id) => id,
            None => {
                return Err(Error::UnknownFunction(name.to_string()));
            }
        };
        for arg in args {
            self.translate(arg, ctx)?;
        }
        // Resume address, resolved at the landing pad below
        let resume = self.code.reserve_push();
        self.code.append_push(target)?;
        self.code.append(JUMP);
        // Resume here after the call
        let id = self.code.append(JUMPDEST);
        self.code.resolve(resume, id)
    }
}
