/// Functionality for lowering a syntax tree into a linear sequence of
/// EVM opcodes.  This is the heart of the compiler: it implements a
/// call-frame discipline in the machine's flat memory, resolves
/// forward jump targets by back-patching and serializes the result as
/// a hex string.
pub mod codegen;
/// Functionality for rendering a generated opcode sequence in a
/// human-readable, one-instruction-per-line form.
pub mod disassembler;
/// Constants and mnemonics for the supported subset of EVM bytecode
/// instructions, including the width-parameterized `PUSH`.
pub mod instruction;
/// Functionality for turning F-Stroke source text into a syntax tree.
/// This includes the character-level tokenizer and the tree builder.
pub mod syntax;
pub mod util;
