/*!
A compiler for a subset of C, targeting x86-64 Linux and emitting GNU-AS
assembly in AT&T syntax. The subset covers integer functions with local
variables, the full complement of unary/binary integer operators,
assignment and compound assignment, pre/post increment and decrement,
`if`/`else`, the conditional operator, `goto` and labels, all three loop
forms with `break`/`continue`, `switch`/`case`/`default`, and function
declarations, definitions and calls.

## Compilation stages

1. **Preprocessing** - the driver shells out to `gcc -E -P` and reads back
   a `.i` file.
2. **Lexing** - [`lexer::lex`] scans the preprocessed text into a
   [`Token`](lexer::Token) sequence, or fails with a
   [`LexError`](lexer::LexError) pointing at the offending position.
3. **Parsing** - [`parser::parse`] builds an [`Ast`](ast::Ast) by
   recursive descent with precedence climbing over binary operators.
4. **Validation** - [`semantic_analysis::validate`] resolves identifiers
   to unique names, type-checks against a symbol table, labels loops and
   switches, collects case sets and checks goto targets. Everything after
   this point treats errors as compiler bugs and panics instead of
   returning [`SemAnalysisError`](semantic_analysis::SemAnalysisError).
5. **TACKY** - [`tacky::emit_tacky`] linearizes the tree into
   three-address code, expanding short-circuit operators, conditionals,
   loops and switches into labels and jumps.
6. **Codegen** - [`codegen::codegen`] lowers TACKY into an assembly AST,
   assigns stack slots to pseudo registers and legalizes instructions
   against the machine's operand constraints.
7. **Emission** - [`emission::emit_asm`] serializes the assembly AST to
   text, which the driver hands to `gcc` to assemble and link.
*/

#![warn(clippy::pedantic)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]

pub mod ast;
pub mod codegen;
pub mod emission;
pub mod lexer;
pub mod parser;
pub mod semantic_analysis;
pub mod tacky;
