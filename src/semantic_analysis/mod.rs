mod case_collection;
mod goto;
mod loop_labeling;
mod name_resolution;
#[cfg(test)]
mod sema_tests;
mod semanalysis_error;
mod typecheck;

use crate::ast::Ast;
use case_collection::collect_cases;
use goto::ensure_goto_correctness;
use loop_labeling::label_loops;
use name_resolution::name_resolution;
use typecheck::check_types;

pub use semanalysis_error::{Result, SemAnalysisError};
pub use typecheck::{SymbolInfo, SymbolTable};

/// Runs every semantic pass over the AST: identifier resolution, type
/// checking, loop/switch labeling, case collection and goto validation.
/// Returns the rewritten AST together with the symbol table, which later
/// stages read (for linkage decisions) and write (per-function stack
/// sizes).
pub fn validate(ast: Ast) -> Result<(Ast, SymbolTable)> {
    let resolved = name_resolution(ast)?;
    let sym_table = check_types(&resolved)?;
    let labeled = label_loops(resolved).and_then(collect_cases)?;
    ensure_goto_correctness(&labeled)?;

    Ok((labeled, sym_table))
}
