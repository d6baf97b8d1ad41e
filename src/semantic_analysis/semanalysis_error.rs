use crate::ast::{Exp, Identifier};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SemAnalysisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemAnalysisError {
    #[error("redeclaration of identifier {0}")]
    IdentifierRedeclaration(Identifier),
    #[error("attempt to define function {0} in a local context")]
    LocalFunDefinition(Identifier),
    #[error("unknown variable: {0}")]
    VariableNotDeclared(Identifier),
    #[error("wrong lvalue: {0:?}")]
    WrongLvalue(Exp),
    #[error("label {0} redeclaration")]
    LabelRedeclaration(Identifier),
    #[error("unknown label {0}")]
    UnknownLabel(Identifier),
    #[error("duplicate case {0}")]
    DuplicateCase(String),
    #[error("break statement outside of a loop or switch")]
    BreakOutsideOfLoop,
    #[error("continue statement outside of a loop")]
    ContinueOutsideOfLoop,
    #[error("case not in switch")]
    CaseNotInSwitch,
    #[error("not a constant expression inside case label: {0:?}")]
    NotAConstCase(Exp),
    #[error("default case not in switch")]
    DefaultNotInSwitch,
    #[error("call to undeclared function {0}")]
    UndeclaredFunction(Identifier),
    #[error("redeclaration of {0}")]
    DuplicateDeclaration(Identifier),
    #[error("incompatible redeclaration of function {0}")]
    IncompatibleFunDec(Identifier),
    #[error("redefinition of function {0}")]
    FunctionRedefinition(Identifier),
    #[error("variable {0} called as a function")]
    VariableCall(Identifier),
    #[error("function {0} used as a variable")]
    FunctionNameAsVariable(Identifier),
    #[error("function {2} called with {1} arguments, but expected {0}")]
    ExpectedArgsCountButGot(usize, usize, String),
}
