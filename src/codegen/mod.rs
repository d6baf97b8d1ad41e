mod asm_ast;
#[cfg(test)]
mod codegen_tests;
mod fix;
mod gen;
mod stack;

pub use asm_ast::{
    AsmAst, AsmBinaryOp, AsmFunction, AsmInstruction, AsmInstructions, AsmUnaryOp, Condition,
    Operand, Register, ARG_REGS,
};
pub use gen::codegen;
