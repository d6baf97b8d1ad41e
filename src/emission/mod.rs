
use crate::codegen::*;
use crate::semantic_analysis::SymbolTable;

use std::fmt::{self, Write};

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AX => write!(f, "%eax"),
            Self::CX => write!(f, "%ecx"),
            Self::DX => write!(f, "%edx"),
            Self::DI => write!(f, "%edi"),
            Self::SI => write!(f, "%esi"),
            Self::R8 => write!(f, "%r8d"),
            Self::R9 => write!(f, "%r9d"),
            Self::R10 => write!(f, "%r10d"),
            Self::R11 => write!(f, "%r11d"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Imm(i) => write!(f, "${i}"),
            Self::Reg(r) => write!(f, "{r}"),
            Self::Stack(i) => write!(f, "{i}(%rbp)"),
            Self::Pseudo(_) => unreachable!("pseudo operand survived into emission"),
        }
    }
}

impl fmt::Display for AsmUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Neg => write!(f, "negl"),
            Self::Not => write!(f, "notl"),
        }
    }
}

impl fmt::Display for AsmBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add => write!(f, "addl"),
            Self::Sub => write!(f, "subl"),
            Self::Imul => write!(f, "imull"),
            Self::And => write!(f, "andl"),
            Self::Or => write!(f, "orl"),
            Self::Xor => write!(f, "xorl"),
            Self::Sal => write!(f, "sall"),
            Self::Sar => write!(f, "sarl"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::E => write!(f, "e"),
            Self::NE => write!(f, "ne"),
            Self::L => write!(f, "l"),
            Self::LE => write!(f, "le"),
            Self::G => write!(f, "g"),
            Self::GE => write!(f, "ge"),
        }
    }
}

/// push, pop and call want the 8-byte register alias.
fn operand_to_quad(operand: &Operand) -> String {
    if let Operand::Reg(reg) = operand {
        match reg {
            Register::AX => "%rax",
            Register::CX => "%rcx",
            Register::DX => "%rdx",
            Register::DI => "%rdi",
            Register::SI => "%rsi",
            Register::R8 => "%r8",
            Register::R9 => "%r9",
            Register::R10 => "%r10",
            Register::R11 => "%r11",
        }
        .into()
    } else {
        operand.to_string()
    }
}

/// setcc writes a single byte.
fn reg_to_byte(reg: Register) -> &'static str {
    match reg {
        Register::AX => "%al",
        Register::CX => "%cl",
        Register::DX => "%dl",
        Register::DI => "%dil",
        Register::SI => "%sil",
        Register::R8 => "%r8b",
        Register::R9 => "%r9b",
        Register::R10 => "%r10b",
        Register::R11 => "%r11b",
    }
}

struct Emitter<'a> {
    sym_table: &'a SymbolTable,
}

impl Emitter<'_> {
    fn emit_call(&self, out: &mut String, name: &str) -> fmt::Result {
        // Symbols defined in this translation unit are reached directly;
        // everything else goes through the PLT.
        let defined = self
            .sym_table
            .get(name)
            .expect("every callee is in the symbol table after typechecking")
            .defined;
        if defined {
            write!(out, "call {name}")
        } else {
            write!(out, "call {name}@PLT")
        }
    }

    fn emit_setcc(out: &mut String, condition: Condition, operand: &Operand) -> fmt::Result {
        if let Operand::Reg(reg) = operand {
            write!(out, "set{condition} {}", reg_to_byte(*reg))
        } else {
            write!(out, "set{condition} {operand}")
        }
    }

    fn emit_instruction(&self, out: &mut String, instruction: &AsmInstruction) -> fmt::Result {
        use AsmInstruction as I;
        match instruction {
            I::AllocateStack(i) => write!(out, "subq ${i}, %rsp"),
            I::DeallocateStack(i) => write!(out, "addq ${i}, %rsp"),
            I::Mov(src, dst) => write!(out, "movl {src}, {dst}"),
            I::Unary(op, operand) => write!(out, "{op} {operand}"),
            I::Binary(op @ (AsmBinaryOp::Sal | AsmBinaryOp::Sar), src, dst)
                if *src == Operand::Reg(Register::CX) =>
            {
                write!(out, "{op} %cl, {dst}")
            }
            I::Binary(op, src, dst) => write!(out, "{op} {src}, {dst}"),
            I::Cmp(src, dst) => write!(out, "cmpl {src}, {dst}"),
            I::Idiv(operand) => write!(out, "idivl {operand}"),
            I::Cdq => write!(out, "cdq"),
            I::Jmp(label) => write!(out, "jmp .L{label}"),
            I::JmpCC(condition, label) => write!(out, "j{condition} .L{label}"),
            I::SetCC(condition, operand) => Self::emit_setcc(out, *condition, operand),
            I::Label(label) => write!(out, ".L{label}:"),
            I::Push(operand) => write!(out, "pushq {}", operand_to_quad(operand)),
            I::Call(name) => self.emit_call(out, name),
            I::Ret => write!(out, "movq %rbp, %rsp\n\tpopq %rbp\n\tret"),
        }
    }

    fn emit_function(&self, out: &mut String, function: &AsmFunction) -> fmt::Result {
        writeln!(out, "\t.globl {}", function.name)?;
        writeln!(out, "{}:", function.name)?;
        writeln!(out, "\tpushq %rbp")?;
        writeln!(out, "\tmovq %rsp, %rbp")?;

        for instruction in &function.body {
            write!(out, "\t")?;
            self.emit_instruction(out, instruction)?;
            writeln!(out)?;
        }

        Ok(())
    }
}

pub fn emit_asm(program: &AsmAst, sym_table: &SymbolTable) -> String {
    let emitter = Emitter { sym_table };
    let mut out = String::new();

    for function in &program.functions {
        emitter
            .emit_function(&mut out, function)
            .expect("writing to a String cannot fail");
        out.push('\n');
    }
    out.push_str(".section .note.GNU-stack,\"\",@progbits\n");

    out
}
