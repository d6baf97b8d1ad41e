use crate::ast::Identifier;
use crate::tacky::{TBinaryOp, TUnaryOp, TValue};

#[derive(Debug, PartialEq)]
pub struct AsmAst {
    pub functions: Vec<AsmFunction>,
}

pub type AsmInstructions = Vec<AsmInstruction>;

#[derive(Debug, PartialEq)]
pub struct AsmFunction {
    pub name: Identifier,
    pub body: AsmInstructions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AsmInstruction {
    AllocateStack(i32),
    DeallocateStack(i32),
    Mov(Operand, Operand),
    Unary(AsmUnaryOp, Operand),
    Binary(AsmBinaryOp, Operand, Operand),
    Cmp(Operand, Operand),
    Idiv(Operand),
    Cdq,
    Jmp(Identifier),
    JmpCC(Condition, Identifier),
    SetCC(Condition, Operand),
    Label(Identifier),
    Push(Operand),
    Call(Identifier),
    Ret,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Condition {
    E,
    NE,
    G,
    GE,
    L,
    LE,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AsmUnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AsmBinaryOp {
    Add,
    Sub,
    Imul,
    And,
    Or,
    Xor,
    Sal,
    Sar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Imm(i32),
    Reg(Register),
    Pseudo(Identifier),
    Stack(i32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Register {
    AX,
    CX,
    DX,
    DI,
    SI,
    R8,
    R9,
    R10,
    R11,
}

/// Integer argument registers of the System V AMD64 calling convention,
/// in order.
pub const ARG_REGS: [Register; 6] = [
    Register::DI,
    Register::SI,
    Register::DX,
    Register::CX,
    Register::R8,
    Register::R9,
];

impl Operand {
    pub fn is_mem(&self) -> bool {
        matches!(self, Self::Stack(_))
    }

    pub fn is_reg(&self) -> bool {
        matches!(self, Self::Reg(_))
    }

    pub fn is_imm(&self) -> bool {
        matches!(self, Self::Imm(_))
    }
}

impl AsmInstruction {
    pub fn mem_operands(&self) -> bool {
        match self {
            // imull takes a memory source; only its destination is special
            Self::Binary(AsmBinaryOp::Imul, _, _) => false,
            Self::Mov(src, dst) | Self::Cmp(src, dst) | Self::Binary(_, src, dst) => {
                src.is_mem() && dst.is_mem()
            }
            _ => false,
        }
    }

    pub fn is_mul_sndmem(&self) -> bool {
        matches!(
            self,
            Self::Binary(AsmBinaryOp::Imul, _, Operand::Stack(_))
        )
    }

    pub fn is_shift_src_not_cx(&self) -> bool {
        matches!(
            self,
            Self::Binary(AsmBinaryOp::Sal | AsmBinaryOp::Sar, src, _)
                if *src != Operand::Reg(Register::CX)
        )
    }

    pub fn is_idiv_constant(&self) -> bool {
        matches!(self, Self::Idiv(Operand::Imm(_)))
    }

    pub fn is_cmp_sndimm(&self) -> bool {
        matches!(self, Self::Cmp(_, Operand::Imm(_)))
    }
}

impl From<TValue> for Operand {
    fn from(value: TValue) -> Self {
        match value {
            TValue::Constant(i) => Self::Imm(i),
            TValue::Var(id) => Self::Pseudo(id),
        }
    }
}

impl From<TUnaryOp> for AsmUnaryOp {
    fn from(value: TUnaryOp) -> Self {
        match value {
            TUnaryOp::Complement => AsmUnaryOp::Not,
            TUnaryOp::Negate => AsmUnaryOp::Neg,
            // logical not lowers to cmp + setcc
            TUnaryOp::LogicalNot => unreachable!(),
        }
    }
}

impl From<TBinaryOp> for AsmBinaryOp {
    fn from(value: TBinaryOp) -> Self {
        match value {
            TBinaryOp::Add => Self::Add,
            TBinaryOp::Subtract => Self::Sub,
            TBinaryOp::Multiply => Self::Imul,
            TBinaryOp::BitwiseAnd => Self::And,
            TBinaryOp::BitwiseOr => Self::Or,
            TBinaryOp::BitwiseXor => Self::Xor,
            TBinaryOp::ShiftLeft => Self::Sal,
            TBinaryOp::ShiftRight => Self::Sar,
            _ => unimplemented!("{value:?} has no direct machine counterpart"),
        }
    }
}

impl From<TBinaryOp> for Condition {
    fn from(value: TBinaryOp) -> Self {
        match value {
            TBinaryOp::IsEqual => Self::E,
            TBinaryOp::IsNotEqual => Self::NE,
            TBinaryOp::IsGreaterThan => Self::G,
            TBinaryOp::IsGreaterOrEqual => Self::GE,
            TBinaryOp::IsLessThan => Self::L,
            TBinaryOp::IsLessOrEqual => Self::LE,
            _ => unreachable!("attempt to get a condition code from a non-relational operator"),
        }
    }
}
