use super::asm_ast::*;
use super::fix::fix_instructions;
use super::stack::replace_pseudos;

use crate::ast::Identifier;
use crate::semantic_analysis::SymbolTable;
use crate::tacky::{TAst, TBinaryOp, TFunction, TInstruction, TInstructions, TUnaryOp, TValue};

fn tunary_to_asm(op: TUnaryOp, src: TValue, dst: TValue, instructions: &mut AsmInstructions) {
    let src = Operand::from(src);
    let dst = Operand::from(dst);
    let op = AsmUnaryOp::from(op);
    instructions.push(AsmInstruction::Mov(src, dst.clone()));
    instructions.push(AsmInstruction::Unary(op, dst));
}

fn tlogical_not_to_asm(src: TValue, dst: TValue, instructions: &mut AsmInstructions) {
    let src = Operand::from(src);
    let dst = Operand::from(dst);
    instructions.push(AsmInstruction::Cmp(Operand::Imm(0), src));
    instructions.push(AsmInstruction::Mov(Operand::Imm(0), dst.clone()));
    instructions.push(AsmInstruction::SetCC(Condition::E, dst));
}

fn tdivrem_to_asm(
    op: TBinaryOp,
    src1: TValue,
    src2: TValue,
    dst: TValue,
    instructions: &mut AsmInstructions,
) {
    let is_rem = op.is_rem();
    let src1 = Operand::from(src1);
    let src2 = Operand::from(src2);
    let dst = Operand::from(dst);
    let ax = Operand::Reg(Register::AX);
    let dx = Operand::Reg(Register::DX);

    instructions.push(AsmInstruction::Mov(src1, ax.clone()));
    instructions.push(AsmInstruction::Cdq);
    instructions.push(AsmInstruction::Idiv(src2));
    let result_reg = if is_rem { dx } else { ax };
    instructions.push(AsmInstruction::Mov(result_reg, dst));
}

fn trelational_to_asm(
    op: TBinaryOp,
    src1: TValue,
    src2: TValue,
    dst: TValue,
    instructions: &mut AsmInstructions,
) {
    let src1 = Operand::from(src1);
    let src2 = Operand::from(src2);
    let dst = Operand::from(dst);
    instructions.push(AsmInstruction::Cmp(src2, src1));
    instructions.push(AsmInstruction::Mov(Operand::Imm(0), dst.clone()));
    instructions.push(AsmInstruction::SetCC(Condition::from(op), dst));
}

fn tbinary_to_asm(
    op: TBinaryOp,
    src1: TValue,
    src2: TValue,
    dst: TValue,
    instructions: &mut AsmInstructions,
) {
    let src1 = Operand::from(src1);
    let src2 = Operand::from(src2);
    let dst = Operand::from(dst);

    let op = AsmBinaryOp::from(op);
    instructions.push(AsmInstruction::Mov(src1, dst.clone()));
    instructions.push(AsmInstruction::Binary(op, src2, dst));
}

fn tcall_to_asm(
    name: Identifier,
    args: Vec<TValue>,
    dst: TValue,
    instructions: &mut AsmInstructions,
) {
    let reg_args_count = usize::min(args.len(), ARG_REGS.len());
    let stack_args_count = args.len() - reg_args_count;

    // The call site must leave %rsp 16-byte aligned.
    let stack_padding = if stack_args_count % 2 == 1 { 8 } else { 0 };
    if stack_padding != 0 {
        instructions.push(AsmInstruction::AllocateStack(stack_padding));
    }

    let mut args = args.into_iter().map(Operand::from);
    for (arg, reg) in args.by_ref().take(reg_args_count).zip(ARG_REGS) {
        instructions.push(AsmInstruction::Mov(arg, Operand::Reg(reg)));
    }

    let stack_args: Vec<_> = args.collect();
    for arg in stack_args.into_iter().rev() {
        if arg.is_reg() || arg.is_imm() {
            instructions.push(AsmInstruction::Push(arg));
        } else {
            // a 4-byte push straight from memory is not encodable
            let ax = Operand::Reg(Register::AX);
            instructions.push(AsmInstruction::Mov(arg, ax.clone()));
            instructions.push(AsmInstruction::Push(ax));
        }
    }

    instructions.push(AsmInstruction::Call(name));

    let bytes_to_remove = 8 * stack_args_count as i32 + stack_padding;
    if bytes_to_remove != 0 {
        instructions.push(AsmInstruction::DeallocateStack(bytes_to_remove));
    }

    let asm_dst = Operand::from(dst);
    instructions.push(AsmInstruction::Mov(Operand::Reg(Register::AX), asm_dst));
}

fn tacky_to_asm(body: TInstructions, instructions: &mut AsmInstructions) {
    use TInstruction as TI;
    for inst in body {
        match inst {
            TI::Return(val) => {
                let src = Operand::from(val);
                let dst = Operand::Reg(Register::AX);
                instructions.push(AsmInstruction::Mov(src, dst));
                instructions.push(AsmInstruction::Ret);
            }
            TI::Unary(TUnaryOp::LogicalNot, src, dst) => {
                tlogical_not_to_asm(src, dst, instructions);
            }
            TI::Unary(op, src, dst) => tunary_to_asm(op, src, dst, instructions),
            TI::Binary(op, v1, v2, v3) if op.is_relational() => {
                trelational_to_asm(op, v1, v2, v3, instructions);
            }
            TI::Binary(op, v1, v2, v3) if op.is_divrem() => {
                tdivrem_to_asm(op, v1, v2, v3, instructions);
            }
            TI::Binary(op, v1, v2, v3) => tbinary_to_asm(op, v1, v2, v3, instructions),
            TI::Copy(src, dst) => {
                let src = Operand::from(src);
                let dst = Operand::from(dst);
                instructions.push(AsmInstruction::Mov(src, dst));
            }
            TI::JumpIfZero(val, target) => {
                let src = Operand::from(val);
                instructions.push(AsmInstruction::Cmp(Operand::Imm(0), src));
                instructions.push(AsmInstruction::JmpCC(Condition::E, target));
            }
            TI::JumpIfNotZero(val, target) => {
                let src = Operand::from(val);
                instructions.push(AsmInstruction::Cmp(Operand::Imm(0), src));
                instructions.push(AsmInstruction::JmpCC(Condition::NE, target));
            }
            TI::JumpIfEqual(v1, v2, target) => {
                let src1 = Operand::from(v1);
                let src2 = Operand::from(v2);
                instructions.push(AsmInstruction::Cmp(src1, src2));
                instructions.push(AsmInstruction::JmpCC(Condition::E, target));
            }
            TI::FunCall { name, args, dst } => tcall_to_asm(name, args, dst, instructions),
            TI::Jump(target) => instructions.push(AsmInstruction::Jmp(target)),
            TI::Label(id) => instructions.push(AsmInstruction::Label(id)),
        }
    }
}

/// Copies incoming arguments from their ABI positions into the pseudo
/// registers named after the parameters: the first six from registers, the
/// rest from the caller's stack slots above the saved %rbp.
fn set_up_parameters(params: Vec<Identifier>, instructions: &mut AsmInstructions) {
    let mut params = params.into_iter().map(Operand::Pseudo);

    for (param, reg) in params.by_ref().take(ARG_REGS.len()).zip(ARG_REGS) {
        instructions.push(AsmInstruction::Mov(Operand::Reg(reg), param));
    }

    for (i, param) in params.enumerate() {
        let stack_offset = Operand::Stack(16 + 8 * i as i32);
        instructions.push(AsmInstruction::Mov(stack_offset, param));
    }
}

fn gen_fundef(f: TFunction, sym_table: &mut SymbolTable) -> AsmFunction {
    let TFunction { name, params, body } = f;

    let mut instructions = AsmInstructions::new();
    set_up_parameters(params, &mut instructions);
    tacky_to_asm(body, &mut instructions);

    let stack_size = replace_pseudos(&mut instructions);
    sym_table
        .get_mut(&name)
        .expect("every generated function is in the symbol table")
        .stack_size = stack_size;

    fix_instructions(&mut instructions, stack_size);

    AsmFunction {
        name,
        body: instructions,
    }
}

pub fn codegen(tast: TAst, sym_table: &mut SymbolTable) -> AsmAst {
    let functions = tast
        .functions
        .into_iter()
        .map(|f| gen_fundef(f, sym_table))
        .collect();

    AsmAst { functions }
}
