use super::asm_ast::*;

fn round_up_16(bytes: i32) -> i32 {
    (bytes + 15) / 16 * 16
}

fn fix_imul(instruction: AsmInstruction) -> AsmInstructions {
    // imull cannot target memory
    let AsmInstruction::Binary(op, src, dst) = instruction else {
        unreachable!("bad fix predicate for fix_imul")
    };
    let r11 = Operand::Reg(Register::R11);
    vec![
        AsmInstruction::Mov(dst.clone(), r11.clone()),
        AsmInstruction::Binary(op, src, r11.clone()),
        AsmInstruction::Mov(r11, dst),
    ]
}

fn fix_shift(instruction: AsmInstruction) -> AsmInstructions {
    // a variable shift count lives in %cl
    let AsmInstruction::Binary(op, src, dst) = instruction else {
        unreachable!("bad fix predicate for fix_shift")
    };
    let cx = Operand::Reg(Register::CX);
    vec![
        AsmInstruction::Mov(src, cx.clone()),
        AsmInstruction::Binary(op, cx, dst),
    ]
}

fn fix_idiv(instruction: AsmInstruction) -> AsmInstructions {
    // idivl rejects immediates
    let AsmInstruction::Idiv(operand) = instruction else {
        unreachable!("bad fix predicate for fix_idiv")
    };
    let r10 = Operand::Reg(Register::R10);
    vec![
        AsmInstruction::Mov(operand, r10.clone()),
        AsmInstruction::Idiv(r10),
    ]
}

fn fix_two_memoperands(instruction: AsmInstruction) -> AsmInstructions {
    let (AsmInstruction::Mov(src, _)
    | AsmInstruction::Binary(_, src, _)
    | AsmInstruction::Cmp(src, _)) = &instruction
    else {
        unreachable!("bad fix predicate for fix_two_memoperands")
    };

    let r10 = Operand::Reg(Register::R10);
    let mov = AsmInstruction::Mov(src.clone(), r10.clone());
    let snd = match instruction {
        AsmInstruction::Mov(_, dst) => AsmInstruction::Mov(r10, dst),
        AsmInstruction::Binary(op, _, dst) => AsmInstruction::Binary(op, r10, dst),
        AsmInstruction::Cmp(_, dst) => AsmInstruction::Cmp(r10, dst),
        _ => unreachable!(),
    };
    vec![mov, snd]
}

fn fix_cmp_sndimm(instruction: AsmInstruction) -> AsmInstructions {
    // the flag-setting operand of cmpl cannot be an immediate
    let AsmInstruction::Cmp(src, dst) = instruction else {
        unreachable!("bad fix predicate for fix_cmp_sndimm")
    };
    let r10 = Operand::Reg(Register::R10);
    vec![
        AsmInstruction::Mov(dst, r10.clone()),
        AsmInstruction::Cmp(src, r10),
    ]
}

fn fix_with_fixer(
    instructions: &mut AsmInstructions,
    predicate: fn(&AsmInstruction) -> bool,
    fixer: fn(AsmInstruction) -> AsmInstructions,
) {
    let indexes: Vec<_> = instructions
        .iter()
        .enumerate()
        .filter(|(_, i)| predicate(i))
        .map(|(i, _)| i)
        .collect();

    let mut count = 0;
    for i in indexes {
        let instr = instructions.remove(i + count);
        let fixed_instructions = fixer(instr);
        for instr in fixed_instructions {
            instructions.insert(i + count, instr);
            count += 1;
        }
        count -= 1;
    }
}

/// Prepends the frame allocation, then legalizes every instruction against
/// the operand constraints of the target encodings.
pub fn fix_instructions(instructions: &mut AsmInstructions, stack_size: i32) {
    use AsmInstruction as I;
    instructions.insert(0, I::AllocateStack(round_up_16(stack_size)));

    fix_with_fixer(instructions, I::is_mul_sndmem, fix_imul);
    fix_with_fixer(instructions, I::is_shift_src_not_cx, fix_shift);
    fix_with_fixer(instructions, I::is_idiv_constant, fix_idiv);
    fix_with_fixer(instructions, I::mem_operands, fix_two_memoperands);
    fix_with_fixer(instructions, I::is_cmp_sndimm, fix_cmp_sndimm);
}
