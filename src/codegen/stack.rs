use super::asm_ast::{AsmInstruction, AsmInstructions, Operand};
use crate::ast::Identifier;

use std::collections::HashMap;

type StackAllocMap = HashMap<Identifier, i32>;

struct StackAllocator {
    offset: i32,
    map: StackAllocMap,
}

impl StackAllocator {
    fn new() -> Self {
        Self {
            offset: 0,
            map: StackAllocMap::new(),
        }
    }

    fn allocate_if_pseudo(&mut self, operand: Operand) -> Operand {
        match operand {
            Operand::Pseudo(name) => Operand::Stack(self.allocate(name)),
            _ => operand,
        }
    }

    fn allocate(&mut self, name: Identifier) -> i32 {
        if let Some(offset) = self.map.get(&name) {
            return *offset;
        }
        self.offset -= 4;
        self.map.insert(name, self.offset);
        self.offset
    }
}

/// Rewrites every `Pseudo` operand to a 4-byte slot below %rbp, first sight
/// first served. Returns the total number of bytes handed out, which
/// becomes the function's `stack_size` in the symbol table.
pub fn replace_pseudos(instructions: &mut AsmInstructions) -> i32 {
    let mut sa = StackAllocator::new();
    for inst in instructions.iter_mut() {
        match inst {
            AsmInstruction::SetCC(_, operand)
            | AsmInstruction::Push(operand)
            | AsmInstruction::Unary(_, operand)
            | AsmInstruction::Idiv(operand) => {
                *operand = sa.allocate_if_pseudo(operand.clone());
            }
            AsmInstruction::Mov(src, dst)
            | AsmInstruction::Cmp(src, dst)
            | AsmInstruction::Binary(_, src, dst) => {
                *src = sa.allocate_if_pseudo(src.clone());
                *dst = sa.allocate_if_pseudo(dst.clone());
            }
            _ => (),
        }
    }

    sa.offset.abs()
}
