use super::*;
use crate::semantic_analysis::SymbolTable;
use crate::{lexer, parser, semantic_analysis, tacky};

fn codegen_src(src: &str) -> (AsmAst, SymbolTable) {
    let tokens = lexer::lex(src).unwrap();
    let ast = parser::parse(&tokens).unwrap();
    let (validated, mut symbols) = semantic_analysis::validate(ast).unwrap();
    let tast = tacky::emit_tacky(validated);
    let asm = codegen(tast, &mut symbols);
    (asm, symbols)
}

/// Every operand constraint the fix-up pass exists for must hold in its
/// output.
fn assert_legal(f: &AsmFunction) {
    for inst in &f.body {
        assert!(!inst.mem_operands(), "{}: mem-to-mem {inst:?}", f.name);
        assert!(!inst.is_mul_sndmem(), "{}: imul into memory {inst:?}", f.name);
        assert!(
            !inst.is_shift_src_not_cx(),
            "{}: shift count outside %cl {inst:?}",
            f.name
        );
        assert!(
            !inst.is_idiv_constant(),
            "{}: idiv on immediate {inst:?}",
            f.name
        );
        assert!(
            !inst.is_cmp_sndimm(),
            "{}: cmp against immediate destination {inst:?}",
            f.name
        );
        assert!(
            !matches!(
                inst,
                AsmInstruction::Mov(Operand::Pseudo(_), _)
                    | AsmInstruction::Mov(_, Operand::Pseudo(_))
            ),
            "{}: pseudo operand survived replacement {inst:?}",
            f.name
        );
    }
}

#[test]
fn test_fixed_instructions_are_legal() {
    let (asm, _) = codegen_src(
        "int pick(int a, int b) { return a < b ? a : b; }
         int main(void) {
             int x = 4;
             int y = 2;
             int q = x / y;
             int r = x % 3;
             int p = x * y;
             int s = x << y;
             int t = x >> 1;
             int c = x == y;
             return pick(q + r, p + s + t + c);
         }",
    );
    for f in &asm.functions {
        assert_legal(f);
    }
}

#[test]
fn test_stack_allocation_rounding() {
    // three 4-byte slots: x, y and the temporary of x + y
    let (asm, symbols) = codegen_src("int main(void) { int x = 1; int y = 2; return x + y; }");
    let body = &asm.functions[0].body;
    assert_eq!(body[0], AsmInstruction::AllocateStack(16));
    assert_eq!(symbols["main"].stack_size, 12);
}

#[test]
fn test_return_sequence() {
    let (asm, _) = codegen_src("int main(void) { return 2; }");
    let body = &asm.functions[0].body;
    let expected = vec![
        AsmInstruction::AllocateStack(0),
        AsmInstruction::Mov(Operand::Imm(2), Operand::Reg(Register::AX)),
        AsmInstruction::Ret,
        // the lowered safety-net return
        AsmInstruction::Mov(Operand::Imm(0), Operand::Reg(Register::AX)),
        AsmInstruction::Ret,
    ];
    assert_eq!(*body, expected);
}

#[test]
fn test_division_uses_cdq_idiv() {
    let (asm, _) = codegen_src("int main(void) { return 10 / 2; }");
    let body = &asm.functions[0].body;
    assert!(body.contains(&AsmInstruction::Cdq));
    // the immediate divisor is bounced through %r10d
    assert!(body.contains(&AsmInstruction::Idiv(Operand::Reg(Register::R10))));
    let modulo = codegen_src("int main(void) { return 10 % 3; }").0;
    assert!(modulo.functions[0]
        .body
        .iter()
        .any(|i| matches!(i, AsmInstruction::Mov(Operand::Reg(Register::DX), _))));
}

#[test]
fn test_shift_count_through_cx() {
    let (asm, _) = codegen_src("int main(void) { int x = 1; int n = 3; return x << n; }");
    let body = &asm.functions[0].body;
    assert!(body.iter().any(|i| matches!(
        i,
        AsmInstruction::Binary(AsmBinaryOp::Sal, Operand::Reg(Register::CX), _)
    )));
}

#[test]
fn test_relational_uses_setcc() {
    let (asm, _) = codegen_src("int main(void) { return 1 < 2; }");
    let body = &asm.functions[0].body;
    assert!(body
        .iter()
        .any(|i| matches!(i, AsmInstruction::SetCC(Condition::L, _))));
}

#[test]
fn test_parameter_setup() {
    let (asm, _) = codegen_src(
        "int f(int a, int b, int c, int d, int e, int g, int h, int i) { return a + h + i; }
         int main(void) { return f(1, 2, 3, 4, 5, 6, 7, 8); }",
    );
    let f = &asm.functions[0];
    // first six from registers, in ABI order
    let mut moves = f.body.iter().filter_map(|i| match i {
        AsmInstruction::Mov(src, _) => Some(src.clone()),
        _ => None,
    });
    for reg in ARG_REGS {
        assert_eq!(moves.next(), Some(Operand::Reg(reg)));
    }
    // the seventh and eighth from the caller's frame (the copies are
    // split through %r10d by the fix-up pass, so only look at sources)
    assert!(moves.any(|src| src == Operand::Stack(16)));
    let mut moves = f.body.iter().filter_map(|i| match i {
        AsmInstruction::Mov(src, _) => Some(src.clone()),
        _ => None,
    });
    assert!(moves.any(|src| src == Operand::Stack(24)));
}

#[test]
fn test_call_stack_args_and_alignment() {
    let (asm, symbols) = codegen_src(
        "int f(int a, int b, int c, int d, int e, int g, int h);
         int main(void) { return f(1, 2, 3, 4, 5, 6, 7); }",
    );
    let main = &asm.functions[0];
    let body = &main.body;

    // one stack argument is odd, so the call site pads by 8
    let padding_pos = body
        .iter()
        .position(|i| *i == AsmInstruction::AllocateStack(8))
        .expect("alignment padding");
    let push_pos = body
        .iter()
        .position(|i| *i == AsmInstruction::Push(Operand::Imm(7)))
        .expect("stack argument push");
    let call_pos = body
        .iter()
        .position(|i| *i == AsmInstruction::Call("f".into()))
        .expect("call");
    let dealloc_pos = body
        .iter()
        .position(|i| *i == AsmInstruction::DeallocateStack(16))
        .expect("stack argument cleanup");
    assert!(padding_pos < push_pos && push_pos < call_pos && call_pos < dealloc_pos);

    // frame + pushed args + padding keep %rsp 16-byte aligned at the call
    let AsmInstruction::AllocateStack(frame) = body[0] else {
        panic!("missing frame allocation");
    };
    assert_eq!((frame + 8 + 8) % 16, 0);

    // result lands in the call's destination from %eax
    assert!(matches!(
        body[call_pos + 2],
        AsmInstruction::Mov(Operand::Reg(Register::AX), Operand::Stack(_))
    ));

    assert_eq!(symbols["main"].stack_size, 4);
}

#[test]
fn test_switch_compare_dispatch() {
    let (asm, _) = codegen_src(
        "int main(void) { switch (3) { case 3: return 1; default: return 9; } return 0; }",
    );
    let body = &asm.functions[0].body;
    // JumpIfEqual lowers to cmp + je against the selector
    assert!(body
        .iter()
        .any(|i| matches!(i, AsmInstruction::JmpCC(Condition::E, l) if l == "case_3_switch.1")));
    assert!(body
        .iter()
        .any(|i| matches!(i, AsmInstruction::Jmp(l) if l == "default_switch.1")));
    assert!(body
        .iter()
        .any(|i| matches!(i, AsmInstruction::Label(l) if l == "break_switch.1")));
}
