mod tast;

use crate::ast::*;

pub use tast::{TAst, TBinaryOp, TFunction, TInstruction, TInstructions, TUnaryOp, TValue};

/// One generator for the whole program: `.L` labels are file-local in the
/// emitted assembly, so synthesized names must not repeat across functions.
struct NameGenerator {
    tmp_count: u64,
    and_count: u64,
    or_count: u64,
    cond_count: u64,
    if_count: u64,
}

impl NameGenerator {
    fn new() -> Self {
        Self {
            tmp_count: 0,
            and_count: 0,
            or_count: 0,
            cond_count: 0,
            if_count: 0,
        }
    }

    fn get_name(&mut self) -> Identifier {
        let c = self.tmp_count;
        self.tmp_count += 1;
        format!("tmp.{c}")
    }

    fn and_labels(&mut self) -> (Identifier, Identifier) {
        let c = self.and_count;
        self.and_count += 1;
        (format!("and_false.{c}"), format!("and_end.{c}"))
    }

    fn or_labels(&mut self) -> (Identifier, Identifier) {
        let c = self.or_count;
        self.or_count += 1;
        (format!("or_true.{c}"), format!("or_end.{c}"))
    }

    fn cond_labels(&mut self) -> (Identifier, Identifier) {
        let c = self.cond_count;
        self.cond_count += 1;
        (format!("cond_else.{c}"), format!("cond_end.{c}"))
    }

    fn if_labels(&mut self) -> (Identifier, Identifier) {
        let c = self.if_count;
        self.if_count += 1;
        (format!("if_else.{c}"), format!("if_end.{c}"))
    }
}

fn emit_crement(
    instructions: &mut TInstructions,
    op: AstUnaryOp,
    exp: Exp,
    ng: &mut NameGenerator,
) -> TValue {
    let one = TValue::Constant(1);
    let binop = match op {
        AstUnaryOp::PrefixIncrement | AstUnaryOp::PostfixIncrement => TBinaryOp::Add,
        _ => TBinaryOp::Subtract,
    };
    let var = emit_expression(instructions, exp, ng);

    if matches!(op, AstUnaryOp::PrefixIncrement | AstUnaryOp::PrefixDecrement) {
        let modify = TInstruction::Binary(binop, var.clone(), one, var.clone());
        instructions.push(modify);
        return var;
    }

    // Postfix reads the old value out before modifying in place.
    let old = TValue::Var(ng.get_name());
    let copy = TInstruction::Copy(var.clone(), old.clone());
    let modify = TInstruction::Binary(binop, var.clone(), one, var);
    instructions.push(copy);
    instructions.push(modify);
    old
}

fn emit_logical_and(
    instructions: &mut TInstructions,
    left: Exp,
    right: Exp,
    ng: &mut NameGenerator,
) -> TValue {
    let (false_label, end_label) = ng.and_labels();
    let result = TValue::Var(ng.get_name());

    let v1 = emit_expression(instructions, left, ng);
    instructions.push(TInstruction::JumpIfZero(v1, false_label.clone()));

    let v2 = emit_expression(instructions, right, ng);
    instructions.push(TInstruction::JumpIfZero(v2, false_label.clone()));

    instructions.push(TInstruction::Copy(TValue::Constant(1), result.clone()));
    instructions.push(TInstruction::Jump(end_label.clone()));
    instructions.push(TInstruction::Label(false_label));
    instructions.push(TInstruction::Copy(TValue::Constant(0), result.clone()));
    instructions.push(TInstruction::Label(end_label));

    result
}

fn emit_logical_or(
    instructions: &mut TInstructions,
    left: Exp,
    right: Exp,
    ng: &mut NameGenerator,
) -> TValue {
    let (true_label, end_label) = ng.or_labels();
    let result = TValue::Var(ng.get_name());

    let v1 = emit_expression(instructions, left, ng);
    instructions.push(TInstruction::JumpIfNotZero(v1, true_label.clone()));

    let v2 = emit_expression(instructions, right, ng);
    instructions.push(TInstruction::JumpIfNotZero(v2, true_label.clone()));

    instructions.push(TInstruction::Copy(TValue::Constant(0), result.clone()));
    instructions.push(TInstruction::Jump(end_label.clone()));
    instructions.push(TInstruction::Label(true_label));
    instructions.push(TInstruction::Copy(TValue::Constant(1), result.clone()));
    instructions.push(TInstruction::Label(end_label));

    result
}

fn emit_conditional(
    instructions: &mut TInstructions,
    cond: ConditionalExp,
    ng: &mut NameGenerator,
) -> TValue {
    let (else_label, end_label) = ng.cond_labels();

    let c = emit_expression(instructions, *cond.condition, ng);
    instructions.push(TInstruction::JumpIfZero(c, else_label.clone()));

    let v1 = emit_expression(instructions, *cond.then, ng);
    let result = TValue::Var(ng.get_name());
    instructions.push(TInstruction::Copy(v1, result.clone()));
    instructions.push(TInstruction::Jump(end_label.clone()));

    instructions.push(TInstruction::Label(else_label));
    let v2 = emit_expression(instructions, *cond.els, ng);
    instructions.push(TInstruction::Copy(v2, result.clone()));
    instructions.push(TInstruction::Label(end_label));

    result
}

fn emit_expression(instructions: &mut TInstructions, e: Exp, ng: &mut NameGenerator) -> TValue {
    match e {
        Exp::Constant(i) => TValue::Constant(i),
        Exp::Var(name) => TValue::Var(name),
        Exp::Unary(op, exp) if op.is_incdec() => emit_crement(instructions, op, *exp, ng),
        Exp::Unary(op, exp) => {
            let tacky_op = TUnaryOp::from(op);
            let src = emit_expression(instructions, *exp, ng);
            let dst = TValue::Var(ng.get_name());
            instructions.push(TInstruction::Unary(tacky_op, src, dst.clone()));
            dst
        }
        Exp::Binary(AstBinaryOp::LogicalAnd, left, right) => {
            emit_logical_and(instructions, *left, *right, ng)
        }
        Exp::Binary(AstBinaryOp::LogicalOr, left, right) => {
            emit_logical_or(instructions, *left, *right, ng)
        }
        Exp::Binary(op, left, right) => {
            let v1 = emit_expression(instructions, *left, ng);
            let v2 = emit_expression(instructions, *right, ng);
            let dst = TValue::Var(ng.get_name());
            let tacky_op = TBinaryOp::from(op);
            instructions.push(TInstruction::Binary(tacky_op, v1, v2, dst.clone()));
            dst
        }
        Exp::Assignment(var, rhs) => {
            let name = match *var {
                Exp::Var(name) => name,
                // semantic analysis has already rejected other lvalues
                _ => unreachable!("assignment to a non-variable"),
            };
            let rhs = emit_expression(instructions, *rhs, ng);
            let var = TValue::Var(name);
            instructions.push(TInstruction::Copy(rhs, var.clone()));
            var
        }
        Exp::Conditional(cond) => emit_conditional(instructions, cond, ng),
        Exp::Call(name, args) => {
            let args = args
                .into_iter()
                .map(|arg| emit_expression(instructions, arg, ng))
                .collect();
            let dst = TValue::Var(ng.get_name());
            instructions.push(TInstruction::FunCall {
                name,
                args,
                dst: dst.clone(),
            });
            dst
        }
    }
}

fn emit_declaration(d: VarDec, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    if let Some(init) = d.init {
        let rhs = emit_expression(instructions, init, ng);
        let var = TValue::Var(d.name);
        instructions.push(TInstruction::Copy(rhs, var));
    }
}

fn emit_forinit(forinit: AstForInit, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    match forinit {
        AstForInit::InitDecl(dec) => emit_declaration(dec, instructions, ng),
        AstForInit::InitExp(Some(exp)) => {
            let _ = emit_expression(instructions, exp, ng);
        }
        AstForInit::InitExp(None) => (),
    }
}

fn emit_if(if_st: If, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    let If {
        condition,
        then,
        els,
    } = if_st;
    let (else_label, end_label) = ng.if_labels();

    let c = emit_expression(instructions, condition, ng);
    if let Some(els) = els {
        instructions.push(TInstruction::JumpIfZero(c, else_label.clone()));
        emit_statement(*then, instructions, ng);
        instructions.push(TInstruction::Jump(end_label.clone()));
        instructions.push(TInstruction::Label(else_label));
        emit_statement(*els, instructions, ng);
        instructions.push(TInstruction::Label(end_label));
    } else {
        instructions.push(TInstruction::JumpIfZero(c, end_label.clone()));
        emit_statement(*then, instructions, ng);
        instructions.push(TInstruction::Label(end_label));
    }
}

fn emit_while(while_st: While, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    let While {
        condition,
        body,
        label,
    } = while_st;
    let continue_label = format!("continue_{label}");
    let break_label = format!("break_{label}");

    instructions.push(TInstruction::Label(continue_label.clone()));
    let v = emit_expression(instructions, condition, ng);
    instructions.push(TInstruction::JumpIfZero(v, break_label.clone()));

    emit_statement(*body, instructions, ng);

    instructions.push(TInstruction::Jump(continue_label));
    instructions.push(TInstruction::Label(break_label));
}

fn emit_dowhile(dowhile: DoWhile, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    let DoWhile {
        body,
        condition,
        label,
    } = dowhile;
    let start_label = format!("start_{label}");
    let continue_label = format!("continue_{label}");
    let break_label = format!("break_{label}");

    instructions.push(TInstruction::Label(start_label.clone()));
    emit_statement(*body, instructions, ng);

    instructions.push(TInstruction::Label(continue_label));
    let v = emit_expression(instructions, condition, ng);
    instructions.push(TInstruction::JumpIfNotZero(v, start_label));
    instructions.push(TInstruction::Label(break_label));
}

fn emit_for(for_st: For, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    let For {
        init,
        condition,
        post,
        body,
        label,
    } = for_st;
    let start_label = format!("start_{label}");
    let continue_label = format!("continue_{label}");
    let break_label = format!("break_{label}");

    emit_forinit(init, instructions, ng);
    instructions.push(TInstruction::Label(start_label.clone()));

    if let Some(exp) = condition {
        let v = emit_expression(instructions, exp, ng);
        instructions.push(TInstruction::JumpIfZero(v, break_label.clone()));
    }

    emit_statement(*body, instructions, ng);

    instructions.push(TInstruction::Label(continue_label));
    if let Some(exp) = post {
        let _ = emit_expression(instructions, exp, ng);
    }
    instructions.push(TInstruction::Jump(start_label));
    instructions.push(TInstruction::Label(break_label));
}

fn emit_switch(switch: Switch, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    let Switch {
        ctrl_exp,
        body,
        cases,
        has_default,
        label,
    } = switch;
    let break_label = format!("break_{label}");

    let selector = emit_expression(instructions, ctrl_exp, ng);
    for case in &cases {
        instructions.push(TInstruction::JumpIfEqual(
            selector.clone(),
            TValue::Constant(*case),
            case_label(*case, &label),
        ));
    }
    let fallthrough = if has_default {
        default_label(&label)
    } else {
        break_label.clone()
    };
    instructions.push(TInstruction::Jump(fallthrough));

    emit_statement(*body, instructions, ng);
    instructions.push(TInstruction::Label(break_label));
}

fn emit_statement(statement: Statement, instructions: &mut TInstructions, ng: &mut NameGenerator) {
    use Statement as S;
    match statement {
        S::While(while_st) => emit_while(while_st, instructions, ng),
        S::DoWhile(dowhile) => emit_dowhile(dowhile, instructions, ng),
        S::For(for_st) => emit_for(for_st, instructions, ng),
        S::If(if_st) => emit_if(if_st, instructions, ng),
        S::Switch(switch) => emit_switch(switch, instructions, ng),
        S::Cased(cased) => {
            instructions.push(TInstruction::Label(cased.label));
            emit_statement(*cased.body, instructions, ng);
        }
        S::DCased(dcased) => {
            instructions.push(TInstruction::Label(dcased.label));
            emit_statement(*dcased.body, instructions, ng);
        }
        S::Labeled(name, statement) => {
            instructions.push(TInstruction::Label(name));
            emit_statement(*statement, instructions, ng);
        }
        S::Break(label) => {
            instructions.push(TInstruction::Jump(format!("break_{label}")));
        }
        S::Continue(label) => {
            instructions.push(TInstruction::Jump(format!("continue_{label}")));
        }
        S::Goto(label) => {
            instructions.push(TInstruction::Jump(label));
        }
        S::Compound(block) => emit_block_items(block.items, instructions, ng),
        S::Return(e) => {
            let value = emit_expression(instructions, e, ng);
            instructions.push(TInstruction::Return(value));
        }
        S::Exp(e) => {
            let _ = emit_expression(instructions, e, ng);
        }
        S::Null => (),
    }
}

fn emit_block_items(
    items: AstBlockItems,
    instructions: &mut TInstructions,
    ng: &mut NameGenerator,
) {
    for item in items {
        match item {
            AstBlockItem::S(s) => emit_statement(s, instructions, ng),
            AstBlockItem::D(Declaration::Var(d)) => emit_declaration(d, instructions, ng),
            // local function declarations carry no code
            AstBlockItem::D(Declaration::Fun(_)) => (),
        }
    }
}

fn emit_function(f: FunDec, body: AstBlock, ng: &mut NameGenerator) -> TFunction {
    let mut instructions = TInstructions::new();
    emit_block_items(body.items, &mut instructions, ng);

    // Safety net for bodies that fall off the end without a return.
    instructions.push(TInstruction::Return(TValue::Constant(0)));

    TFunction {
        name: f.name,
        params: f.params,
        body: instructions,
    }
}

pub fn emit_tacky(input: Ast) -> TAst {
    let mut ng = NameGenerator::new();
    let functions = input
        .functions
        .into_iter()
        .filter_map(|mut f| {
            f.body.take().map(|body| emit_function(f, body, &mut ng))
        })
        .collect();

    TAst { functions }
}
