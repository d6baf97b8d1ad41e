use super::*;
use crate::lexer;

fn parse_exp_str(input: &str) -> Result<Exp> {
    let tokens = lexer::lex(input).unwrap();
    let mut cursor = Cursor::new(&tokens);
    parse_exp(&mut cursor, 0)
}

#[test]
fn test_expression_precedence() {
    let parsed = parse_exp_str("1 * 2 - 3 * (4 + 5)");
    let expected = Exp::Binary(
        AstBinaryOp::Subtract,
        Box::new(Exp::Binary(
            AstBinaryOp::Multiply,
            Box::new(Exp::Constant(1)),
            Box::new(Exp::Constant(2)),
        )),
        Box::new(Exp::Binary(
            AstBinaryOp::Multiply,
            Box::new(Exp::Constant(3)),
            Box::new(Exp::Binary(
                AstBinaryOp::Add,
                Box::new(Exp::Constant(4)),
                Box::new(Exp::Constant(5)),
            )),
        )),
    );
    assert_eq!(Ok(expected), parsed);
}

#[test]
fn test_assignment_right_associative() {
    let parsed = parse_exp_str("a = b = 2");
    let expected = Exp::Assignment(
        Box::new(Exp::Var("a".into())),
        Box::new(Exp::Assignment(
            Box::new(Exp::Var("b".into())),
            Box::new(Exp::Constant(2)),
        )),
    );
    assert_eq!(Ok(expected), parsed);
}

#[test]
fn test_compound_assignment_desugars() {
    let parsed = parse_exp_str("a += 2 * b");
    let expected = Exp::Assignment(
        Box::new(Exp::Var("a".into())),
        Box::new(Exp::Binary(
            AstBinaryOp::Add,
            Box::new(Exp::Var("a".into())),
            Box::new(Exp::Binary(
                AstBinaryOp::Multiply,
                Box::new(Exp::Constant(2)),
                Box::new(Exp::Var("b".into())),
            )),
        )),
    );
    assert_eq!(Ok(expected), parsed);
}

#[test]
fn test_conditional_right_associative() {
    let parsed = parse_exp_str("a ? 1 : b ? 2 : 3");
    let expected = Exp::Conditional(ConditionalExp {
        condition: Box::new(Exp::Var("a".into())),
        then: Box::new(Exp::Constant(1)),
        els: Box::new(Exp::Conditional(ConditionalExp {
            condition: Box::new(Exp::Var("b".into())),
            then: Box::new(Exp::Constant(2)),
            els: Box::new(Exp::Constant(3)),
        })),
    });
    assert_eq!(Ok(expected), parsed);
}

#[test]
fn test_crements() {
    let parsed = parse_exp_str("x++ + ++y");
    let expected = Exp::Binary(
        AstBinaryOp::Add,
        Box::new(Exp::Unary(
            AstUnaryOp::PostfixIncrement,
            Box::new(Exp::Var("x".into())),
        )),
        Box::new(Exp::Unary(
            AstUnaryOp::PrefixIncrement,
            Box::new(Exp::Var("y".into())),
        )),
    );
    assert_eq!(Ok(expected), parsed);
}

#[test]
fn test_call_with_arguments() {
    let parsed = parse_exp_str("add(1, 2 + 3)");
    let expected = Exp::Call(
        "add".into(),
        vec![
            Exp::Constant(1),
            Exp::Binary(
                AstBinaryOp::Add,
                Box::new(Exp::Constant(2)),
                Box::new(Exp::Constant(3)),
            ),
        ],
    );
    assert_eq!(Ok(expected), parsed);
}

#[test]
fn test_function_declaration() {
    let tokens = lexer::lex("int add(int a, int b) { return a + b; } int add(int a, int b);")
        .unwrap();
    let ast = parse(&tokens).unwrap();
    assert_eq!(ast.functions.len(), 2);

    let def = &ast.functions[0];
    assert_eq!(def.name, "add");
    assert_eq!(def.params, vec!["a".to_owned(), "b".to_owned()]);
    assert!(def.body.is_some());

    let dec = &ast.functions[1];
    assert!(dec.body.is_none());
}

#[test]
fn test_top_level_variable_rejected() {
    let tokens = lexer::lex("int x = 5;").unwrap();
    let parsed = parse(&tokens);
    assert_eq!(Err(ParseError::TopLevelVariable("x".into())), parsed);
}

#[test]
fn test_for_with_declaration_init() {
    let tokens =
        lexer::lex("int main(void) { for (int i = 0; i < 3; i = i + 1) ; return 0; }").unwrap();
    let ast = parse(&tokens).unwrap();
    let body = ast.functions[0].body.as_ref().unwrap();
    let AstBlockItem::S(Statement::For(for_st)) = &body.items[0] else {
        panic!("expected a for statement");
    };
    assert!(matches!(&for_st.init, AstForInit::InitDecl(d) if d.name == "i"));
    assert!(for_st.condition.is_some());
    assert!(for_st.post.is_some());
}

#[test]
fn test_switch_statement() {
    let tokens = lexer::lex(
        "int main(void) { switch (x) { case 1: return 1; default: break; } return 0; }",
    )
    .unwrap();
    let ast = parse(&tokens).unwrap();
    let body = ast.functions[0].body.as_ref().unwrap();
    let AstBlockItem::S(Statement::Switch(switch)) = &body.items[0] else {
        panic!("expected a switch statement");
    };
    assert_eq!(switch.ctrl_exp, Exp::Var("x".into()));
    // cases are not collected until semantic analysis
    assert!(switch.cases.is_empty());
    assert!(!switch.has_default);
}

#[test]
fn test_goto_and_label() {
    let tokens = lexer::lex("int main(void) { goto end; end: return 1; }").unwrap();
    let ast = parse(&tokens).unwrap();
    let body = ast.functions[0].body.as_ref().unwrap();
    assert_eq!(
        body.items[0],
        AstBlockItem::S(Statement::Goto("end".into()))
    );
    assert!(matches!(
        &body.items[1],
        AstBlockItem::S(Statement::Labeled(name, _)) if name == "end"
    ));
}

#[test]
fn test_bad_factor() {
    let tokens = lexer::lex("int main(void) { return }").unwrap();
    let parsed = parse(&tokens);
    assert_eq!(Err(ParseError::BadFactor(Token::CloseCurly)), parsed);
}

#[test]
fn test_empty_params_rejected() {
    let tokens = lexer::lex("int f() { return 0; }").unwrap();
    let parsed = parse(&tokens);
    assert_eq!(
        Err(ParseError::ExpectedButGot(Token::Int, Token::CloseParanth)),
        parsed
    );
}
