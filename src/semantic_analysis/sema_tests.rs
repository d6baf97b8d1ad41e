use super::*;
use crate::ast::*;
use crate::{lexer, parser};

fn validate_src(src: &str) -> Result<(Ast, SymbolTable)> {
    let tokens = lexer::lex(src).unwrap();
    let ast = parser::parse(&tokens).unwrap();
    validate(ast)
}

fn collect_var_decls(block: &AstBlock, out: &mut Vec<Identifier>) {
    for item in &block.items {
        match item {
            AstBlockItem::D(Declaration::Var(v)) => out.push(v.name.clone()),
            AstBlockItem::D(Declaration::Fun(_)) => (),
            AstBlockItem::S(st) => collect_var_decls_st(st, out),
        }
    }
}

fn collect_var_decls_st(st: &Statement, out: &mut Vec<Identifier>) {
    use Statement as S;
    match st {
        S::Compound(block) => collect_var_decls(block, out),
        S::While(While { body, .. })
        | S::DoWhile(DoWhile { body, .. })
        | S::Switch(Switch { body, .. })
        | S::Cased(CasedStatement { body, .. })
        | S::DCased(DCasedStatement { body, .. })
        | S::Labeled(_, body) => collect_var_decls_st(body, out),
        S::For(for_st) => {
            if let AstForInit::InitDecl(v) = &for_st.init {
                out.push(v.name.clone());
            }
            collect_var_decls_st(&for_st.body, out);
        }
        S::If(if_st) => {
            collect_var_decls_st(&if_st.then, out);
            if let Some(els) = &if_st.els {
                collect_var_decls_st(els, out);
            }
        }
        _ => (),
    }
}

#[test]
fn test_shadowing_gets_unique_names() {
    let (ast, _) = validate_src(
        "int main(void) { int x = 1; { int x = 2; } for (int x = 0; x < 1; x = x + 1) ; return x; }",
    )
    .unwrap();

    let mut decls = Vec::new();
    collect_var_decls(ast.functions[0].body.as_ref().unwrap(), &mut decls);
    assert_eq!(decls.len(), 3);
    let mut deduped = decls.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 3, "renamed declarations must be distinct");
    assert!(decls.iter().all(|n| n.starts_with("x.cv")));
}

#[test]
fn test_redeclaration_in_same_scope() {
    let result = validate_src("int main(void) { int x = 1; int x = 2; return x; }");
    assert!(matches!(
        result,
        Err(SemAnalysisError::IdentifierRedeclaration(_))
    ));
}

#[test]
fn test_undeclared_variable() {
    let result = validate_src("int main(void) { return x; }");
    assert!(matches!(
        result,
        Err(SemAnalysisError::VariableNotDeclared(_))
    ));
}

#[test]
fn test_invalid_lvalues() {
    let result = validate_src("int main(void) { 1 = 2; return 0; }");
    assert!(matches!(result, Err(SemAnalysisError::WrongLvalue(_))));

    let result = validate_src("int main(void) { int x = 0; (x + 1)++; return 0; }");
    assert!(matches!(result, Err(SemAnalysisError::WrongLvalue(_))));
}

#[test]
fn test_break_and_continue_outside_loop() {
    let result = validate_src("int main(void) { break; return 0; }");
    assert_eq!(Err(SemAnalysisError::BreakOutsideOfLoop), result);

    let result = validate_src("int main(void) { continue; return 0; }");
    assert_eq!(Err(SemAnalysisError::ContinueOutsideOfLoop), result);

    // continue may not target a switch
    let result = validate_src("int main(void) { switch (1) { continue; } return 0; }");
    assert_eq!(Err(SemAnalysisError::ContinueOutsideOfLoop), result);
}

#[test]
fn test_loop_and_switch_ids() {
    let (ast, _) = validate_src(
        "int main(void) { while (1) { switch (2) { case 1: break; } break; } return 0; }",
    )
    .unwrap();
    let body = ast.functions[0].body.as_ref().unwrap();
    let AstBlockItem::S(Statement::While(while_st)) = &body.items[0] else {
        panic!("expected while");
    };
    assert_eq!(while_st.label, "loop.1");

    let Statement::Compound(inner) = while_st.body.as_ref() else {
        panic!("expected block");
    };
    let AstBlockItem::S(Statement::Switch(switch)) = &inner.items[0] else {
        panic!("expected switch");
    };
    assert_eq!(switch.label, "switch.2");

    // break inside the switch targets the switch, break after it the loop
    let Statement::Compound(switch_body) = switch.body.as_ref() else {
        panic!("expected block");
    };
    let AstBlockItem::S(Statement::Cased(cased)) = &switch_body.items[0] else {
        panic!("expected case");
    };
    assert_eq!(cased.label, "case_1_switch.2");
    assert_eq!(*cased.body, Statement::Break("switch.2".into()));
    assert_eq!(inner.items[1], AstBlockItem::S(Statement::Break("loop.1".into())));
}

#[test]
fn test_case_collection() {
    let (ast, _) = validate_src(
        "int main(void) { switch (1) { case 3: ; case -1: ; default: ; case 2: ; } return 0; }",
    )
    .unwrap();
    let body = ast.functions[0].body.as_ref().unwrap();
    let AstBlockItem::S(Statement::Switch(switch)) = &body.items[0] else {
        panic!("expected switch");
    };
    assert_eq!(switch.cases, vec![-1, 2, 3]);
    assert!(switch.has_default);
}

#[test]
fn test_duplicate_cases() {
    let result =
        validate_src("int main(void) { switch (1) { case 2: ; case 2: ; } return 0; }");
    assert_eq!(Err(SemAnalysisError::DuplicateCase("2".into())), result);

    let result =
        validate_src("int main(void) { switch (1) { default: ; default: ; } return 0; }");
    assert!(matches!(result, Err(SemAnalysisError::DuplicateCase(_))));

    // the same value in a nested switch is a different case
    let nested = validate_src(
        "int main(void) { switch (1) { case 2: switch (3) { case 2: ; } } return 0; }",
    );
    assert!(nested.is_ok());
}

#[test]
fn test_case_outside_switch() {
    let result = validate_src("int main(void) { case 1: return 0; }");
    assert_eq!(Err(SemAnalysisError::CaseNotInSwitch), result);

    let result = validate_src("int main(void) { default: return 0; }");
    assert_eq!(Err(SemAnalysisError::DefaultNotInSwitch), result);
}

#[test]
fn test_non_constant_case() {
    let result = validate_src(
        "int main(void) { int x = 1; switch (1) { case x: return 0; } return 1; }",
    );
    assert!(matches!(result, Err(SemAnalysisError::NotAConstCase(_))));
}

#[test]
fn test_goto_labels() {
    let result = validate_src("int main(void) { goto end; return 2; end: return 1; }");
    assert!(result.is_ok());

    let result = validate_src("int main(void) { goto nowhere; return 0; }");
    assert_eq!(Err(SemAnalysisError::UnknownLabel("nowhere".into())), result);

    let result = validate_src("int main(void) { end: ; end: return 1; }");
    assert_eq!(
        Err(SemAnalysisError::LabelRedeclaration("end".into())),
        result
    );

    // labels are per function
    let result = validate_src(
        "int f(void) { end: return 1; } int main(void) { end: return 0; }",
    );
    assert!(result.is_ok());
}

#[test]
fn test_nested_function_definition() {
    let result = validate_src("int main(void) { int f(void) { return 1; } return 0; }");
    assert_eq!(
        Err(SemAnalysisError::LocalFunDefinition("f".into())),
        result
    );
}

#[test]
fn test_call_arity_and_kind() {
    let result = validate_src("int add(int a, int b); int main(void) { return add(1); }");
    assert_eq!(
        Err(SemAnalysisError::ExpectedArgsCountButGot(2, 1, "add".into())),
        result
    );

    let result = validate_src("int main(void) { int x = 0; return x(); }");
    assert_eq!(Err(SemAnalysisError::VariableCall("x.cv0".into())), result);

    let result = validate_src("int f(void); int main(void) { return f; }");
    assert_eq!(
        Err(SemAnalysisError::FunctionNameAsVariable("f".into())),
        result
    );
}

#[test]
fn test_incompatible_redeclarations() {
    let result = validate_src("int f(int a); int f(int a, int b); int main(void) { return 0; }");
    assert_eq!(Err(SemAnalysisError::IncompatibleFunDec("f".into())), result);

    let result = validate_src(
        "int f(void) { return 1; } int f(void) { return 2; } int main(void) { return 0; }",
    );
    assert_eq!(
        Err(SemAnalysisError::FunctionRedefinition("f".into())),
        result
    );
}

#[test]
fn test_symbol_table_contents() {
    let (_, symbols) = validate_src(
        "int add(int a, int b) { return a + b; } int twice(int x); int main(void) { return add(1, 2); }",
    )
    .unwrap();

    let add = &symbols["add"];
    assert_eq!(add.sym_type, Type::Fun { param_count: 2 });
    assert!(add.defined);
    assert!(add.has_external_linkage);
    assert_eq!(add.stack_size, 0);

    let twice = &symbols["twice"];
    assert!(!twice.defined);

    let a = &symbols["a.cv0"];
    assert_eq!(a.sym_type, Type::Int);
    assert!(!a.has_external_linkage);
}
