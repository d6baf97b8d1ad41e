use super::*;

#[test]
fn test_basic1() {
    let input = "int main(void) {}";
    let lexed = lex(input);
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("main")),
        Token::OpenParanth,
        Token::Void,
        Token::CloseParanth,
        Token::OpenCurly,
        Token::CloseCurly,
    ];
    assert_eq!(Ok(expected), lexed);
}

#[test]
fn test_bad_atsign() {
    let input = "int main(void) {\nreturn 0@1;\n}";
    let lexed = lex(input);
    match lexed {
        Err(LexError::UnknownToken { pos, window }) => {
            assert_eq!(pos, 25);
            assert!(window.contains('@'));
        }
        other => panic!("expected unknown token error, got {other:?}"),
    }
}

#[test]
fn test_bad_constant() {
    let input = "int main(void) {\nreturn 1foo;\n}";
    let lexed = lex(input);
    assert!(matches!(lexed, Err(LexError::UnknownToken { pos: 24, .. })));
}

#[test]
fn test_constant_too_large() {
    let input = "int main(void) { return 2147483648; }";
    let lexed = lex(input);
    let expected = Err(LexError::ConstantTooLarge("2147483648".into()));
    assert_eq!(expected, lexed);

    let fits = lex("int main(void) { return 2147483647; }");
    assert!(fits.is_ok());
}

#[test]
fn test_maximal_munch() {
    let input = "a <<= b << c <= d < e";
    let lexed = lex(input);
    let expected = vec![
        Token::Identifier(String::from("a")),
        Token::AssignShl,
        Token::Identifier(String::from("b")),
        Token::ShiftLeft,
        Token::Identifier(String::from("c")),
        Token::IsLessThanOrEqual,
        Token::Identifier(String::from("d")),
        Token::IsLessThan,
        Token::Identifier(String::from("e")),
    ];
    assert_eq!(Ok(expected), lexed);
}

#[test]
fn test_keywords_not_identifiers() {
    let input = "switch (x) { case 1: default: break; } goto end; do continue; while (0);";
    let lexed = lex(input).unwrap();
    assert_eq!(lexed[0], Token::Switch);
    assert_eq!(lexed[5], Token::Case);
    assert_eq!(lexed[8], Token::KwDefault);
    assert!(lexed.contains(&Token::Goto));
    // prefix of a keyword is still an identifier
    let lexed = lex("int forx = 0;").unwrap();
    assert_eq!(lexed[1], Token::Identifier(String::from("forx")));
}

#[test]
fn test_precedence_sequence() {
    let input = "int main(void) {\nreturn (0 == 0 && 3 == 2 + 1 > 1) + 1;\n}";
    let lexed = lex(input);
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("main")),
        Token::OpenParanth,
        Token::Void,
        Token::CloseParanth,
        Token::OpenCurly,
        Token::Return,
        Token::OpenParanth,
        Token::Constant(0),
        Token::IsEqual,
        Token::Constant(0),
        Token::LogicalAnd,
        Token::Constant(3),
        Token::IsEqual,
        Token::Constant(2),
        Token::Plus,
        Token::Constant(1),
        Token::IsGreaterThan,
        Token::Constant(1),
        Token::CloseParanth,
        Token::Plus,
        Token::Constant(1),
        Token::Semicolon,
        Token::CloseCurly,
    ];
    assert_eq!(Ok(expected), lexed);
}
