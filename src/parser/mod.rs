mod cursor;
mod parse_error;
#[cfg(test)]
mod parser_tests;

use crate::ast::*;
use crate::lexer::Token;
use cursor::Cursor;
pub use parse_error::{ParseError, Result};

#[allow(clippy::match_same_arms)]
fn get_prec(token: &Token) -> u64 {
    match token {
        Token::Asterisk => 50,
        Token::FSlash => 50,
        Token::Percent => 50,
        Token::Plus => 45,
        Token::Hyphen => 45,
        Token::ShiftLeft => 40,
        Token::ShiftRight => 40,
        Token::IsLessThan => 35,
        Token::IsLessThanOrEqual => 35,
        Token::IsGreaterThan => 35,
        Token::IsGreaterThanOrEqual => 35,
        Token::IsEqual => 30,
        Token::IsNotEqual => 30,
        Token::BitwiseAnd => 25,
        Token::BitwiseXor => 20,
        Token::BitwiseOr => 15,
        Token::LogicalAnd => 10,
        Token::LogicalOr => 5,
        Token::QuestionMark => 3,
        Token::Assign => 1,
        t if t.is_compound_assign() => 1,
        _ => 0,
    }
}

impl TryFrom<&Token> for AstBinaryOp {
    type Error = ParseError;
    fn try_from(value: &Token) -> std::result::Result<Self, ParseError> {
        match value {
            Token::Plus => Ok(AstBinaryOp::Add),
            Token::Hyphen => Ok(AstBinaryOp::Subtract),
            Token::Asterisk => Ok(AstBinaryOp::Multiply),
            Token::FSlash => Ok(AstBinaryOp::Divide),
            Token::Percent => Ok(AstBinaryOp::Mod),
            Token::LogicalAnd => Ok(AstBinaryOp::LogicalAnd),
            Token::LogicalOr => Ok(AstBinaryOp::LogicalOr),
            Token::IsEqual => Ok(AstBinaryOp::IsEqual),
            Token::IsNotEqual => Ok(AstBinaryOp::IsNotEqual),
            Token::IsLessThan => Ok(AstBinaryOp::LessThan),
            Token::IsLessThanOrEqual => Ok(AstBinaryOp::LessOrEqual),
            Token::IsGreaterThan => Ok(AstBinaryOp::GreaterThan),
            Token::IsGreaterThanOrEqual => Ok(AstBinaryOp::GreaterOrEqual),
            Token::BitwiseAnd => Ok(AstBinaryOp::BitwiseAnd),
            Token::BitwiseOr => Ok(AstBinaryOp::BitwiseOr),
            Token::BitwiseXor => Ok(AstBinaryOp::BitwiseXor),
            Token::ShiftLeft => Ok(AstBinaryOp::ShiftLeft),
            Token::ShiftRight => Ok(AstBinaryOp::ShiftRight),
            _ => Err(ParseError::UnexpectedToken(value.clone())),
        }
    }
}

impl TryFrom<&Token> for AstUnaryOp {
    type Error = ParseError;
    fn try_from(value: &Token) -> std::result::Result<Self, ParseError> {
        match value {
            Token::Hyphen => Ok(Self::Negate),
            Token::Tilde => Ok(Self::Complement),
            Token::LogicalNot => Ok(Self::LogicalNot),
            Token::Increment => Ok(Self::PrefixIncrement),
            Token::Decrement => Ok(Self::PrefixDecrement),
            _ => Err(ParseError::BadUnaryOp(value.clone())),
        }
    }
}

fn parse_identifier(cursor: &mut Cursor) -> Result<Identifier> {
    let next = cursor.next_or_error()?;
    if let Token::Identifier(name) = next {
        Ok(name.to_owned())
    } else {
        Err(ParseError::ExpectedIdentifierButGot(next.clone()))
    }
}

fn parse_conditional_middle(cursor: &mut Cursor) -> Result<Exp> {
    cursor.expect(&Token::QuestionMark)?;
    let exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::Colon)?;
    Ok(exp)
}

fn parse_exp_conditional(cursor: &mut Cursor, prec: u64, left: Exp) -> Result<Exp> {
    let then = parse_conditional_middle(cursor).map(Box::new)?;
    // Same minimum precedence: the conditional is right-associative.
    let els = parse_exp(cursor, prec).map(Box::new)?;
    let conditional = ConditionalExp {
        condition: Box::new(left),
        then,
        els,
    };

    Ok(Exp::Conditional(conditional))
}

fn parse_exp_compassign(cursor: &mut Cursor, prec: u64, left: Exp) -> Result<Exp> {
    let t = cursor.next_or_error()?;
    if !t.is_compound_assign() {
        return Err(ParseError::UnexpectedToken(t.clone()));
    }

    let op = t.compound_to_single();
    let op = AstBinaryOp::try_from(&op)?;

    // `lhs op= rhs` desugars to `lhs = lhs op rhs`; the left operand of the
    // inner binary is a structural clone of the lvalue.
    let right = parse_exp(cursor, prec).map(Box::new)?;
    let operation = Exp::Binary(op, Box::new(left.clone()), right);
    Ok(Exp::Assignment(Box::new(left), Box::new(operation)))
}

fn parse_exp_assign(cursor: &mut Cursor, prec: u64, left: Exp) -> Result<Exp> {
    cursor.expect(&Token::Assign)?;
    let right = parse_exp(cursor, prec).map(Box::new)?;
    Ok(Exp::Assignment(Box::new(left), right))
}

fn parse_binary_op(cursor: &mut Cursor) -> Result<AstBinaryOp> {
    let next = cursor.next_or_error()?;
    AstBinaryOp::try_from(next)
}

fn parse_exp_binary(cursor: &mut Cursor, prec: u64, left: Exp) -> Result<Exp> {
    let op = parse_binary_op(cursor)?;
    let right = parse_exp(cursor, prec + 1).map(Box::new)?;
    Ok(Exp::Binary(op, Box::new(left), right))
}

fn parse_exp(cursor: &mut Cursor, min_prec: u64) -> Result<Exp> {
    let mut left = parse_factor(cursor)?;

    while let Some(next_token) = cursor.peek().filter(|t| t.is_binaryop()) {
        let prec = get_prec(next_token);
        if prec < min_prec {
            break;
        }
        left = match next_token {
            t if t.is_compound_assign() => parse_exp_compassign(cursor, prec, left)?,
            Token::QuestionMark => parse_exp_conditional(cursor, prec, left)?,
            Token::Assign => parse_exp_assign(cursor, prec, left)?,
            _ => parse_exp_binary(cursor, prec, left)?,
        };
    }

    Ok(left)
}

fn parse_unary_operation(cursor: &mut Cursor) -> Result<Exp> {
    let next = cursor.next_or_error()?;
    let op = AstUnaryOp::try_from(next)?;
    let inner = parse_factor(cursor).map(Box::new)?;

    Ok(Exp::Unary(op, inner))
}

fn parse_postfixop(cursor: &mut Cursor) -> Result<AstUnaryOp> {
    let next = cursor.next_or_error()?;
    match next {
        Token::Increment => Ok(AstUnaryOp::PostfixIncrement),
        _ => Ok(AstUnaryOp::PostfixDecrement),
    }
}

fn parse_factor_postfixop(cursor: &mut Cursor, inner: Exp) -> Result<Exp> {
    let op = parse_postfixop(cursor)?;
    Ok(Exp::Unary(op, Box::new(inner)))
}

fn parse_arguments(cursor: &mut Cursor) -> Result<Vec<Exp>> {
    let mut args = Vec::new();

    if cursor.peek_is(&Token::CloseParanth) {
        return Ok(args);
    }

    args.push(parse_exp(cursor, 0)?);
    while cursor.bump_if(&Token::Comma) {
        args.push(parse_exp(cursor, 0)?);
    }

    Ok(args)
}

fn parse_factor_call(cursor: &mut Cursor, name: Identifier) -> Result<Exp> {
    cursor.expect(&Token::OpenParanth)?;
    let arguments = parse_arguments(cursor)?;
    cursor.expect(&Token::CloseParanth)?;
    Ok(Exp::Call(name, arguments))
}

fn parse_factor_identifier(cursor: &mut Cursor) -> Result<Exp> {
    let name = parse_identifier(cursor)?;
    let var = Exp::Var(name.clone());
    match cursor.peek() {
        Some(Token::OpenParanth) => parse_factor_call(cursor, name),
        Some(Token::Increment | Token::Decrement) => parse_factor_postfixop(cursor, var),
        _ => Ok(var),
    }
}

fn parse_factor_subexp(cursor: &mut Cursor) -> Result<Exp> {
    cursor.expect(&Token::OpenParanth)?;
    let exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::CloseParanth)?;

    match cursor.peek() {
        Some(Token::Increment | Token::Decrement) => parse_factor_postfixop(cursor, exp),
        _ => Ok(exp),
    }
}

fn parse_factor(cursor: &mut Cursor) -> Result<Exp> {
    let peek = cursor.peek_or_error()?;
    match peek {
        Token::Identifier(_) => parse_factor_identifier(cursor),
        Token::OpenParanth => parse_factor_subexp(cursor),
        Token::Constant(i) => {
            let constant = Exp::Constant(*i);
            cursor.bump();
            Ok(constant)
        }
        t if t.is_unaryop() => parse_unary_operation(cursor),
        _ => Err(ParseError::BadFactor(peek.clone())),
    }
}

fn parse_optional_exp(cursor: &mut Cursor, delim: &Token) -> Result<Option<Exp>> {
    let not_met_delim = !cursor.bump_if(delim);
    let exp = not_met_delim.then(|| parse_exp(cursor, 0)).transpose()?;

    if not_met_delim {
        cursor.expect(delim)?;
    }

    Ok(exp)
}

fn parse_forinit(cursor: &mut Cursor) -> Result<AstForInit> {
    let peek = cursor.peek_or_error()?;
    if peek == &Token::Int {
        match parse_declaration(cursor)? {
            Declaration::Var(vardec) => Ok(AstForInit::InitDecl(vardec)),
            Declaration::Fun(_) => Err(ParseError::BadForInit),
        }
    } else {
        let exp = parse_optional_exp(cursor, &Token::Semicolon)?;
        Ok(AstForInit::InitExp(exp))
    }
}

fn parse_for(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::For)?;
    cursor.expect(&Token::OpenParanth)?;
    let init = parse_forinit(cursor)?;
    let condition = parse_optional_exp(cursor, &Token::Semicolon)?;
    let post = parse_optional_exp(cursor, &Token::CloseParanth)?;
    let body = parse_statement(cursor).map(Box::new)?;
    let for_st = For {
        init,
        condition,
        post,
        body,
        label: Identifier::new(),
    };

    Ok(Statement::For(for_st))
}

fn parse_if(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::If)?;
    cursor.expect(&Token::OpenParanth)?;
    let condition = parse_exp(cursor, 0)?;
    cursor.expect(&Token::CloseParanth)?;
    let then = parse_statement(cursor).map(Box::new)?;
    let else_present = cursor.bump_if(&Token::Else);
    let els = else_present
        .then(|| parse_statement(cursor))
        .transpose()?
        .map(Box::new);
    let if_st = If {
        condition,
        then,
        els,
    };

    Ok(Statement::If(if_st))
}

fn parse_while(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::While)?;
    cursor.expect(&Token::OpenParanth)?;
    let condition = parse_exp(cursor, 0)?;
    cursor.expect(&Token::CloseParanth)?;
    let body = parse_statement(cursor).map(Box::new)?;
    let while_st = While {
        condition,
        body,
        label: Identifier::new(),
    };

    Ok(Statement::While(while_st))
}

fn parse_dowhile(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Do)?;
    let body = parse_statement(cursor).map(Box::new)?;
    cursor.expect(&Token::While)?;
    cursor.expect(&Token::OpenParanth)?;
    let condition = parse_exp(cursor, 0)?;
    cursor.expect(&Token::CloseParanth)?;
    cursor.expect(&Token::Semicolon)?;
    let dowhile = DoWhile {
        body,
        condition,
        label: Identifier::new(),
    };

    Ok(Statement::DoWhile(dowhile))
}

fn parse_switch(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Switch)?;
    cursor.expect(&Token::OpenParanth)?;
    let ctrl_exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::CloseParanth)?;
    let body = parse_statement(cursor).map(Box::new)?;
    let switch = Switch {
        ctrl_exp,
        body,
        cases: Vec::new(),
        has_default: false,
        label: Identifier::new(),
    };

    Ok(Statement::Switch(switch))
}

fn parse_case(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Case)?;
    let exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::Colon)?;
    let body = parse_statement(cursor).map(Box::new)?;
    let cased = CasedStatement {
        exp,
        body,
        label: Identifier::new(),
    };

    Ok(Statement::Cased(cased))
}

fn parse_default_case(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::KwDefault)?;
    cursor.expect(&Token::Colon)?;
    let body = parse_statement(cursor).map(Box::new)?;
    let dcased = DCasedStatement {
        body,
        label: Identifier::new(),
    };

    Ok(Statement::DCased(dcased))
}

fn parse_continue(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Continue)?;
    cursor.expect(&Token::Semicolon)?;
    Ok(Statement::Continue(Identifier::new()))
}

fn parse_break(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Break)?;
    cursor.expect(&Token::Semicolon)?;
    Ok(Statement::Break(Identifier::new()))
}

fn parse_return(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Return)?;
    let exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::Semicolon)?;
    Ok(Statement::Return(exp))
}

fn parse_goto(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(&Token::Goto)?;
    let label = parse_identifier(cursor)?;
    cursor.expect(&Token::Semicolon)?;

    Ok(Statement::Goto(label))
}

fn parse_labeled_statement(cursor: &mut Cursor) -> Result<Statement> {
    let name = parse_identifier(cursor)?;
    cursor.expect(&Token::Colon)?;
    let statement = parse_statement(cursor).map(Box::new)?;

    Ok(Statement::Labeled(name, statement))
}

fn parse_statement_exp(cursor: &mut Cursor) -> Result<Statement> {
    let exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::Semicolon)?;

    Ok(Statement::Exp(exp))
}

fn parse_statement_label_or_exp(cursor: &mut Cursor) -> Result<Statement> {
    let second = cursor.peek_nth_or_error(1)?;
    if let Token::Colon = second {
        parse_labeled_statement(cursor)
    } else {
        parse_statement_exp(cursor)
    }
}

fn parse_statement(cursor: &mut Cursor) -> Result<Statement> {
    let peek = cursor.peek_or_error()?;
    match peek {
        Token::Goto => parse_goto(cursor),
        Token::Case => parse_case(cursor),
        Token::KwDefault => parse_default_case(cursor),
        Token::Switch => parse_switch(cursor),
        Token::Continue => parse_continue(cursor),
        Token::Break => parse_break(cursor),
        Token::Return => parse_return(cursor),
        Token::For => parse_for(cursor),
        Token::Do => parse_dowhile(cursor),
        Token::While => parse_while(cursor),
        Token::If => parse_if(cursor),
        Token::Identifier(_) => parse_statement_label_or_exp(cursor),
        Token::Semicolon => {
            cursor.bump();
            Ok(Statement::Null)
        }
        Token::OpenCurly => {
            let block = parse_block(cursor)?;
            Ok(Statement::Compound(block))
        }
        _ => parse_statement_exp(cursor),
    }
}

fn parse_block_item(cursor: &mut Cursor) -> Result<AstBlockItem> {
    let peek = cursor.peek_or_error()?;
    match peek {
        Token::Int => parse_declaration(cursor).map(AstBlockItem::D),
        _ => parse_statement(cursor).map(AstBlockItem::S),
    }
}

fn parse_block(cursor: &mut Cursor) -> Result<AstBlock> {
    let mut items = Vec::new();

    cursor.expect(&Token::OpenCurly)?;

    while !cursor.bump_if(&Token::CloseCurly) {
        let item = parse_block_item(cursor)?;
        items.push(item);
    }

    Ok(AstBlock { items })
}

fn parse_params(cursor: &mut Cursor) -> Result<Vec<Identifier>> {
    if cursor.bump_if(&Token::Void) {
        return Ok(Vec::new());
    }

    let mut params = Vec::new();
    loop {
        cursor.expect(&Token::Int)?;
        params.push(parse_identifier(cursor)?);
        if !cursor.bump_if(&Token::Comma) {
            break;
        }
    }

    Ok(params)
}

fn parse_declaration(cursor: &mut Cursor) -> Result<Declaration> {
    cursor.expect(&Token::Int)?;
    let name = parse_identifier(cursor)?;
    let next = cursor.next_or_error()?;

    match next {
        Token::Assign => {
            let exp = parse_exp(cursor, 0)?;
            cursor.expect(&Token::Semicolon)?;
            Ok(Declaration::Var(VarDec {
                name,
                init: Some(exp),
            }))
        }
        Token::Semicolon => Ok(Declaration::Var(VarDec { name, init: None })),
        Token::OpenParanth => {
            let params = parse_params(cursor)?;
            cursor.expect(&Token::CloseParanth)?;
            let has_body = !cursor.bump_if(&Token::Semicolon);
            let body = has_body.then(|| parse_block(cursor)).transpose()?;
            Ok(Declaration::Fun(FunDec { name, params, body }))
        }
        _ => Err(ParseError::UnexpectedToken(next.clone())),
    }
}

pub fn parse(tokens: &[Token]) -> Result<Ast> {
    let mut functions = Vec::new();
    let mut cursor = Cursor::new(tokens);

    while !cursor.at_end() {
        match parse_declaration(&mut cursor)? {
            Declaration::Fun(fundec) => functions.push(fundec),
            Declaration::Var(vardec) => return Err(ParseError::TopLevelVariable(vardec.name)),
        }
    }
    Ok(Ast { functions })
}
