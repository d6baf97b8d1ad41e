use crate::lexer::Token;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected token {0:?}, but got {1:?}")]
    ExpectedButGot(Token, Token),
    #[error("expected identifier, but got {0:?}")]
    ExpectedIdentifierButGot(Token),
    #[error("unexpected token {0:?}")]
    UnexpectedToken(Token),
    #[error("bad factor {0:?}")]
    BadFactor(Token),
    #[error("bad unary operator {0:?}")]
    BadUnaryOp(Token),
    #[error("function declarations are not allowed inside for loop initialization")]
    BadForInit,
    #[error("only function declarations are allowed at file scope, but {0} is a variable")]
    TopLevelVariable(String),
    #[error("reached unexpected EOF")]
    UnexpectedEof,
}
