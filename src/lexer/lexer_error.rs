use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LexError {
    #[error("could not lex token at position {pos}\nnearby text:\n{window}")]
    UnknownToken { pos: usize, window: String },
    #[error("integer constant {0} does not fit in an int")]
    ConstantTooLarge(String),
}
