mod lexer_error;
#[cfg(test)]
mod lexer_tests;
mod token;

pub use lexer_error::LexError;
pub use token::Token;

use regex::Regex;
use std::sync::LazyLock;
use token::{KEYWORDS, SYMBOLS};

pub type Tokens = Vec<Token>;

static IDENT_OR_CONST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?:([A-Za-z_]\w*)|([0-9]+))\b").expect("the pattern is valid")
});

fn keyword_or_identifier(spelling: &str) -> Token {
    for (keyword, token) in &KEYWORDS {
        if *keyword == spelling {
            return token.clone();
        }
    }
    Token::Identifier(spelling.to_owned())
}

fn lex_symbol(rest: &str) -> Option<(Token, usize)> {
    SYMBOLS
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|(spelling, token)| (token.clone(), spelling.len()))
}

/// ~30 characters of source centered on the failing position. The input is
/// expected to be ASCII C source, but a stray multibyte character must not
/// turn a lex error into a slicing panic.
fn context_window(input: &str, pos: usize) -> String {
    const HALF_WIDTH: usize = 15;
    let mut start = pos.saturating_sub(HALF_WIDTH);
    let mut end = usize::min(pos + HALF_WIDTH, input.len());
    while !input.is_char_boundary(start) {
        start -= 1;
    }
    while !input.is_char_boundary(end) {
        end += 1;
    }
    input[start..end].to_owned()
}

pub fn lex(input: &str) -> Result<Tokens, LexError> {
    let mut tokens = Tokens::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let first = rest.chars().next().expect("rest is non-empty");
        if first.is_whitespace() {
            pos += first.len_utf8();
            continue;
        }

        if let Some(captures) = IDENT_OR_CONST.captures(rest) {
            let spelling = captures
                .get(0)
                .expect("group 0 is the whole match")
                .as_str();
            let token = if captures.get(1).is_some() {
                keyword_or_identifier(spelling)
            } else {
                let value = spelling
                    .parse::<i32>()
                    .map_err(|_| LexError::ConstantTooLarge(spelling.to_owned()))?;
                Token::Constant(value)
            };
            tokens.push(token);
            pos += spelling.len();
        } else if let Some((token, len)) = lex_symbol(rest) {
            tokens.push(token);
            pos += len;
        } else {
            let window = context_window(input, pos);
            return Err(LexError::UnknownToken { pos, window });
        }
    }

    Ok(tokens)
}
