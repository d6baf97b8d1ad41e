/// Basic token type
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// int keyword
    Int,
    /// void keyword
    Void,
    /// return keyword
    Return,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// goto keyword
    Goto,
    /// do keyword
    Do,
    /// while keyword
    While,
    /// for keyword
    For,
    /// break keyword
    Break,
    /// continue keyword
    Continue,
    /// switch keyword
    Switch,
    /// case keyword
    Case,
    /// "default" keyword
    KwDefault,
    /// any non-keyword name (variable names, function names, ..)
    Identifier(String),
    /// integer constants (e.g. 100)
    Constant(i32),
    /// (
    OpenParanth,
    /// )
    CloseParanth,
    /// {
    OpenCurly,
    /// }
    CloseCurly,
    /// ;
    Semicolon,
    /// :
    Colon,
    /// ?
    QuestionMark,
    /// ,
    Comma,
    /// +
    Plus,
    /// -
    Hyphen,
    /// ~
    Tilde,
    /// *
    Asterisk,
    /// /
    FSlash,
    /// %
    Percent,
    /// ++
    Increment,
    /// --
    Decrement,
    /// !
    LogicalNot,
    /// &&
    LogicalAnd,
    /// ||
    LogicalOr,
    /// ==
    IsEqual,
    /// !=
    IsNotEqual,
    /// <
    IsLessThan,
    /// >
    IsGreaterThan,
    /// <=
    IsLessThanOrEqual,
    /// >=
    IsGreaterThanOrEqual,
    /// &
    BitwiseAnd,
    /// |
    BitwiseOr,
    /// ^
    BitwiseXor,
    /// <<
    ShiftLeft,
    /// >>
    ShiftRight,
    /// =
    Assign,
    /// +=
    AssignAdd,
    /// -=
    AssignSub,
    /// *=
    AssignMul,
    /// /=
    AssignDiv,
    /// %=
    AssignMod,
    /// &=
    AssignAnd,
    /// |=
    AssignOr,
    /// ^=
    AssignXor,
    /// <<=
    AssignShl,
    /// >>=
    AssignShr,
}

/// Reserved spellings, scanned linearly after an identifier match.
pub(super) const KEYWORDS: [(&str, Token); 14] = [
    ("int", Token::Int),
    ("void", Token::Void),
    ("return", Token::Return),
    ("if", Token::If),
    ("else", Token::Else),
    ("goto", Token::Goto),
    ("do", Token::Do),
    ("while", Token::While),
    ("for", Token::For),
    ("break", Token::Break),
    ("continue", Token::Continue),
    ("switch", Token::Switch),
    ("case", Token::Case),
    ("default", Token::KwDefault),
];

/// Every non-identifier, non-constant, non-keyword spelling, sorted by
/// decreasing length. The order is what makes the prefix match greedy:
/// `<<=` is tried before `<<` before `<`.
pub(super) const SYMBOLS: [(&str, Token); 41] = [
    ("<<=", Token::AssignShl),
    (">>=", Token::AssignShr),
    ("++", Token::Increment),
    ("--", Token::Decrement),
    ("<<", Token::ShiftLeft),
    (">>", Token::ShiftRight),
    ("<=", Token::IsLessThanOrEqual),
    (">=", Token::IsGreaterThanOrEqual),
    ("==", Token::IsEqual),
    ("!=", Token::IsNotEqual),
    ("&&", Token::LogicalAnd),
    ("||", Token::LogicalOr),
    ("+=", Token::AssignAdd),
    ("-=", Token::AssignSub),
    ("*=", Token::AssignMul),
    ("/=", Token::AssignDiv),
    ("%=", Token::AssignMod),
    ("&=", Token::AssignAnd),
    ("|=", Token::AssignOr),
    ("^=", Token::AssignXor),
    ("(", Token::OpenParanth),
    (")", Token::CloseParanth),
    ("{", Token::OpenCurly),
    ("}", Token::CloseCurly),
    (";", Token::Semicolon),
    (":", Token::Colon),
    ("?", Token::QuestionMark),
    (",", Token::Comma),
    ("+", Token::Plus),
    ("-", Token::Hyphen),
    ("~", Token::Tilde),
    ("*", Token::Asterisk),
    ("/", Token::FSlash),
    ("%", Token::Percent),
    ("<", Token::IsLessThan),
    (">", Token::IsGreaterThan),
    ("=", Token::Assign),
    ("&", Token::BitwiseAnd),
    ("|", Token::BitwiseOr),
    ("^", Token::BitwiseXor),
    ("!", Token::LogicalNot),
];

impl Token {
    #[inline]
    pub fn is_compound_assign(&self) -> bool {
        matches!(
            self,
            Self::AssignAdd
                | Self::AssignSub
                | Self::AssignMul
                | Self::AssignDiv
                | Self::AssignMod
                | Self::AssignAnd
                | Self::AssignOr
                | Self::AssignXor
                | Self::AssignShr
                | Self::AssignShl
        )
    }

    #[inline]
    pub fn is_unaryop(&self) -> bool {
        matches!(
            self,
            Token::Tilde | Token::Hyphen | Token::LogicalNot | Token::Increment | Token::Decrement
        )
    }

    #[inline]
    pub fn is_binaryop(&self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Hyphen
                | Token::Asterisk
                | Token::FSlash
                | Token::Percent
                | Token::LogicalAnd
                | Token::LogicalOr
                | Token::IsEqual
                | Token::IsNotEqual
                | Token::IsLessThan
                | Token::IsLessThanOrEqual
                | Token::IsGreaterThan
                | Token::IsGreaterThanOrEqual
                | Token::BitwiseAnd
                | Token::BitwiseOr
                | Token::BitwiseXor
                | Token::ShiftLeft
                | Token::ShiftRight
                | Token::QuestionMark
                | Token::Assign
        ) || self.is_compound_assign()
    }

    #[must_use]
    pub fn compound_to_single(&self) -> Self {
        match self {
            Self::AssignAdd => Self::Plus,
            Self::AssignSub => Self::Hyphen,
            Self::AssignMul => Self::Asterisk,
            Self::AssignDiv => Self::FSlash,
            Self::AssignMod => Self::Percent,
            Self::AssignAnd => Self::BitwiseAnd,
            Self::AssignOr => Self::BitwiseOr,
            Self::AssignXor => Self::BitwiseXor,
            Self::AssignShl => Self::ShiftLeft,
            Self::AssignShr => Self::ShiftRight,
            _ => self.clone(),
        }
    }
}
