pub mod lexer;

pub use lexer::{scan, Lexer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerTokenKind {
    // `[`: If the byte at the `data pointer` is zero, then jump the `instruction pointer` forward to the instruction after the matching `]`
    LeftBracket,
    // `]`: If the byte at the `data pointer` is non-zero then jump the `instruction pointer` back to the instruction after the matching `[`
    RightBracket,

    // `+`: Increment the byte at the `data pointer` by one
    Plus,
    // `-`: Decrement the byte at the `data pointer` by one
    Minus,

    // `<`: Decrement the `data pointer` by one
    Less,
    // `>`: Increment the `data pointer` by one
    Greater,

    // `.`: Write the byte at the `data pointer` to the `output device`
    Dot,
    // `,`: Read the next byte from the `input device` and write it to the `data pointer`
    Comma,

    // End of file: no more tokens left
    EOF,
}

impl LexerTokenKind {
    /// The source character for the token, `None` for the synthetic `EOF`
    pub fn as_char(&self) -> Option<char> {
        match self {
            LexerTokenKind::LeftBracket => Some('['),
            LexerTokenKind::RightBracket => Some(']'),
            LexerTokenKind::Plus => Some('+'),
            LexerTokenKind::Minus => Some('-'),
            LexerTokenKind::Less => Some('<'),
            LexerTokenKind::Greater => Some('>'),
            LexerTokenKind::Dot => Some('.'),
            LexerTokenKind::Comma => Some(','),
            LexerTokenKind::EOF => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: LexerTokenKind,
    /** 1-based line the token was found on */
    pub line: usize,
}

impl Token {
    pub fn new(kind: LexerTokenKind, line: usize) -> Token {
        Token { kind, line }
    }
}
