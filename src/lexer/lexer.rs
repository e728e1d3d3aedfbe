use super::{LexerTokenKind, Token};

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human readable line, the only position errors report */
    pub cur_line: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
    finished: bool,
}

/// Scan the whole source into tokens, always terminated by a single `EOF`
pub fn scan(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_line: 1,

            chars: chars.chars().peekable(),
            finished: false,
        }
    }

    fn transform_to_type(c: char) -> Option<LexerTokenKind> {
        match c {
            '[' => Some(LexerTokenKind::LeftBracket),
            ']' => Some(LexerTokenKind::RightBracket),
            '+' => Some(LexerTokenKind::Plus),
            '-' => Some(LexerTokenKind::Minus),
            '<' => Some(LexerTokenKind::Less),
            '>' => Some(LexerTokenKind::Greater),
            '.' => Some(LexerTokenKind::Dot),
            ',' => Some(LexerTokenKind::Comma),
            // everything else is a comment
            _ => None,
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.cur_line += 1;
        }
        Some(c)
    }

    fn skip_comments(&mut self) {
        while let Some(c) = self.chars.peek() {
            if Lexer::transform_to_type(*c).is_some() {
                break;
            }
            self.consume_char();
        }
    }

    /// The next token, `EOF` once the input is exhausted (repeatedly)
    pub fn next_token(&mut self) -> Token {
        self.skip_comments();

        // the line has to be captured before consuming, a token can't span lines anyway
        let line = self.cur_line;
        match self.consume_char().and_then(Lexer::transform_to_type) {
            Some(kind) => Token::new(kind, line),
            None => Token::new(LexerTokenKind::EOF, self.cur_line),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    /// Yields every token including the trailing `EOF`, then stops
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if token.kind == LexerTokenKind::EOF {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerTokenKind::*;

    fn kinds(source: &str) -> Vec<LexerTokenKind> {
        scan(source).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn every_instruction_maps_to_one_token() {
        assert_eq!(
            kinds("[]+-<>.,"),
            vec![LeftBracket, RightBracket, Plus, Minus, Less, Greater, Dot, Comma, EOF]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("Hello [+] World!"), vec![LeftBracket, Plus, RightBracket, EOF]);
        assert_eq!(kinds("no instructions here"), vec![EOF]);
        assert_eq!(kinds(""), vec![EOF]);
    }

    #[test]
    fn lines_are_tracked() {
        let tokens = scan("+\n\n-\nabc");
        assert_eq!(tokens[0], Token::new(Plus, 1));
        assert_eq!(tokens[1], Token::new(Minus, 3));
        assert_eq!(tokens[2], Token::new(EOF, 4));
    }

    #[test]
    fn only_newlines_advance_the_line() {
        let mut lexer = Lexer::new("ab+\r\n\t-");
        assert_eq!(lexer.next_token(), Token::new(Plus, 1));
        assert_eq!(lexer.cur_line, 1);
        assert_eq!(lexer.next_token(), Token::new(Minus, 2));
        assert_eq!(lexer.cur_line, 2);
    }

    #[test]
    fn eof_is_reported_once() {
        let mut lexer = Lexer::new("+");
        assert_eq!(lexer.next().map(|t| t.kind), Some(Plus));
        assert_eq!(lexer.next().map(|t| t.kind), Some(EOF));
        assert_eq!(lexer.next(), None);
        // next_token keeps answering EOF
        assert_eq!(lexer.next_token().kind, EOF);
    }
}
