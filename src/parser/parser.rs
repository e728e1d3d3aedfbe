use std::iter::Peekable;

use crate::lexer::{LexerTokenKind, Token};

use super::{AstKind, BasicBlock, LoopBlock, LoopId, ParseError, Program};

/// Scan-free entry point: tokens in, program out
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

pub struct Parser<'a> {
    tokens: Peekable<std::slice::Iter<'a, Token>>,
    /// line of the last token seen, used if the stream is missing its `EOF`
    last_line: usize,
    next_loop_id: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            tokens: tokens.iter().peekable(),
            last_line: 1,
            next_loop_id: 0,
        }
    }

    fn fresh_loop_id(&mut self) -> LoopId {
        let id = LoopId(self.next_loop_id);
        self.next_loop_id += 1;
        id
    }

    /// Parses instructions until a `]` (when `nested`) or `EOF`
    fn parse_block(&mut self, nested: bool) -> Result<BasicBlock, ParseError> {
        let mut instructions = vec![];

        loop {
            let Some(token) = self.tokens.next() else {
                // a well formed stream always ends with EOF but a slice might not
                return self.end_of_input(nested, self.last_line, instructions);
            };
            self.last_line = token.line;

            instructions.push(match token.kind {
                LexerTokenKind::Greater => AstKind::Move(1),
                LexerTokenKind::Less => AstKind::Move(-1),
                LexerTokenKind::Plus => AstKind::Add(1),
                LexerTokenKind::Minus => AstKind::Add(-1),
                LexerTokenKind::Dot => AstKind::Print,
                LexerTokenKind::Comma => AstKind::Read,
                LexerTokenKind::LeftBracket => self.parse_loop()?,
                LexerTokenKind::RightBracket if nested => break,
                LexerTokenKind::RightBracket => {
                    return Err(ParseError::new("Unexpected ']'.", token.line))
                }
                LexerTokenKind::EOF => {
                    return self.end_of_input(nested, token.line, instructions)
                }
            })
        }

        Ok(BasicBlock { instructions })
    }

    fn end_of_input(
        &self,
        nested: bool,
        line: usize,
        instructions: Vec<AstKind>,
    ) -> Result<BasicBlock, ParseError> {
        if nested {
            Err(ParseError::new("Expected matching ']'.", line))
        } else {
            Ok(BasicBlock { instructions })
        }
    }

    /// Called just after the `[` has been consumed
    fn parse_loop(&mut self) -> Result<AstKind, ParseError> {
        let id = self.fresh_loop_id();
        let body = self.parse_block(true)?;

        // `[+]` & `[-]` keep adding until the cell wraps to zero, any non-zero step on a
        // wrapping byte gets there so the loop is the same as just zeroing the cell
        if let [AstKind::Add(_)] = body.instructions[..] {
            return Ok(AstKind::Zero);
        }

        Ok(AstKind::Loop(LoopBlock { id, body }))
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        Ok(Program {
            body: self.parse_block(false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    fn parse_source(source: &str) -> Result<Program, ParseError> {
        parse(&scan(source))
    }

    #[test]
    fn zero_idiom_is_recognised() {
        assert_eq!(parse_source("[+]").unwrap(), Program::new(vec![AstKind::Zero]));
        assert_eq!(parse_source("[-]").unwrap(), Program::new(vec![AstKind::Zero]));
    }

    #[test]
    fn multi_add_loops_stay_loops() {
        let program = parse_source("[++]").unwrap();
        assert!(matches!(program.body.instructions[..], [AstKind::Loop(_)]));
    }

    #[test]
    fn loops_get_distinct_ids() {
        let program = parse_source("[>][>[<]]").unwrap();
        let ids: Vec<LoopId> = match &program.body.instructions[..] {
            [AstKind::Loop(first), AstKind::Loop(second)] => match &second.body.instructions[..] {
                [AstKind::Move(1), AstKind::Loop(inner)] => vec![first.id, second.id, inner.id],
                other => panic!("unexpected body {:?}", other),
            },
            other => panic!("unexpected program {:?}", other),
        };
        assert_eq!(ids, vec![LoopId(0), LoopId(1), LoopId(2)]);
    }

    #[test]
    fn unmatched_close_bracket() {
        let err = parse_source("+\n+]").unwrap_err();
        assert_eq!(err, ParseError::new("Unexpected ']'.", 2));
    }

    #[test]
    fn unterminated_loop_reports_eof_line() {
        let err = parse_source("[\n+\n\n").unwrap_err();
        assert_eq!(err, ParseError::new("Expected matching ']'.", 4));
        assert_eq!(
            err.to_string(),
            "Error encountered on line 4: Expected matching ']'."
        );
    }

    #[test]
    fn tokens_without_eof_still_parse() {
        let tokens = vec![Token::new(LexerTokenKind::Plus, 1)];
        assert_eq!(parse(&tokens).unwrap(), Program::new(vec![AstKind::Add(1)]));

        let tokens = vec![Token::new(LexerTokenKind::LeftBracket, 3)];
        assert_eq!(
            parse(&tokens).unwrap_err(),
            ParseError::new("Expected matching ']'.", 3)
        );
    }
}
