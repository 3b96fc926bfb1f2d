//! Acceptance check for user-typed CSS lengths.
//!
//! Custom size and offset strings go straight into inline styles, so they are
//! checked against a small CSS value grammar first:
//!
//! - a dimension with one of the units in [`LENGTH_UNITS`], or a bare `0`
//! - `clamp()` (three arguments), `calc()` (one), `min()` / `max()` (one or more)
//!
//! Function arguments may nest accepted functions and combine terms with
//! `+ - * /`. As in CSS, `+` and `-` need whitespace on both sides, and
//! multiplication/division needs a unitless number on one side. Nesting
//! deeper than [`MAX_NESTING`] levels is rejected.
//!
//! Anything else is rejected; [`sanitize_length`] coerces rejected input to
//! an empty string instead of surfacing an error.

use logos::Logos;

/// Units accepted on a dimension
pub const LENGTH_UNITS: [&str; 5] = ["px", "rem", "em", "vw", "cqi"];

/// Deepest function or parenthesis nesting accepted in a length
pub const MAX_NESTING: usize = 32;

/// Returns true when `value` is an accepted CSS length or length function
pub fn is_valid_length(value: &str) -> bool {
    let value = value.trim();
    let Ok(tokens) = Token::lexer(value).collect::<Result<Vec<_>, _>>() else {
        return false;
    };

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    // A bare parenthesised group is only meaningful inside a function
    if parser.peek() == Some(Token::Open) {
        return false;
    }
    match parser.parse_term() {
        Some(ValueKind::Length) => parser.at_end(),
        Some(ValueKind::Number) => parser.at_end() && value.parse::<f64>().is_ok_and(|n| n == 0.0),
        None => false,
    }
}

/// Trimmed `value` if it is an accepted length, otherwise an empty string
pub fn sanitize_length(value: &str) -> String {
    if is_valid_length(value) {
        value.trim().to_string()
    } else {
        if !value.trim().is_empty() {
            log::debug!("Discarding invalid CSS length {value:?}");
        }
        String::new()
    }
}

/// Tokens of the length grammar. Any other character is a lexing error.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Function name; the opening parenthesis is part of the token
    #[regex(r"[a-zA-Z-]+\(", |lex| lex.slice().trim_end_matches('('))]
    Function(&'a str),

    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[token(",")]
    Comma,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)")]
    Number,

    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)(px|rem|em|vw|cqi)", ignore(case))]
    Dimension,

    #[regex(r"[ \t\r\n]+")]
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Length,
    Number,
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Skip whitespace, reporting whether any was present
    fn skip_space(&mut self) -> bool {
        let mut skipped = false;
        while self.peek() == Some(Token::Space) {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn at_end(&mut self) -> bool {
        self.skip_space();
        self.peek().is_none()
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`]
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Option<ValueKind>,
    ) -> Option<ValueKind> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let kind = parse(self);
        self.depth -= 1;
        kind
    }

    /// Parse arguments up to the closing parenthesis of function `name`
    fn parse_function(&mut self, name: &str) -> Option<ValueKind> {
        let mut arg_count = 0;
        loop {
            self.skip_space();
            if self.parse_sum()? != ValueKind::Length {
                return None;
            }
            arg_count += 1;
            self.skip_space();
            match self.next()? {
                Token::Comma => continue,
                Token::Close => break,
                _ => return None,
            }
        }

        let arity_ok = match name.to_ascii_lowercase().as_str() {
            "clamp" => arg_count == 3,
            "calc" => arg_count == 1,
            "min" | "max" => arg_count >= 1,
            _ => false,
        };
        arity_ok.then_some(ValueKind::Length)
    }

    fn parse_sum(&mut self) -> Option<ValueKind> {
        let kind = self.parse_product()?;
        loop {
            let save = self.pos;
            let spaced = self.skip_space();
            match self.peek() {
                Some(Token::Plus | Token::Minus) if spaced => {
                    self.pos += 1;
                    if !self.skip_space() {
                        return None;
                    }
                    if self.parse_product()? != kind {
                        return None;
                    }
                }
                Some(Token::Plus | Token::Minus) => return None,
                _ => {
                    self.pos = save;
                    return Some(kind);
                }
            }
        }
    }

    fn parse_product(&mut self) -> Option<ValueKind> {
        let mut kind = self.parse_term()?;
        loop {
            let save = self.pos;
            self.skip_space();
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    self.skip_space();
                    kind = match (kind, self.parse_term()?) {
                        (ValueKind::Length, ValueKind::Number)
                        | (ValueKind::Number, ValueKind::Length) => ValueKind::Length,
                        (ValueKind::Number, ValueKind::Number) => ValueKind::Number,
                        (ValueKind::Length, ValueKind::Length) => return None,
                    };
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    self.skip_space();
                    if self.parse_term()? != ValueKind::Number {
                        return None;
                    }
                }
                _ => {
                    self.pos = save;
                    return Some(kind);
                }
            }
        }
    }

    fn parse_term(&mut self) -> Option<ValueKind> {
        match self.next()? {
            Token::Function(name) => self.nested(|parser| parser.parse_function(name)),
            Token::Open => self.nested(|parser| {
                parser.skip_space();
                let kind = parser.parse_sum()?;
                parser.skip_space();
                (parser.next()? == Token::Close).then_some(kind)
            }),
            // A sign binds only to a number written directly after it
            Token::Plus | Token::Minus => match self.next()? {
                Token::Dimension => Some(ValueKind::Length),
                Token::Number => Some(ValueKind::Number),
                _ => None,
            },
            Token::Dimension => Some(ValueKind::Length),
            Token::Number => Some(ValueKind::Number),
            _ => None,
        }
    }
}
