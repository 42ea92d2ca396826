//! Arithmetic expression parser
//!
//! A recursive descent parser for the text a formula body reduces to once
//! every range function and cell reference has been substituted away: numeric
//! literals combined with `+ - * /` and parentheses. It evaluates directly to
//! an `f64` instead of building a tree; non-finite results are mapped to
//! error sentinels by the caller.

use crate::error::{FormulaError, FormulaResult};

/// Evaluate a fully substituted formula body as plain arithmetic.
///
/// Empty (or whitespace-only) input is not a syntax error: it evaluates to
/// NaN, the same non-value a dangling reference leaves behind.
///
/// # Example
/// ```rust
/// use gridcalc_formula::evaluate_expression;
///
/// assert_eq!(evaluate_expression("2+3*4").unwrap(), 14.0);
/// assert_eq!(evaluate_expression("(2+3)*4").unwrap(), 20.0);
/// assert!(evaluate_expression("2+*4").is_err());
/// ```
pub fn evaluate_expression(input: &str) -> FormulaResult<f64> {
    let mut parser = ExprParser::new(input)?;

    if parser.current == Token::Eof {
        return Ok(f64::NAN);
    }

    let value = parser.parse_additive()?;

    // Make sure we consumed all input
    if parser.current != Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected trailing input: '{}'",
            &input[parser.pos..]
        )));
    }

    Ok(value)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Expression parser
struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    current: Token,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current: Token::Eof,
        };
        parser.current = parser.scan_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        match c {
            '+' => {
                self.advance();
                return Ok(Token::Plus);
            }
            '-' => {
                self.advance();
                return Ok(Token::Minus);
            }
            '*' => {
                self.advance();
                return Ok(Token::Star);
            }
            '/' => {
                self.advance();
                return Ok(Token::Slash);
            }
            '(' => {
                self.advance();
                return Ok(Token::LeftParen);
            }
            ')' => {
                self.advance();
                return Ok(Token::RightParen);
            }
            _ => {}
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Residual error sentinel
        if c == '#' {
            return self.scan_ref_error();
        }

        // Non-finite substituted values print as lowercase words
        if c.is_ascii_lowercase() {
            return self.scan_word();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' in expression",
            c
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part, only when digits actually follow the marker;
        // otherwise the letter is left for the next token and rejected there.
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let mut offset = 1;
            if self.peek_char_at(offset).map_or(false, |c| c == '+' || c == '-') {
                offset += 1;
            }
            if self.peek_char_at(offset).map_or(false, |c| c.is_ascii_digit()) {
                for _ in 0..offset {
                    self.advance();
                }
                while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let num_str = &self.input[start..self.pos];
        let num: f64 = num_str
            .parse()
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", num_str)))?;
        Ok(Token::Number(num))
    }

    /// A `#REF!` left behind by reference rewriting reads as NaN, poisoning
    /// whatever arithmetic surrounds it. Any other `#` text is a syntax
    /// error.
    fn scan_ref_error(&mut self) -> FormulaResult<Token> {
        if self.input[self.pos..].starts_with("#REF!") {
            for _ in 0.."#REF!".len() {
                self.advance();
            }
            return Ok(Token::Number(f64::NAN));
        }

        Err(FormulaError::Parse(
            "Unrecognized '#' token in expression".into(),
        ))
    }

    /// Overflowed aggregates substitute as the text `inf`; read it back as
    /// the infinity it stands for so the sentinel mapping can see it.
    fn scan_word(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_lowercase()) {
            self.advance();
        }

        let word = &self.input[start..self.pos];
        if word == "inf" {
            return Ok(Token::Number(f64::INFINITY));
        }

        Err(FormulaError::Parse(format!(
            "Unexpected word '{}' in expression",
            word
        )))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let next = self.scan_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if &self.current == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected, self.current
            )))
        }
    }

    // === Expression parsing with precedence ===

    fn parse_additive(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_multiplicative()?;

        loop {
            match self.current {
                Token::Plus => {
                    self.consume()?;
                    left += self.parse_multiplicative()?;
                }
                Token::Minus => {
                    self.consume()?;
                    left -= self.parse_multiplicative()?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_unary()?;

        loop {
            match self.current {
                Token::Star => {
                    self.consume()?;
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume()?;
                    // IEEE division: x/0 is an infinity, 0/0 is NaN
                    left /= self.parse_unary()?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<f64> {
        // Prefix unary minus
        if matches!(self.current, Token::Minus) {
            self.consume()?;
            return Ok(-self.parse_unary()?);
        }

        // Prefix plus (no-op)
        if matches!(self.current, Token::Plus) {
            self.consume()?;
            return self.parse_unary();
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> FormulaResult<f64> {
        match self.consume()? {
            Token::Number(n) => Ok(n),
            Token::LeftParen => {
                let value = self.parse_additive()?;
                self.expect(&Token::RightParen)?;
                Ok(value)
            }
            token => Err(FormulaError::Parse(format!(
                "Expected a number or '(', got {:?}",
                token
            ))),
        }
    }
}
