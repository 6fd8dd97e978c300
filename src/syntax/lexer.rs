//! Lexer for query string syntax
//!
//! Tokenizes Lucene-style query strings into a stream of spanned tokens.

use crate::error::{QueryNodeError, Result};
use crate::nodes::Span;

/// Token types for query string parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An unquoted word
    ///
    /// `text` has backslash escapes resolved, `raw` keeps them so wildcard
    /// patterns can tell literal `*`/`?` from metacharacters.
    Term {
        text: String,
        raw: String,
        wildcard: bool,
    },
    /// A quoted string
    QuotedString(String),

    /// AND operator (`AND`, `&&`)
    And,
    /// OR operator (`OR`, `||`)
    Or,
    /// NOT operator (`NOT`, `!`)
    Not,
    /// Colon separator (field:value)
    Colon,

    /// Caret for boosting with optional boost value
    Caret(Option<f32>),

    /// Left square bracket (inclusive range start)
    LeftBracket,
    /// Right square bracket (inclusive range end)
    RightBracket,
    /// Left curly brace (exclusive range start)
    LeftBrace,
    /// Right curly brace (exclusive range end)
    RightBrace,
    /// TO keyword for ranges
    To,

    /// Left parenthesis (grouping)
    LeftParen,
    /// Right parenthesis (grouping)
    RightParen,

    /// Plus sign (required clause)
    Plus,
    /// Minus sign (prohibited clause)
    Minus,

    /// End of input
    Eof,
}

impl Token {
    pub fn term(text: &str) -> Token {
        Token::Term {
            text: text.to_string(),
            raw: text.to_string(),
            wildcard: false,
        }
    }
}

/// A token together with the character offsets it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer for tokenizing query strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_whitespace();
        let start = self.position;
        let token = self.read_token()?;
        Ok(SpannedToken {
            token,
            span: Span::new(start, self.position),
        })
    }

    /// Check if the lexer has reached the end of input
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn read_token(&mut self) -> Result<Token> {
        if self.is_eof() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();
        let single = match ch {
            ':' => Some(Token::Colon),
            '[' => Some(Token::LeftBracket),
            ']' => Some(Token::RightBracket),
            '{' => Some(Token::LeftBrace),
            '}' => Some(Token::RightBrace),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '!' => Some(Token::Not),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match ch {
            '^' => {
                self.advance();
                Ok(Token::Caret(self.read_float()))
            }
            '&' if self.peek() == Some('&') => {
                self.position += 2;
                Ok(Token::And)
            }
            '|' if self.peek() == Some('|') => {
                self.position += 2;
                Ok(Token::Or)
            }
            '"' => {
                self.advance();
                self.read_quoted_string()
            }
            _ if Self::is_term_start(ch) => self.read_term(),
            _ => Err(self.error(format!("Unexpected character '{}'", ch))),
        }
    }

    fn read_term(&mut self) -> Result<Token> {
        let mut text = String::new();
        let mut raw = String::new();
        let mut wildcard = false;
        let mut escaped = false;

        while !self.is_eof() {
            let ch = self.current_char();
            if ch == '\\' {
                self.advance();
                if self.is_eof() {
                    return Err(self.error("Dangling escape character".to_string()));
                }
                let literal = self.current_char();
                text.push(literal);
                raw.push('\\');
                raw.push(literal);
                escaped = true;
                self.advance();
            } else if Self::is_term_char(ch) {
                wildcard |= ch == '*' || ch == '?';
                text.push(ch);
                raw.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if escaped {
            return Ok(Token::Term {
                text,
                raw,
                wildcard,
            });
        }

        // Keywords are only recognised in upper case
        match text.as_str() {
            "AND" => Ok(Token::And),
            "OR" => Ok(Token::Or),
            "NOT" => Ok(Token::Not),
            "TO" => Ok(Token::To),
            _ => Ok(Token::Term {
                text,
                raw,
                wildcard,
            }),
        }
    }

    fn read_quoted_string(&mut self) -> Result<Token> {
        let mut s = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            if ch == '"' {
                self.advance();
                return Ok(Token::QuotedString(s));
            }
            if ch == '\\' {
                self.advance();
                if !self.is_eof() {
                    let escaped = self.current_char();
                    match escaped {
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        'r' => s.push('\r'),
                        _ => s.push(escaped),
                    }
                    self.advance();
                }
            } else {
                s.push(ch);
                self.advance();
            }
        }

        Err(self.error("Unterminated quoted string".to_string()))
    }

    fn read_float(&mut self) -> Option<f32> {
        let mut num_str = String::new();
        let mut has_dot = false;

        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        num_str.parse().ok()
    }

    fn error(&self, message: String) -> QueryNodeError {
        QueryNodeError::Syntax {
            message,
            position: self.position,
        }
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Check if a character can start a term
    fn is_term_start(ch: char) -> bool {
        ch.is_alphanumeric()
            || matches!(ch, '_' | '@' | '#' | '.' | '*' | '?' | '\\' | '/' | '$' | '%')
    }

    /// Check if a character can be part of a term
    fn is_term_char(ch: char) -> bool {
        Self::is_term_start(ch) || matches!(ch, '-' | '+' | '\'' | ',' | '=')
    }
}
