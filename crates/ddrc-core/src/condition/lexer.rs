//! Tokenizer for condition expressions, e.g.
//! `IsMeleeAttack() and not HasStatus('RAGING')`.

use super::token::Token;
use super::value::CompareOp;

pub(super) struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    source: &'a str,
    pub(super) warnings: Vec<String>,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Self { chars: source.char_indices().peekable(), source, warnings: Vec::new() }
    }

    pub(super) fn tokenize(mut self) -> (Vec<Token>, Vec<String>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        (tokens, self.warnings)
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let Some(&(idx, c)) = self.chars.peek() else {
            return Token::Eof;
        };

        match c {
            '(' => {
                self.chars.next();
                Token::LParen
            }
            ')' => {
                self.chars.next();
                Token::RParen
            }
            ',' => {
                self.chars.next();
                Token::Comma
            }
            '.' => {
                self.chars.next();
                Token::Dot
            }
            '\'' | '"' => self.read_string(c),
            '=' => {
                self.chars.next();
                if self.eat('=') {
                    Token::Op(CompareOp::Eq)
                } else {
                    Token::Op(CompareOp::Eq)
                }
            }
            '!' => {
                self.chars.next();
                if self.eat('=') {
                    Token::Op(CompareOp::Ne)
                } else {
                    self.warnings.push(format!("unexpected '!' at byte {idx}"));
                    self.next_token()
                }
            }
            '<' => {
                self.chars.next();
                if self.eat('=') { Token::Op(CompareOp::Le) } else { Token::Op(CompareOp::Lt) }
            }
            '>' => {
                self.chars.next();
                if self.eat('=') { Token::Op(CompareOp::Ge) } else { Token::Op(CompareOp::Gt) }
            }
            c if c.is_ascii_digit() => self.read_number(),
            c if c == '-' && self.peek_is_digit_after_minus() => self.read_number(),
            c if is_ident_start(c) => self.read_ident(),
            _ => {
                self.chars.next();
                self.warnings.push(format!("unrecognized character '{c}' at byte {idx}"));
                self.next_token()
            }
        }
    }

    fn peek_is_digit_after_minus(&mut self) -> bool {
        let mut clone = self.chars.clone();
        clone.next();
        matches!(clone.peek(), Some((_, d)) if d.is_ascii_digit())
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some(&(_, c)) if c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn read_string(&mut self, quote: char) -> Token {
        self.chars.next();
        let mut out = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            self.chars.next();
            if c == quote {
                return Token::Str(out);
            }
            out.push(c);
        }
        self.warnings.push("unterminated string literal".to_string());
        Token::Str(out)
    }

    fn read_number(&mut self) -> Token {
        let start = self.chars.peek().unwrap().0;
        if matches!(self.chars.peek(), Some((_, '-'))) {
            self.chars.next();
        }
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.source[start..end];
        match text.parse::<f64>() {
            Ok(n) => Token::Number(n),
            Err(_) => {
                self.warnings.push(format!("malformed number literal '{text}'"));
                Token::Number(0.0)
            }
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.chars.peek().unwrap().0;
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if is_ident_continue(c) {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        Token::Ident(self.source[start..end].to_string())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
