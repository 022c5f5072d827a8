//! Recursive-descent parser over the condition grammar:
//!
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr ("or" and_expr)*
//! and_expr   := not_expr ("and" not_expr)*
//! not_expr   := "not" not_expr | comparison
//! comparison := primary (cmp_op primary)?
//! primary    := "(" expr ")" | number | string | qualified_or_call
//! qualified  := ident ("." ident)*  ["(" args ")"]
//! args       := (expr ("," expr)*)?
//! ```

use super::ast::Expr;
use super::context::Qualifier;
use super::lexer::Lexer;
use super::token::Token;

pub(super) struct ParseOutcome {
    pub expr: Expr,
    pub warnings: Vec<String>,
}

pub(super) fn parse(source: &str) -> Result<ParseOutcome, String> {
    let (tokens, mut warnings) = Lexer::new(source).tokenize();
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    warnings.extend(parser.warnings);
    Ok(ParseOutcome { expr, warnings })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_eof(&self) -> Result<(), String> {
        if matches!(self.peek(), Token::Eof) {
            Ok(())
        } else {
            Err(format!("unexpected trailing token {:?}", self.peek()))
        }
    }

    fn keyword_ahead(&self, word: &str) -> bool {
        matches!(self.peek(), Token::Ident(id) if id.eq_ignore_ascii_case(word))
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut terms = vec![self.parse_and()?];
        while self.keyword_ahead("or") {
            self.bump();
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 { terms.pop().unwrap() } else { Expr::Or(terms) })
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut terms = vec![self.parse_not()?];
        while self.keyword_ahead("and") {
            self.bump();
            terms.push(self.parse_not()?);
        }
        Ok(if terms.len() == 1 { terms.pop().unwrap() } else { Expr::And(terms) })
    }

    fn parse_not(&mut self) -> Result<Expr, String> {
        if self.keyword_ahead("not") {
            self.bump();
            return Ok(Expr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, String> {
        let lhs = self.parse_primary()?;
        if let Token::Op(op) = self.peek().clone() {
            self.bump();
            let rhs = self.parse_primary()?;
            return Ok(Expr::Compare(op, Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.peek().clone() {
            Token::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Number(n) => {
                self.bump();
                Ok(Expr::Number(n))
            }
            Token::Str(s) => {
                self.bump();
                Ok(Expr::Str(s))
            }
            Token::Ident(_) => self.parse_qualified_or_call(),
            other => Err(format!("unexpected token {other:?}")),
        }
    }

    fn parse_qualified_or_call(&mut self) -> Result<Expr, String> {
        let mut segments = vec![self.expect_ident()?];
        while matches!(self.peek(), Token::Dot) {
            self.bump();
            segments.push(self.expect_ident()?);
        }

        let qualifier = if segments.len() >= 2 && segments[0].eq_ignore_ascii_case("context") {
            let q = match segments[1].as_str() {
                s if s.eq_ignore_ascii_case("source") => Some(Qualifier::Source),
                s if s.eq_ignore_ascii_case("target") => Some(Qualifier::Target),
                _ => None,
            };
            if q.is_some() {
                segments.drain(0..2);
            }
            q
        } else {
            None
        };

        if matches!(self.peek(), Token::LParen) {
            self.bump();
            let args = self.parse_args()?;
            self.expect(Token::RParen)?;
            Ok(Expr::Call { qualifier, path: segments, args })
        } else {
            Ok(Expr::Ident(segments))
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, String> {
        if matches!(self.peek(), Token::RParen) {
            return Ok(Vec::new());
        }
        let mut args = vec![self.parse_expr()?];
        while matches!(self.peek(), Token::Comma) {
            self.bump();
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    fn expect_ident(&mut self) -> Result<String, String> {
        match self.bump() {
            Token::Ident(s) => Ok(s),
            other => Err(format!("expected identifier, found {other:?}")),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        let tok = self.bump();
        if tok == expected { Ok(()) } else { Err(format!("expected {expected:?}, found {tok:?}")) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_call_chain() {
        let out = parse("IsMeleeAttack() and not HasStatus('RAGING')").unwrap();
        match out.expr {
            Expr::And(terms) => {
                assert_eq!(terms.len(), 2);
                assert!(matches!(terms[0], Expr::Call { ref path, .. } if path == &["IsMeleeAttack"]));
                assert!(matches!(terms[1], Expr::Not(_)));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn parses_qualified_target_call() {
        let out = parse("context.Target.HasStatus('RAGING')").unwrap();
        match out.expr {
            Expr::Call { qualifier, path, .. } => {
                assert_eq!(qualifier, Some(Qualifier::Target));
                assert_eq!(path, vec!["HasStatus".to_string()]);
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn parses_comparison_with_precedence() {
        let out = parse("SpellLevel() >= 3 and HasPassive('Sneak_Attack')").unwrap();
        assert!(matches!(out.expr, Expr::And(_)));
    }

    #[test]
    fn or_binds_looser_than_and() {
        let out = parse("a() or b() and c()").unwrap();
        match out.expr {
            Expr::Or(terms) => {
                assert_eq!(terms.len(), 2);
                assert!(matches!(terms[1], Expr::And(_)));
            }
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(parse("IsMeleeAttack(").is_err());
    }
}
