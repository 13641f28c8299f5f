//! Calc parser
//!
//! Recursive descent over the token stream.
//!
//! ```text
//! line       := IDENT '=' expr | expr
//! expr       := additive (cmp_op additive)?
//! additive   := term (('+' | '-') term)*
//! term       := unary (('*' | '/' | '%') unary)*
//! unary      := '-' unary | postfix
//! postfix    := primary ('(' args? ')')*
//! primary    := INT | FLOAT | STRING | IDENT | '(' expr ')' | '[' args? ']'
//! ```
//!
//! Trees deeper than [`MAX_DEPTH`] are rejected while parsing, which also
//! bounds the recursion of evaluation.

use crate::engine::EvalError;

use super::lexer::{Token, TokenKind};

/// Deepest expression tree the parser will build
pub const MAX_DEPTH: usize = 256;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Var(String),
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
}

/// A parsed line
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(String, Expr),
    Expr(Expr),
}

/// Parse a full line
pub fn parse(tokens: &[Token]) -> Result<Stmt, EvalError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let stmt = parser.statement()?;
    if let Some(tok) = parser.peek() {
        return Err(EvalError::syntax(
            format!("unexpected token {:?}", tok.kind),
            tok.column,
        ));
    }
    Ok(stmt)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Nesting of the tree under construction
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn end_column(&self) -> usize {
        self.tokens.last().map(|t| t.column + 1).unwrap_or(1)
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let column = self.peek().map(|t| t.column).unwrap_or_else(|| self.end_column());
            return Err(EvalError::syntax("expression nested too deeply", column));
        }
        Ok(())
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        what: &str,
    ) -> Result<(), EvalError> {
        match self.advance() {
            Some(tok) if tok.kind == kind => Ok(()),
            Some(tok) => Err(EvalError::syntax(format!("expected {}", what), tok.column)),
            None => Err(EvalError::syntax(format!("expected {}", what), self.end_column())),
        }
    }

    fn statement(&mut self) -> Result<Stmt, EvalError> {
        if let (Some(TokenKind::Ident(name)), Some(TokenKind::Assign)) = (
            self.tokens.first().map(|t| &t.kind),
            self.tokens.get(1).map(|t| &t.kind),
        ) {
            self.pos = 2;
            let value = self.expr()?;
            return Ok(Stmt::Assign(name.clone(), value));
        }
        Ok(Stmt::Expr(self.expr()?))
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        self.descend()?;
        let left = self.additive()?;
        let op = match self.peek_kind() {
            Some(TokenKind::Eq) => BinOp::Eq,
            Some(TokenKind::Ne) => BinOp::Ne,
            Some(TokenKind::Lt) => BinOp::Lt,
            Some(TokenKind::Le) => BinOp::Le,
            Some(TokenKind::Gt) => BinOp::Gt,
            Some(TokenKind::Ge) => BinOp::Ge,
            _ => {
                self.depth -= 1;
                return Ok(left);
            }
        };
        self.pos += 1;
        let right = self.additive()?;
        self.depth -= 1;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    fn additive(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        let mut levels = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => {
                    self.depth -= levels;
                    return Ok(left);
                }
            };
            // each operator adds a level to the left-leaning tree
            self.descend()?;
            levels += 1;
            self.pos += 1;
            let right = self.term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.unary()?;
        let mut levels = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                Some(TokenKind::Percent) => BinOp::Rem,
                _ => {
                    self.depth -= levels;
                    return Ok(left);
                }
            };
            self.descend()?;
            levels += 1;
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        if let Some(TokenKind::Minus) = self.peek_kind() {
            self.pos += 1;
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, EvalError> {
        let mut expr = self.primary()?;
        let mut levels = 0;
        while let Some(TokenKind::LParen) = self.peek_kind() {
            self.descend()?;
            levels += 1;
            self.pos += 1;
            let args = self.args(TokenKind::RParen, "')'")?;
            expr = Expr::Call(Box::new(expr), args);
        }
        self.depth -= levels;
        Ok(expr)
    }

    fn args(
        &mut self,
        close: TokenKind,
        what: &str,
    ) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.peek_kind() == Some(&close) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.peek_kind() {
                Some(TokenKind::Comma) => self.pos += 1,
                _ => break,
            }
        }
        self.expect(close, what)?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let end = self.end_column();
        let tok = self
            .advance()
            .ok_or_else(|| EvalError::syntax("unexpected end of input", end))?;
        match &tok.kind {
            TokenKind::Int(i) => Ok(Expr::Int(*i)),
            TokenKind::Float(f) => Ok(Expr::Float(*f)),
            TokenKind::Str(s) => Ok(Expr::Str(s.clone())),
            TokenKind::Ident(name) => Ok(Expr::Var(name.clone())),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => Ok(Expr::List(self.args(TokenKind::RBracket, "']'")?)),
            other => Err(EvalError::syntax(
                format!("unexpected token {:?}", other),
                tok.column,
            )),
        }
    }
}
