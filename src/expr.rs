//! Safe arithmetic expression evaluation.
//!
//! A hand-written lexer and recursive-descent parser build an explicit AST
//! which is then interpreted directly. Input comes from untrusted chat users,
//! so nothing here can reach any general code-execution facility.
//!
//! Grammar:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := '-' factor | power
//! power  := atom ('^' factor)?         // right-associative
//! atom   := number | '(' expr ')'
//! ```

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    BinOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Parses and evaluates an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, EngineError> {
    let tokens = tokenize(input)?;
    let ast = Parser::new(&tokens, input.len()).parse()?;
    let value = eval(&ast)?;
    if !value.is_finite() {
        return Err(EngineError::Arithmetic(
            "result is not a finite number".to_string(),
        ));
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, EngineError> {
    let mut tokens = Vec::new();
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push((pos, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((pos, Token::Minus));
                i += 1;
            }
            '*' => {
                tokens.push((pos, Token::Star));
                i += 1;
            }
            '/' => {
                tokens.push((pos, Token::Slash));
                i += 1;
            }
            '^' => {
                tokens.push((pos, Token::Caret));
                i += 1;
            }
            '(' => {
                tokens.push((pos, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((pos, Token::RParen));
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                let value = text.parse::<f64>().map_err(|_| {
                    EngineError::parse(pos, format!("invalid number \"{text}\""))
                })?;
                tokens.push((pos, Token::Number(value)));
            }
            other => {
                return Err(EngineError::parse(
                    pos,
                    format!("unexpected character '{other}'"),
                ));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [(usize, Token)],
    pos: usize,
    input_len: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [(usize, Token)], input_len: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            input_len,
        }
    }

    fn parse(mut self) -> Result<Expr, EngineError> {
        if self.tokens.is_empty() {
            return Err(EngineError::parse(0, "empty expression"));
        }
        let expr = self.parse_expr()?;
        match self.peek() {
            None => Ok(expr),
            Some((pos, _)) => Err(EngineError::parse(pos, "unexpected trailing input")),
        }
    }

    fn peek(&self) -> Option<(usize, Token)> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expr(&mut self) -> Result<Expr, EngineError> {
        let mut lhs = self.parse_term()?;
        while let Some((_, token)) = self.peek() {
            let op = match token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, EngineError> {
        let mut lhs = self.parse_factor()?;
        while let Some((_, token)) = self.peek() {
            let op = match token {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Expr::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Expr, EngineError> {
        if let Some((_, Token::Minus)) = self.peek() {
            self.advance();
            let inner = self.parse_factor()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, EngineError> {
        let base = self.parse_atom()?;
        if let Some((_, Token::Caret)) = self.peek() {
            self.advance();
            // Right-associative (2^3^2 == 2^(3^2)), and the exponent is a
            // factor so it may carry a unary minus: 2^-3 == 0.125.
            let exponent = self.parse_factor()?;
            return Ok(Expr::BinOp {
                op: BinOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, EngineError> {
        match self.advance() {
            Some((_, Token::Number(value))) => Ok(Expr::Number(value)),
            Some((pos, Token::LParen)) => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    _ => Err(EngineError::parse(pos, "unbalanced parenthesis")),
                }
            }
            Some((pos, token)) => {
                Err(EngineError::parse(pos, format!("unexpected token {token:?}")))
            }
            None => Err(EngineError::parse(
                self.input_len,
                "unexpected end of expression",
            )),
        }
    }
}

fn eval(expr: &Expr) -> Result<f64, EngineError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Neg(inner) => Ok(-eval(inner)?),
        Expr::BinOp { op, lhs, rhs } => {
            let left = eval(lhs)?;
            let right = eval(rhs)?;
            match op {
                BinOp::Add => Ok(left + right),
                BinOp::Sub => Ok(left - right),
                BinOp::Mul => Ok(left * right),
                BinOp::Div => {
                    if right == 0.0 {
                        Err(EngineError::Arithmetic("division by zero".to_string()))
                    } else {
                        Ok(left / right)
                    }
                }
                BinOp::Pow => Ok(left.powf(right)),
            }
        }
    }
}
