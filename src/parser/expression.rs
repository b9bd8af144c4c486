//! Evaluator for the inside of `str(...)`: numbers joined by `+` are summed,
//! anything else joined by `+` is concatenated.

use crate::parser::literal::render_float;

use logos::Logos;
use thiserror::Error;

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    pub value: f64,
    pub integral: bool,
}

impl Number {
    fn render(self) -> String {
        if self.integral && self.value.fract() == 0.0 {
            format!("{}", self.value)
        } else {
            render_float(self.value)
        }
    }
}

fn number(lex: &mut logos::Lexer<Piece>) -> Option<Number> {
    let slice = lex.slice();
    let value = slice.parse::<f64>().ok()?;
    Some(Number {
        value,
        integral: !slice.contains('.'),
    })
}

fn unquote(lex: &mut logos::Lexer<Piece>) -> String {
    let s = lex.slice();
    s[1..s.len() - 1].to_string()
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Piece {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+", number, priority = 3)]
    Number(Number),

    #[regex(r#""[^"]*""#, unquote)]
    #[regex(r"'[^']*'", unquote)]
    Quoted(String),

    #[regex(r#"[^ \t+\-"'0-9.][^ \t+"']*"#)]
    Word,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FoldError {
    #[error("missing operand at offset {0}")]
    MissingOperand(usize),

    #[error("unexpected `{text}` at offset {offset}")]
    Unexpected { text: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Number(Number),
    Text(String),
}

/// Folds `expr`, the text between the parentheses of one `str(...)`.
///
/// `str(1 + 2 + 3)` is `6`, `str(1.5 + 1)` is `2.5`, `str("a" + 1)` is `a1`.
/// A sum renders as an integer only when every operand was written as one.
pub fn fold(expr: &str) -> Result<String, FoldError> {
    let operands = operands(expr)?;

    let numbers: Option<Vec<Number>> = operands
        .iter()
        .map(|operand| match operand {
            Operand::Number(n) => Some(*n),
            Operand::Text(_) => None,
        })
        .collect();

    if let Some(numbers) = numbers {
        let sum = Number {
            value: numbers.iter().map(|n| n.value).sum(),
            integral: numbers.iter().all(|n| n.integral),
        };
        return Ok(sum.render());
    }

    Ok(operands
        .into_iter()
        .map(|operand| match operand {
            Operand::Number(n) => n.render(),
            Operand::Text(s) => s,
        })
        .collect())
}

fn operands(expr: &str) -> Result<Vec<Operand>, FoldError> {
    let mut operands = vec![];
    let mut current: Vec<(Piece, Range<usize>)> = vec![];
    let mut lexer = Piece::lexer(expr).spanned();

    while let Some((piece, span)) = lexer.next() {
        let Ok(piece) = piece else {
            return Err(FoldError::Unexpected {
                text: expr[span.clone()].to_string(),
                offset: span.start,
            });
        };
        if piece == Piece::Plus {
            operands.push(operand(expr, &current, span.start)?);
            current.clear();
        } else {
            current.push((piece, span));
        }
    }

    operands.push(operand(expr, &current, expr.len())?);
    Ok(operands)
}

fn operand(expr: &str, pieces: &[(Piece, Range<usize>)], at: usize) -> Result<Operand, FoldError> {
    match pieces {
        [] => Err(FoldError::MissingOperand(at)),
        [(Piece::Number(n), _)] => Ok(Operand::Number(*n)),
        [(Piece::Minus, _), (Piece::Number(n), _)] => Ok(Operand::Number(Number {
            value: -n.value,
            integral: n.integral,
        })),
        [(Piece::Quoted(s), _)] => Ok(Operand::Text(s.clone())),
        [(_, first), .., (_, last)] => Ok(Operand::Text(expr[first.start..last.end].to_string())),
        [(_, only)] => Ok(Operand::Text(expr[only.clone()].to_string())),
    }
}
