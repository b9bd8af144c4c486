//! Binder/folder: token stream plus binding table to the single IR line.

pub mod expression;
pub mod literal;

#[cfg(test)]
pub mod test;

pub use expression::{FoldError, fold};
pub use literal::{BindingTable, Literal};

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::ir::OutputDirective;
use crate::lexer::{SpannedToken, StreamError, Token, read_token_stream};

use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern"));

static STR_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstr\(([^()]*)\)").expect("str() pattern"));

#[derive(Debug)]
pub struct Bound {
    pub directive: OutputDirective,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Binder<'t> {
    bindings: &'t mut BindingTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Binder<'t> {
    pub fn new(bindings: &'t mut BindingTable) -> Self {
        Binder {
            bindings,
            diagnostics: vec![],
        }
    }

    /// Walks the stream up to `EOF`. The first `OUTPUT` is resolved against
    /// the bindings seen so far; later ones are reported and ignored.
    ///
    /// Errors use the token index plus one as the line, which is the line
    /// number in a `.sctk` file.
    pub fn bind(mut self, tokens: &[SpannedToken]) -> std::result::Result<Bound, StreamError> {
        let mut directive: Option<OutputDirective> = None;
        let mut iter = tokens.iter().enumerate();

        while let Some((index, (token, span))) = iter.next() {
            match token {
                Token::VariableDecl(name) => {
                    let Some((_, (Token::VariableValue(value), _))) = iter.next() else {
                        return Err(StreamError {
                            line: index + 2,
                            reason: format!("declaration of `{}` is not followed by its value", name),
                        });
                    };
                    let literal = Literal::classify(value);
                    debug!(name, ?literal, "bind");
                    self.bindings.bind(name.clone(), literal);
                }
                Token::Output(text) if directive.is_none() => {
                    directive = Some(OutputDirective::new(self.resolve(text, span)));
                }
                Token::Output(_) => {
                    self.warn(Diagnostic::warning(
                        "W-OUTPUT",
                        "only one output statement is supported; this one is ignored",
                        span.clone(),
                    ));
                }
                Token::EndOfFile => {
                    let directive = directive.unwrap_or_else(|| {
                        self.warn(Diagnostic::warning(
                            "W-NO-OUTPUT",
                            "no output statement; the program prints an empty line",
                            span.clone(),
                        ));
                        OutputDirective::default()
                    });
                    return Ok(Bound {
                        directive,
                        diagnostics: self.diagnostics,
                    });
                }
                Token::VariableValue(_) | Token::BlankLine => {}
            }
        }

        Err(StreamError {
            line: tokens.len() + 1,
            reason: "token stream ended before EOF".to_string(),
        })
    }

    fn warn(&mut self, diagnostic: Diagnostic) {
        warn!(code = diagnostic.code, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// Substitution, then folding, then dropping concatenation operators.
    pub fn resolve(&mut self, text: &str, span: &Range<usize>) -> String {
        let substituted = substitute(text, &*self.bindings);
        let folded = self.fold_calls(substituted, span);
        strip_concatenation(&folded)
    }

    fn fold_calls(&mut self, mut text: String, span: &Range<usize>) -> String {
        // Innermost calls first; every pass removes one pair of parentheses.
        loop {
            let Some((range, inner)) = STR_CALL
                .captures(&text)
                .and_then(|call| Some((call.get(0)?.range(), call.get(1)?.as_str().to_string())))
            else {
                return text;
            };
            let replacement = match fold(&inner) {
                Ok(value) => value,
                Err(err) => {
                    self.warn(Diagnostic::error(
                        "E-FOLD",
                        format!("cannot evaluate `str({})`: {}", inner, err),
                        span.clone(),
                    ));
                    inner
                }
            };
            text.replace_range(range, &replacement);
        }
    }
}

/// Replaces every `${name}` that has a binding. Unknown names stay as written.
pub fn substitute(text: &str, bindings: &BindingTable) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            bindings
                .render(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Removes `+` operators left over after folding. A `+` survives only when
/// the characters directly beside it are both digits (`1+2`), and `+` inside
/// double quotes is untouched. Whitespace around a removed `+` goes with it.
pub fn strip_concatenation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            quoted = !quoted;
        }
        if c != '+' || quoted {
            out.push(c);
            i += 1;
            continue;
        }

        let before = i.checked_sub(1).map(|prev| chars[prev]);
        let after = chars.get(i + 1).copied();
        if before.is_some_and(|c| c.is_ascii_digit()) && after.is_some_and(|c| c.is_ascii_digit()) {
            out.push(c);
            i += 1;
            continue;
        }

        out.truncate(out.trim_end().len());
        i += 1;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
    }
    out
}

/// Binder stage: `token_path` to `ir_path`. Returns the token stream text
/// so diagnostics can be rendered against it.
pub fn parse_file(token_path: &Path, ir_path: &Path) -> Result<(String, Bound)> {
    let stream = fs::read_to_string(token_path).map_err(|e| Error::io(token_path, e))?;
    let tokens = read_token_stream(&stream).map_err(|e| e.into_error(token_path))?;

    let mut bindings = BindingTable::new();
    let bound = Binder::new(&mut bindings)
        .bind(&tokens)
        .map_err(|e| e.into_error(token_path))?;

    debug!(path = %ir_path.display(), "writing ir");
    fs::write(ir_path, format!("{}\n", bound.directive)).map_err(|e| Error::io(ir_path, e))?;

    info!(
        bindings = bindings.len(),
        diagnostics = bound.diagnostics.len(),
        "resolved {}",
        token_path.display()
    );
    Ok((stream, bound))
}
