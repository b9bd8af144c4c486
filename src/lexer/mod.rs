//! Line-oriented tokenizer and the `.sctk` token stream format.

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};

use tracing::{debug, info, warn};

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::ops::Range;
use std::path::Path;


const COMMENT: &str = "//";
const LET: &str = "let ";
const OUTPUT: &str = "output(";

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    VariableDecl(String),
    VariableValue(String),
    Output(String),
    BlankLine,
    EndOfFile,
}

/// One line per token, the format the binder reads back.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::VariableDecl(name) => write!(f, "VARIABLE({})", name),
            Token::VariableValue(value) => write!(f, "VARIABLEVALUE({})", value),
            Token::Output(text) => write!(f, "OUTPUT({})", text),
            Token::BlankLine => Ok(()),
            Token::EndOfFile => write!(f, "EOF"),
        }
    }
}

pub type SpannedToken = (Token, Range<usize>);

#[derive(Debug, Default)]
pub struct Lexed {
    pub tokens: Vec<SpannedToken>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lexed {
    pub fn kinds(&self) -> Vec<Token> {
        self.tokens.iter().map(|(token, _)| token.clone()).collect()
    }
}

/// Classifies every line of `source`. Never fails: lines that match no
/// statement form are reported and skipped.
pub fn tokenize(source: &str) -> Lexed {
    let mut lexed = Lexed::default();
    let mut offset = 0;

    for raw in source.split_inclusive('\n') {
        let body = raw.trim_end_matches(['\n', '\r']);
        let span = offset..offset + body.len();
        offset += raw.len();

        let line = body.trim();
        if line.starts_with(COMMENT) {
            continue;
        }

        if line.is_empty() {
            lexed.tokens.push((Token::BlankLine, span));
            continue;
        }

        if let Some(assignment) = line.strip_prefix(LET) {
            match assignment.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    lexed
                        .tokens
                        .push((Token::VariableDecl(name.trim().to_string()), span.clone()));
                    lexed
                        .tokens
                        .push((Token::VariableValue(value.trim().to_string()), span));
                }
                _ => unclassified(&mut lexed, line, span, "expected `let <name> = <value>`"),
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(OUTPUT) {
            if let Some(text) = rest.strip_suffix(')') {
                lexed.tokens.push((Token::Output(text.to_string()), span));
                continue;
            }
        }

        unclassified(&mut lexed, line, span, "not a comment, declaration or output");
    }

    lexed.tokens.push((Token::EndOfFile, offset..offset));
    lexed
}

fn unclassified(lexed: &mut Lexed, line: &str, span: Range<usize>, why: &str) {
    warn!(line, "skipping unclassified line");
    lexed.diagnostics.push(Diagnostic::error(
        "E-LINE",
        format!("unclassified line: {}", why),
        span,
    ));
}

pub fn write_token_stream<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.to_string());
        out.push('\n');
    }
    out
}

/// Why a token stream could not be read back. `line` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamError {
    pub line: usize,
    pub reason: String,
}

impl StreamError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        StreamError {
            line,
            reason: reason.into(),
        }
    }

    pub fn into_error(self, path: &Path) -> Error {
        Error::TokenStream {
            path: path.to_path_buf(),
            line: self.line,
            reason: self.reason,
        }
    }
}

/// Parses a `.sctk` artifact. Spans index into `text`. Everything after the
/// `EOF` line is ignored.
pub fn read_token_stream(text: &str) -> std::result::Result<Vec<SpannedToken>, StreamError> {
    let mut tokens: Vec<SpannedToken> = vec![];
    let mut offset = 0;
    let mut line_no = 0;

    for raw in text.split_inclusive('\n') {
        line_no += 1;
        let line = raw.trim_end_matches(['\n', '\r']);
        let span = offset..offset + line.len();
        offset += raw.len();

        if let Some((Token::VariableDecl(name), _)) = tokens.last() {
            if !line.starts_with("VARIABLEVALUE(") {
                return Err(StreamError::new(
                    line_no,
                    format!("declaration of `{}` is not followed by its value", name),
                ));
            }
        }

        let token = if line == "EOF" {
            tokens.push((Token::EndOfFile, span));
            return Ok(tokens);
        } else if line.is_empty() {
            Token::BlankLine
        } else if let Some(value) = payload(line, "VARIABLEVALUE(") {
            Token::VariableValue(value.to_string())
        } else if let Some(name) = payload(line, "VARIABLE(") {
            Token::VariableDecl(name.to_string())
        } else if let Some(text) = payload(line, "OUTPUT(") {
            Token::Output(text.to_string())
        } else {
            return Err(StreamError::new(line_no, format!("unknown token `{}`", line)));
        };
        tokens.push((token, span));
    }

    Err(StreamError::new(
        line_no + 1,
        "token stream ended before EOF",
    ))
}

fn payload<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix(')')
}

/// Tokenizer stage: `source_path` to `token_path`. Returns the source text
/// along with the result so callers can render diagnostics against it.
pub fn lex_file(source_path: &Path, token_path: &Path) -> Result<(String, Lexed)> {
    let source = fs::read_to_string(source_path).map_err(|e| Error::io(source_path, e))?;
    let lexed = tokenize(&source);

    let stream = write_token_stream(lexed.tokens.iter().map(|(token, _)| token));
    debug!(path = %token_path.display(), bytes = stream.len(), "writing token stream");
    fs::write(token_path, stream).map_err(|e| Error::io(token_path, e))?;

    info!(
        tokens = lexed.tokens.len(),
        diagnostics = lexed.diagnostics.len(),
        "tokenized {}",
        source_path.display()
    );
    Ok((source, lexed))
}
