//! The `.scir` artifact: a single `output <text>` line.

use crate::error::{Error, Result};

use std::fmt::{self, Display, Formatter};
use std::path::Path;

#[cfg(test)]
pub mod test;

pub const PREFIX: &str = "output ";

/// The fully resolved text the compiled program prints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputDirective {
    pub text: String,
}

impl OutputDirective {
    pub fn new(text: impl Into<String>) -> Self {
        OutputDirective { text: text.into() }
    }

    /// Reads the directive back from artifact text. Only the first line
    /// counts; its line terminator is not part of the output.
    pub fn parse(ir: &str, path: &Path) -> Result<Self> {
        let line = ir.lines().next().unwrap_or_default();
        match line.strip_prefix(PREFIX) {
            Some(text) => Ok(OutputDirective::new(text)),
            None => Err(Error::MalformedIr {
                path: path.to_path_buf(),
                line: line.to_string(),
            }),
        }
    }
}

impl Display for OutputDirective {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.text)
    }
}
