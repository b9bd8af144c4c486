
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use std::io;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A recoverable problem found while lowering one artifact into the next.
///
/// `span` is a byte range into the artifact the stage was reading: the
/// source file for the lexer, the token stream for the binder.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Range<usize>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Range<usize>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Range<usize>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn to_report(&self, file: &str, colored: bool) -> Report<'static, (String, Range<usize>)> {
        let (kind, color) = match self.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };
        Report::build(kind, (file.to_string(), self.span.clone()))
            .with_config(
                Config::default()
                    .with_index_type(IndexType::Byte)
                    .with_color(colored),
            )
            .with_code(self.code)
            .with_message(&self.message)
            .with_label(
                Label::new((file.to_string(), self.span.clone()))
                    .with_message(&self.message)
                    .with_color(color),
            )
            .finish()
    }
}

/// Prints every diagnostic against `source`, which is the text of `file`.
pub fn report(file: &str, source: &str, diagnostics: &[Diagnostic]) -> io::Result<()> {
    let source = Source::from(source.to_string());
    for diagnostic in diagnostics {
        diagnostic
            .to_report(file, true)
            .eprint((file.to_string(), source.clone()))?;
    }
    Ok(())
}

/// Same as [`report`] but into a buffer, without colours.
pub fn render(file: &str, source: &str, diagnostics: &[Diagnostic]) -> io::Result<String> {
    let source = Source::from(source.to_string());
    let mut out = Vec::new();
    for diagnostic in diagnostics {
        let report = diagnostic.to_report(file, false);
        report.write((file.to_string(), source.clone()), &mut out)?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}
