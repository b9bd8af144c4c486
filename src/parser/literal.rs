use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// The resolved value of a `VARIABLEVALUE(...)` token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    /// Text that is none of the above, kept verbatim. Usually the name of
    /// another binding, or an expression folded later through `str(...)`.
    Reference(String),
}

impl Literal {
    /// Quoted text first, then anything with a decimal point that parses as
    /// a float, then integers. Whatever is left is a reference.
    pub fn classify(raw: &str) -> Literal {
        let raw = raw.trim();

        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Literal::String(raw[1..raw.len() - 1].to_string());
        }

        if raw.contains('.') {
            return match raw.parse::<f64>() {
                Ok(f) => Literal::Float(f),
                Err(_) => Literal::Reference(raw.to_string()),
            };
        }

        match raw.parse::<i64>() {
            Ok(i) => Literal::Integer(i),
            Err(_) => Literal::Reference(raw.to_string()),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", render_float(*x)),
            Literal::String(s) | Literal::Reference(s) => write!(f, "{}", s),
        }
    }
}

/// Shortest round-trip form, but integral values keep one fractional digit
/// so `3.0` stays distinguishable from `3`. Magnitudes outside
/// `1e-5..1e16` switch to scientific notation (`1.5e300`).
pub fn render_float(x: f64) -> String {
    let magnitude = x.abs();
    if !x.is_finite() {
        format!("{}", x)
    } else if x != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{:e}", x)
    } else if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

/// Name to value, last write wins. Lives for exactly one compilation.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    entries: HashMap<String, Literal>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts `name`. A reference to an already bound name captures that
    /// binding's current value, so later rebinding does not leak through.
    pub fn bind(&mut self, name: impl Into<String>, literal: Literal) {
        let literal = match literal {
            Literal::Reference(target) => match self.entries.get(&target) {
                Some(value) => value.clone(),
                None => Literal::Reference(target),
            },
            other => other,
        };
        self.entries.insert(name.into(), literal);
    }

    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.entries.get(name)
    }

    pub fn render(&self, name: &str) -> Option<String> {
        self.get(name).map(Literal::to_string)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
