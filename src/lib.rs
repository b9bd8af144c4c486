pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;

pub use error::{Error, Result};
