//! Lexical scanner for the Lox scripting language.

pub mod lang;
pub mod report;
pub mod scanner;

pub use lang::{Literal, Token, TokenType};
pub use report::{ConsoleReporter, Diagnostic, Reporter};
pub use scanner::{scan_tokens, LexicalError, Scanner};
