use std::io::{self, Stderr, Write};

/// Receives lexical errors as the scanner finds them. The scanner never
/// inspects what the sink does with a report.
pub trait Reporter {
    fn report(&mut self, line: usize, place: &str, message: &str);

    fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message)
    }
}

/// Prints every report and remembers that something went wrong.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write = Stderr> {
    out: W,
    pub had_error: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            had_error: false,
        }
    }

    pub fn reset(&mut self) {
        self.had_error = false;
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, line: usize, place: &str, message: &str) {
        self.had_error = true;
        let _ = writeln!(self.out, "[line {line}] Error{place}: {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub place: String,
    pub message: String,
}

/// Recording sink, keeps reports in the order they arrived.
impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, line: usize, place: &str, message: &str) {
        self.push(Diagnostic {
            line,
            place: place.to_owned(),
            message: message.to_owned(),
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn error_has_no_place() {
        let mut diagnostics: Vec<Diagnostic> = vec![];
        diagnostics.error(4, "boom");
        diagnostics.report(5, " at 'x'", "bad");
        assert_eq!(
            vec![
                Diagnostic {
                    line: 4,
                    place: "".to_owned(),
                    message: "boom".to_owned(),
                },
                Diagnostic {
                    line: 5,
                    place: " at 'x'".to_owned(),
                    message: "bad".to_owned(),
                },
            ],
            diagnostics
        );
    }

    #[test]
    pub fn console_remembers_errors() {
        let mut console = ConsoleReporter::with_writer(Vec::<u8>::new());
        assert!(!console.had_error);
        console.error(1, "Unexpected character '@'.");
        assert!(console.had_error);
        console.reset();
        assert!(!console.had_error);
        console.report(3, " at end", "Unterminated string.");
        assert_eq!(
            "[line 1] Error: Unexpected character '@'.\n[line 3] Error at end: Unterminated string.\n",
            String::from_utf8(console.into_inner()).unwrap()
        );
    }
}
