use clap::error::ErrorKind;
use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use lox_lexer::{scan_tokens, ConsoleReporter};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

// sysexits.h
const EX_OK: u8 = 0;
const EX_DATAERR: u8 = 65;
const EX_IOERR: u8 = 74;

/// Print the tokens of a Lox script
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    script: Option<PathBuf>,

    #[arg(value_enum, short, long, default_value_t = Mode::Tokenize)]
    mode: Mode,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Mode {
    Tokenize,
    Repl,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut reporter = ConsoleReporter::new();
    let mut out = io::stdout().lock();
    let status = match args.mode {
        Mode::Tokenize => {
            let Some(script) = args.script else {
                Args::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "--script is required in tokenize mode",
                    )
                    .exit()
            };
            tokenize_file(&script, &mut reporter, &mut out)
        }
        Mode::Repl => repl(io::stdin().lock(), &mut reporter, &mut out),
    };
    ExitCode::from(status)
}

fn tokenize_file<E: Write>(
    script: &Path,
    reporter: &mut ConsoleReporter<E>,
    out: &mut impl Write,
) -> u8 {
    let source = match fs::read_to_string(script) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("could not read {}: {e}", script.display());
            return EX_IOERR;
        }
    };

    if run(&source, reporter, out).is_err() {
        return EX_IOERR;
    }

    if reporter.had_error {
        EX_DATAERR
    } else {
        EX_OK
    }
}

fn repl<E: Write>(
    input: impl BufRead,
    reporter: &mut ConsoleReporter<E>,
    out: &mut impl Write,
) -> u8 {
    let mut lines = input.lines();
    loop {
        if write!(out, "> ").and_then(|_| out.flush()).is_err() {
            return EX_IOERR;
        }
        match lines.next() {
            Some(Ok(line)) => {
                if run(&line, reporter, out).is_err() {
                    return EX_IOERR;
                }
                reporter.reset();
            }
            Some(Err(e)) => {
                eprintln!("could not read stdin: {e}");
                return EX_IOERR;
            }
            None => return EX_OK,
        }
    }
}

fn run<E: Write>(
    source: &str,
    reporter: &mut ConsoleReporter<E>,
    out: &mut impl Write,
) -> io::Result<()> {
    for token in scan_tokens(source, reporter) {
        writeln!(out, "{token} {}", token.literal)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn quiet() -> ConsoleReporter<Vec<u8>> {
        ConsoleReporter::with_writer(Vec::new())
    }

    fn script(name: &str, source: &str) -> PathBuf {
        let file = format!("lox-lexer-{}-{name}.lox", std::process::id());
        let path = std::env::temp_dir().join(file);
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    pub fn run_prints_one_token_per_line() {
        let mut out: Vec<u8> = vec![];
        run("1", &mut quiet(), &mut out).unwrap();
        assert_eq!("Number 1 1 1.0\nEof  1 null\n", String::from_utf8(out).unwrap());
    }

    #[test]
    pub fn clean_script_succeeds() {
        let path = script("clean", "var a = \"x\";");
        let mut reporter = quiet();
        let mut out: Vec<u8> = vec![];
        let status = tokenize_file(&path, &mut reporter, &mut out);
        fs::remove_file(&path).unwrap();

        assert_eq!(EX_OK, status);
        assert_eq!(
            "Var var 1 null\nIdentifier a 1 null\nEqual = 1 null\nText \"x\" 1 x\nSemiColon ; 1 null\nEof  1 null\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    pub fn lexical_error_is_data_error() {
        let path = script("dataerr", "1 @ 2");
        let mut reporter = quiet();
        let mut out: Vec<u8> = vec![];
        let status = tokenize_file(&path, &mut reporter, &mut out);
        fs::remove_file(&path).unwrap();

        assert_eq!(EX_DATAERR, status);
        assert_eq!(
            "[line 1] Error: Unexpected character '@'.\n",
            String::from_utf8(reporter.into_inner()).unwrap()
        );
    }

    #[test]
    pub fn missing_script_is_io_error() {
        let path = std::env::temp_dir().join("lox-lexer-does-not-exist.lox");
        let mut out: Vec<u8> = vec![];
        assert_eq!(EX_IOERR, tokenize_file(&path, &mut quiet(), &mut out));
        assert!(out.is_empty());
    }

    #[test]
    pub fn repl_clears_errors_between_lines() {
        let mut reporter = quiet();
        let mut out: Vec<u8> = vec![];
        let status = repl(Cursor::new("@\n1\n"), &mut reporter, &mut out);

        assert_eq!(EX_OK, status);
        assert!(!reporter.had_error);
        assert_eq!(
            "> Eof  1 null\n> Number 1 1 1.0\nEof  1 null\n> ",
            String::from_utf8(out).unwrap()
        );
        assert_eq!(
            "[line 1] Error: Unexpected character '@'.\n",
            String::from_utf8(reporter.into_inner()).unwrap()
        );
    }
}
