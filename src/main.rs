use std::{fs, io, num::NonZeroUsize, process::ExitCode, sync::Once};

use clap::{Parser, ValueEnum};
use seqcalc::{
    diagnostics::Diagnostic,
    evaluate_with,
    interpreter::{consumer::AstPrinter, evaluator::Options, lexer::TokenKind},
    lex_with_diagnostics, parse, type_check,
    verifier::{Mismatch, Verifier},
};

/// seqcalc runs programs of a small expression language with ranges and
/// parallel map/reduce, or any prefix of its pipeline.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The pipeline stage whose result is printed.
    #[arg(value_enum)]
    mode: Mode,

    /// Checks diagnostics against the `#expectedError@` directives and the
    /// output against the `CHECK:` lines of the program instead of printing
    /// the diagnostics.
    #[arg(long)]
    verify: bool,

    /// Maximum number of workers a range, map or reduce is split across.
    /// Defaults to the number of available threads.
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    /// Tells seqcalc to read the program from a file instead of taking it
    /// as the argument.
    #[arg(short, long)]
    file: bool,

    input: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print the tokens.
    Lex,
    /// Print the syntax tree of every statement.
    Parse,
    /// Print the syntax tree of every well-typed statement with its types.
    TypeCheck,
    /// Print the output of the program.
    Evaluate,
}

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("Failed to read the input file '{path}'. Perhaps this file does not exist?")]
    ReadInput {
        path:   String,
        #[source]
        source: io::Error,
    },
    #[error("Verification failed with {} mismatch(es)", .0.len())]
    VerificationFailed(Vec<Mismatch>),
}

static TRACING_INIT: Once = Once::new();

/// Installs a log subscriber on stderr, only if `RUST_LOG` is set.
///
/// Enable with e.g. `RUST_LOG=seqcalc=debug` or `RUST_LOG=seqcalc=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
                    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

                    if std::env::var("RUST_LOG").is_ok() {
                        tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)
                                                                        .with_target(true))
                                                      .with(EnvFilter::from_default_env())
                                                      .init();
                    }
                });
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(DriverError::VerificationFailed(mismatches)) => {
            for mismatch in &mismatches {
                eprintln!("{mismatch}");
            }
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<(), DriverError> {
    let source = if args.file {
        fs::read_to_string(&args.input).map_err(|source| {
                                            DriverError::ReadInput { path: args.input.clone(),
                                                                     source }
                                        })?
    } else {
        args.input.clone()
    };

    let options = args.workers.map_or_else(Options::default, Options::with_workers);
    let (output, diagnostics) = run_stage(args.mode, &source, &options);
    print!("{output}");

    if args.verify {
        return Verifier::from_source(&source).verify(&output, &diagnostics)
                                             .map_err(DriverError::VerificationFailed);
    }
    for diagnostic in &diagnostics {
        println!("{diagnostic}");
    }
    Ok(())
}

/// Runs the pipeline up to `mode` and renders what that stage produced, one
/// item per line.
fn run_stage(mode: Mode, source: &str, options: &Options) -> (String, Vec<Diagnostic>) {
    match mode {
        Mode::Lex => {
            let (tokens, diagnostics) = lex_with_diagnostics(source);
            let output = tokens.iter()
                               .filter(|token| {
                                   !matches!(token.kind, TokenKind::Comment | TokenKind::Eof)
                               })
                               .map(|token| format!("{token}\n"))
                               .collect();
            (output, diagnostics.into_vec())
        },
        Mode::Parse => {
            let mut printer = AstPrinter::new();
            let diagnostics = parse(source, &mut printer);
            (printer.into_output(), diagnostics.into_vec())
        },
        Mode::TypeCheck => {
            let mut printer = AstPrinter::new();
            let diagnostics = type_check(source, &mut printer);
            (printer.into_output(), diagnostics.into_vec())
        },
        Mode::Evaluate => {
            let evaluation = evaluate_with(source, options);
            let output = evaluation.output
                                   .values()
                                   .map(|value| format!("{value}\n"))
                                   .collect();
            (output, evaluation.diagnostics)
        },
    }
}
