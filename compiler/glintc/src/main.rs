//! `glintc` — the CLI collaborator.
//!
//! Drives file selection, prints diagnostics, and writes the compiled
//! artifact. There is no lexer/parser/type checker in this workspace —
//! the front end is an external collaborator — so `glintc` takes its
//! typed input from [`fixtures`], small hand-built typed-AST programs
//! standing in for what a real front end would hand this crate's
//! [`glintc::compile`]. A production build wires a real checker's output
//! into the same [`glintc::Program`] shape and nothing else changes.

mod fixtures;

use std::path::PathBuf;
use std::process::ExitCode;

use glintc::{CompileOptions, KeepGoing, OptLevel};

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glintc=info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "compile" => compile_command(&args[2..]),
        "list-fixtures" => {
            for name in fixtures::names() {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" => {
            println!("glintc {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("glintc: unrecognized command `{other}`");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  glintc compile <fixture-name> -o <output.bc> [--opt=none|speed|size] [--stop-on-error]");
    eprintln!("  glintc list-fixtures");
    eprintln!("  glintc help");
}

fn compile_command(args: &[String]) -> ExitCode {
    let Some(fixture_name) = args.first() else {
        eprintln!("glintc compile: missing <fixture-name>");
        print_usage();
        return ExitCode::FAILURE;
    };

    let mut output: Option<PathBuf> = None;
    let mut options = CompileOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("glintc compile: -o requires a path");
                    return ExitCode::FAILURE;
                };
                output = Some(PathBuf::from(path));
            }
            "--opt=none" => options.opt_level = OptLevel::None,
            "--opt=speed" => options.opt_level = OptLevel::Speed,
            "--opt=size" => options.opt_level = OptLevel::Size,
            "--stop-on-error" => options.keep_going = KeepGoing::No,
            other => {
                eprintln!("glintc compile: unrecognized flag `{other}`");
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let Some(program) = fixtures::by_name(fixture_name) else {
        eprintln!("glintc compile: unknown fixture `{fixture_name}` (see `glintc list-fixtures`)");
        return ExitCode::FAILURE;
    };

    let (artifacts, diagnostics) = glintc::compile_all(std::slice::from_ref(&program.as_program()), &options);

    for diagnostic in &diagnostics {
        eprintln!("error: {diagnostic}");
    }

    let Some(artifact) = artifacts.into_iter().next() else {
        eprintln!("glintc: compilation failed, no artifact produced");
        return ExitCode::FAILURE;
    };

    let output_path = output.unwrap_or_else(|| PathBuf::from(format!("{fixture_name}.bc")));
    if let Err(err) = std::fs::write(&output_path, &artifact.bitcode) {
        eprintln!("glintc: failed to write `{}`: {err}", output_path.display());
        return ExitCode::FAILURE;
    }

    tracing::info!(path = %output_path.display(), bytes = artifact.bitcode.len(), "wrote artifact");
    ExitCode::SUCCESS
}
