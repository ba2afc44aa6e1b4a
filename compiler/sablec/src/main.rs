//! Sable Compiler CLI

use sable_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use sable_ir::Word;
use sablec::{Artifact, CompileError, CompileOptions};

/// What `sable build` prints.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Emit {
    Ir,
    Summary,
}

fn main() {
    sablec::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: sable check <file.sb>");
                std::process::exit(1);
            }
            let path = &args[2];
            let source = read_file(path);
            if let Err(err) = sablec::check(&source) {
                report(path, &source, &err);
            }
            println!("{path}: ok");
        }
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: sable build <file.sb> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --no-fold           Emit runtime instructions for constant expressions");
                eprintln!("  --emit=<kind>       Emit: ir (default), summary");
                std::process::exit(1);
            }

            let mut options = CompileOptions::default();
            let mut emit = Emit::Ir;
            for arg in args.iter().skip(3) {
                if arg == "--no-fold" {
                    options.fold_constants = false;
                } else if let Some(kind) = arg.strip_prefix("--emit=") {
                    emit = match kind {
                        "ir" => Emit::Ir,
                        "summary" => Emit::Summary,
                        _ => {
                            eprintln!("error: unknown emit kind '{kind}'");
                            eprintln!("Valid kinds: ir, summary");
                            std::process::exit(1);
                        }
                    };
                } else {
                    eprintln!("error: unknown option '{arg}'");
                    std::process::exit(1);
                }
            }

            let path = &args[2];
            let artifact = compile_file(path, options);
            match emit {
                Emit::Ir => print!("{}", artifact.program),
                Emit::Summary => print!("{artifact}"),
            }
        }
        "run" => {
            if args.len() < 4 {
                eprintln!("Usage: sable run <file.sb> <function> [args...] [--no-fold]");
                eprintln!();
                eprintln!("Arguments are unsigned integers or true/false, one word each.");
                std::process::exit(1);
            }

            let mut options = CompileOptions::default();
            let mut words = Vec::new();
            for arg in args.iter().skip(4) {
                if arg == "--no-fold" {
                    options.fold_constants = false;
                } else if let Some(word) = parse_word(arg) {
                    words.push(word);
                } else {
                    eprintln!("error: invalid argument '{arg}'");
                    std::process::exit(1);
                }
            }

            let artifact = compile_file(&args[2], options);
            match artifact.run(&args[3], &words) {
                Ok(results) => {
                    for word in results {
                        println!("{word}");
                    }
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Sable Compiler {}", env!("CARGO_PKG_VERSION"));
        }
        command => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Sable Compiler");
    println!();
    println!("Usage: sable <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <file>                  Type-check a file");
    println!("  build <file> [options]        Compile a file and print the result");
    println!("  run <file> <function> [args]  Compile and execute a function");
    println!("  help                          Show this message");
    println!("  version                       Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=sable_types=debug) for compiler tracing.");
}

fn compile_file(path: &str, options: CompileOptions) -> Artifact {
    let source = read_file(path);
    match sablec::compile_with(&source, options) {
        Ok(artifact) => artifact,
        Err(err) => report(path, &source, &err),
    }
}

/// Render a compile error with its source snippet and exit.
fn report(path: &str, source: &str, err: &CompileError) -> ! {
    let mut emitter = TerminalEmitter::stderr().with_source(path, source);
    emitter.emit(&err.diagnostic);
    emitter.emit_summary(1, 0);
    emitter.flush();
    std::process::exit(1);
}

fn parse_word(arg: &str) -> Option<Word> {
    match arg {
        "true" => Some(Word::from_bool(true)),
        "false" => Some(Word::from_bool(false)),
        _ => arg.parse::<u64>().ok().map(Word::from_u64),
    }
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
