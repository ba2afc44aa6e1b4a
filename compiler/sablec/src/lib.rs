//! The Sable compiler driver.
//!
//! [`compile`] runs one compilation unit through every phase:
//!
//! ```text
//! lex -> parse -> collect_declarations -> check_module -> lower_module
//! ```
//!
//! Each phase owns nothing global. A fresh [`CompilationContext`] (interner,
//! namespace, enum registry) is created per call and dropped with it, so
//! independent compilations may run on separate threads.
//!
//! The first diagnostic aborts the unit and comes back as a [`CompileError`]
//! with its position resolved to `line:column`.

mod artifact;

pub use artifact::{Artifact, ConstantSummary, EnumSummary, FunctionSummary};

use std::sync::Once;

use sable_codegen::lower_module;
use sable_diagnostic::span_utils::offset_to_line_col;
use sable_diagnostic::{Diagnostic, ErrorCode, ErrorKind};
use sable_ir::Module;
use sable_types::{check_module, collect_declarations, CompilationContext, TypedModule};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=sable_types=debug` or `RUST_LOG=sable_codegen=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Knobs for a single compilation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompileOptions {
    /// Replace compile-time-constant expressions by their value.
    ///
    /// When off, every operator is emitted as its runtime instruction
    /// sequence. Results are identical either way.
    pub fold_constants: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            fold_constants: true,
        }
    }
}

/// A compilation failure: the diagnostic plus its resolved position.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{line}:{column}: {}: {}", .diagnostic.kind(), .diagnostic.message)]
pub struct CompileError {
    pub diagnostic: Diagnostic,
    /// 1-based line of the primary label.
    pub line: u32,
    /// 1-based column (in characters) of the primary label.
    pub column: u32,
}

impl CompileError {
    fn new(source: &str, diagnostic: Diagnostic) -> Self {
        let offset = diagnostic.primary_span().map_or(0, |span| span.start);
        let (line, column) = offset_to_line_col(source, offset);
        CompileError {
            diagnostic,
            line,
            column,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.diagnostic.kind()
    }

    pub fn code(&self) -> ErrorCode {
        self.diagnostic.code
    }
}

/// Compile a source file with default options.
pub fn compile(source: &str) -> Result<Artifact, CompileError> {
    compile_with(source, CompileOptions::default())
}

/// Compile a source file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len(), fold = options.fold_constants))]
pub fn compile_with(source: &str, options: CompileOptions) -> Result<Artifact, CompileError> {
    let result = analyze(source).and_then(|unit| {
        let program = lower_module(&unit.module, &unit.ctx, &unit.typed, options.fold_constants)?;
        Ok(Artifact::new(program, &unit.module, &unit.ctx, &unit.typed))
    });
    result.map_err(|diagnostic| {
        tracing::debug!(code = %diagnostic.code, "compilation failed");
        CompileError::new(source, diagnostic)
    })
}

/// Run every phase up to and including type checking.
///
/// Succeeds exactly when [`compile`] would, minus code generation.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn check(source: &str) -> Result<(), CompileError> {
    analyze(source)
        .map(|_| ())
        .map_err(|diagnostic| CompileError::new(source, diagnostic))
}

/// Front-end output for one unit.
struct Analyzed {
    module: Module,
    ctx: CompilationContext,
    typed: TypedModule,
}

fn analyze(source: &str) -> Result<Analyzed, Diagnostic> {
    let mut ctx = CompilationContext::new();
    let tokens = sable_lexer::lex(source, &ctx.interner)?;
    let module = sable_parse::parse(&tokens, &ctx.interner)?;
    collect_declarations(&module, &mut ctx)?;
    let typed = check_module(&module, &ctx)?;
    Ok(Analyzed { module, ctx, typed })
}
