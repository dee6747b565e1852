//! Check, lint and pretty-print `.serv` files.
//!
//! Usage:
//!   servc check [--strict] FILE...
//!   servc lint FILE...
//!   servc fmt FILE
//!   servc tokens FILE
//!
//! `-` reads from stdin. Exit code 1 if any file fails to compile or has error-level lint findings.
//! Logging goes to stderr; raise it with `-v`/`-vv` or `RUST_LOG`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use servdsl::lint::{lint, Severity};
use servdsl::{compile_with, parse, Lexer, ValidationOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "servc", about = "Serv IDL front-end", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate files
    Check {
        /// Also require message fields to reference known types
        #[arg(long)]
        strict: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse files and report lint findings
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a file in canonical form
    Fmt { file: PathBuf },
    /// Dump the token stream of a file
    Tokens { file: PathBuf },
}

fn init_logging(verbose: u8) {
    let directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn read_source(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    let bytes = read_source(path)?;
    Ok(servdsl::lexer::decode_source(&bytes)
        .with_context(|| format!("{}", path.display()))?
        .to_string())
}

fn check(files: &[PathBuf], options: ValidationOptions) -> anyhow::Result<bool> {
    let mut ok = true;
    for path in files {
        let source = read_source(path)?;
        match compile_with(&source, options) {
            Ok(doc) => {
                tracing::info!(file = %path.display(), definitions = doc.definitions.len(), "ok");
            }
            Err(e) => {
                println!("{}: {}", path.display(), e);
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn lint_files(files: &[PathBuf]) -> anyhow::Result<bool> {
    let mut ok = true;
    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    for path in files {
        let text = read_text(path)?;
        let doc = match parse(&text) {
            Ok(doc) => doc,
            Err(e) => {
                println!("{}: {}", path.display(), e);
                ok = false;
                continue;
            }
        };
        for m in lint(&doc) {
            match m.severity {
                Severity::Error => total_errors += 1,
                Severity::Warning => total_warnings += 1,
            }
            println!("{}: {}", path.display(), m);
        }
    }
    if total_errors > 0 || total_warnings > 0 {
        eprintln!("lint: {} error(s), {} warning(s)", total_errors, total_warnings);
    }
    Ok(ok && total_errors == 0)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ok = match &cli.command {
        Commands::Check { strict, files } => check(
            files,
            ValidationOptions {
                check_field_references: *strict,
            },
        )?,
        Commands::Lint { files } => lint_files(files)?,
        Commands::Fmt { file } => {
            let text = read_text(file)?;
            let doc = parse(&text).with_context(|| format!("{}", file.display()))?;
            print!("{}", doc);
            true
        }
        Commands::Tokens { file } => {
            let text = read_text(file)?;
            for token in Lexer::new(&text) {
                let token = token.with_context(|| format!("{}", file.display()))?;
                println!("{}\t{:?}\t{}", token.position, token.kind, token.text);
            }
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
