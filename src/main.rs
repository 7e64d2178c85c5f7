//! `sigshow` command line: extract, check and snapshot signatures from JSON syntax trees.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use sigshow::{
    Expr, Node, Sigshow, Snapshot, Stmt, findings_to_json, findings_to_markdown, findings_to_table,
    render, render_signature, signatures_to_json, signatures_to_markdown, signatures_to_table,
};

/// Unparse syntax trees and extract annotated function signatures.
#[derive(Parser, Debug)]
#[command(name = "sigshow", version, about)]
struct Cli {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Table,
    Json,
    Markdown,
}

/// Which trees to load.
#[derive(clap::Args, Debug)]
struct Scan {
    /// Tree files or folders containing `*.json` trees.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Extra include glob.
    #[arg(long)]
    include: Vec<String>,
    /// Exclude glob.
    #[arg(long)]
    exclude: Vec<String>,
    /// Skip files that fail to load instead of aborting.
    #[arg(long)]
    ignore_parse_errors: bool,
    /// Skip files larger than this many bytes.
    #[arg(long)]
    max_file_size: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List extracted signatures.
    Extract {
        #[command(flatten)]
        scan: Scan,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Run annotation rules over extracted signatures.
    Check {
        #[command(flatten)]
        scan: Scan,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Write a signature snapshot.
    Snapshot {
        #[command(flatten)]
        scan: Scan,
        #[arg(long)]
        out: PathBuf,
    },
    /// Compare current signatures with a saved snapshot.
    Diff {
        #[command(flatten)]
        scan: Scan,
        #[arg(long)]
        old: PathBuf,
    },
    /// Render an expression node, or a function definition's signature, from a JSON file.
    Render { file: PathBuf },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RenderTarget {
    Expr(Expr),
    Stmt(Stmt),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(scan: &Scan) -> Result<Sigshow, Box<dyn std::error::Error>> {
    let mut b = Sigshow::new("sigshow").exclude_generated()?;
    for p in &scan.paths {
        b = b.scan_in_folder(p);
    }
    for g in &scan.include {
        b = b.include_glob(g)?;
    }
    for g in &scan.exclude {
        b = b.exclude_glob(g)?;
    }
    if let Some(n) = scan.max_file_size {
        b = b.max_file_size(n);
    }
    Ok(b.ignore_parse_errors(scan.ignore_parse_errors).parse()?)
}

fn execute(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Extract { scan, format } => {
            let k = load(&scan)?;
            let sigs = k.signatures().collect();
            match format {
                Format::Table => print!("{}", signatures_to_table(&sigs)),
                Format::Json => println!("{}", signatures_to_json(&sigs)?),
                Format::Markdown => print!("{}", signatures_to_markdown(&sigs)),
            }
        }
        Command::Check { scan, format } => {
            let k = load(&scan)?;
            let findings = k.rules().with_default_rules().run();
            match format {
                Format::Table => print!("{}", findings_to_table(&findings)),
                Format::Json => println!("{}", findings_to_json(&findings)?),
                Format::Markdown => print!("{}", findings_to_markdown(&findings)),
            }
        }
        Command::Snapshot { scan, out } => {
            let k = load(&scan)?;
            std::fs::write(&out, k.snapshot().to_json_string()?)?;
            println!("wrote {} signatures to {}", k.signatures.len(), out.display());
        }
        Command::Diff { scan, old } => {
            let k = load(&scan)?;
            let old = Snapshot::from_json_str(&read(&old)?)?;
            let diff = k.diff_snapshot(&old);
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
        Command::Render { file } => {
            let text = match serde_json::from_str::<RenderTarget>(&read(&file)?)? {
                RenderTarget::Expr(e) => render(Node::Expr(&e))?,
                RenderTarget::Stmt(s) => render_signature(Node::Stmt(&s))?,
            };
            println!("{text}");
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(std::fs::read_to_string(path)?)
}
