//! `tables`: render a JSON data file as a bordered terminal table.
//!
//! ```text
//! tables layout.json data.json
//! kubectl get pods -o json | jq '[.items[] | {...}]' | tables layout.json -
//! ```
//!
//! The table goes to stdout; diagnostics go to stderr.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tables_render::{read_document, render_documents, Document, RenderOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Render JSON data as a themed, bordered terminal table.
#[derive(Parser, Debug)]
#[command(name = "tables", version, about)]
struct Cli {
    /// Layout document: columns, sort order, title, footer and theme.
    /// Use `-` to read it from stdin.
    #[arg(value_name = "LAYOUT")]
    layout: PathBuf,

    /// Data document: a JSON array of objects. Use `-` to read it from
    /// stdin.
    #[arg(value_name = "DATA")]
    data: PathBuf,

    /// Theme to use instead of the one named in the layout.
    #[arg(long, value_name = "NAME", env = "TABLES_THEME")]
    theme: Option<String>,

    /// Print without colors.
    #[arg(long)]
    no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tables: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if is_stdin(&cli.layout) && is_stdin(&cli.data) {
        bail!("only one of LAYOUT and DATA can be read from stdin");
    }

    let layout = load(&cli.layout, Document::Layout)?;
    let data = load(&cli.data, Document::Data)?;

    let options = RenderOptions {
        styled: !cli.no_color,
        theme: cli.theme.clone(),
    };
    let table = render_documents(&layout, &data, &options)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(table.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| anyhow!("cannot write table to stdout: {e}"))?;
    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn load(path: &Path, document: Document) -> Result<String> {
    if !is_stdin(path) {
        return Ok(read_document(path, document)?);
    }
    let mut contents = String::new();
    std::io::stdin()
        .read_to_string(&mut contents)
        .map_err(|e| anyhow!("cannot read {document} document from stdin: {e}"))?;
    tracing::debug!(%document, bytes = contents.len(), "read document from stdin");
    Ok(contents)
}
