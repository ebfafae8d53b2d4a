//! Labelmerge CLI
//!
//! Command-line tool for checking two student tables, matching them by NIF,
//! and exporting the matched addresses for label printing.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use labelmerge_core::reader::decode_text;
use labelmerge_core::{
    detect_delimiter, parse_with_delimiter, prepare, write_merge_csv, Delimiter,
    Error, PipelineConfig, Session, SourceFormat, SpreadsheetReader, Table, TableRole,
    WorkbookReader,
};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "labelmerge")]
#[command(about = "Match student tables by NIF and prepare address labels", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and display a single table file
    Inspect {
        /// Path to a CSV or workbook file
        #[arg(short, long)]
        file: PathBuf,

        /// Delimiter to use instead of sniffing it
        #[arg(short, long)]
        delimiter: Option<DelimiterArg>,
    },

    /// Check a table against the required headers of its role
    Check {
        /// Path to a CSV or workbook file
        #[arg(short, long)]
        file: PathBuf,

        /// Which side of the join the file plays
        #[arg(short, long, default_value = "primary")]
        role: RoleArg,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Match the secondary table against the primary table
    Join {
        /// Primary table (full attribute set)
        #[arg(short, long)]
        primary: PathBuf,

        /// Secondary table (checked for membership)
        #[arg(short, long)]
        secondary: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export matched labels as a mail-merge CSV
    Export {
        /// Primary table (full attribute set)
        #[arg(short, long)]
        primary: PathBuf,

        /// Secondary table (checked for membership)
        #[arg(short, long)]
        secondary: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path for the configuration file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Primary,
    Secondary,
}

impl From<RoleArg> for TableRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Primary => TableRole::Primary,
            RoleArg::Secondary => TableRole::Secondary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DelimiterArg {
    Comma,
    Semicolon,
    Tab,
}

impl From<DelimiterArg> for Delimiter {
    fn from(value: DelimiterArg) -> Self {
        match value {
            DelimiterArg::Comma => Delimiter::Comma,
            DelimiterArg::Semicolon => Delimiter::Semicolon,
            DelimiterArg::Tab => Delimiter::Tab,
        }
    }
}

/// Summary of a join, as printed by `join --json`
#[derive(Serialize)]
struct JoinReport {
    matches: usize,
    mismatches: usize,
    label_rows: usize,
    label_pages: usize,
    labels_per_page: usize,
    mismatched_identifiers: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install a stderr subscriber; `RUST_LOG` takes precedence over `-v`
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> labelmerge_core::Result<()> {
    match command {
        Commands::Inspect { file, delimiter } => cmd_inspect(&file, delimiter.map(Into::into)),
        Commands::Check { file, role, config } => cmd_check(&file, role.into(), config.as_deref()),
        Commands::Join {
            primary,
            secondary,
            config,
            json,
        } => cmd_join(&primary, &secondary, config.as_deref(), json),
        Commands::Export {
            primary,
            secondary,
            output,
            config,
        } => cmd_export(&primary, &secondary, &output, config.as_deref()),
        Commands::InitConfig { output } => cmd_init_config(&output),
    }
}

fn load_config(path: Option<&Path>) -> labelmerge_core::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn cmd_inspect(file: &Path, delimiter: Option<Delimiter>) -> labelmerge_core::Result<()> {
    let format = SourceFormat::from_path(file)?;
    let bytes = fs::read(file).map_err(|source| Error::UnreadableFile {
        path: file.to_path_buf(),
        source,
    })?;

    println!("File: {}", file.display());

    let table = match format {
        SourceFormat::DelimitedText => {
            let text = decode_text(&bytes, file)?;
            let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(text));
            println!("Format: delimited text ({})", delimiter);
            parse_with_delimiter(text, delimiter)
        }
        SourceFormat::Workbook => {
            println!("Format: workbook (first sheet)");
            WorkbookReader.read_table(&bytes, file)?
        }
    };

    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    print_table(&table, 10);

    Ok(())
}

fn cmd_check(file: &Path, role: TableRole, config: Option<&Path>) -> labelmerge_core::Result<()> {
    let config = load_config(config)?;
    let table = labelmerge_core::load_table(file)?;

    println!("File: {}", file.display());
    println!("Role: {}", role);
    println!("Rows: {}", table.row_count());

    let prepared = prepare(table, role, &config)?;

    println!(
        "All {} required headers present, identifier column '{}' at position {}",
        config.required_headers(role).len(),
        prepared.table.headers[prepared.identifier],
        prepared.identifier + 1
    );
    Ok(())
}

fn build_session(
    primary: &Path,
    secondary: &Path,
    config: Option<&Path>,
) -> labelmerge_core::Result<Session> {
    let mut session = Session::new(load_config(config)?);
    session.load_file(TableRole::Primary, primary, None)?;
    session.load_file(TableRole::Secondary, secondary, None)?;
    session.join()?;
    Ok(session)
}

fn cmd_join(
    primary: &Path,
    secondary: &Path,
    config: Option<&Path>,
    json: bool,
) -> labelmerge_core::Result<()> {
    let session = build_session(primary, secondary, config)?;
    let outcome = session
        .outcome()
        .ok_or(Error::NotReady("join result"))?;
    let layout = &session.config().layout;

    let report = JoinReport {
        matches: outcome.result.match_count(),
        mismatches: outcome.result.mismatch_count(),
        label_rows: outcome.label_rows.len(),
        label_pages: layout.page_count(outcome.label_rows.len()),
        labels_per_page: layout.labels_per_page(),
        mismatched_identifiers: outcome
            .mismatched_identifiers()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Primary: {}", primary.display());
    println!("Secondary: {}", secondary.display());
    println!();
    println!("Matches: {}", report.matches);
    println!("Mismatches: {}", report.mismatches);
    println!(
        "Label rows: {} ({} page(s) of {} labels, template {})",
        report.label_rows, report.label_pages, report.labels_per_page, layout.template
    );

    if !report.mismatched_identifiers.is_empty() {
        println!();
        println!("Unmatched identifiers:");
        for id in &report.mismatched_identifiers {
            if id.is_empty() {
                println!("  - (empty)");
            } else {
                println!("  - {}", id);
            }
        }
    }

    Ok(())
}

fn cmd_export(
    primary: &Path,
    secondary: &Path,
    output: &Path,
    config: Option<&Path>,
) -> labelmerge_core::Result<()> {
    let session = build_session(primary, secondary, config)?;
    let labels = session.label_records()?;

    tracing::info!(labels = labels.len(), output = %output.display(), "writing merge file");
    let file = File::create(output)?;
    write_merge_csv(&labels, BufWriter::new(file))?;

    let pages = session.config().layout.page_count(labels.len());
    println!(
        "Exported {} labels ({} page(s)) to {}",
        labels.len(),
        pages,
        output.display()
    );

    Ok(())
}

fn cmd_init_config(output: &Path) -> labelmerge_core::Result<()> {
    let config = PipelineConfig::default();
    config.save(output)?;

    println!("Created configuration file: {}", output.display());
    println!("Primary headers: {}", config.primary_headers.len());
    println!("Secondary headers: {}", config.secondary_headers.len());
    println!("Identifier column: {}", config.identifier_column);
    println!();
    println!("Edit the file as needed, then run:");
    println!(
        "  labelmerge join --primary <file> --secondary <file> --config {}",
        output.display()
    );

    Ok(())
}

fn print_table(table: &Table, limit: usize) {
    println!("{}", table.headers.join("\t"));
    println!("{}", "-".repeat(table.column_count() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<&str> = (0..table.column_count()).map(|i| row.cell(i)).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }
}
