use crate::generator::{generate_project, load_and_render, FileStatus, GenerateOptions};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line interface for restscaffold
///
/// Generates service classes with routing and documentation metadata from a
/// type catalog.
#[derive(Parser, Debug)]
#[command(name = "restscaffold-gen")]
#[command(about = "restscaffold service generator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one service file per root service plus a mod.rs
    Generate {
        /// Path to the type catalog (YAML or JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Path to the documentation model (YAML or JSON)
        #[arg(short, long)]
        docs: Option<PathBuf>,

        /// Path to restscaffold.toml
        /// If not provided, will auto-detect alongside the catalog
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (default: `output_dir` from the config, else ./generated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files whose contents differ
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Perform a dry run: show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print every generated route and resource descriptor without writing
    Inspect {
        /// Path to the type catalog (YAML or JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Path to the documentation model (YAML or JSON)
        #[arg(short, long)]
        docs: Option<PathBuf>,

        /// Path to restscaffold.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Run a parsed command, printing its report to stdout
///
/// # Errors
///
/// Any loading, generation or I/O failure; the binary turns it into a
/// non-zero exit status.
pub fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Run a parsed command, printing its report to `out`
pub fn run_with_output(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate {
            catalog,
            docs,
            config,
            output,
            force,
            dry_run,
        } => {
            let report = generate_project(&GenerateOptions {
                catalog: catalog.clone(),
                docs: docs.clone(),
                config: config.clone(),
                output: output.clone(),
                force: *force,
                dry_run: *dry_run,
            })?;
            for file in &report.files {
                let status = match file.status {
                    FileStatus::Written => "written",
                    FileStatus::Unchanged => "unchanged",
                    FileStatus::Skipped => "skipped (exists, use --force)",
                    FileStatus::WouldWrite => "would write",
                };
                writeln!(
                    out,
                    "{status:<12} {} sha256:{}",
                    file.path.display(),
                    file.digest
                )?;
            }
            for note in &report.notes {
                writeln!(out, "note: {note}")?;
            }
            if *dry_run {
                writeln!(out, "dry run: nothing written to {}", report.output_dir.display())?;
            }
            Ok(())
        }
        Commands::Inspect {
            catalog,
            docs,
            config,
        } => {
            let (project, _) = load_and_render(catalog, docs.as_deref(), config.as_deref())?;
            writeln!(out, "Routes:")?;
            for route in project.routes() {
                writeln!(
                    out,
                    "  {:<7} {:<40} {}::{} <- {}",
                    route.verb,
                    route.route,
                    route.class,
                    route.method,
                    route.chain.join(" -> ")
                )?;
            }
            writeln!(out, "Resources:")?;
            for descriptor in project.descriptors() {
                let path = descriptor.base_path.as_deref().unwrap_or("-");
                let implementation = descriptor.implementation.as_deref().unwrap_or("-");
                writeln!(
                    out,
                    "  {} (impl: {implementation}, path: {path}, tags: [{}])",
                    descriptor.type_name,
                    descriptor.tags.join(", ")
                )?;
            }
            let notes: Vec<_> = project.notes().collect();
            if !notes.is_empty() {
                writeln!(out, "Notes:")?;
                for note in notes {
                    writeln!(out, "  {note}")?;
                }
            }
            Ok(())
        }
    }
}
