//! bibfront - BibTeX to static-site publication pages
//!
//! `bibfront list-bib` shows the BibTeX files available, `bibfront process
//! FILE` writes one page per entry (or prints them with `--dry-run`).

mod commands;

use std::path::PathBuf;

use bibfront_core::{Settings, DEFAULT_SETTINGS_FILE};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FormatArg, ProcessArgs};

#[derive(Debug, Parser)]
#[command(name = "bibfront", version, about = "Generate publication pages from BibTeX")]
struct Cli {
    /// Settings file (TOML, JSON or YAML) [default: ./bibfront.toml if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List BibTeX files in a directory
    ListBib {
        /// Directory to search [default: bib_dir from settings]
        #[arg(long)]
        bib_dir: Option<PathBuf>,
    },
    /// Generate one page per entry of a BibTeX file
    Process {
        /// BibTeX file, relative to the bib directory
        filename: PathBuf,

        /// Output directory [default: from settings]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Directory containing FILENAME [default: bib_dir from settings]
        #[arg(long)]
        bib_dir: Option<PathBuf>,

        /// Print pages instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Open the output directory when done
        #[arg(long)]
        open_output_dir: bool,

        /// Frontmatter format
        #[arg(long, value_enum, default_value_t = FormatArg::Yaml)]
        format: FormatArg,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default(DEFAULT_SETTINGS_FILE)?,
    };

    match cli.command {
        Command::ListBib { bib_dir } => commands::list_bib(&settings, bib_dir),
        Command::Process {
            filename,
            output_dir,
            bib_dir,
            dry_run,
            open_output_dir,
            format,
        } => commands::process(
            &settings,
            ProcessArgs {
                filename,
                output_dir,
                bib_dir,
                dry_run,
                open_output_dir,
                format,
            },
        ),
    }
}

/// Logs go to stderr so dry-run pages on stdout stay clean
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process() {
        let cli = Cli::try_parse_from([
            "bibfront",
            "-v",
            "process",
            "pubs.bib",
            "--output-dir",
            "out",
            "--dry-run",
            "--format",
            "toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Process {
                filename,
                output_dir,
                dry_run,
                open_output_dir,
                format,
                ..
            } => {
                assert_eq!(filename, PathBuf::from("pubs.bib"));
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert!(dry_run);
                assert!(!open_output_dir);
                assert_eq!(format, FormatArg::Toml);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_bib_with_global_config() {
        let cli =
            Cli::try_parse_from(["bibfront", "list-bib", "--config", "site.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert!(matches!(cli.command, Command::ListBib { bib_dir: None }));
    }

    #[test]
    fn test_process_requires_filename() {
        assert!(Cli::try_parse_from(["bibfront", "process"]).is_err());
    }
}
