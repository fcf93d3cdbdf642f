//! Subcommand implementations

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

use bibfront_core::{convert, list_bib_files, Destination, FrontmatterFormat, Settings};
use clap::ValueEnum;
use tracing::{info, warn};

type CommandResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Yaml,
    Toml,
}

impl From<FormatArg> for FrontmatterFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => FrontmatterFormat::Yaml,
            FormatArg::Toml => FrontmatterFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessArgs {
    pub filename: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub bib_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub open_output_dir: bool,
    pub format: FormatArg,
}

/// Print the `.bib` files of the bib directory, one per line
pub fn list_bib(settings: &Settings, bib_dir: Option<PathBuf>) -> CommandResult {
    let dir = bib_dir.unwrap_or_else(|| settings.bib_dir.clone());
    for path in list_bib_files(&dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Convert `<bib_dir>/<filename>` into pages under the output directory
pub fn process(settings: &Settings, args: ProcessArgs) -> CommandResult {
    let bib_dir = args.bib_dir.unwrap_or_else(|| settings.bib_dir.clone());
    let source = bib_dir.join(&args.filename);
    let output_dir = args.output_dir.unwrap_or_else(|| settings.output_dir());

    let destination = if args.dry_run {
        Destination::Stdout
    } else {
        Destination::Directory(output_dir.clone())
    };

    let report = convert(
        &source,
        &settings.overrides,
        &destination,
        args.format.into(),
    )?;

    if !args.dry_run {
        println!(
            "Wrote {} page(s) to {}",
            report.written.len(),
            output_dir.display()
        );
    }

    if args.open_output_dir {
        if output_dir.is_dir() {
            open_directory(&output_dir)?;
        } else {
            warn!(dir = %output_dir.display(), "output directory does not exist, not opening it");
        }
    }
    Ok(())
}

/// Hand the directory to the desktop's file opener without waiting for it
fn open_directory(dir: &Path) -> CommandResult {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };
    info!(opener, dir = %dir.display(), "opening output directory");
    Command::new(opener)
        .arg(dir)
        .spawn()
        .map_err(|e| format!("failed to run {opener} on {}: {e}", dir.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ENTRY: &str = r#"
@article{Doe:2020,
    author = {Jane Doe},
    title = {A Study},
    journal = {Phys. Rev. D},
    volume = {12},
    year = {2020},
}
"#;

    #[test]
    fn test_format_arg_conversion() {
        assert_eq!(FrontmatterFormat::from(FormatArg::Yaml), FrontmatterFormat::Yaml);
        assert_eq!(FrontmatterFormat::from(FormatArg::Toml), FrontmatterFormat::Toml);
    }

    #[test]
    fn test_process_uses_settings_directories() {
        let dir = tempfile::tempdir().unwrap();
        let bib_dir = dir.path().join("bib");
        fs::create_dir(&bib_dir).unwrap();
        fs::write(bib_dir.join("pubs.bib"), ENTRY).unwrap();

        let settings = Settings {
            bib_dir,
            site_dir: Some(dir.path().join("site")),
            ..Settings::default()
        };
        let args = ProcessArgs {
            filename: PathBuf::from("pubs.bib"),
            output_dir: None,
            bib_dir: None,
            dry_run: false,
            open_output_dir: false,
            format: FormatArg::Yaml,
        };
        process(&settings, args).unwrap();

        let page = dir.path().join("site/content/publication/doe-2020.md");
        assert!(fs::read_to_string(page).unwrap().starts_with("---\nid: "));
    }

    #[test]
    fn test_dry_run_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubs.bib"), ENTRY).unwrap();
        let out = dir.path().join("out");

        let args = ProcessArgs {
            filename: PathBuf::from("pubs.bib"),
            output_dir: Some(out.clone()),
            bib_dir: Some(dir.path().to_path_buf()),
            dry_run: true,
            open_output_dir: false,
            format: FormatArg::Yaml,
        };
        process(&Settings::default(), args).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_dry_run_does_not_open_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubs.bib"), ENTRY).unwrap();
        let out = dir.path().join("never-created");

        let args = ProcessArgs {
            filename: PathBuf::from("pubs.bib"),
            output_dir: Some(out.clone()),
            bib_dir: Some(dir.path().to_path_buf()),
            dry_run: true,
            open_output_dir: true,
            format: FormatArg::Yaml,
        };
        process(&Settings::default(), args).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ProcessArgs {
            filename: PathBuf::from("absent.bib"),
            output_dir: Some(dir.path().join("out")),
            bib_dir: Some(dir.path().to_path_buf()),
            dry_run: false,
            open_output_dir: false,
            format: FormatArg::Yaml,
        };
        assert!(process(&Settings::default(), args).is_err());
    }
}
