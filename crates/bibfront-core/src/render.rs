//! Frontmatter serialization and output delivery

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{Frontmatter, PublicationRecord};

/// Frontmatter flavour understood by static-site generators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrontmatterFormat {
    #[default]
    Yaml,
    Toml,
}

impl FrontmatterFormat {
    /// Line that opens and closes the block
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }

    /// Serialize the mapping without delimiters. Field order is kept and
    /// non-ASCII text is written literally.
    pub fn serialize(&self, fields: &Frontmatter) -> Result<String> {
        let mut body = match self {
            Self::Yaml => serde_yaml::to_string(fields)?,
            Self::Toml => toml::to_string(fields)?,
        };
        if !body.ends_with('\n') {
            body.push('\n');
        }
        Ok(body)
    }
}

impl FromStr for FrontmatterFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(format!("unknown frontmatter format: {other}")),
        }
    }
}

impl fmt::Display for FrontmatterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        })
    }
}

/// Wrap the serialized mapping between two delimiter lines. The document
/// body after the closing delimiter is left empty.
pub fn render(fields: &Frontmatter, format: FrontmatterFormat) -> Result<String> {
    let delimiter = format.delimiter();
    let body = format.serialize(fields)?;
    Ok(format!("{delimiter}\n{body}{delimiter}\n"))
}

/// Where a rendered record goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Explicit target file; wins over `base_dir`
    pub path: Option<PathBuf>,
    /// Directory receiving `<name><suffix>`, created when missing
    pub base_dir: Option<PathBuf>,
    /// File stem; defaults to the record's resolved name
    pub name: Option<String>,
    pub suffix: String,
    pub format: FrontmatterFormat,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: None,
            base_dir: None,
            name: None,
            suffix: ".md".to_string(),
            format: FrontmatterFormat::default(),
        }
    }
}

impl OutputOptions {
    /// Print to standard output
    pub fn stdout() -> Self {
        Self::default()
    }

    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: FrontmatterFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Resolved target file, or `None` for standard output
    fn target(&self, record: &PublicationRecord<'_>) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        self.base_dir.as_ref().map(|base| {
            let name = self.name.clone().unwrap_or_else(|| record.name());
            base.join(format!("{name}{}", self.suffix))
        })
    }
}

/// What happened to a rendered record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Written(PathBuf),
    Printed,
}

impl PublicationRecord<'_> {
    /// Render and deliver this record: to `options.path`, else into
    /// `options.base_dir`, else to standard output. Existing files are
    /// replaced.
    pub fn write(&self, options: &OutputOptions) -> Result<Delivery> {
        let text = self.frontmatter(options.format)?;

        match options.target(self) {
            Some(path) => {
                if options.path.is_none() {
                    if let Some(base) = &options.base_dir {
                        fs::create_dir_all(base).map_err(|e| Error::io(base, e))?;
                    }
                }
                fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
                debug!(id = self.id(), path = %path.display(), "wrote frontmatter");
                Ok(Delivery::Written(path))
            }
            None => {
                print_to(&mut io::stdout().lock(), &text)?;
                Ok(Delivery::Printed)
            }
        }
    }

    /// Render this record onto any writer, as the stdout branch of
    /// [`write`](Self::write) does
    pub fn write_to<W: Write>(&self, out: &mut W, format: FrontmatterFormat) -> Result<()> {
        print_to(out, &self.frontmatter(format)?)
    }
}

fn print_to<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| Error::io(Path::new("-"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibfront_bibtex::{BibTeXEntry, BibTeXEntryType};
    use serde_json::json;

    fn record() -> PublicationRecord<'static> {
        let entry = BibTeXEntry::new("Some:Key", BibTeXEntryType::Article)
            .with_field("author", "{J\\\"urgen Gro{\\ss}}")
            .with_field("title", "A Study")
            .with_field("journal", "Proc. of Foo")
            .with_field("volume", "12")
            .with_field("year", "2020");
        PublicationRecord::new(entry, None)
    }

    #[test]
    fn test_yaml_block_shape() {
        let text = record().frontmatter(FrontmatterFormat::Yaml).unwrap();
        assert!(text.starts_with("---\nid: "));
        assert!(text.ends_with("\n---\n"));
        assert!(text.contains("Jürgen Groß"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let record = record();
        let text = record.frontmatter(FrontmatterFormat::Yaml).unwrap();
        let body = text
            .strip_prefix("---\n")
            .and_then(|rest| rest.strip_suffix("---\n"))
            .unwrap();
        let parsed: Frontmatter = serde_yaml::from_str(body).unwrap();
        let expected = record.to_frontmatter().unwrap();
        assert_eq!(parsed, expected);
        assert!(parsed.keys().eq(expected.keys()));
    }

    #[test]
    fn test_toml_round_trip() {
        let record = record();
        let text = record.frontmatter(FrontmatterFormat::Toml).unwrap();
        assert!(text.starts_with("+++\n"));
        let body = text
            .strip_prefix("+++\n")
            .and_then(|rest| rest.strip_suffix("+++\n"))
            .unwrap();
        let parsed: Frontmatter = toml::from_str(body).unwrap();
        assert_eq!(parsed, record.to_frontmatter().unwrap());
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = record();
        assert_eq!(
            record.frontmatter(FrontmatterFormat::Yaml).unwrap(),
            record.frontmatter(FrontmatterFormat::Yaml).unwrap()
        );
    }

    #[test]
    fn test_render_keeps_patch_order() {
        let mut fields = Frontmatter::new();
        fields.insert("zeta".into(), json!(1));
        fields.insert("alpha".into(), json!("x"));
        let text = render(&fields, FrontmatterFormat::Yaml).unwrap();
        assert_eq!(text, "---\nzeta: 1\nalpha: x\n---\n");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("YAML".parse::<FrontmatterFormat>(), Ok(FrontmatterFormat::Yaml));
        assert_eq!("toml".parse::<FrontmatterFormat>(), Ok(FrontmatterFormat::Toml));
        assert!("json".parse::<FrontmatterFormat>().is_err());
    }

    #[test]
    fn test_target_resolution() {
        let record = record();
        assert_eq!(OutputOptions::stdout().target(&record), None);
        assert_eq!(
            OutputOptions::in_dir("out").target(&record),
            Some(PathBuf::from("out/some-key.md"))
        );
        let explicit = OutputOptions {
            path: Some(PathBuf::from("x.md")),
            base_dir: Some(PathBuf::from("ignored")),
            ..OutputOptions::default()
        };
        assert_eq!(explicit.target(&record), Some(PathBuf::from("x.md")));
        let named = OutputOptions {
            name: Some("custom".into()),
            ..OutputOptions::in_dir("out").with_suffix(".html")
        };
        assert_eq!(named.target(&record), Some(PathBuf::from("out/custom.html")));
    }

    #[test]
    fn test_write_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("content").join("publication");
        let delivery = record().write(&OutputOptions::in_dir(&base)).unwrap();

        let path = base.join("some-key.md");
        assert_eq!(delivery, Delivery::Written(path.clone()));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, record().frontmatter(FrontmatterFormat::Yaml).unwrap());
    }

    #[test]
    fn test_printed_page_matches_rendered_block() {
        let record = record();
        let mut out = Vec::new();
        record.write_to(&mut out, FrontmatterFormat::Toml).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(printed, record.frontmatter(FrontmatterFormat::Toml).unwrap());
        assert!(printed.starts_with("+++\nid = \"Some:Key\"\n"));
        assert!(printed.contains("authors = [\"Jürgen Groß\"]"));
        assert!(printed.ends_with("+++\n"));
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.md");
        let old = "old content that is much longer than the new one".repeat(50);
        std::fs::write(&path, old).unwrap();

        record().write(&OutputOptions::to_path(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("---\n"));
        assert!(!written.contains("old content"));
    }
}
