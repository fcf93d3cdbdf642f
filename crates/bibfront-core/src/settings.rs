//! Settings for a conversion run
//!
//! Loaded once at startup and passed down explicitly. The file carries the
//! source/output locations and the override tables:
//!
//! ```toml
//! site_dir = "/path/to/your/webpage"
//! bib_dir = "."
//! selected = ["key1", "key3"]
//!
//! [projects]
//! my-project-1 = ["key1", "key2"]
//! my-project-2 = ["key3", "key4"]
//!
//! [updates.key1]
//! abstract = "This is the abstract for the entry `key1`"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::policy::OverridePolicy;

/// File looked up in the working directory when none is named
pub const DEFAULT_SETTINGS_FILE: &str = "bibfront.toml";

/// Output location relative to the site directory
const PUBLICATION_SECTION: &str = "content/publication";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the `.bib` sources
    pub bib_dir: PathBuf,
    /// Root of the static site
    pub site_dir: Option<PathBuf>,
    /// Where pages are written; derived from `site_dir` when unset
    pub output_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub overrides: OverridePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bib_dir: PathBuf::from("."),
            site_dir: None,
            output_dir: None,
            overrides: OverridePolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings from TOML, JSON or YAML, chosen by file extension
    /// (TOML when there is none).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        let parsed = match extension.as_deref() {
            Some("json") => Self::from_json(&text).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => Self::from_yaml(&text).map_err(|e| e.to_string()),
            _ => Self::from_toml(&text).map_err(|e| e.to_string()),
        };
        let settings = parsed.map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Native TOML dates and times become plain strings, so a patched
    /// `date = 2021-05-03` renders like any other scalar.
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut table: toml::Table = toml::from_str(text)?;
        table.iter_mut().map(|(_, v)| v).for_each(stringify_datetimes);
        toml::Value::Table(table).try_into()
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Output directory: explicit, else `<site_dir>/content/publication`,
    /// else `content/publication`
    pub fn output_dir(&self) -> PathBuf {
        match (&self.output_dir, &self.site_dir) {
            (Some(dir), _) => dir.clone(),
            (None, Some(site)) => site.join(PUBLICATION_SECTION),
            (None, None) => PathBuf::from(PUBLICATION_SECTION),
        }
    }
}

fn stringify_datetimes(value: &mut toml::Value) {
    match value {
        toml::Value::Datetime(datetime) => {
            let text = datetime.to_string();
            *value = toml::Value::String(text);
        }
        toml::Value::Array(items) => items.iter_mut().for_each(stringify_datetimes),
        toml::Value::Table(table) => table.iter_mut().map(|(_, v)| v).for_each(stringify_datetimes),
        _ => {}
    }
}
