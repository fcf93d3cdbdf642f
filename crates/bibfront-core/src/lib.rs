//! Publication frontmatter for static sites
//!
//! Turns BibTeX entries into one frontmatter document per entry. Each
//! document is built in three layers:
//!
//! 1. fields derived from the entry itself
//! 2. overrides inferred from the [`OverridePolicy`] (project membership,
//!    selection)
//! 3. explicit per-entry patches from the policy
//!
//! Later layers overwrite earlier ones field by field.

pub mod convert;
pub mod error;
pub mod fields;
pub mod policy;
pub mod record;
pub mod render;
pub mod settings;

pub use convert::{convert, list_bib_files, ConversionReport, Destination};
pub use error::{Error, Result};
pub use policy::{OverridePolicy, Project};
pub use record::{Frontmatter, PublicationRecord, FRONTMATTER_FIELDS};
pub use render::{render, Delivery, FrontmatterFormat, OutputOptions};
pub use settings::{Settings, DEFAULT_SETTINGS_FILE};
