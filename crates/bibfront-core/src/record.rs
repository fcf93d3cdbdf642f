//! One bibliographic entry and the frontmatter derived from it

use std::fs;
use std::path::Path;

use bibfront_bibtex::{decode_latex, parse, BibTeXEntry};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fields::{
    dummy_date, is_conference, remove_enclosing_braces, slugify, split_list, to_single_line,
};
use crate::policy::OverridePolicy;
use crate::render::{render, FrontmatterFormat};

/// Insertion-ordered field mapping emitted as frontmatter
pub type Frontmatter = serde_json::Map<String, Value>;

pub type Derivation = fn(&PublicationRecord<'_>) -> Result<Value>;

/// Layer-1 fields in output order, each with the rule that derives it
pub const FRONTMATTER_FIELDS: [(&str, Derivation); 11] = [
    ("id", |r| Ok(r.id().into())),
    ("title", |r| r.title().map(Value::from)),
    ("date", |r| r.date().map(Value::from)),
    ("authors", |r| r.authors().map(Value::from)),
    ("doi", |r| Ok(r.doi().into())),
    ("publication", |r| r.publication().map(Value::from)),
    ("publication_types", |r| r.publication_types().map(Value::from)),
    ("selected", |r| Ok(r.selected().into())),
    ("tags", |r| Ok(r.tags().into())),
    ("projects", |r| Ok(r.projects().into())),
    ("math", |r| Ok(r.math().into())),
];

/// A BibTeX entry together with the (optional) override policy of the run.
///
/// All output fields are computed on demand; nothing is cached or mutated.
#[derive(Debug, Clone)]
pub struct PublicationRecord<'p> {
    entry: BibTeXEntry,
    policy: Option<&'p OverridePolicy>,
}

impl<'p> PublicationRecord<'p> {
    pub fn new(entry: BibTeXEntry, policy: Option<&'p OverridePolicy>) -> Self {
        Self { entry, policy }
    }

    /// Read a `.bib` file and wrap every entry, in source order.
    ///
    /// Entries the parser had to skip are logged; a source that yields no
    /// entries but did produce parse errors is rejected.
    pub fn from_path(
        path: impl AsRef<Path>,
        policy: Option<&'p OverridePolicy>,
    ) -> Result<Vec<Self>> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let parsed = parse(&source).map_err(|e| Error::MalformedSource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if parsed.entries.is_empty() {
            if let Some(first) = parsed.errors.first() {
                return Err(Error::MalformedSource {
                    path: path.to_path_buf(),
                    message: format!("line {}: {}", first.line, first.message),
                });
            }
        }
        for err in &parsed.errors {
            warn!(path = %path.display(), line = err.line, "{}", err.message);
        }
        debug!(path = %path.display(), entries = parsed.entries.len(), "parsed BibTeX source");

        Ok(parsed
            .entries
            .into_iter()
            .map(|entry| Self::new(entry, policy))
            .collect())
    }

    pub fn entry(&self) -> &BibTeXEntry {
        &self.entry
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.entry.get_field(key)
    }

    fn required(&self, key: &'static str) -> Result<&str> {
        self.field(key).ok_or_else(|| Error::MissingField {
            id: self.id().to_string(),
            field: key,
        })
    }

    // ===== Derived fields =====

    pub fn id(&self) -> &str {
        &self.entry.cite_key
    }

    /// The author field as one decoded string, with the collaboration
    /// appended in parentheses. Always a single-element list.
    pub fn authors(&self) -> Result<Vec<String>> {
        let raw = self.required("author")?;
        let mut authors = decode_latex(remove_enclosing_braces(&to_single_line(raw)));

        if let Some(collaboration) = self.field("collaboration").filter(|c| !c.is_empty()) {
            authors = format!("{authors} ({collaboration})");
        }

        Ok(vec![authors])
    }

    /// Title, single-line and brace-stripped. No LaTeX decoding.
    pub fn title(&self) -> Result<String> {
        let raw = self.required("title")?;
        Ok(remove_enclosing_braces(&to_single_line(raw)).to_string())
    }

    pub fn doi(&self) -> String {
        self.field("doi").unwrap_or_default().to_string()
    }

    /// Items of the `keyword` field (singular in BibTeX)
    pub fn keywords(&self) -> Vec<String> {
        split_list(self.field("keyword").unwrap_or_default())
    }

    /// `"1"` for articles, `"2"` for conference venues; both may apply.
    pub fn publication_types(&self) -> Result<Vec<String>> {
        let journal = self.required("journal")?;
        let mut types = Vec::new();
        if self.entry.is_article() {
            types.push("1".to_string());
        }
        if is_conference(journal) {
            types.push("2".to_string());
        }
        Ok(types)
    }

    pub fn selected(&self) -> bool {
        self.keywords().iter().any(|keyword| keyword == "selected")
    }

    pub fn tags(&self) -> Vec<String> {
        split_list(self.field("hugotags").unwrap_or_default())
    }

    pub fn projects(&self) -> Vec<String> {
        split_list(self.field("hugoprojects").unwrap_or_default())
    }

    pub fn publication(&self) -> Result<String> {
        let journal = self.required("journal")?;
        let volume = self.required("volume")?;
        Ok(format!("In: *{journal}* {volume}"))
    }

    pub fn publication_short(&self) -> Result<String> {
        self.publication()
    }

    pub fn date(&self) -> Result<String> {
        self.required("year").map(dummy_date)
    }

    pub fn math(&self) -> bool {
        true
    }

    /// Page name: `hugoname` when given, else [`fallback_name`](Self::fallback_name)
    pub fn name(&self) -> String {
        match self.field("hugoname") {
            Some(name) => name.to_string(),
            None => self.fallback_name(),
        }
    }

    // TODO replace with a real slugifier once page URLs need to be stable
    // across ID renames
    pub fn fallback_name(&self) -> String {
        slugify(self.id())
    }

    // ===== Layers =====

    /// Layer 1: fields derived from the entry alone
    pub fn derived_fields(&self) -> Result<Frontmatter> {
        FRONTMATTER_FIELDS
            .iter()
            .map(|(key, derive)| Ok((key.to_string(), derive(self)?)))
            .collect()
    }

    /// Layers 2 and 3 for this entry: project/selection inference followed
    /// by the explicit patch.
    pub fn policy_overrides(&self, policy: &OverridePolicy) -> Frontmatter {
        let id = self.id();
        let mut updates = Frontmatter::new();

        let projects_bib = self.projects();
        for project in policy.projects() {
            if project.contains(id) && !projects_bib.contains(&project.name) {
                // reassigned, not accumulated: the last matching project wins
                let mut projects = vec![project.name.clone()];
                projects.extend(projects_bib.iter().cloned());
                updates.insert("projects".to_string(), projects.into());
            }
        }
        if policy.is_selected(id) {
            updates.insert("selected".to_string(), true.into());
        }

        let patch = policy.patch_for(id);
        if !patch.is_empty() {
            debug!(id, fields = patch.len(), "applying explicit patch");
        }
        updates.extend(patch.into_owned());

        updates
    }

    /// The merged field mapping. Without a policy this is exactly layer 1.
    pub fn to_frontmatter(&self) -> Result<Frontmatter> {
        let mut fields = self.derived_fields()?;
        if let Some(policy) = self.policy {
            // existing keys keep their position, new keys go last
            fields.extend(self.policy_overrides(policy));
        }
        Ok(fields)
    }

    // ===== Rendering =====

    /// Delimited frontmatter block in the requested format
    pub fn frontmatter(&self, format: FrontmatterFormat) -> Result<String> {
        render(&self.to_frontmatter()?, format)
    }

    /// The bare YAML mapping, without delimiters
    pub fn to_yaml(&self) -> Result<String> {
        FrontmatterFormat::Yaml.serialize(&self.to_frontmatter()?)
    }
}
