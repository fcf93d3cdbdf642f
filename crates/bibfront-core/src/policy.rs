//! User-authored overrides keyed by entry ID
//!
//! The policy holds three tables, all optional in the settings file:
//!
//! ```toml
//! selected = ["key1", "key3"]
//!
//! [projects]
//! my-project-1 = ["key1", "key2"]
//!
//! [updates.key1]
//! abstract = "This is the abstract for the entry `key1`"
//! ```
//!
//! IDs that do not appear in the BibTeX source are simply never looked up.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::record::Frontmatter;

/// A named project and the entry IDs that belong to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub members: Vec<String>,
}

impl Project {
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|member| member == id)
    }
}

/// Read-only override tables shared by every record of a run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverridePolicy {
    /// Projects in the order the settings file lists them
    #[serde(deserialize_with = "deserialize_projects")]
    projects: Vec<Project>,
    selected: HashSet<String>,
    updates: HashMap<String, Frontmatter>,
}

impl OverridePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a project
    pub fn with_project<I, S>(mut self, name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let ids = ids.into_iter().map(Into::into);
        match self.projects.iter_mut().find(|p| p.name == name) {
            Some(project) => project.members.extend(ids),
            None => self.projects.push(Project {
                name,
                members: ids.collect(),
            }),
        }
        self
    }

    pub fn with_selected(mut self, id: impl Into<String>) -> Self {
        self.selected.insert(id.into());
        self
    }

    /// Set one patched field for an entry
    pub fn with_update(
        mut self,
        id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.updates
            .entry(id.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// All projects, in declaration order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Names of the projects whose ID list contains `id`
    pub fn projects_for(&self, id: &str) -> Vec<&str> {
        self.projects
            .iter()
            .filter(|project| project.contains(id))
            .map(|project| project.name.as_str())
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// The explicit patch for `id`; empty when there is none
    pub fn patch_for(&self, id: &str) -> Cow<'_, Frontmatter> {
        match self.updates.get(id) {
            Some(patch) => Cow::Borrowed(patch),
            None => Cow::Owned(Frontmatter::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.selected.is_empty() && self.updates.is_empty()
    }

    /// Every entry ID mentioned anywhere in the policy, sorted
    pub fn referenced_ids(&self) -> BTreeSet<&str> {
        self.projects
            .iter()
            .flat_map(|project| project.members.iter())
            .chain(self.selected.iter())
            .chain(self.updates.keys())
            .map(String::as_str)
            .collect()
    }
}

/// Deserialize the `projects` table keeping document order, which decides
/// the outcome when several projects claim the same entry.
fn deserialize_projects<'de, D>(deserializer: D) -> Result<Vec<Project>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ProjectsVisitor;

    impl<'de> Visitor<'de> for ProjectsVisitor {
        type Value = Vec<Project>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of project name to a list of entry IDs")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut projects = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, members)) = map.next_entry::<String, Vec<String>>()? {
                projects.push(Project { name, members });
            }
            Ok(projects)
        }
    }

    deserializer.deserialize_map(ProjectsVisitor)
}
