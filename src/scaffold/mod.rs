//! Template scaffolding for the new repository
//!
//! Renders a small file tree into the target directory before the initial
//! commit. The built-in templates are embedded in the binary; a template
//! directory on disk can be used instead, in which case every file under it
//! is rendered to the same relative path.
//!
//! Placeholders look like `{{ name }}`. Unknown placeholders are left as is.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

const README_TEMPLATE: &str = include_str!("templates/README.md");
const GITIGNORE_TEMPLATE: &str = include_str!("templates/gitignore");
const CHANGELOG_TEMPLATE: &str = include_str!("templates/CHANGELOG.md");

/// Built-in templates as (relative output path, template text).
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("README.md", README_TEMPLATE),
    (".gitignore", GITIGNORE_TEMPLATE),
    ("CHANGELOG.md", CHANGELOG_TEMPLATE),
];

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

/// Errors while materializing the template tree.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("template directory not found: {}", .0.display())]
    MissingTemplates(PathBuf),

    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Variable bindings available to templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
    /// The standard bindings: repository `name` and `generated_on` date.
    pub fn new(name: &str, generated_on: chrono::NaiveDate) -> Self {
        let mut vars = Self::default();
        vars.insert("name", name);
        vars.insert("generated_on", &generated_on.format("%Y-%m-%d").to_string());
        vars
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Substitute placeholders; the result always ends with a newline.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut rendered = placeholder_pattern()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned();
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

/// Writes the initial file tree of a new repository.
pub trait Scaffold {
    /// Render every template under `target`, returning the written paths.
    fn scaffold(&self, target: &Path, vars: &TemplateVars) -> Result<Vec<PathBuf>, ScaffoldError>;
}

/// Where templates come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    #[default]
    Builtin,
    Directory(PathBuf),
}

/// [`Scaffold`] implementation rendering built-in or on-disk templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateScaffolder {
    source: TemplateSource,
}

impl TemplateScaffolder {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    fn load_templates(&self) -> Result<Vec<(PathBuf, String)>, ScaffoldError> {
        match &self.source {
            TemplateSource::Builtin => Ok(BUILTIN_TEMPLATES
                .iter()
                .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                .collect()),
            TemplateSource::Directory(root) => {
                if !root.is_dir() {
                    return Err(ScaffoldError::MissingTemplates(root.clone()));
                }
                let mut files = collect_files(root)?;
                files.sort();
                files
                    .into_iter()
                    .map(|relative| {
                        let path = root.join(&relative);
                        std::fs::read_to_string(&path)
                            .map(|text| (relative, text))
                            .map_err(|source| ScaffoldError::Read { path, source })
                    })
                    .collect()
            }
        }
    }
}

impl Scaffold for TemplateScaffolder {
    fn scaffold(&self, target: &Path, vars: &TemplateVars) -> Result<Vec<PathBuf>, ScaffoldError> {
        let mut written = Vec::new();
        for (relative, template) in self.load_templates()? {
            let output = target.join(&relative);
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ScaffoldError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&output, render(&template, vars)).map_err(|source| {
                ScaffoldError::Write {
                    path: output.clone(),
                    source,
                }
            })?;
            debug!("Rendered {}", output.display());
            written.push(relative);
        }
        Ok(written)
    }
}

/// Regular files under `root`, relative to it. Symlinks are not followed.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|err| ScaffoldError::Read {
            path: err.path().unwrap_or(root).to_path_buf(),
            source: err.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}
