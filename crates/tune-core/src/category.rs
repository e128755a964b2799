//! Category tables (genre, theme, mood) mapping a label to the keywords that
//! describe it. Tables are loaded once from TOML data files and never mutated;
//! iteration order is file order, which is also the tie-break order when
//! matching.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{kind} mapping has no categories")]
    Empty { kind: AttributeKind },
    #[error("{kind} mapping has a category with a blank name")]
    BlankName { kind: AttributeKind },
    #[error("{kind} mapping lists \"{name}\" more than once")]
    Duplicate { kind: AttributeKind, name: String },
    #[error("{kind} category \"{name}\" has no keywords")]
    NoKeywords { kind: AttributeKind, name: String },
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {kind} mapping: {source}")]
    Parse { kind: AttributeKind, source: toml::de::Error },
}

/// Which of the three independent tables a mapping belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind { Genre, Theme, Mood }

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] = [AttributeKind::Genre, AttributeKind::Theme, AttributeKind::Mood];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::Genre => "genre",
            AttributeKind::Theme => "theme",
            AttributeKind::Mood => "mood",
        }
    }

    /// Data file holding this table inside the categories directory.
    pub fn file_name(self) -> &'static str {
        match self {
            AttributeKind::Genre => "genre.toml",
            AttributeKind::Theme => "theme.toml",
            AttributeKind::Mood => "mood.toml",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for AttributeKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "genre" => Ok(AttributeKind::Genre),
            "theme" => Ok(AttributeKind::Theme),
            "mood" => Ok(AttributeKind::Mood),
            other => Err(format!("unknown attribute kind: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Category { pub name: String, pub keywords: Vec<String> }

impl Category {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self { name: name.into(), keywords: keywords.iter().map(|k| k.to_string()).collect() }
    }

    /// Keywords joined by single spaces; this is what gets embedded.
    pub fn description(&self) -> String { self.keywords.join(" ") }
}

#[derive(Deserialize)]
struct MappingFile { category: Vec<Category> }

/// Non-empty, uniquely-keyed table of categories.
#[derive(Clone, Debug)]
pub struct CategoryMapping { kind: AttributeKind, categories: Vec<Category> }

impl CategoryMapping {
    pub fn new(kind: AttributeKind, categories: Vec<Category>) -> Result<Self, CategoryError> {
        if categories.is_empty() {
            return Err(CategoryError::Empty { kind });
        }
        let mut seen = HashSet::new();
        for c in &categories {
            if c.name.trim().is_empty() {
                return Err(CategoryError::BlankName { kind });
            }
            if !seen.insert(c.name.as_str()) {
                return Err(CategoryError::Duplicate { kind, name: c.name.clone() });
            }
            if c.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(CategoryError::NoKeywords { kind, name: c.name.clone() });
            }
        }
        Ok(Self { kind, categories })
    }

    pub fn from_toml_str(kind: AttributeKind, src: &str) -> Result<Self, CategoryError> {
        let file: MappingFile = toml::from_str(src).map_err(|source| CategoryError::Parse { kind, source })?;
        Self::new(kind, file.category)
    }

    pub fn load(kind: AttributeKind, path: &Path) -> Result<Self, CategoryError> {
        let src = std::fs::read_to_string(path)
            .map_err(|source| CategoryError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(kind, &src)
    }

    pub fn kind(&self) -> AttributeKind { self.kind }
    pub fn len(&self) -> usize { self.categories.len() }
    pub fn is_empty(&self) -> bool { self.categories.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, Category> { self.categories.iter() }
    pub fn names(&self) -> impl Iterator<Item = &str> { self.categories.iter().map(|c| c.name.as_str()) }
    pub fn get(&self, name: &str) -> Option<&Category> { self.categories.iter().find(|c| c.name == name) }
}

impl<'a> IntoIterator for &'a CategoryMapping {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;
    fn into_iter(self) -> Self::IntoIter { self.categories.iter() }
}

/// The three tables used to tag an image.
#[derive(Clone, Debug)]
pub struct CategorySet { pub genre: CategoryMapping, pub theme: CategoryMapping, pub mood: CategoryMapping }

impl CategorySet {
    /// Reads `genre.toml`, `theme.toml` and `mood.toml` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, CategoryError> {
        let load = |kind: AttributeKind| CategoryMapping::load(kind, &dir.join(kind.file_name()));
        Ok(Self {
            genre: load(AttributeKind::Genre)?,
            theme: load(AttributeKind::Theme)?,
            mood: load(AttributeKind::Mood)?,
        })
    }

    pub fn get(&self, kind: AttributeKind) -> &CategoryMapping {
        match kind {
            AttributeKind::Genre => &self.genre,
            AttributeKind::Theme => &self.theme,
            AttributeKind::Mood => &self.mood,
        }
    }
}
