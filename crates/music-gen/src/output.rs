use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How generated clips are placed under the output directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNaming {
    /// `<root>/<job-uuid>/output_<i>.wav`; concurrent jobs never share a file.
    #[default]
    PerJob,
    /// `<root>/output_<i>.wav`; a later job overwrites an earlier one.
    Positional,
}

pub fn clip_file_name(index: usize) -> String {
    format!("output_{index}.wav")
}

#[derive(Clone, Debug)]
pub struct OutputLayout { root: PathBuf, naming: OutputNaming }

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, naming: OutputNaming) -> Self {
        Self { root: root.into(), naming }
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn naming(&self) -> OutputNaming { self.naming }

    /// Directory for one generation job. Not created here.
    pub fn job_dir(&self) -> PathBuf {
        match self.naming {
            OutputNaming::PerJob => self.root.join(Uuid::new_v4().to_string()),
            OutputNaming::Positional => self.root.clone(),
        }
    }
}
