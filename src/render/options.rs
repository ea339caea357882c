//! Output options and configuration.

use std::path::{Path, PathBuf};

/// Where and how the dataset files are written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Directory receiving the dataset files and the image directory
    pub output_dir: PathBuf,

    /// JSON array file name
    pub json_file: String,

    /// Script file name
    pub script_file: String,

    /// Variable assigned in the script file
    pub variable: String,

    /// Image directory name, also the prefix recorded in `image` fields
    pub images_dir: String,
}

impl OutputOptions {
    /// Create new output options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the script variable name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Set the JSON and script file names.
    pub fn with_file_names(mut self, json_file: impl Into<String>, script_file: impl Into<String>) -> Self {
        self.json_file = json_file.into();
        self.script_file = script_file.into();
        self
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }

    pub fn script_path(&self) -> PathBuf {
        self.output_dir.join(&self.script_file)
    }

    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join(&self.images_dir)
    }

    /// Whether `path` names the script file rather than the JSON file.
    pub fn is_script(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|n| n == self.script_file.as_str())
            || path.extension().is_some_and(|e| e == "js")
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            json_file: "official_survey.json".to_string(),
            script_file: "questions.js".to_string(),
            variable: "questionData".to_string(),
            images_dir: "images".to_string(),
        }
    }
}
