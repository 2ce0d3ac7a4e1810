//! Saved course directory
//!
//! Finished statement lists are kept as `<course>.json` files in one
//! directory, by default `saved_course_jsons/`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::StatementFile;

/// Directory of saved statement lists
pub struct CourseLibrary {
    root: PathBuf,
}

impl CourseLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names ending in `.json`, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).with_context(|| {
            format!("Failed to read saved course directory: {}", self.root.display())
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    files.push(name.to_string());
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Resolves a statement list by path or saved file name
    ///
    /// An existing path wins; otherwise the name is looked up in the
    /// library, with `.json` appended when it has no extension.
    pub fn resolve(&self, name: &str) -> Result<StatementFile> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Ok(StatementFile::new(direct));
        }

        let mut saved = self.root.join(name);
        if saved.extension().is_none() {
            saved.set_extension("json");
        }

        if saved.is_file() {
            Ok(StatementFile::new(saved))
        } else {
            anyhow::bail!(
                "Statement list not found: {} (also looked in {})",
                name,
                self.root.display()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library_with(files: &[&str]) -> (TempDir, CourseLibrary) {
        let dir = TempDir::new().unwrap();
        for file in files {
            fs::write(dir.path().join(file), "[]").unwrap();
        }
        let library = CourseLibrary::new(dir.path());
        (dir, library)
    }

    #[test]
    fn lists_only_json_files_sorted() {
        let (dir, library) = library_with(&["real_analysis.json", "notes.txt", "measure.json"]);
        fs::create_dir(dir.path().join("archive.json")).unwrap();

        assert_eq!(
            library.list().unwrap(),
            vec!["measure.json".to_string(), "real_analysis.json".to_string()]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let library = CourseLibrary::new(dir.path().join("nope"));
        assert!(library.list().is_err());
    }

    #[test]
    fn resolves_saved_name_with_or_without_extension() {
        let (dir, library) = library_with(&["measure.json"]);
        let expected = dir.path().join("measure.json");

        assert_eq!(library.resolve("measure.json").unwrap().path(), expected);
        assert_eq!(library.resolve("measure").unwrap().path(), expected);
    }

    #[test]
    fn existing_path_takes_precedence() {
        let (_dir, library) = library_with(&[]);
        let other = TempDir::new().unwrap();
        let path = other.path().join("elsewhere.json");
        fs::write(&path, "[]").unwrap();

        let file = library.resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(file.path(), path);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let (_dir, library) = library_with(&["measure.json"]);
        assert!(library.resolve("topology").is_err());
    }
}
