//! Source tree scanning into an immutable, queryable model.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::facts::{ClassFacts, FileFacts};
use super::java::JavaReader;

/// A read-only projection of every parseable Java file under one root.
///
/// Built once per analysis run; the analyzers share it and never mutate it.
/// Files that cannot be read or parsed are skipped with a warning so a
/// single defective file never aborts the run.
pub struct SourceModel {
    root: PathBuf,
    files: Vec<FileFacts>,
    by_path: HashMap<String, usize>,
}

impl SourceModel {
    /// Scan a source tree.
    ///
    /// A missing root yields an empty model (with a warning) rather than an
    /// error; every analyzer then degrades to an empty result.
    pub fn scan(root: &Path) -> Self {
        let reader = JavaReader::new();
        let mut files = Vec::new();

        if !root.exists() {
            log::warn!("source root does not exist: {}", root.display());
            return Self::from_files(root, files);
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "java")
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect();
        paths.sort();

        for path in paths {
            let source = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::warn!("could not open file {}: {}", path.display(), err);
                    continue;
                }
            };
            let rel = path.strip_prefix(root).unwrap_or(&path);
            match reader.read_file(rel, &source) {
                Ok(facts) => {
                    if facts.has_parse_errors {
                        log::warn!("parse errors in {}; facts may be partial", rel.display());
                    }
                    files.push(facts);
                }
                Err(err) => {
                    log::warn!("skipping unreadable source {}: {}", rel.display(), err);
                }
            }
        }

        Self::from_files(root, files)
    }

    fn from_files(root: &Path, files: Vec<FileFacts>) -> Self {
        let by_path = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path.clone(), i))
            .collect();
        Self {
            root: root.to_path_buf(),
            files,
            by_path,
        }
    }

    /// The scanned root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All scanned files, in sorted path order.
    pub fn files(&self) -> &[FileFacts] {
        &self.files
    }

    /// All classes across all files, in file order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassFacts> {
        self.files.iter().flat_map(|f| f.classes.iter())
    }

    /// Facts for one file, looked up by its path relative to the root.
    pub fn file(&self, rel_path: &str) -> Option<&FileFacts> {
        self.by_path.get(rel_path).map(|&i| &self.files[i])
    }

    /// Imports of one file, looked up by its path relative to the root.
    pub fn imports_of(&self, rel_path: &str) -> Option<&[String]> {
        self.file(rel_path).map(|f| f.imports.as_slice())
    }

    /// Number of scanned files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the model contains no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_collects_sorted_files() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("com").join("example");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("B.java"),
            "package com.example;\nimport java.util.List;\npublic class B {}\n",
        )
        .unwrap();
        fs::write(pkg.join("A.java"), "package com.example;\npublic class A {}\n").unwrap();

        let model = SourceModel::scan(temp.path());
        assert_eq!(model.len(), 2);
        assert_eq!(model.files()[0].path, "com/example/A.java");
        assert_eq!(
            model.imports_of("com/example/B.java"),
            Some(&["java.util.List".to_string()][..])
        );
    }

    #[test]
    fn test_missing_root_yields_empty_model() {
        let model = SourceModel::scan(Path::new("/nonexistent/archmap-test-root"));
        assert!(model.is_empty());
    }

    #[test]
    fn test_non_java_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "not java").unwrap();
        fs::write(temp.path().join("A.java"), "public class A {}").unwrap();

        let model = SourceModel::scan(temp.path());
        assert_eq!(model.len(), 1);
    }
}
