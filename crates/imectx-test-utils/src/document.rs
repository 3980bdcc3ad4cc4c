//! Source document fixtures.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Character (not byte) index of the first occurrence of `needle` in `text`.
///
/// Panics if `needle` is absent, which is always a broken fixture.
pub fn char_offset(text: &str, needle: &str) -> i64 {
    let byte = text
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in fixture {text:?}"));
    text[..byte].chars().count() as i64
}

/// A source file written into its own temporary directory.
///
/// The directory is deleted when this value is dropped, even on panic.
pub struct TestDocument {
    pub path: PathBuf,
    temp_dir: TempDir,
}

impl TestDocument {
    /// Write `content` to a file called `file_name` in a fresh temp dir.
    pub async fn write(file_name: &str, content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join(file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .expect("failed to create document directory");
        }
        tokio::fs::write(&path, content)
            .await
            .expect("failed to write test document");
        Self {
            path,
            temp_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the document, for sibling files such as configs.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offset_counts_characters() {
        let text = r#"val msg = "你好世界""#;
        assert_eq!(char_offset(text, "你"), 11);
        assert_eq!(char_offset("中文abc", "abc"), 2);
    }

    #[tokio::test]
    async fn test_document_is_written() {
        let doc = TestDocument::write(".git/COMMIT_EDITMSG", "fix").await;
        assert!(doc.path().ends_with(".git/COMMIT_EDITMSG"));
        let content = tokio::fs::read_to_string(doc.path()).await.unwrap();
        assert_eq!(content, "fix");
        assert!(doc.path().starts_with(doc.dir()));
    }
}
