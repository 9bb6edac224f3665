// WHY: Documents are matched one line at a time, and the character after a closing
// bracket decides whether it is a candidate. Lines therefore keep their terminators

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const READ_BUFFER_BYTES: usize = 8192;

/// A document as lines that still end in `\n` (or `\r\n`); only the last may lack one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLines {
    lines: Vec<String>,
}

impl DocumentLines {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.lines.iter().map(String::len).sum()
    }

    /// The original text, byte for byte
    pub fn into_text(self) -> String {
        self.lines.concat()
    }
}

/// Read a document line by line. Invalid UTF-8 is an error naming the line
pub async fn read_document_lines(path: impl AsRef<Path>) -> Result<DocumentLines> {
    let path = path.as_ref();
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open document {}", path.display()))?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_BYTES, file);

    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .with_context(|| format!("Cannot decode {} at line {}", path.display(), lines.len() + 1))?;
        if read == 0 {
            break;
        }
        lines.push(line);
    }

    let document = DocumentLines { lines };
    debug!(
        "Read {}: {} lines, {} bytes",
        path.display(),
        document.len(),
        document.byte_len()
    );
    Ok(document)
}

/// Whole document text, unchanged
pub async fn read_document(path: impl AsRef<Path>) -> Result<String> {
    Ok(read_document_lines(path).await?.into_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lines_keep_terminators() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abstract.txt");
        tokio::fs::write(&path, "Tumor necrosis factor (TNF)\nlevels rose.").await.unwrap();

        let document = read_document_lines(&path).await.unwrap();
        let lines: Vec<&str> = document.iter().collect();
        assert_eq!(lines, vec!["Tumor necrosis factor (TNF)\n", "levels rose."]);
        assert_eq!(document.byte_len(), 40);
        assert_eq!(read_document(&path).await.unwrap(), "Tumor necrosis factor (TNF)\nlevels rose.");
    }

    #[test]
    fn test_from_text_keeps_crlf() {
        let document = DocumentLines::from_text("Interleukin 6 (IL6)\r\nrose\n");
        let lines: Vec<&str> = document.iter().collect();
        assert_eq!(lines, vec!["Interleukin 6 (IL6)\r\n", "rose\n"]);
        assert!(DocumentLines::from_text("").is_empty());
    }

    #[tokio::test]
    async fn test_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_document_lines(temp_dir.path().join("missing.txt")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open document"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_names_the_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.txt");
        std::fs::write(&path, [b'o', b'k', b'\n', 0xFF, 0xFE]).unwrap();

        let err = read_document(&path).await.unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
