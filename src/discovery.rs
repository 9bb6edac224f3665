use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration for document discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Stop at the first inaccessible path instead of recording it
    pub fail_fast: bool,
    /// File extension of documents, without the dot
    pub extension: String,
    /// Descend into subdirectories instead of listing only the root
    pub recursive: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            extension: "txt".to_string(),
            recursive: false,
        }
    }
}

/// Result of validating one discovered path
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Stream every `*.<extension>` file in `root_dir` (or below it when recursive),
/// validated one at a time
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();
    futures::stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move { state.next_file().await.map(|result| (result, state)) },
    )
}

/// Glob for the configured documents; the root is escaped so its own `[`, `*` or `?` match literally
fn discovery_pattern(root_dir: &Path, config: &DiscoveryConfig) -> String {
    let root = glob::Pattern::escape(&root_dir.to_string_lossy());
    let extension = glob::Pattern::escape(&config.extension);
    if config.recursive {
        format!("{root}/**/*.{extension}")
    } else {
        format!("{root}/*.{extension}")
    }
}

struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        if self.glob_iter.is_none() {
            let pattern = discovery_pattern(&self.root_dir, &self.config);
            debug!("Starting document discovery with pattern: {}", pattern);
            match glob(&pattern) {
                Ok(paths) => self.glob_iter = Some(paths),
                Err(e) => return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e))),
            }
        }

        loop {
            let glob_iter = self.glob_iter.as_mut()?;
            match glob_iter.next()? {
                Ok(path) => return Some(self.validate_file(path).await),
                Err(e) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);
                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
            }
        }
    }

    async fn validate_file(&self, path: PathBuf) -> Result<FileValidation> {
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(FileValidation { path, error: None }),
            Ok(_) => {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                Ok(FileValidation { path, error: Some(error) })
            }
            Err(e) => {
                let error = format!("Cannot access file {}: {}", path.display(), e);
                warn!("{}", error);
                if self.config.fail_fast {
                    return Err(anyhow::anyhow!(error));
                }
                Ok(FileValidation { path, error: Some(error) })
            }
        }
    }
}

/// Collect the discovery stream, sorted by path
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(root_dir, config));
    while let Some(result) = stream.next().await {
        files.push(result?);
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let invalid_count = files.iter().filter(|f| f.error.is_some()).count();
    if invalid_count > 0 {
        warn!("Found {} documents with validation issues", invalid_count);
    }
    info!("Document discovery summary: {} valid, {} invalid", files.len() - invalid_count, invalid_count);
    Ok(files)
}

/// Paths of all valid `.txt` documents under `root_dir`
pub async fn find_text_files<P: AsRef<Path>>(root_dir: P) -> Result<Vec<PathBuf>> {
    let validations = collect_discovered_files(root_dir, DiscoveryConfig::default()).await?;
    Ok(validations
        .into_iter()
        .filter(|v| v.error.is_none())
        .map(|v| v.path)
        .collect())
}
