//! Rule sources.
//!
//! A source supplies the current raw Public Suffix List text, or fails.
//! Where the text comes from (memory, a local file, a download) is opaque
//! to the slicer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use parking_lot::Mutex;

use crate::error::{Result, SlicerError, SourceErrorKind};
use crate::rules::RuleTable;

/// Default location of the Public Suffix List
pub const DEFAULT_LIST_URL: &str = "https://publicsuffix.org/list/effective_tld_names.dat";

/// Default local cache file for the downloaded list
pub const DEFAULT_CACHE_FILE: &str = ".suffixlist";

/// Trait for supplying raw rule text
pub trait RuleSource: Send + Sync {
    /// Return the current rule text
    fn fetch(&self) -> Result<String>;
}

/// In-memory rule source
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleSource {
    text: String,
}

impl MemoryRuleSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl RuleSource for MemoryRuleSource {
    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Nil rule source - always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NilRuleSource;

impl RuleSource for NilRuleSource {
    fn fetch(&self) -> Result<String> {
        Err(SlicerError::unavailable(
            SourceErrorKind::NotConfigured,
            "no rule source configured",
        ))
    }
}

/// Reads the list from a local file
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleSource for FileRuleSource {
    fn fetch(&self) -> Result<String> {
        read_list(&self.path)
    }
}

/// Local cached copy with download fallback.
///
/// An existing non-empty cache file is always used as-is. Otherwise the list
/// is downloaded, verified and moved into place before being read.
pub struct AutoRuleSource {
    pub cache_path: PathBuf,
    pub url: String,
    download_lock: Mutex<()>,
}

impl AutoRuleSource {
    /// Create a source using [`DEFAULT_CACHE_FILE`] and [`DEFAULT_LIST_URL`]
    pub fn new() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            url: DEFAULT_LIST_URL.to_string(),
            download_lock: Mutex::new(()),
        }
    }

    /// Set the local cache file
    pub fn with_cache_path(mut self, path: impl AsRef<Path>) -> Self {
        self.cache_path = path.as_ref().to_path_buf();
        self
    }

    /// Set a custom download URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Check if the cache file is missing or empty
    fn should_download(&self) -> bool {
        match fs::metadata(&self.cache_path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        }
    }

    /// Download the list into the cache file
    fn download(&self) -> Result<()> {
        let _lock = self.download_lock.lock();

        // Another caller may have finished the download while we waited
        if !self.should_download() {
            return Ok(());
        }

        info!(
            "Downloading public suffix list from {} to {}",
            self.url,
            self.cache_path.display()
        );

        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.cache_path.with_extension("tmp");

        let response = ureq::get(self.url.as_str()).call().map_err(|e| {
            SlicerError::unavailable(
                SourceErrorKind::DownloadFailed,
                format!("Download failed: {}", e),
            )
        })?;

        let mut file = fs::File::create(&tmp_path)?;
        let (_, body) = response.into_parts();
        let mut reader = body.into_reader();
        std::io::copy(&mut reader, &mut file)?;
        file.flush()?;
        drop(file);

        if let Err(e) = verify_list(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SlicerError::unavailable(
                SourceErrorKind::DownloadFailed,
                format!("Verification failed: {}", e),
            ));
        }

        fs::rename(&tmp_path, &self.cache_path)?;

        info!("Downloaded {} successfully", self.cache_path.display());
        Ok(())
    }

    /// Delete the local cache file, if present
    pub fn remove_local_copy(&self) -> Result<()> {
        match fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for AutoRuleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSource for AutoRuleSource {
    fn fetch(&self) -> Result<String> {
        if self.should_download() {
            if let Err(e) = self.download() {
                warn!("Failed to download public suffix list: {}", e);
                return Err(e);
            }
        }
        read_list(&self.cache_path)
    }
}

/// Read list text from a file
fn read_list(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        SlicerError::unavailable(
            SourceErrorKind::FileError,
            format!("Failed to read rules file '{}': {}", path.display(), e),
        )
    })
}

/// Verify that a downloaded list holds at least one rule
fn verify_list(path: &Path) -> Result<()> {
    let text = read_list(path)?;
    if RuleTable::parse(&text).is_empty() {
        return Err(SlicerError::unavailable(
            SourceErrorKind::InvalidData,
            format!("'{}' contains no rules", path.display()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source() {
        let source = MemoryRuleSource::new("com\nnet\n");
        assert_eq!(source.fetch().unwrap(), "com\nnet\n");
    }

    #[test]
    fn test_nil_source() {
        let err = NilRuleSource.fetch().unwrap_err();
        assert_eq!(err.source_kind(), Some(SourceErrorKind::NotConfigured));
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.dat");
        fs::write(&path, "// comment\ncom\n").unwrap();

        let source = FileRuleSource::new(&path);
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.fetch().unwrap(), "// comment\ncom\n");
    }

    #[test]
    fn test_file_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileRuleSource::new(dir.path().join("missing.dat"));
        let err = source.fetch().unwrap_err();
        assert_eq!(err.source_kind(), Some(SourceErrorKind::FileError));
    }

    #[test]
    fn test_auto_source_builder() {
        let source = AutoRuleSource::new()
            .with_cache_path("/tmp/test/.suffixlist")
            .with_url("http://example.com/list.dat");

        assert_eq!(source.cache_path, PathBuf::from("/tmp/test/.suffixlist"));
        assert_eq!(source.url, "http://example.com/list.dat");
        assert_eq!(AutoRuleSource::default().url, DEFAULT_LIST_URL);
    }

    #[test]
    fn test_auto_source_uses_existing_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CACHE_FILE);
        fs::write(&path, "com\n").unwrap();

        // The URL is never contacted while a local copy exists
        let source = AutoRuleSource::new()
            .with_cache_path(&path)
            .with_url("http://127.0.0.1:9/unreachable");
        assert_eq!(source.fetch().unwrap(), "com\n");
    }

    #[test]
    fn test_auto_source_download_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = AutoRuleSource::new()
            .with_cache_path(dir.path().join(DEFAULT_CACHE_FILE))
            .with_url("http://127.0.0.1:9/unreachable");

        let err = source.fetch().unwrap_err();
        assert_eq!(err.source_kind(), Some(SourceErrorKind::DownloadFailed));
    }

    #[test]
    fn test_remove_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CACHE_FILE);
        fs::write(&path, "com\n").unwrap();

        let source = AutoRuleSource::new().with_cache_path(&path);
        source.remove_local_copy().unwrap();
        assert!(!path.exists());

        // Removing twice is fine
        source.remove_local_copy().unwrap();
    }

    #[test]
    fn test_verify_list_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.dat");
        fs::write(&path, "// nothing here\n").unwrap();

        let err = verify_list(&path).unwrap_err();
        assert_eq!(err.source_kind(), Some(SourceErrorKind::InvalidData));
    }
}
