//! Async slicer context.
//!
//! Same contract as [`crate::Slicer`], with the table build awaited instead
//! of blocked on: concurrent first callers await one in-flight build.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::OnceCell;

use crate::error::{Result, SlicerError, SourceErrorKind};
use crate::rules::RuleTable;
use crate::slicer::{slice_with_table, SlicerOptions};
use crate::source::RuleSource;
use crate::types::SlicedResult;

/// Async rule source
#[async_trait]
pub trait AsyncRuleSource: Send + Sync {
    /// Return the current rule text
    async fn fetch(&self) -> Result<String>;
}

/// Runs a blocking [`RuleSource`] on tokio's blocking pool.
pub struct BlockingSource<S> {
    inner: Arc<S>,
}

impl<S: RuleSource + 'static> BlockingSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(source),
        }
    }
}

#[async_trait]
impl<S: RuleSource + 'static> AsyncRuleSource for BlockingSource<S> {
    async fn fetch(&self) -> Result<String> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.fetch())
            .await
            .map_err(|e| {
                SlicerError::unavailable(
                    SourceErrorKind::Interrupted,
                    format!("Rule fetch task failed: {}", e),
                )
            })?
    }
}

/// Async slicing context
pub struct AsyncSlicer {
    source: Box<dyn AsyncRuleSource>,
    options: SlicerOptions,
    table: OnceCell<RuleTable>,
}

impl AsyncSlicer {
    /// Create a slicer that loads its table from `source` on first use.
    pub fn new(source: impl AsyncRuleSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            options: SlicerOptions::default(),
            table: OnceCell::new(),
        }
    }

    /// Create a slicer around a blocking source
    pub fn from_blocking(source: impl RuleSource + 'static) -> Self {
        Self::new(BlockingSource::new(source))
    }

    /// Set options. Takes effect on the next table build.
    pub fn with_options(mut self, options: SlicerOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the rule table, building it if needed.
    pub async fn table(&self) -> Result<&RuleTable> {
        self.table.get_or_try_init(|| self.load()).await
    }

    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }

    /// Fetch the rules again and replace the table.
    pub async fn reload(&mut self) -> Result<()> {
        let table = self.load().await?;
        self.table = OnceCell::new_with(Some(table));
        Ok(())
    }

    async fn load(&self) -> Result<RuleTable> {
        let text = self.source.fetch().await?;
        let table = RuleTable::parse_with(&text, self.options.parse_options());
        if table.is_empty() {
            warn!("rule source returned no public suffix rules");
        }
        debug!("public suffix table ready with {} rules", table.len());
        Ok(table)
    }

    /// Slice a URL or hostname.
    pub async fn slice(&self, url: &str) -> Result<SlicedResult> {
        let table = self.table().await?;
        Ok(slice_with_table(table, url))
    }
}
