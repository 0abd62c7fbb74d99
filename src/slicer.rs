//! Slicer context and the slicing pipeline.
//!
//! A [`Slicer`] owns its rule source and builds the [`RuleTable`] on first
//! use. Concurrent first callers share a single build; once built the table
//! is only read. [`slice_with_table`] is the pure pipeline and can be used
//! directly with a table the caller manages.

use log::{debug, warn};
use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::matcher::SuffixMatcher;
use crate::normalize::{is_puny_encoded, puny_to_unicode, split_host_and_query, to_ascii, trim_url};
use crate::rules::{ParseOptions, RuleTable};
use crate::source::{NilRuleSource, RuleSource};
use crate::splitter::split_domain;
use crate::types::{InvalidReason, SlicedResult};
use crate::validator::validate;

/// Slicer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicerOptions {
    /// Keep rules from the PSL private section (e.g. `blogspot.com`)
    pub include_private_domains: bool,
}

impl Default for SlicerOptions {
    fn default() -> Self {
        Self {
            include_private_domains: true,
        }
    }
}

impl SlicerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether private-section rules are used.
    pub fn with_private_domains(mut self, include: bool) -> Self {
        self.include_private_domains = include;
        self
    }

    pub(crate) fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().with_private_domains(self.include_private_domains)
    }
}

/// Slicing context: a rule source plus the table built from it.
pub struct Slicer {
    source: Box<dyn RuleSource>,
    options: SlicerOptions,
    table: OnceCell<RuleTable>,
}

impl Slicer {
    /// Create a slicer that loads its table from `source` on first use.
    pub fn new(source: impl RuleSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            options: SlicerOptions::default(),
            table: OnceCell::new(),
        }
    }

    /// Create a slicer around an already built table.
    ///
    /// It has no source, so [`Slicer::reload`] fails.
    pub fn from_table(table: RuleTable) -> Self {
        Self {
            source: Box::new(NilRuleSource),
            options: SlicerOptions::default(),
            table: OnceCell::with_value(table),
        }
    }

    /// Set options. Takes effect on the next table build.
    pub fn with_options(mut self, options: SlicerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SlicerOptions {
        self.options
    }

    /// Get the rule table, building it if needed.
    ///
    /// Only one build runs at a time; other callers wait for it and share
    /// the result. A failed build is retried by the next call.
    pub fn table(&self) -> Result<&RuleTable> {
        self.table.get_or_try_init(|| self.load())
    }

    /// Check if the table has been built
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Fetch the rules again and replace the table.
    ///
    /// On failure the current table is kept.
    pub fn reload(&mut self) -> Result<()> {
        let table = self.load()?;
        self.table = OnceCell::with_value(table);
        Ok(())
    }

    fn load(&self) -> Result<RuleTable> {
        let text = self.source.fetch()?;
        let table = RuleTable::parse_with(&text, self.options.parse_options());
        if table.is_empty() {
            warn!("rule source returned no public suffix rules");
        }
        debug!("public suffix table ready with {} rules", table.len());
        Ok(table)
    }

    /// Slice a URL or hostname.
    ///
    /// Errors only when the table cannot be built; an unusable input gives
    /// an invalid [`SlicedResult`].
    pub fn slice(&self, url: &str) -> Result<SlicedResult> {
        let table = self.table()?;
        Ok(slice_with_table(table, url))
    }
}

/// Slice a URL or hostname against a rule table.
pub fn slice_with_table(table: &RuleTable, url: &str) -> SlicedResult {
    match slice_parts(table, url) {
        Ok(result) => result,
        Err(reason) => SlicedResult::invalid(reason),
    }
}

fn slice_parts(table: &RuleTable, url: &str) -> std::result::Result<SlicedResult, InvalidReason> {
    let trimmed = trim_url(url);
    if trimmed.is_empty() || !trimmed.contains('.') {
        return Err(InvalidReason::MalformedInput);
    }

    let (host, query) = split_host_and_query(trimmed);
    if host.is_empty() {
        return Err(InvalidReason::MalformedInput);
    }

    let punycode = is_puny_encoded(host);
    let decoded;
    let host = if punycode {
        decoded = puny_to_unicode(host).ok_or(InvalidReason::MalformedInput)?;
        decoded.as_str()
    } else {
        host
    };

    let effective = SuffixMatcher::new(table).effective_suffix(host)?;
    let parts = split_domain(host, &effective);
    validate(parts.domain, effective.suffix, trimmed)?;

    let (domain, suffix, subdomains) = if punycode {
        let encode = |s: &str| to_ascii(s).ok_or(InvalidReason::MalformedInput);
        (
            encode(parts.domain)?,
            encode(effective.suffix)?,
            parts
                .subdomains
                .iter()
                .map(|s| encode(*s))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        )
    } else {
        (
            parts.domain.to_string(),
            effective.suffix.to_string(),
            parts.subdomains.iter().map(|s| s.to_string()).collect(),
        )
    };

    Ok(SlicedResult {
        domain: Some(domain),
        suffix: Some(suffix),
        subdomains,
        query: query.map(str::to_string),
        valid: true,
        reason: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorKind;
    use crate::source::MemoryRuleSource;

    const RULES: &str = "\
com
net
bg
jp
kyoto.jp
ide.kyoto.jp
*.kobe.jp
!city.kobe.jp
cn
公司.cn
// ===BEGIN PRIVATE DOMAINS===
blogspot.com
// ===END PRIVATE DOMAINS===
";

    fn slicer() -> Slicer {
        Slicer::new(MemoryRuleSource::new(RULES))
    }

    #[test]
    fn test_lazy_table_build() {
        let slicer = slicer();
        assert!(!slicer.is_loaded());
        slicer.slice("dir.com").unwrap();
        assert!(slicer.is_loaded());
    }

    #[test]
    fn test_simple_domain() {
        let result = slicer().slice("dir.com").unwrap();
        assert!(result.valid);
        assert_eq!(result.domain.as_deref(), Some("dir"));
        assert_eq!(result.suffix.as_deref(), Some("com"));
        assert!(result.subdomains.is_empty());
        assert!(result.query.is_none());
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_query_carried_through() {
        let result = slicer()
            .slice("http://dnes.dir.bg/news/volen-siderov-16638984?nt=4")
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.domain.as_deref(), Some("dir"));
        assert_eq!(result.suffix.as_deref(), Some("bg"));
        assert_eq!(result.subdomains, vec!["dnes"]);
        assert_eq!(result.query.as_deref(), Some("news/volen-siderov-16638984?nt=4"));
    }

    #[test]
    fn test_invalid_inputs() {
        let slicer = slicer();
        let cases = [
            ("", InvalidReason::MalformedInput),
            ("   ", InvalidReason::MalformedInput),
            ("net", InvalidReason::MalformedInput),
            ("/path.html", InvalidReason::MalformedInput),
            ("kobe.jp", InvalidReason::EmptyDomainResult),
            ("公司.cn", InvalidReason::EmptyDomainResult),
            ("www.blah.xczxczxczxc", InvalidReason::NoMatchingSuffix),
            ("https://di r.bg", InvalidReason::MalformedInput),
        ];
        for (input, reason) in cases {
            let result = slicer.slice(input).unwrap();
            assert!(!result.valid, "{:?} should be invalid", input);
            assert_eq!(result.reason, Some(reason), "reason for {:?}", input);
            assert!(result.domain.is_none());
            assert!(result.suffix.is_none());
            assert!(result.query.is_none());
            assert!(result.subdomains.is_empty());
        }
    }

    #[test]
    fn test_invalid_result_drops_query() {
        let result = slicer().slice("www.blah.xczxczxczxc/some/path").unwrap();
        assert!(!result.valid);
        assert!(result.query.is_none());
    }

    #[test]
    fn test_punycode_round_trip() {
        let result = slicer().slice("xn--85x722f.xn--85x722f.xn--55qx5d.cn").unwrap();
        assert!(result.valid);
        assert_eq!(result.domain.as_deref(), Some("xn--85x722f"));
        assert_eq!(result.suffix.as_deref(), Some("xn--55qx5d.cn"));
        assert_eq!(result.subdomains, vec!["xn--85x722f"]);
    }

    #[test]
    fn test_unicode_input_stays_unicode() {
        let result = slicer().slice("www.食狮.公司.cn").unwrap();
        assert!(result.valid);
        assert_eq!(result.domain.as_deref(), Some("食狮"));
        assert_eq!(result.suffix.as_deref(), Some("公司.cn"));
        assert_eq!(result.subdomains, vec!["www"]);
    }

    #[test]
    fn test_private_domains_option() {
        let with_private = slicer();
        let result = with_private.slice("me.blogspot.com").unwrap();
        assert_eq!(result.suffix.as_deref(), Some("blogspot.com"));
        assert_eq!(result.domain.as_deref(), Some("me"));

        let without_private =
            slicer().with_options(SlicerOptions::new().with_private_domains(false));
        assert!(!without_private.options().include_private_domains);
        let result = without_private.slice("me.blogspot.com").unwrap();
        assert_eq!(result.suffix.as_deref(), Some("com"));
        assert_eq!(result.domain.as_deref(), Some("blogspot"));
        assert_eq!(result.subdomains, vec!["me"]);
    }

    #[test]
    fn test_source_failure_is_an_error() {
        let slicer = Slicer::new(NilRuleSource);
        let err = slicer.slice("dir.com").unwrap_err();
        assert_eq!(err.source_kind(), Some(SourceErrorKind::NotConfigured));
        assert!(!slicer.is_loaded());
    }

    #[test]
    fn test_from_table() {
        let mut slicer = Slicer::from_table(RuleTable::parse("com\n"));
        assert!(slicer.is_loaded());
        assert!(slicer.slice("www.google.com").unwrap().valid);

        // No source to reload from; the existing table stays in place
        assert!(slicer.reload().is_err());
        assert!(slicer.slice("www.google.com").unwrap().valid);
    }

    #[test]
    fn test_reload_replaces_table() {
        let mut slicer = Slicer::new(MemoryRuleSource::new("com\n"));
        assert_eq!(slicer.table().unwrap().len(), 1);
        slicer.reload().unwrap();
        assert_eq!(slicer.table().unwrap().len(), 1);
    }

    #[test]
    fn test_slice_with_table_is_idempotent() {
        let table = RuleTable::parse(RULES);
        let first = slice_with_table(&table, " https://www.test.ide.kyoto.jp/a?b=c ");
        let second = slice_with_table(&table, " https://www.test.ide.kyoto.jp/a?b=c ");
        assert_eq!(first, second);
        assert_eq!(first.domain.as_deref(), Some("test"));
        assert_eq!(first.suffix.as_deref(), Some("ide.kyoto.jp"));
        assert_eq!(first.subdomains, vec!["www"]);
        assert_eq!(first.query.as_deref(), Some("a?b=c"));
    }
}
