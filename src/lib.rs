//! URL Slicer - split URLs and hostnames using the Public Suffix List
//!
//! This library decomposes a URL or bare hostname into:
//! - the registrable domain (`google` in `www.google.co.uk`)
//! - the effective public suffix (`co.uk`)
//! - the subdomain labels, leftmost first (`["www"]`)
//! - the trailing path/query, carried through untouched
//!
//! Matching follows the Public Suffix List rule format, including wildcard
//! (`*.ck`) and exception (`!www.ck`) rules, for both the ICANN and the
//! private sections. Punycode hosts are matched through their Unicode form
//! and returned in ASCII-compatible form.
//!
//! # Example
//!
//! ```rust
//! use url_slicer::{MemoryRuleSource, Slicer};
//!
//! let rules = "
//! // ===BEGIN ICANN DOMAINS===
//! com
//! uk
//! co.uk
//! *.ck
//! !www.ck
//! // ===END ICANN DOMAINS===
//! ";
//!
//! let slicer = Slicer::new(MemoryRuleSource::new(rules));
//!
//! let sliced = slicer.slice("https://www.google.co.uk/search?q=rust").unwrap();
//! assert!(sliced.valid);
//! assert_eq!(sliced.domain.as_deref(), Some("google"));
//! assert_eq!(sliced.suffix.as_deref(), Some("co.uk"));
//! assert_eq!(sliced.subdomains, vec!["www"]);
//! assert_eq!(sliced.query.as_deref(), Some("search?q=rust"));
//!
//! // Invalid input is a flag on the result, not an error
//! let sliced = slicer.slice("co.uk").unwrap();
//! assert!(!sliced.valid);
//! ```
//!
//! # Rule Matching
//!
//! | Rule | Example | Effect |
//! |------|---------|--------|
//! | Normal | `co.uk` | `co.uk` is a public suffix |
//! | Wildcard | `*.ck` | any label plus `ck` is a public suffix |
//! | Exception | `!www.ck` | `www.ck` is registrable despite `*.ck` |
//!
//! The longest matching candidate wins; for the same candidate a wildcard
//! is preferred over an exception, and an exception over a normal rule.

pub mod error;
pub mod matcher;
pub mod normalize;
pub mod rules;
pub mod slicer;
#[cfg(feature = "async")]
pub mod slicer_async;
pub mod source;
pub mod splitter;
pub mod types;
pub mod validator;

// Re-export commonly used items
pub use error::{Result, SlicerError, SourceErrorKind};
pub use matcher::{EffectiveSuffix, SuffixMatch, SuffixMatcher};
pub use rules::{ParseOptions, RuleKind, RuleSection, RuleTable};
pub use slicer::{slice_with_table, Slicer, SlicerOptions};
pub use source::{
    AutoRuleSource, FileRuleSource, MemoryRuleSource, NilRuleSource, RuleSource,
    DEFAULT_CACHE_FILE, DEFAULT_LIST_URL,
};
pub use types::{InvalidReason, SlicedResult, INVALID_DOMAIN_MESSAGE};
pub use validator::{valid, MAX_LABEL_LEN};

#[cfg(feature = "async")]
pub use slicer_async::{AsyncRuleSource, AsyncSlicer, BlockingSource};
