//! Public Suffix List rule table.
//!
//! Rules are kept in a single map keyed by their base suffix, with one slot
//! per rule form, so a lookup per label level answers all three of
//! `*.base`, `!base` and `base` at once. Membership is exact-string
//! membership of the original rule lines.

use std::collections::HashMap;

use log::debug;

const COMMENT_MARKER: &str = "//";
const WILDCARD_PREFIX: &str = "*.";
const EXCEPTION_PREFIX: &str = "!";

const BEGIN_ICANN: &str = "===BEGIN ICANN DOMAINS===";
const END_ICANN: &str = "===END ICANN DOMAINS===";
const BEGIN_PRIVATE: &str = "===BEGIN PRIVATE DOMAINS===";
const END_PRIVATE: &str = "===END PRIVATE DOMAINS===";

/// Form of a rule line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Plain suffix, e.g. `co.uk`
    Normal,
    /// `*.base`: any single label left of `base` is part of the suffix
    Wildcard,
    /// `!base`: carves `base` out of a wildcard
    Exception,
}

impl RuleKind {
    /// Split a rule line into its form and base suffix.
    pub fn classify(rule: &str) -> (RuleKind, &str) {
        if let Some(base) = rule.strip_prefix(WILDCARD_PREFIX) {
            (RuleKind::Wildcard, base)
        } else if let Some(base) = rule.strip_prefix(EXCEPTION_PREFIX) {
            (RuleKind::Exception, base)
        } else {
            (RuleKind::Normal, rule)
        }
    }
}

/// PSL section a rule was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSection {
    Icann,
    Private,
}

/// Options for [`RuleTable::parse_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep rules from the PRIVATE DOMAINS section
    pub include_private_domains: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_private_domains: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether private-section rules are kept
    pub fn with_private_domains(mut self, include: bool) -> Self {
        self.include_private_domains = include;
        self
    }
}

/// Rule slots for one base suffix
#[derive(Debug, Clone, Copy, Default)]
struct RuleSlots {
    normal: Option<RuleSection>,
    wildcard: Option<RuleSection>,
    exception: Option<RuleSection>,
}

impl RuleSlots {
    fn slot(&self, kind: RuleKind) -> Option<RuleSection> {
        match kind {
            RuleKind::Normal => self.normal,
            RuleKind::Wildcard => self.wildcard,
            RuleKind::Exception => self.exception,
        }
    }

    fn slot_mut(&mut self, kind: RuleKind) -> &mut Option<RuleSection> {
        match kind {
            RuleKind::Normal => &mut self.normal,
            RuleKind::Wildcard => &mut self.wildcard,
            RuleKind::Exception => &mut self.exception,
        }
    }
}

/// Immutable set of PSL rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, RuleSlots>,
    count: usize,
}

impl RuleTable {
    /// Parse raw PSL text, keeping every section.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, ParseOptions::default())
    }

    /// Parse raw PSL text.
    ///
    /// Empty lines and any line containing `//` are skipped; every other
    /// line is stored as-is. Section marker comments decide which section
    /// the following rules belong to.
    pub fn parse_with(text: &str, options: ParseOptions) -> Self {
        let mut table = RuleTable::default();
        let mut section = RuleSection::Icann;

        for line in text.lines() {
            if line.is_empty() {
                continue;
            }

            if line.contains(COMMENT_MARKER) {
                if line.contains(BEGIN_PRIVATE) {
                    section = RuleSection::Private;
                } else if line.contains(BEGIN_ICANN)
                    || line.contains(END_ICANN)
                    || line.contains(END_PRIVATE)
                {
                    section = RuleSection::Icann;
                }
                continue;
            }

            if section == RuleSection::Private && !options.include_private_domains {
                continue;
            }

            table.insert(line, section);
        }

        debug!("parsed {} public suffix rules", table.count);
        table
    }

    fn insert(&mut self, rule: &str, section: RuleSection) {
        let (kind, base) = RuleKind::classify(rule);
        let slot = self.rules.entry(base.to_string()).or_default().slot_mut(kind);
        if slot.is_none() {
            self.count += 1;
            *slot = Some(section);
        }
    }

    /// Exact-string membership test for a rule line such as `*.ck`,
    /// `!www.ck` or `co.uk`.
    pub fn contains(&self, candidate: &str) -> bool {
        let (kind, base) = RuleKind::classify(candidate);
        self.lookup(base, kind)
    }

    /// Check whether the rule of the given form over `base` exists.
    pub fn lookup(&self, base: &str, kind: RuleKind) -> bool {
        self.rules
            .get(base)
            .is_some_and(|slots| slots.slot(kind).is_some())
    }

    /// Section the given rule line was declared in
    pub fn section_of(&self, rule: &str) -> Option<RuleSection> {
        let (kind, base) = RuleKind::classify(rule);
        self.rules.get(base).and_then(|slots| slots.slot(kind))
    }

    /// Number of distinct rules
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
