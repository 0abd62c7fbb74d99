//! Longest-match public suffix selection.
//!
//! For every label count dropped from the left, starting with none, the
//! candidate is probed as `*.candidate`, `!candidate` and `candidate`, in
//! that order. The first hit wins, so longer suffixes beat shorter ones and
//! an exception beats a plain rule over the same labels.

use crate::rules::{RuleKind, RuleTable};
use crate::types::InvalidReason;

const PROBE_ORDER: [RuleKind; 3] = [RuleKind::Wildcard, RuleKind::Exception, RuleKind::Normal];

/// The rule that matched a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch {
    /// Form of the matched rule
    pub kind: RuleKind,
    /// Index of the first label of the rule's base suffix
    pub label_index: usize,
}

/// Effective public suffix of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveSuffix<'a> {
    /// Dot-joined suffix, a tail of the host
    pub suffix: &'a str,
    /// Index of the suffix's first label; labels before it remain for the domain
    pub label_index: usize,
}

/// Finds the effective public suffix of a host against a rule table.
#[derive(Debug, Clone, Copy)]
pub struct SuffixMatcher<'t> {
    table: &'t RuleTable,
}

impl<'t> SuffixMatcher<'t> {
    pub fn new(table: &'t RuleTable) -> Self {
        Self { table }
    }

    /// Find the longest matching rule for `host`.
    pub fn find(&self, host: &str) -> Option<SuffixMatch> {
        let starts = label_starts(host);
        starts.iter().enumerate().find_map(|(label_index, &start)| {
            let candidate = &host[start..];
            PROBE_ORDER
                .into_iter()
                .find(|&kind| self.table.lookup(candidate, kind))
                .map(|kind| SuffixMatch { kind, label_index })
        })
    }

    /// Resolve the effective suffix of `host`.
    ///
    /// A wildcard pulls in one more label on the left, an exception drops
    /// its own leftmost label. The suffix may never cover the whole host.
    pub fn effective_suffix<'h>(
        &self,
        host: &'h str,
    ) -> std::result::Result<EffectiveSuffix<'h>, InvalidReason> {
        let matched = self.find(host).ok_or(InvalidReason::NoMatchingSuffix)?;
        let starts = label_starts(host);

        let label_index = match matched.kind {
            RuleKind::Normal => matched.label_index,
            RuleKind::Wildcard => matched
                .label_index
                .checked_sub(1)
                .ok_or(InvalidReason::EmptyDomainResult)?,
            RuleKind::Exception => {
                let next = matched.label_index + 1;
                if next >= starts.len() {
                    return Err(InvalidReason::EmptySuffixResult);
                }
                next
            }
        };

        if label_index == 0 {
            return Err(InvalidReason::EmptyDomainResult);
        }

        Ok(EffectiveSuffix {
            suffix: &host[starts[label_index]..],
            label_index,
        })
    }
}

/// Byte offsets where each dot-separated label of `host` begins.
pub(crate) fn label_starts(host: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(host.match_indices('.').map(|(pos, _)| pos + 1))
        .collect()
}
