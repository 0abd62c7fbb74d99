//! Split the part of a host left of its public suffix into registrable
//! domain and subdomains.

use crate::matcher::EffectiveSuffix;

/// Labels left of the suffix: the registrable domain and its subdomains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts<'a> {
    pub domain: &'a str,
    /// Leftmost first
    pub subdomains: Vec<&'a str>,
}

/// Remove the suffix (and its separating dot) from `host` and split the rest.
///
/// The last remaining label is the domain, any labels before it are
/// subdomains in their original order.
pub fn split_domain<'a>(host: &'a str, suffix: &EffectiveSuffix<'_>) -> DomainParts<'a> {
    let remainder_len = host.len().saturating_sub(suffix.suffix.len() + 1);
    let remainder = &host[..remainder_len];

    match remainder.rsplit_once('.') {
        Some((subdomains, domain)) => DomainParts {
            domain,
            subdomains: subdomains.split('.').collect(),
        },
        None => DomainParts {
            domain: remainder,
            subdomains: Vec::new(),
        },
    }
}
