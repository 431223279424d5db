//! Pattern-deviation checks.
//!
//! The check set is a table of named predicates, not branching logic:
//! adding a check means adding a row. Each check's anomaly score comes from
//! its severity through the fixed severity→score map.

use repute_core::types::anomaly::AnomalySeverity;
use repute_core::types::snapshot::SubjectSnapshot;

/// One named boolean check over a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PatternCheck {
    pub name: &'static str,
    pub description: &'static str,
    pub severity: AnomalySeverity,
    /// Feature group implicated when the check fires.
    pub feature: &'static str,
    pub predicate: fn(&SubjectSnapshot) -> bool,
}

/// A website without MX records is a mismatch between claimed presence and
/// mail configuration.
pub fn no_mx_records() -> PatternCheck {
    PatternCheck {
        name: "no_mx_records",
        description: "Subject has a website but no MX records",
        severity: AnomalySeverity::Medium,
        feature: "dns_configuration",
        predicate: |s| s.metric("mx_count") == Some(0.0) && s.has_website,
    }
}

/// Sub-minute TTLs are a fast-flux signature.
pub fn suspicious_ttl() -> PatternCheck {
    PatternCheck {
        name: "suspicious_ttl",
        description: "Very low DNS TTL may indicate fast-flux behavior",
        severity: AnomalySeverity::High,
        feature: "dns_configuration",
        predicate: |s| s.metric("dns_ttl").is_some_and(|ttl| ttl < 60.0),
    }
}

pub fn multiple_cnames() -> PatternCheck {
    PatternCheck {
        name: "multiple_cnames",
        description: "Excessive CNAME chaining detected",
        severity: AnomalySeverity::Medium,
        feature: "dns_configuration",
        predicate: |s| s.metric("cname_count").is_some_and(|c| c > 5.0),
    }
}

pub fn wildcard_dns() -> PatternCheck {
    PatternCheck {
        name: "wildcard_dns",
        description: "Wildcard DNS configuration detected",
        severity: AnomalySeverity::Low,
        feature: "dns_configuration",
        predicate: |s| s.wildcard_dns,
    }
}

/// A certificate issued days ago on a domain registered years ago often
/// marks a repurposed or compromised domain.
pub fn fresh_cert_on_aged_domain() -> PatternCheck {
    PatternCheck {
        name: "fresh_cert_on_aged_domain",
        description: "Recently issued certificate on an established domain",
        severity: AnomalySeverity::Medium,
        feature: "ssl_certificate",
        predicate: |s| {
            matches!(
                (s.metric("domain_age_days"), s.metric("ssl_age_days")),
                (Some(age), Some(ssl)) if age > 365.0 && ssl < 7.0
            )
        },
    }
}

/// The default check set.
pub fn default_checks() -> Vec<PatternCheck> {
    vec![
        no_mx_records(),
        suspicious_ttl(),
        multiple_cnames(),
        wildcard_dns(),
        fresh_cert_on_aged_domain(),
    ]
}
