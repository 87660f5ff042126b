/*
 * Responsibility
 * - Authority: normalized role token (`ROLE_<UPPERCASE>`)
 * - Principal: identity resolved for one request (possibly anonymous)
 *
 * Notes
 * - Both role claims and policy rules go through `Authority::from_role`, so
 *   comparisons are case-insensitive with respect to the raw role names.
 */
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::AppError;

pub const ROLE_PREFIX: &str = "ROLE_";

/// A normalized role token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    /// Trim, upper-case and prefix a raw role name.
    ///
    /// Returns `None` for blank names. A name that already carries the prefix
    /// (in any case) is not prefixed twice.
    pub fn from_role(role: &str) -> Option<Self> {
        let upper = role.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }
        if let Some(rest) = upper.strip_prefix(ROLE_PREFIX) {
            if rest.is_empty() {
                return None;
            }
            return Some(Self(upper));
        }
        Some(Self(format!("{ROLE_PREFIX}{upper}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity attached to a request by the gate.
///
/// `subject == None` marks the anonymous principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: Option<i64>,
    pub subject: Option<String>,
    pub authorities: BTreeSet<Authority>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.subject.is_none()
    }

    pub fn has_role(&self, role: &str) -> bool {
        Authority::from_role(role).is_some_and(|a| self.authorities.contains(&a))
    }

    /// Handler-side role check for endpoints that narrow the gate's decision.
    pub fn require_any_role(&self, roles: &[&str]) -> Result<(), AppError> {
        if self.is_anonymous() {
            return Err(AppError::Unauthorized);
        }
        if roles.iter().any(|r| self.has_role(r)) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
