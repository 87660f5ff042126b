use std::collections::BTreeSet;
use std::fmt;

use axum::http::Method;

use crate::error::AppError;
use crate::services::auth::{Authority, Principal};
use crate::services::authz::pattern::{PathPattern, PatternError};

/// What a matched rule demands of the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    /// Any one of the listed authorities is enough.
    AnyRole(BTreeSet<Authority>),
}

impl Requirement {
    pub fn any_role(roles: &[&str]) -> Self {
        Self::AnyRole(roles.iter().filter_map(|r| Authority::from_role(r)).collect())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::AnyRole(roles) => {
                let names: Vec<&str> = roles.iter().map(Authority::as_str).collect();
                write!(f, "any of [{}]", names.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No usable identity ("who are you?").
    Unauthenticated,
    /// Identity present but lacking a required role.
    Forbidden,
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => AppError::Unauthorized,
            DenyReason::Forbidden => AppError::Forbidden,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    method: Option<Method>,
    pattern: PathPattern,
    requirement: Requirement,
}

impl Rule {
    /// `method == None` applies the rule to every method.
    pub fn new(
        method: Option<Method>,
        pattern: &str,
        requirement: Requirement,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            method,
            pattern: PathPattern::parse(pattern)?,
            requirement,
        })
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// `path` comes from [`normalized_segments`](super::normalized_segments). A GET rule also covers HEAD,
    /// since axum answers HEAD with the GET handler.
    pub fn applies_to(&self, method: &Method, path: &[&str]) -> bool {
        let method_ok = self
            .method
            .as_ref()
            .is_none_or(|m| m == method || (*m == Method::GET && *method == Method::HEAD));
        method_ok && self.pattern.matches_segments(path)
    }

    pub fn decide(&self, principal: &Principal) -> Decision {
        match &self.requirement {
            Requirement::Public => Decision::Allow,
            _ if principal.is_anonymous() => Decision::Deny(DenyReason::Unauthenticated),
            Requirement::Authenticated => Decision::Allow,
            Requirement::AnyRole(required) => {
                if principal.authorities.is_disjoint(required) {
                    Decision::Deny(DenyReason::Forbidden)
                } else {
                    Decision::Allow
                }
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(m) => write!(f, "{} {} -> {}", m, self.pattern, self.requirement),
            None => write!(f, "* {} -> {}", self.pattern, self.requirement),
        }
    }
}
