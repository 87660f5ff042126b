/*
 * Responsibility
 * - `Authorization` header -> Principal (best effort)
 * - Never rejects: a missing, foreign-scheme, invalid or expired token resolves
 *   to the anonymous principal. Rejection is the policy table's job.
 */
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::services::auth::principal::{Authority, Principal};
use crate::services::auth::token_codec::{Claims, TokenCodec, TokenError};

const BEARER: &str = "bearer";

#[derive(Clone, Debug)]
pub struct PrincipalResolver {
    codec: Arc<TokenCodec>,
}

impl PrincipalResolver {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn resolve(&self, authorization: Option<&str>) -> Principal {
        let Some(token) = authorization.and_then(bearer_token) else {
            return Principal::anonymous();
        };

        match self.codec.decode(token) {
            Ok(claims) => principal_from_claims(claims),
            Err(TokenError::Expired) => {
                tracing::debug!("access token expired, continuing as anonymous");
                Principal::anonymous()
            }
            Err(err) => {
                tracing::warn!(error = %err, "access token rejected, continuing as anonymous");
                Principal::anonymous()
            }
        }
    }
}

/// `Bearer <token>` -> `<token>`. The scheme keyword is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn principal_from_claims(claims: Claims) -> Principal {
    Principal {
        id: claims.id,
        authorities: authorities_from_claims(&claims),
        subject: Some(claims.sub),
    }
}

/// A non-empty `roles` list wins over the single `role` claim.
fn authorities_from_claims(claims: &Claims) -> BTreeSet<Authority> {
    match claims.roles.as_deref() {
        Some(roles) if !roles.is_empty() => {
            roles.iter().filter_map(|r| Authority::from_role(r)).collect()
        }
        _ => claims
            .role
            .as_deref()
            .and_then(Authority::from_role)
            .into_iter()
            .collect(),
    }
}
