/*
 * Responsibility
 * - Ordered, immutable access-rule table (compiled once at startup)
 * - First matching rule wins, regardless of how specific later rules are
 * - Implicit fallbacks: authenticated under the protected prefix, public elsewhere
 * - Paths are judged after dot-segment resolution
 */
use axum::http::Method;

use crate::services::auth::Principal;
use crate::services::authz::pattern::{PatternError, normalized_segments};
use crate::services::authz::rule::{Decision, Requirement, Rule};

#[derive(Debug, Clone)]
pub struct PolicyTable {
    rules: Vec<Rule>,
    protected_fallback: Rule,
    public_fallback: Rule,
}

impl PolicyTable {
    /// `protected_prefix` is a path such as `/api`; `/` protects everything.
    pub fn new(protected_prefix: &str, rules: Vec<Rule>) -> Result<Self, PatternError> {
        let prefix = protected_prefix.trim_end_matches('/');
        let protected = format!("{prefix}/**");

        Ok(Self {
            rules,
            protected_fallback: Rule::new(None, &protected, Requirement::Authenticated)?,
            public_fallback: Rule::new(None, "/**", Requirement::Public)?,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rule governing `method path`. Always returns a rule.
    pub fn matching(&self, method: &Method, path: &str) -> &Rule {
        let path = normalized_segments(path);
        self.rules
            .iter()
            .find(|rule| rule.applies_to(method, &path))
            .unwrap_or_else(|| {
                if self.protected_fallback.pattern().matches_segments(&path) {
                    &self.protected_fallback
                } else {
                    &self.public_fallback
                }
            })
    }

    pub fn evaluate(&self, method: &Method, path: &str, principal: &Principal) -> Decision {
        self.matching(method, path).decide(principal)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::services::auth::Authority;
    use crate::services::authz::rule::DenyReason;

    fn user(roles: &[&str]) -> Principal {
        Principal {
            id: Some(1),
            subject: Some("user@hotel.test".into()),
            authorities: roles.iter().filter_map(|r| Authority::from_role(r)).collect(),
        }
    }

    fn table(rules: Vec<Rule>) -> PolicyTable {
        PolicyTable::new("/api", rules).unwrap()
    }

    #[test]
    fn first_match_wins_over_more_specific_later_rule() {
        let t = table(vec![
            Rule::new(None, "/api/**", Requirement::Authenticated).unwrap(),
            Rule::new(Some(Method::GET), "/api/rooms", Requirement::Public).unwrap(),
        ]);

        assert_eq!(
            t.evaluate(&Method::GET, "/api/rooms", &Principal::anonymous()),
            Decision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn earlier_public_rule_shadows_later_catch_all() {
        let t = table(vec![
            Rule::new(Some(Method::GET), "/api/rooms/**", Requirement::Public).unwrap(),
            Rule::new(None, "/api/**", Requirement::any_role(&["ADMIN"])).unwrap(),
        ]);

        assert_eq!(
            t.evaluate(&Method::GET, "/api/rooms/3", &Principal::anonymous()),
            Decision::Allow
        );
        assert_eq!(
            t.evaluate(&Method::POST, "/api/rooms/3", &user(&["MANAGER"])),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn method_mismatch_moves_on_to_next_rule() {
        let t = table(vec![
            Rule::new(Some(Method::GET), "/api/reviews", Requirement::Public).unwrap(),
            Rule::new(None, "/api/reviews", Requirement::any_role(&["CUSTOMER"])).unwrap(),
        ]);

        let rule = t.matching(&Method::POST, "/api/reviews");

        assert_eq!(rule.requirement(), &Requirement::any_role(&["CUSTOMER"]));
    }

    #[test]
    fn unmatched_path_under_prefix_requires_authentication() {
        let t = table(Vec::new());

        let rule = t.matching(&Method::GET, "/api/unknown/thing");

        assert_eq!(rule.requirement(), &Requirement::Authenticated);
        assert_eq!(rule.pattern().as_str(), "/api/**");
        assert_eq!(
            t.evaluate(&Method::GET, "/api", &Principal::anonymous()),
            Decision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn unmatched_path_outside_prefix_is_public() {
        let t = table(Vec::new());

        assert_eq!(
            t.matching(&Method::GET, "/uploads/rooms/1.jpg").requirement(),
            &Requirement::Public
        );
        assert_eq!(
            t.evaluate(&Method::GET, "/apiary", &Principal::anonymous()),
            Decision::Allow
        );
    }

    #[test]
    fn parent_segments_cannot_escape_into_a_public_rule() {
        let t = table(vec![
            Rule::new(Some(Method::GET), "/api/rooms/**", Requirement::Public).unwrap(),
            Rule::new(None, "/api/dashboard/**", Requirement::any_role(&["MANAGER"])).unwrap(),
        ]);
        let anon = Principal::anonymous();

        assert_eq!(
            t.evaluate(&Method::GET, "/api/rooms/../dashboard", &anon),
            Decision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            t.evaluate(&Method::GET, "/api/rooms/%2e%2E/dashboard", &user(&["CUSTOMER"])),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            t.evaluate(&Method::GET, "/api/rooms/./3", &anon),
            Decision::Allow
        );
    }

    #[test]
    fn parent_segments_cannot_leave_the_protected_prefix_to_dodge_it() {
        let t = table(Vec::new());

        assert_eq!(
            t.matching(&Method::GET, "/public/../api/secret").requirement(),
            &Requirement::Authenticated
        );
        assert_eq!(
            t.matching(&Method::GET, "/api/../uploads/a.jpg").requirement(),
            &Requirement::Public
        );
    }

    #[test]
    fn get_rules_govern_head_requests() {
        let t = table(vec![
            Rule::new(Some(Method::GET), "/api/rooms/**", Requirement::Public).unwrap(),
            Rule::new(None, "/api/rooms/**", Requirement::any_role(&["ADMIN"])).unwrap(),
        ]);

        assert_eq!(
            t.evaluate(&Method::HEAD, "/api/rooms", &Principal::anonymous()),
            Decision::Allow
        );
    }

    fn requirement_strategy() -> impl Strategy<Value = Requirement> {
        prop_oneof![
            Just(Requirement::Public),
            Just(Requirement::Authenticated),
            "[a-z]{3,10}".prop_map(|role| Requirement::any_role(&[role.as_str()])),
        ]
    }

    proptest! {
        #[test]
        fn earlier_rule_governs_whatever_its_specificity(
            segments in prop::collection::vec("[a-z0-9]{1,8}", 1..5),
            broad_first in any::<bool>(),
            first in requirement_strategy(),
            second in requirement_strategy(),
        ) {
            let path = format!("/{}", segments.join("/"));
            let broad = format!("/{}/**", segments[0]);
            let (first_pattern, second_pattern) = if broad_first {
                (broad.as_str(), path.as_str())
            } else {
                (path.as_str(), broad.as_str())
            };
            let t = table(vec![
                Rule::new(None, first_pattern, first.clone()).unwrap(),
                Rule::new(None, second_pattern, second).unwrap(),
            ]);

            let rule = t.matching(&Method::GET, &path);

            prop_assert_eq!(rule.pattern().as_str(), first_pattern);
            prop_assert_eq!(rule.requirement(), &first);
        }

        #[test]
        fn public_rule_allows_anyone(
            segments in prop::collection::vec("[a-z0-9]{1,8}", 0..5),
            roles in prop::collection::vec("[a-z]{3,10}", 0..3),
            anonymous in any::<bool>(),
        ) {
            let path = format!("/api/{}", segments.join("/"));
            let t = table(vec![Rule::new(None, "/api/**", Requirement::Public).unwrap()]);
            let role_refs: Vec<&str> = roles.iter().map(String::as_str).collect();
            let principal = if anonymous { Principal::anonymous() } else { user(&role_refs) };

            prop_assert_eq!(t.evaluate(&Method::POST, &path, &principal), Decision::Allow);
        }
    }

    #[test]
    fn prefix_trailing_slash_is_ignored() {
        let t = PolicyTable::new("/api/", Vec::new()).unwrap();

        assert_eq!(
            t.matching(&Method::GET, "/api/x").requirement(),
            &Requirement::Authenticated
        );
    }
}
