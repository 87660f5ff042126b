/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Built once at startup, read-only afterwards; Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::PrincipalResolver;
use crate::services::authz::PolicyTable;

#[derive(Clone, Debug)]
pub struct AppState {
    pub resolver: PrincipalResolver,
    pub policy: Arc<PolicyTable>,
}

impl AppState {
    pub fn new(resolver: PrincipalResolver, policy: Arc<PolicyTable>) -> Self {
        Self { resolver, policy }
    }
}
