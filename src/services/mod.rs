/*
 * Responsibility
 * - auth: bearer token -> Principal (identity)
 * - authz: ordered access-rule table -> Decision (authorization)
 */
pub mod auth;
pub mod authz;
