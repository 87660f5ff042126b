/*
 * Responsibility
 * - Public surface of the middleware layer
 * - auth::gate (identity + access rules), cors, http (request id / trace / limits), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
