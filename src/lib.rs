//! Stateless access guard for the hotel API.
//!
//! Every request passes the gate once: the bearer token (if any) becomes a
//! [`Principal`](services::auth::Principal), the first matching access rule
//! decides, and handlers read the principal from request extensions.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
