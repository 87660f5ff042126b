pub mod access_rules;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
