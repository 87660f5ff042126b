/// Factory: build the process-wide `PrincipalResolver` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{PrincipalResolver, TokenCodec};

pub fn build_resolver(config: &Config) -> PrincipalResolver {
    let codec = TokenCodec::new(
        config.jwt_secret.as_bytes(),
        config.access_token_leeway_seconds,
    );

    PrincipalResolver::new(Arc::new(codec))
}
