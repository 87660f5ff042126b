pub mod factory;
pub mod principal;
pub mod resolver;
pub mod token_codec;

pub use factory::build_resolver;
pub use principal::{Authority, Principal};
pub use resolver::PrincipalResolver;
pub use token_codec::{Claims, TokenCodec, TokenError};

#[cfg(test)]
pub(crate) mod test_support {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde::Serialize;

    use super::Claims;

    pub const SECRET: &[u8] = b"test-secret-only-for-unit-tests-not-production";

    pub fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    /// Claims without roles, valid for ten minutes.
    pub fn claims_for(sub: &str, id: Option<i64>) -> Claims {
        Claims {
            sub: sub.to_string(),
            id,
            role: None,
            roles: None,
            exp: Some(now() + 600),
        }
    }

    pub fn mint(claims: &Claims) -> String {
        sign(claims)
    }

    pub fn mint_json(claims: serde_json::Value) -> String {
        sign(&claims)
    }

    fn sign<T: Serialize>(claims: &T) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("sign test token")
    }

    /// Flip one character in the middle of the signature segment.
    pub fn tamper_signature(token: &str) -> String {
        let mut bytes = token.as_bytes().to_vec();
        let i = bytes.len() - 10;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).expect("ascii token")
    }
}
