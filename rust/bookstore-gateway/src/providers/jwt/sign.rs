use super::AccessTokenClaims;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

pub fn sign_access_token(
    claims: &AccessTokenClaims,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    sign_jwt(claims, secret)
}

/// Signs with HS256, the default header algorithm.
pub fn sign_jwt<T: Serialize>(claims: &T, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}
