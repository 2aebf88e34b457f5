use super::claims::{AccessTokenClaims, AUDIENCE};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;

pub fn verify_access_token(
    token: &str,
    secret: &str,
) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
    verify_jwt::<AccessTokenClaims>(token, secret)
}

/// Checks the signature and audience only. Expiry is left to the caller so
/// that an expired token is reported as such rather than as a bad signature.
pub fn verify_jwt<T: DeserializeOwned>(
    token: &str,
    secret: &str,
) -> Result<T, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_audience(&[AUDIENCE]);

    let token = decode::<T>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)?;
    Ok(token.claims)
}
