mod claims;
mod sign;
mod verify;


pub use claims::{AccessTokenClaims, AUDIENCE};
pub use sign::{sign_access_token, sign_jwt};
pub use verify::{verify_access_token, verify_jwt};
