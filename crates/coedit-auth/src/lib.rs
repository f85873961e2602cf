//! # coedit-auth
//!
//! Editor token issuing and verification.
//!
//! Tokens are compact JWT-shaped strings (`header.payload.signature`,
//! base64url without padding) signed with HMAC-SHA256. Verification is a
//! pure function of the token, the shared secret, and the clock; there is
//! no revocation state and no I/O.

pub mod claims;
pub mod token;

pub use claims::EditorClaims;
pub use token::{TokenError, TokenService};
