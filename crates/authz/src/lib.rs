//! `warden-authz`: pure authorization domain (zero-trust).
//!
//! Policy documents, pattern matching, and the deterministic evaluator live
//! here. This crate is intentionally decoupled from HTTP and storage: no IO,
//! no panics, no clocks (callers pass `now` explicitly).

pub mod actor;
pub mod claims;
pub mod document;
pub mod evaluator;
pub mod pattern;

pub use actor::Actor;
pub use claims::{
    validate_claims, ActorClaims, Hs256JwtValidator, JwtValidator, TokenValidationError,
};
pub use document::{Effect, PolicyDocument, PolicyParseError, Statement};
pub use evaluator::{evaluate, Decision};
pub use pattern::pattern_matches;
