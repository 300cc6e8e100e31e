pub mod claims;
pub mod extractors;
pub mod roles;
pub mod services;
pub mod verifier;
