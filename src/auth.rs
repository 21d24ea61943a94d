//! Credential model: the API key that authenticates exchanges, the bearer credential they
//! produce, and the freshness policy that decides when to replace it.

pub mod api_key;
pub mod credential;
pub mod freshness;

pub use api_key::*;
pub use credential::*;
pub use freshness::*;
