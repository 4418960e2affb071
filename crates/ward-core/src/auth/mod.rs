//! Request authentication.
//!
//! [`RequestAuthenticator`] decides which credentials each request carries
//! and recovers from stale anti-forgery tokens. [`AntiforgeryTokenSupplier`]
//! fetches new tokens and caches them in the credential store.

mod authenticator;
mod supplier;

pub use authenticator::{Disposition, RequestAuthenticator};
pub use supplier::AntiforgeryTokenSupplier;
