//! Core ward types.
//!
//! These types enforce invariants at construction time, so an invalid
//! base URL is rejected before any request is built.

mod base_url;

pub use base_url::BaseUrl;
