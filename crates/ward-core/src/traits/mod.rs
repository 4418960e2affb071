//! Core traits for transports and request interception.

mod interceptor;
mod transport;

pub use interceptor::Interceptor;
pub use transport::Transport;
