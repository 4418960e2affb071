//! Persisted credential state.

pub mod storage;
