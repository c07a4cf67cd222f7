//! Integration tests for the leave sync backend.

pub(crate) mod fake_remote;
