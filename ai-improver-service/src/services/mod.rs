//! HTTP clients for inference servers.

pub mod completion_service;
