//! Client configuration: the immutable [`ImproverConfig`], the optional
//! options object it is built from, and env-driven loading.

pub mod default_config;
pub mod improver_config;
