//! iterablectl: a command-line client for the Iterable API.
//!
//! The crate is split the usual way for a small HTTP client:
//! `domain` holds the records and errors, `application` the request
//! pipeline and the per-command operations, `infrastructure` the hyper
//! transport, configuration and output formatting, and `presentation`
//! the clap command tree.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
