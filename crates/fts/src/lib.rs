//! fts: inspect Alfresco full-text search queries
//!
//! A command-line front end for `fts-query`. It parses queries with the settings resolved by
//! `fts-config` from `.fts.toml` files and prints the resulting syntax trees, token streams,
//! and effective configuration.

#![warn(missing_docs)]

pub mod cli;
