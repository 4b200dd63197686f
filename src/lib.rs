//! Bluesky Reaction Compiler library.
//!
//! A service that searches Bluesky for posts matching a query, ranks them by
//! engagement, and serves a web UI for browsing the results and copying
//! share-ready text blocks.

pub mod bsky;
pub mod config;
pub mod constants;
pub mod ranking;
pub mod share;
pub mod web;
