//! Content fetching, rich-text rendering and search for a GraphQL-backed
//! corporate website.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
