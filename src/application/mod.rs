//! Application services: fetching, rendering and searching site content.

pub mod backend;
pub mod error;
pub mod fetcher;
pub mod queries;
pub mod render;
pub mod search;
