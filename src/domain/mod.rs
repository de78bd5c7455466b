//! Domain layer: the content model and its normalisation rules.

pub mod blocks;
pub mod documents;
pub mod error;
pub mod location;
