//! Presentation helpers for the operator binary.

pub mod views;
