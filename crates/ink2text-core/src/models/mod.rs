//! Data models.

pub mod config;
pub mod extraction;
pub mod formatting;
pub mod image;
