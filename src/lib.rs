//! subburn - burn translated subtitles into downloaded videos
//!
//! This library crate exposes the pipeline for integration testing.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod translate;
