//! Subburn-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across subburn:
//!
//! - **Error Handling**: the unified [`Error`] type and [`Result`] alias
//! - **Video Identifiers**: [`VideoId`], a filesystem-safe token naming one video
//! - **Reference Parsing**: [`reference::parse_video_id`] for the canonical URL shapes
//! - **Path Utilities**: Functions to detect file types by extension
//!
//! # Examples
//!
//! ```
//! use subburn_common::reference::parse_video_id;
//! use subburn_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let id = parse_video_id("https://youtu.be/abc123").unwrap();
//! assert_eq!(id.as_str(), "abc123");
//!
//! assert!(is_video_file(Path::new("abc123.webm")));
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod reference;

pub use error::{Error, Result};
pub use ids::VideoId;
