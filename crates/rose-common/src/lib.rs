//! Common utilities for the rose rich-text engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - deduplicated warnings for missing resources and
//!   malformed markup, forwarded to `tracing`
//! - **Images** - decoded RGBA bitmaps handed from the image source to layout
//!   and rendering

pub mod image;
pub mod warning;
