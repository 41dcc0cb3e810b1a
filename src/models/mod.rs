//! Request and Response models for the image proxy API
//!
//! This module defines the DTOs used for query extraction and JSON bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ImageQuery;
pub use responses::{InfoResponse, StatsData, StatsResponse};
