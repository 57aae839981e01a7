//! Figma REST API design source.
//!
//! Fetches whole design files by key and caches the raw response next to
//! the exploration root so repeated runs do not hit the API.

mod client;

pub use client::{FigmaClient, FigmaConfig};
