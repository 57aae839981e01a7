//! Common types shared by the exploration loop and its collaborators.

mod action;
mod element;
mod geometry;
mod record;
mod verdict;

pub use action::*;
pub use element::*;
pub use geometry::*;
pub use record::*;
pub use verdict::*;
