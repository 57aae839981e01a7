//! Error types for the AutoProbe protocol layer.

mod annotate;
mod design;
mod driver;
mod explore;
mod model;

pub use annotate::*;
pub use design::*;
pub use driver::*;
pub use explore::*;
pub use model::*;
