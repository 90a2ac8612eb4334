//! Board pipelines: the stage-ordering engine and the store seam it runs on.

pub mod engine;
pub mod store;

pub use engine::*;
pub use store::*;
