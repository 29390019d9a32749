pub mod executor;

pub use executor::{Pipeline, PipelineSettings, Stage};
