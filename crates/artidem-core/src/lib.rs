//! Artificial glacier DEMs for flux routing.
//!
//! A coherent-noise surface is shaped into an island, turned into a
//! [`Geometry`] record (bed, thickness, melt, basal temperature, optional
//! ice-type mask), and exported as a NetCDF dataset in one of the
//! [`SchemaVersion`] layouts.

pub mod config;
pub mod dataset;
pub mod error;
pub mod field;
pub mod generator;
pub mod geometry;
pub mod mask;
pub mod noise;
pub mod overrides;
pub mod presets;
pub mod window;

pub use config::DemConfig;
pub use dataset::{read_dataset, write_dataset, DatasetWriter, SchemaVersion};
pub use error::{DemError, DemResult};
pub use field::Field;
pub use geometry::Geometry;
