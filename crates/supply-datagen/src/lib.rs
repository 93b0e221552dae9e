//! Synthetic data generator
//!
//! Produces the two relational tables the index is built from: suppliers
//! (`S001`, `S002`, ...) and materials that each reference one generated supplier.
//!
//! # Example
//!
//! ```no_run
//! use supply_core::{DataConfig, GeneratorConfig};
//! use supply_datagen::{SyntheticGenerator, write_dataset};
//!
//! let mut generator = SyntheticGenerator::new(GeneratorConfig::default().with_seed(7))?;
//! let dataset = generator.generate()?;
//! let report = write_dataset(&dataset, &DataConfig::default())?;
//! println!("{} materials written", report.materials_written);
//! # Ok::<(), supply_datagen::DatagenError>(())
//! ```

pub mod error;
pub mod generator;
pub mod vocab;
pub mod writer;

pub use error::{DatagenError, Result};
pub use generator::{Dataset, SyntheticGenerator};
pub use writer::{GenerationReport, write_dataset};
