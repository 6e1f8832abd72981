pub mod cancel;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod lattice;
pub mod report;
pub mod schedule;
pub mod stats;
pub mod sweep;

#[cfg(feature = "fast-lattice")]
pub mod lattice_fast;
