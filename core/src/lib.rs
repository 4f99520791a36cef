#![deny(unsafe_code)]

//! Tools for the hub model of Eurasian population history.
//!
//! This serves as the core library implementation for the `hub-model` and `list-derived`
//! binaries, and covers two separate tasks.
//!
//! # Simulation
//!
//! The hub [`model`] is a fixed [`Demography`] of population splits, admixtures, and mass
//! migrations, from which samples are requested and simulated by an external
//! [`simulate::Engine`].
//!
//! ```
//! use ancestry_core::model::{self, Parameters, Variant};
//!
//! let parameters = Parameters::new(Variant::A)?;
//! let demography = model::build(&parameters)?;
//!
//! assert_eq!(demography.populations().len(), 37);
//! assert!(demography.is_sorted());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Derived alleles
//!
//! The [`derived`] module lists the sites at which individuals carry derived alleles, based on
//! genotype counts computed by plink.

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod demography;
pub use demography::Demography;

pub mod derived;

pub mod model;

pub mod sample;
pub use sample::{SampleRequest, SampleSet};

pub mod simulate;
pub use simulate::SimulationRequest;

pub mod time;
