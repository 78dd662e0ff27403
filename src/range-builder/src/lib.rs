#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Batch jobs around `fishing-ranges`: converting configured sources into a
//! canonical range store, and labelling vessel tracks against that store.

pub mod dialect;
pub mod error;
pub mod label;
pub mod settings;
pub mod sources;
pub mod startup;
