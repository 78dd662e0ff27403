#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Builds privacy preserving fishing/not fishing time ranges per vessel from point
//! observations, and labels vessel tracks by joining them against those ranges.

mod anonymize;
mod deserialize_utils;
mod error;
mod models;
mod points;
mod ranges;
mod series;
mod store;

pub use anonymize::*;
pub use error::{Error, Result};
pub use models::*;
pub use points::*;
pub use ranges::*;
pub use series::*;
pub use store::*;
