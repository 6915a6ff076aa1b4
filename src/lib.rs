pub mod error;
pub mod geometry;
pub mod landxml;
pub mod math;

pub use error::{AlineaError, Result};
