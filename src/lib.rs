//! Spirit Hatch: a single virtual pet whose stats decay in real time.
//!
//! The engine lives in [`model`] and [`sim`]; [`session`] wraps one pet with
//! a clock and an RNG. [`app`] and [`server`] are the terminal and HTTP
//! front ends.

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod server;
pub mod session;
pub mod sim;

pub use error::{Error, Result};
