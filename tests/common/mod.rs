#![allow(dead_code)] // not every helper is used by every test binary

pub mod probes;
pub mod strategies;

pub use probes::*;
pub use strategies::*;
