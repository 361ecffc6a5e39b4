// astra_core/src/lib.rs

// This file defines the public modules of the library.
pub mod clock;
pub mod constants;
pub mod delay;
pub mod error;
pub mod geometry;
pub mod judgement;
pub mod noise;
pub mod prelude;
pub mod sensors;
pub mod types;
pub mod visibility;
