//! Remote inventory API adapters
//!
//! The property collector gateway answers "all objects of type T with
//! property set P" over JSON. Transport retries live in [`crate::http`].

pub mod collector;

pub use collector::HttpPropertyCollector;
