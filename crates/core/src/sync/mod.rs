//! Inventory synchronization: fetch, diff, commit

pub mod mapper;
pub mod ports;
pub mod reconciler;
pub mod service;
