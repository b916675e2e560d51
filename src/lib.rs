//! Venue Runtime - Library Root
//!
//! Re-exports all modules for integration tests and benchmarks.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod usecases;
