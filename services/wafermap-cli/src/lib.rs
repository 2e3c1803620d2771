//! Command line front-end for wafer descriptions.
//!
//! The binary loads a description file, builds the wafer and prints scans,
//! merged grids, click payloads, legends or render plans as tables, JSON
//! or CSV. Formatting lives here so it can be tested without a process.

pub mod report;

pub use report::{OutputFormat, WaferReport};
