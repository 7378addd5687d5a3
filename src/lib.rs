//! Read-only market statistics: top open asks and a gap-filled daily volume
//! series, carried as arbitrary-precision decimals end to end.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod numeric;
pub mod timeseries;
pub mod types;
