//! Worship service styles: color palettes with reference photos, exported as
//! paginated PDFs.
//!
//! This library exposes the core of the `wss` CLI for use in tests and other
//! front ends.
//!
//! # Modules
//!
//! - `palette`: the palette being edited and its value-replacing edits
//! - `history`: saved palettes and the key-value store behind them
//! - `render`: rasterising the printable sheet into a snapshot
//! - `export`: slicing a snapshot into margin-aware PDF pages
//! - `config`: settings files
//! - `output`: output mode abstraction (robot/human)
//! - `error`: error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logging;
pub mod output;
pub mod palette;
pub mod raster;
pub mod render;
pub mod theme;
