//! Pure-rust reader for H.264 macroblock coefficient traces.
//!
//! An instrumented reference decoder can dump the transform coefficients of
//! every macroblock it decodes into a positional binary trace. This crate
//! parses such a trace into a `Video` tree and reorders the scan-ordered
//! coefficients of a single block back into a raster `CoefficientMatrix`.

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate lazy_static;

mod error;
pub mod parser;
mod traits;
mod types;
pub mod unpack;

pub use error::{Error, Result};
pub use parser::{read_video, read_video_with, Pictures, ReaderConfig, ReaderOption, TraceLimits};
pub use types::*;
pub use unpack::{pack, scan_position, unpack, unpack_with_scan, CoefficientMatrix, ScanOrder};
