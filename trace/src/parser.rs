//! Coefficient trace parser functions.

mod macroblock;
mod options;
mod picture;
mod reader;
mod slice;
mod video;

pub use macroblock::{decode_coefficient_set, decode_macroblock};
pub use options::{ReaderConfig, ReaderOption, TraceLimits};
pub use picture::{decode_picture, decode_subpicture};
pub use reader::TraceReader;
pub use slice::decode_slice;
pub use video::{
    decode_header, read_video, read_video_with, Pictures, TraceHeader, TRACE_MAGIC, TRACE_VERSION,
};
