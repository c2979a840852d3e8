//! Reader configuration

bitflags! {
    /// Options which influence the reading of a trace.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ReaderOption : u8 {
        /// Tolerate data after the last declared picture.
        ///
        /// Some decoder builds append a footer to the trace. Without this
        /// option, leftover bytes are treated as corrupt framing.
        const ALLOW_TRAILING_DATA = 0b1;

        /// Number macroblocks purely by their order in the trace, ignoring
        /// any explicit addresses the trace carries.
        const IMPLICIT_ADDRESSES = 0b10;
    }
}

impl Default for ReaderOption {
    fn default() -> Self {
        Self::empty()
    }
}

/// Upper bounds on the repetition counts of a trace.
///
/// A count above its bound is treated as corrupt framing rather than as a
/// request to allocate that many children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceLimits {
    pub max_pictures: usize,

    /// A frame has one subpicture, a field pair has two.
    pub max_subpictures: usize,

    pub max_slices: usize,

    /// Macroblocks per slice. The default fits an 8K (8192x4320) picture.
    pub max_macroblocks: usize,

    /// Coefficient sets per macroblock. There are at most 48 distinct planes
    /// in a macroblock, plus 12 more if 8x8 transforms are mixed in.
    pub max_coefficient_sets: usize,
}

impl Default for TraceLimits {
    fn default() -> Self {
        Self {
            max_pictures: 1 << 20,
            max_subpictures: 2,
            max_slices: 1 << 18,
            max_macroblocks: 1 << 18,
            max_coefficient_sets: 60,
        }
    }
}

/// Everything that configures a trace read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    pub options: ReaderOption,
    pub limits: TraceLimits,
}

impl ReaderConfig {
    pub fn new(options: ReaderOption, limits: TraceLimits) -> Self {
        Self { options, limits }
    }
}

impl From<ReaderOption> for ReaderConfig {
    fn from(options: ReaderOption) -> Self {
        Self {
            options,
            limits: TraceLimits::default(),
        }
    }
}
