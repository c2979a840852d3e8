//! Parsed coefficient trace types

use std::ops::Index;

/// A fully parsed coefficient trace.
///
/// The `Video` owns every picture recorded in the trace, in the order the
/// decoder emitted them. Decode order is the only positional key available;
/// the trace does not carry a picture index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Video {
    /// The trace format version the video was read from.
    pub version: u16,

    /// All pictures in decode order.
    pub pictures: Vec<Picture>,
}

impl Video {
    /// Iterate over every macroblock in the video, along with the path of
    /// indices that leads to it.
    ///
    /// The path is `(picture, subpicture, slice, macroblock)`. The data model
    /// stores no parent links, so this is the way to recover where a
    /// macroblock came from.
    pub fn macroblocks(&self) -> impl Iterator<Item = (MacroblockPath, &Macroblock)> {
        self.pictures.iter().enumerate().flat_map(|(p, picture)| {
            picture
                .subpictures
                .iter()
                .enumerate()
                .flat_map(move |(s, subpicture)| {
                    subpicture
                        .slices
                        .iter()
                        .enumerate()
                        .flat_map(move |(l, slice)| {
                            slice.macroblocks.iter().enumerate().map(move |(m, mb)| {
                                (
                                    MacroblockPath {
                                        picture: p,
                                        subpicture: s,
                                        slice: l,
                                        macroblock: m,
                                    },
                                    mb,
                                )
                            })
                        })
                })
        })
    }
}

/// The location of a macroblock inside a `Video`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MacroblockPath {
    pub picture: usize,
    pub subpicture: usize,
    pub slice: usize,
    pub macroblock: usize,
}

/// One coded picture, either a frame or a pair of fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
    pub subpictures: Vec<Subpicture>,
}

/// A frame or a single field of a coded picture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subpicture {
    /// Whether this subpicture holds a whole frame or one of its fields.
    pub structure: PictureStructure,

    pub slices: Vec<Slice>,
}

/// H.264 picture structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PictureStructure {
    Frame,
    TopField,
    BottomField,
}

impl PictureStructure {
    /// Convert a trace structure code into a `PictureStructure`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Frame),
            1 => Some(Self::TopField),
            2 => Some(Self::BottomField),
            _ => None,
        }
    }

    /// The trace structure code for this picture structure.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Frame => 0,
            Self::TopField => 1,
            Self::BottomField => 2,
        }
    }

    /// Determine if this is either field.
    pub fn is_field(self) -> bool {
        matches!(self, Self::TopField | Self::BottomField)
    }
}

/// An independently decodable run of macroblocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    /// The slice type as recorded by the decoder.
    ///
    /// It is carried along for analysis only; nothing in this crate depends
    /// on it.
    pub slice_type: SliceType,

    pub macroblocks: Vec<Macroblock>,
}

/// ITU-T Recommendation H.264 7.4.3 `slice_type`, modulo 5.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SliceType {
    P,
    B,
    I,
    SP,
    SI,

    /// A slice type code outside of the H.264 range.
    ///
    /// The provided `u8` is the code exactly as it appeared in the trace.
    Reserved(u8),
}

impl SliceType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::P,
            1 => Self::B,
            2 => Self::I,
            3 => Self::SP,
            4 => Self::SI,
            v => Self::Reserved(v),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::P => 0,
            Self::B => 1,
            Self::I => 2,
            Self::SP => 3,
            Self::SI => 4,
            Self::Reserved(v) => v,
        }
    }

    /// Determine if this slice only contains intra-coded macroblocks.
    pub fn is_intra(self) -> bool {
        matches!(self, Self::I | Self::SI)
    }
}

bitflags! {
    /// Per-macroblock flags recorded in the trace.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct MacroblockFlag : u8 {
        /// The trace carried an explicit macroblock address.
        const EXPLICIT_ADDRESS = 0b1;

        /// The macroblock was decoded as a field macroblock (MBAFF), and thus
        /// used the field scan.
        const FIELD_DECODING = 0b10;
    }
}

/// The fixed-size coding unit of a picture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Macroblock {
    /// The macroblock address within its subpicture, in raster order.
    pub address: u32,

    pub flags: MacroblockFlag,

    /// All coefficient sets recorded for this macroblock.
    pub dct_coeffs: DctCoefficients,
}

/// The coefficient sets of one macroblock, keyed by `Plane`.
///
/// Each plane appears at most once. Sets are kept in the order they appeared
/// in the trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DctCoefficients(Vec<DctCoefficientSet>);

impl DctCoefficients {
    /// Build a coefficient map, rejecting a list that names a plane twice.
    ///
    /// On failure the duplicated plane is returned.
    pub fn new(sets: Vec<DctCoefficientSet>) -> Result<Self, Plane> {
        for (i, set) in sets.iter().enumerate() {
            if sets[..i].iter().any(|other| other.plane == set.plane) {
                return Err(set.plane);
            }
        }

        Ok(Self(sets))
    }

    /// Get the coefficient set for a plane, if the macroblock has one.
    pub fn get(&self, plane: Plane) -> Option<&DctCoefficientSet> {
        self.0.iter().find(|set| set.plane == plane)
    }

    pub fn contains(&self, plane: Plane) -> bool {
        self.get(plane).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DctCoefficientSet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the underlying list of sets, in trace order.
    pub fn as_slice(&self) -> &[DctCoefficientSet] {
        &self.0
    }
}

impl Index<Plane> for DctCoefficients {
    type Output = DctCoefficientSet;

    /// Get the coefficient set for a plane.
    ///
    /// # Panics
    ///
    /// Panics if the macroblock has no set for `plane`. Use `get` to probe.
    fn index(&self, plane: Plane) -> &DctCoefficientSet {
        self.get(plane)
            .unwrap_or_else(|| panic!("macroblock has no coefficients for {:?}", plane))
    }
}

impl<'a> IntoIterator for &'a DctCoefficients {
    type Item = &'a DctCoefficientSet;
    type IntoIter = std::slice::Iter<'a, DctCoefficientSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One block's worth of transform coefficients.
///
/// `values` are stored in the scan order the decoder read them in, not in
/// raster order. Use `crate::unpack` to reorder them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DctCoefficientSet {
    pub plane: Plane,
    pub values: Vec<i32>,
}

/// A colour component of a macroblock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Luma,
    ChromaBlue,
    ChromaRed,
}

/// The transform block size used for a plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransformSize {
    /// 4x4 integer transform, 16 coefficients.
    Transform4x4,

    /// 8x8 integer transform (High profile), 64 coefficients.
    Transform8x8,
}

impl TransformSize {
    /// The width and height of the transform block.
    pub fn side(self) -> usize {
        match self {
            Self::Transform4x4 => 4,
            Self::Transform8x8 => 8,
        }
    }

    /// The number of coefficients in one transform block.
    pub fn block_size(self) -> usize {
        self.side() * self.side()
    }

    /// How many transform blocks of this size tile a 16x16 plane.
    pub fn blocks_per_macroblock(self) -> u8 {
        match self {
            Self::Transform4x4 => 16,
            Self::Transform8x8 => 4,
        }
    }
}

/// Identifies one transform block within a macroblock.
///
/// A plane is a colour component, the transform size used on it, and which of
/// the component's transform blocks is meant. Blocks are numbered in the
/// decoder's block scan order.
///
/// In a trace, a plane is a single byte: bits 0-1 hold the component, bit 2 is
/// set for 8x8 transforms, bit 3 is reserved and bits 4-7 hold the block
/// index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Plane {
    component: Component,
    transform: TransformSize,
    block: u8,
}

impl Plane {
    /// The first 4x4 luma block.
    pub const LUMA: Plane = Plane {
        component: Component::Luma,
        transform: TransformSize::Transform4x4,
        block: 0,
    };

    /// The first 4x4 Cb block.
    pub const CHROMA_BLUE: Plane = Plane {
        component: Component::ChromaBlue,
        transform: TransformSize::Transform4x4,
        block: 0,
    };

    /// The first 4x4 Cr block.
    pub const CHROMA_RED: Plane = Plane {
        component: Component::ChromaRed,
        transform: TransformSize::Transform4x4,
        block: 0,
    };

    /// Construct a plane.
    ///
    /// Yields `None` if `block` does not fit in a macroblock for the given
    /// transform size.
    pub fn new(component: Component, transform: TransformSize, block: u8) -> Option<Self> {
        if block >= transform.blocks_per_macroblock() {
            return None;
        }

        Some(Self {
            component,
            transform,
            block,
        })
    }

    /// Convert a trace plane identifier into a `Plane`.
    ///
    /// This yields `None` for identifiers outside of the plane enumeration.
    pub fn from_u8(value: u8) -> Option<Self> {
        if value & 0x08 != 0 {
            return None;
        }

        let component = match value & 0x03 {
            0 => Component::Luma,
            1 => Component::ChromaBlue,
            2 => Component::ChromaRed,
            _ => return None,
        };

        let transform = if value & 0x04 != 0 {
            TransformSize::Transform8x8
        } else {
            TransformSize::Transform4x4
        };

        Self::new(component, transform, value >> 4)
    }

    /// The trace plane identifier for this plane.
    pub fn to_u8(self) -> u8 {
        let component = match self.component {
            Component::Luma => 0,
            Component::ChromaBlue => 1,
            Component::ChromaRed => 2,
        };
        let transform = match self.transform {
            TransformSize::Transform4x4 => 0,
            TransformSize::Transform8x8 => 0x04,
        };

        self.block << 4 | transform | component
    }

    pub fn component(self) -> Component {
        self.component
    }

    pub fn transform(self) -> TransformSize {
        self.transform
    }

    /// The index of this transform block within its component.
    pub fn block(self) -> u8 {
        self.block
    }

    /// The number of coefficients a set on this plane must hold.
    pub fn block_size(self) -> usize {
        self.transform.block_size()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{
        Component, DctCoefficientSet, DctCoefficients, PictureStructure, Plane, SliceType,
        TransformSize,
    };

    #[test]
    fn plane_identifiers() {
        assert_eq!(Some(Plane::LUMA), Plane::from_u8(0x00));
        assert_eq!(Some(Plane::CHROMA_BLUE), Plane::from_u8(0x01));
        assert_eq!(Some(Plane::CHROMA_RED), Plane::from_u8(0x02));

        let luma8x8 = Plane::from_u8(0x34).unwrap();
        assert_eq!(Component::Luma, luma8x8.component());
        assert_eq!(TransformSize::Transform8x8, luma8x8.transform());
        assert_eq!(3, luma8x8.block());
        assert_eq!(64, luma8x8.block_size());
        assert_eq!(0x34, luma8x8.to_u8());

        let cr15 = Plane::from_u8(0xF2).unwrap();
        assert_eq!(Component::ChromaRed, cr15.component());
        assert_eq!(15, cr15.block());
        assert_eq!(16, cr15.block_size());
    }

    #[test]
    fn unknown_planes() {
        // No fourth component.
        assert_eq!(None, Plane::from_u8(0x03));
        // Reserved bit.
        assert_eq!(None, Plane::from_u8(0x08));
        // Only four 8x8 blocks fit in a macroblock.
        assert_eq!(None, Plane::from_u8(0x44));
        assert_eq!(None, Plane::new(Component::Luma, TransformSize::Transform8x8, 4));
    }

    #[test]
    fn every_plane_round_trips_its_identifier() {
        for value in 0..=255u8 {
            if let Some(plane) = Plane::from_u8(value) {
                assert_eq!(value, plane.to_u8());
            }
        }
    }

    #[test]
    fn structure_and_slice_codes() {
        assert_eq!(Some(PictureStructure::BottomField), PictureStructure::from_u8(2));
        assert_eq!(None, PictureStructure::from_u8(3));
        assert!(PictureStructure::TopField.is_field());
        assert!(!PictureStructure::Frame.is_field());

        assert_eq!(SliceType::I, SliceType::from_u8(2));
        assert_eq!(SliceType::Reserved(7), SliceType::from_u8(7));
        assert_eq!(7, SliceType::Reserved(7).to_u8());
        assert!(SliceType::SI.is_intra());
    }

    #[test]
    fn coefficients_are_keyed_by_plane() {
        let coeffs = DctCoefficients::new(vec![
            DctCoefficientSet {
                plane: Plane::LUMA,
                values: vec![1; 16],
            },
            DctCoefficientSet {
                plane: Plane::CHROMA_RED,
                values: vec![2; 16],
            },
        ])
        .unwrap();

        assert_eq!(2, coeffs.len());
        assert_eq!(vec![2; 16], coeffs[Plane::CHROMA_RED].values);
        assert!(coeffs.get(Plane::CHROMA_BLUE).is_none());
    }

    #[test]
    fn duplicate_planes_are_rejected() {
        let set = DctCoefficientSet {
            plane: Plane::CHROMA_BLUE,
            values: vec![0; 16],
        };

        assert_eq!(
            Err(Plane::CHROMA_BLUE),
            DctCoefficients::new(vec![set.clone(), set])
        );
    }
}
