//! Trace header and picture stream

use crate::error::{Error, Result};
use crate::parser::options::{ReaderConfig, ReaderOption};
use crate::parser::picture::decode_picture;
use crate::parser::reader::TraceReader;
use crate::types::{Picture, Video};
use std::io::Read;

/// The four bytes every coefficient trace starts with.
pub const TRACE_MAGIC: [u8; 4] = *b"MBTR";

/// The only trace format version this reader understands.
pub const TRACE_VERSION: u16 = 1;

/// The header at the start of a coefficient trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceHeader {
    pub version: u16,

    /// How many pictures follow the header.
    pub picture_count: usize,
}

/// Reads the trace header.
///
/// A trace that does not start with `TRACE_MAGIC`, or that carries a version
/// other than `TRACE_VERSION`, is rejected as corrupt framing.
pub fn decode_header<R>(reader: &mut TraceReader<R>, config: &ReaderConfig) -> Result<TraceHeader>
where
    R: Read,
{
    let mut magic = [0; 4];
    reader.read_bytes(&mut magic)?;
    if magic != TRACE_MAGIC {
        return Err(Error::CorruptFraming("missing trace magic"));
    }

    let version = reader.read_le::<u16>()?;
    if version != TRACE_VERSION {
        return Err(Error::CorruptFraming("unsupported trace version"));
    }

    let picture_count = reader.read_count(config.limits.max_pictures, "picture count")?;

    Ok(TraceHeader {
        version,
        picture_count,
    })
}

/// A lazy traversal of the pictures in a trace.
///
/// The header is read up front; every call to `next` then parses exactly one
/// more picture. Once all declared pictures have been produced, the rest of
/// the stream is checked for leftover data.
///
/// After yielding an error the iterator is fused: the read cursor is no
/// longer on a field boundary, so nothing after it can be trusted.
pub struct Pictures<R>
where
    R: Read,
{
    reader: TraceReader<R>,
    config: ReaderConfig,
    header: TraceHeader,

    /// How many pictures have been produced so far.
    decoded: usize,

    finished: bool,
}

impl<R> Pictures<R>
where
    R: Read,
{
    /// Start reading a trace from `source`.
    pub fn new(source: R, config: ReaderConfig) -> Result<Self> {
        let mut reader = TraceReader::from_source(source);
        let header = decode_header(&mut reader, &config)?;

        log::debug!(
            "Coefficient trace version {} with {} pictures",
            header.version,
            header.picture_count
        );

        Ok(Self {
            reader,
            config,
            header,
            decoded: 0,
            finished: false,
        })
    }

    /// The header the trace was opened with.
    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    /// How many pictures are still to be read.
    pub fn remaining(&self) -> usize {
        if self.finished {
            0
        } else {
            self.header.picture_count - self.decoded
        }
    }

    /// Make sure nothing follows the last declared picture.
    fn finish(&mut self) -> Result<()> {
        if self.reader.is_at_end()? {
            return Ok(());
        }

        if !self
            .config
            .options
            .contains(ReaderOption::ALLOW_TRAILING_DATA)
        {
            return Err(Error::CorruptFraming("data after last picture"));
        }

        let skipped = self.reader.skip_to_end()?;
        log::warn!("Ignoring {} bytes after the last picture", skipped);

        Ok(())
    }
}

impl<R> Iterator for Pictures<R>
where
    R: Read,
{
    type Item = Result<Picture>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.decoded == self.header.picture_count {
            self.finished = true;
            return self.finish().err().map(Err);
        }

        log::debug!(
            "Reading picture {} at byte {}",
            self.decoded,
            self.reader.position()
        );

        match decode_picture(&mut self.reader, &self.config) {
            Ok(picture) => {
                self.decoded += 1;
                Some(Ok(picture))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining() + 1))
    }
}

/// Read an entire coefficient trace into a `Video`.
///
/// The stream is read to exhaustion. The first error aborts the read and
/// nothing that was parsed before it is returned.
pub fn read_video_with<R>(source: R, config: ReaderConfig) -> Result<Video>
where
    R: Read,
{
    let pictures = Pictures::new(source, config)?;
    let version = pictures.header().version;

    Ok(Video {
        version,
        pictures: pictures.collect::<Result<Vec<_>>>()?,
    })
}

/// Read an entire coefficient trace into a `Video` with the default
/// configuration.
pub fn read_video<R>(source: R) -> Result<Video>
where
    R: Read,
{
    read_video_with(source, ReaderConfig::default())
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::parser::fixture::{TraceBuilder, LUMA_RAMP};
    use crate::parser::options::{ReaderConfig, ReaderOption, TraceLimits};
    use crate::parser::video::{read_video, read_video_with, Pictures};
    use crate::types::{PictureStructure, Plane, SliceType};
    use crate::unpack::unpack;

    #[test]
    fn single_macroblock_trace() {
        let data = TraceBuilder::single_macroblock(&[(Plane::LUMA.to_u8(), &LUMA_RAMP[..])]);
        let video = read_video(&data[..]).unwrap();

        assert_eq!(1, video.version);
        assert_eq!(1, video.pictures.len());

        let subpicture = &video.pictures[0].subpictures[0];
        assert_eq!(PictureStructure::Frame, subpicture.structure);
        assert_eq!(SliceType::I, subpicture.slices[0].slice_type);

        let mb = &subpicture.slices[0].macroblocks[0];
        assert_eq!(0, mb.address);
        assert_eq!(
            (0..16).collect::<Vec<i32>>(),
            mb.dct_coeffs[Plane::LUMA].values
        );
    }

    #[test]
    fn single_macroblock_unpacks() {
        let data = TraceBuilder::single_macroblock(&[(Plane::LUMA.to_u8(), &LUMA_RAMP[..])]);
        let video = read_video(&data[..]).unwrap();
        let (path, mb) = video.macroblocks().next().unwrap();

        assert_eq!(0, path.picture + path.subpicture + path.slice + path.macroblock);

        let set = &mb.dct_coeffs[Plane::LUMA];
        let matrix = unpack(set.plane, &set.values).unwrap();

        assert_eq!(
            vec![
                vec![0, 1, 5, 6],
                vec![2, 4, 7, 12],
                vec![3, 8, 11, 13],
                vec![9, 10, 14, 15],
            ],
            matrix.to_rows()
        );
        assert_eq!(1, video.macroblocks().count());
    }

    #[test]
    fn parsing_is_deterministic() {
        let mut builder = TraceBuilder::new(2);
        for p in 0..2 {
            builder.picture(1).subpicture(0, 1).slice(p, 2);
            for m in 0..2 {
                let values: Vec<i32> = (0..16).map(|v| v * (m + 1) - p as i32).collect();
                builder
                    .macroblock(0, None, 1)
                    .coefficient_set(Plane::CHROMA_BLUE.to_u8(), &values);
            }
        }
        let data = builder.finish();

        assert_eq!(read_video(&data[..]).unwrap(), read_video(&data[..]).unwrap());

        let video = read_video(&data[..]).unwrap();
        let paths: Vec<_> = video
            .macroblocks()
            .map(|(path, mb)| (path.picture, path.macroblock, mb.address))
            .collect();

        assert_eq!(vec![(0, 0, 0), (0, 1, 1), (1, 0, 0), (1, 1, 1)], paths);
    }

    #[test]
    fn empty_trace_is_truncated() {
        assert!(matches!(read_video(&[][..]), Err(Error::TruncatedInput)));
    }

    #[test]
    fn no_pictures() {
        let data = TraceBuilder::new(0).finish();
        let video = read_video(&data[..]).unwrap();

        assert!(video.pictures.is_empty());
    }

    #[test]
    fn bad_magic() {
        let mut data = TraceBuilder::new(0).finish();
        data[0] = b'X';

        assert!(matches!(
            read_video(&data[..]),
            Err(Error::CorruptFraming(_))
        ));
    }

    #[test]
    fn unsupported_version() {
        let mut data = TraceBuilder::new(0).finish();
        data[4] = 2;

        assert!(matches!(
            read_video(&data[..]),
            Err(Error::CorruptFraming(_))
        ));
    }

    #[test]
    fn negative_picture_count() {
        let data = TraceBuilder::new(-1).finish();

        assert!(matches!(
            read_video(&data[..]),
            Err(Error::CorruptFraming("picture count"))
        ));
    }

    #[test]
    fn picture_count_over_limit() {
        let data = TraceBuilder::new(3).finish();
        let config = ReaderConfig::new(
            ReaderOption::empty(),
            TraceLimits {
                max_pictures: 2,
                ..TraceLimits::default()
            },
        );

        assert!(matches!(
            read_video_with(&data[..], config),
            Err(Error::CorruptFraming("picture count"))
        ));
    }

    #[test]
    fn missing_declared_picture_is_truncation() {
        let mut builder = TraceBuilder::new(2);
        builder.picture(1).subpicture(0, 0);
        let data = builder.finish();

        assert!(matches!(read_video(&data[..]), Err(Error::TruncatedInput)));
    }

    #[test]
    fn every_truncation_point_is_reported() {
        let data = TraceBuilder::single_macroblock(&[(Plane::LUMA.to_u8(), &LUMA_RAMP[..])]);

        for end in 0..data.len() {
            assert!(
                matches!(read_video(&data[..end]), Err(Error::TruncatedInput)),
                "truncating at {} of {} bytes",
                end,
                data.len()
            );
        }
    }

    #[test]
    fn trailing_data() {
        let mut data = TraceBuilder::single_macroblock(&[(Plane::LUMA.to_u8(), &LUMA_RAMP[..])]);
        data.extend_from_slice(&[0xDE, 0xAD]);

        assert!(matches!(
            read_video(&data[..]),
            Err(Error::CorruptFraming("data after last picture"))
        ));

        let video = read_video_with(&data[..], ReaderOption::ALLOW_TRAILING_DATA.into()).unwrap();
        assert_eq!(1, video.pictures.len());
    }

    #[test]
    fn lazy_pictures() {
        let mut builder = TraceBuilder::new(3);
        for _ in 0..3 {
            builder
                .picture(2)
                .subpicture(1, 1)
                .slice(1, 1)
                .macroblock(0, None, 0)
                .subpicture(2, 0);
        }
        let data = builder.finish();

        let mut pictures = Pictures::new(&data[..], ReaderConfig::default()).unwrap();
        assert_eq!(3, pictures.remaining());

        let first = pictures.next().unwrap().unwrap();
        assert_eq!(2, first.subpictures.len());
        assert_eq!(PictureStructure::TopField, first.subpictures[0].structure);
        assert_eq!(PictureStructure::BottomField, first.subpictures[1].structure);
        assert_eq!(2, pictures.remaining());

        assert_eq!(2, pictures.by_ref().filter(|p| p.is_ok()).count());
        assert!(pictures.next().is_none());
    }

    #[test]
    fn lazy_pictures_stop_after_error() {
        let mut builder = TraceBuilder::new(2);
        builder.picture(1).subpicture(0, 1).slice(0, 1).macroblock(0, None, 1);
        builder.coefficient_set(0x03, &LUMA_RAMP);
        builder.picture(1).subpicture(0, 0);
        let data = builder.finish();

        let mut pictures = Pictures::new(&data[..], ReaderConfig::default()).unwrap();

        assert!(matches!(pictures.next(), Some(Err(Error::UnknownPlane(0x03)))));
        assert!(pictures.next().is_none());
        assert_eq!(0, pictures.remaining());
    }
}
