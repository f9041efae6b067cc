use core::fmt::{Debug, Formatter};

use miniz_oxide::MZError;

use crate::enums::ColorType;

/// Errors surfaced while decoding a PNG stream or compositing
/// decoded images.
///
/// Every failure aborts the operation that produced it, no
/// partially decoded or partially composed image is ever handed
/// back.
pub enum ImageErrors
{
    /// The first eight bytes are not the PNG signature.
    InvalidSignature,
    /// The stream has no leading IHDR chunk, or the chunk itself
    /// does not follow the format.
    MissingOrMalformedHeader(&'static str),
    /// The stream ended in the middle of a chunk or a scanline.
    TruncatedInput
    {
        expected: usize,
        found:    usize
    },
    /// A chunk's stored CRC does not match the computed one.
    ChunkCorrupt
    {
        stored:   u32,
        computed: u32
    },
    /// The image uses a part of the format this decoder does not
    /// handle, interlacing, indexed colour, depths other than 8
    /// or an unknown filter type.
    UnsupportedFeature(String),
    /// A compressed or decompressed stream, or a composited
    /// buffer, would pass the 4 GiB design limit.
    OversizedInput(u64),
    /// There was no image data to decompress.
    EmptyInput,
    /// The decompression primitive reported an error.
    DecompressionFailed(MZError),
    /// Two images handed to a compositing operation disagree on
    /// bit depth or colour type.
    IncompatibleFormats
    {
        left:  (u8, ColorType),
        right: (u8, ColorType)
    },
    Generic(String)
}

impl Debug for ImageErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            Self::InvalidSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::MissingOrMalformedHeader(val) => writeln!(f, "Malformed header, {val}"),
            Self::TruncatedInput { expected, found } => writeln!(
                f,
                "Stream ended early, needed {expected} bytes but only {found} remain"
            ),
            Self::ChunkCorrupt { stored, computed } => writeln!(
                f,
                "CRC does not match, chunk stores {stored:#010X} but data hashes to {computed:#010X}"
            ),
            Self::UnsupportedFeature(val) => writeln!(f, "Unsupported feature, {val}"),
            Self::OversizedInput(val) =>
            {
                writeln!(f, "Stream of {val} bytes is beyond the 4 GiB limit")
            }
            Self::EmptyInput => writeln!(f, "No image data present"),
            Self::DecompressionFailed(err) =>
            {
                writeln!(f, "Error inflating idat chunks {err:?}")
            }
            Self::IncompatibleFormats { left, right } => writeln!(
                f,
                "Images disagree on format, depth {} {:?} versus depth {} {:?}",
                left.0, left.1, right.0, right.1
            ),
            Self::Generic(val) => writeln!(f, "{val}")
        }
    }
}

impl From<String> for ImageErrors
{
    fn from(val: String) -> Self
    {
        Self::Generic(val)
    }
}
