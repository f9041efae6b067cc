#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types the decoder acts on, see
/// https://www.w3.org/TR/2003/REC-PNG-20031110/
///
/// Every other type is routed through the unknown chunk path and
/// skipped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum PngChunkType
{
    IHDR,
    IDAT,
    IEND,
    unkn
}

/// Per scanline tag selecting the predictor used to encode that
/// row.
///
/// `PaethFirst` and `AvgFirst` are not wire values, they are the
/// first row specializations where the previous scanline is
/// defined to be zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FilterType
{
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // First scanline, special
    PaethFirst,
    AvgFirst
}

impl FilterType
{
    pub fn from_int(int: u8) -> Option<FilterType>
    {
        match int
        {
            0 => Some(FilterType::None),
            1 => Some(FilterType::Sub),
            2 => Some(FilterType::Up),
            3 => Some(FilterType::Average),
            4 => Some(FilterType::Paeth),
            _ => None
        }
    }
}

/// Colour interpretation of a decoded pixel buffer.
///
/// These mirror the PNG colour types. Indexed colour is
/// recognised during parsing but never decoded, resolving a
/// palette is outside what this crate does.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorType
{
    Greyscale,
    TrueColor,
    IndexedColor,
    GreyscaleAlpha,
    TrueColorAlpha
}

impl Default for ColorType
{
    fn default() -> Self
    {
        Self::Greyscale
    }
}

impl ColorType
{
    pub(crate) fn num_components(self) -> u8
    {
        match self
        {
            ColorType::Greyscale => 1,
            ColorType::GreyscaleAlpha => 2,
            ColorType::TrueColor => 3,
            ColorType::TrueColorAlpha => 4,
            // rejected while parsing the header, an image with
            // this colour type is never constructed
            ColorType::IndexedColor => unreachable!()
        }
    }

    pub(crate) fn from_int(int: u8) -> Option<ColorType>
    {
        match int
        {
            0 => Some(Self::Greyscale),
            2 => Some(Self::TrueColor),
            3 => Some(Self::IndexedColor),
            4 => Some(Self::GreyscaleAlpha),
            6 => Some(Self::TrueColorAlpha),
            _ => None
        }
    }
}
