//! The decoded image and the operations that compose decoded
//! images into new ones.
//!
//! An image owns one interleaved byte buffer plus the dimensions
//! and colour interpretation needed to address it. Compositing
//! never mutates its inputs, every operation builds and returns a
//! fresh image.

use crate::enums::ColorType;
use crate::error::ImageErrors;

/// Axis along which [`merge`](Image::merge) lays out two images.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MergeDirection
{
    /// Side by side, widths add up, the shorter image is bottom
    /// padded.
    Horizontal,
    /// Stacked, heights add up, narrower rows are right padded.
    Vertical
}

/// Multiply out a buffer length, keeping the arithmetic in 64
/// bits and refusing anything past the 4 GiB design limit.
fn checked_buffer_len(width: u32, height: u32, bpp: usize) -> Result<usize, ImageErrors>
{
    let len = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(bpp as u64));

    match len
    {
        Some(len) if len <= u64::from(u32::MAX) => Ok(len as usize),
        Some(len) => Err(ImageErrors::OversizedInput(len)),
        None => Err(ImageErrors::OversizedInput(u64::MAX))
    }
}

/// A fully decoded raster image.
///
/// Holds raw interleaved pixel bytes, row major, exactly
/// `width * height * bytes_per_pixel` of them.
#[derive(Clone, Debug)]
pub struct Image
{
    width:  u32,
    height: u32,
    depth:  u8,
    color:  ColorType,
    data:   Vec<u8>
}

impl Default for Image
{
    fn default() -> Self
    {
        Image {
            width:  0,
            height: 0,
            depth:  8,
            color:  ColorType::Greyscale,
            data:   Vec::new()
        }
    }
}

impl Image
{
    /// Create an empty image, zero dimensions and no pixels.
    pub fn new() -> Image
    {
        Image::default()
    }

    pub(crate) fn from_parts(
        width: u32, height: u32, depth: u8, color: ColorType, data: Vec<u8>
    ) -> Image
    {
        Image {
            width,
            height,
            depth,
            color,
            data
        }
    }

    /// Build an image over caller provided interleaved pixels.
    ///
    /// The buffer must hold exactly `width * height` pixels of
    /// `color`, 8 bits per sample.
    pub fn from_u8(
        pixels: &[u8], width: u32, height: u32, color: ColorType
    ) -> Result<Image, ImageErrors>
    {
        if color == ColorType::IndexedColor
        {
            return Err(ImageErrors::UnsupportedFeature(
                "indexed colour cannot carry raw pixels".to_string()
            ));
        }

        let bpp = usize::from(color.num_components());
        let expected_len = checked_buffer_len(width, height, bpp)?;

        if pixels.len() != expected_len
        {
            return Err(ImageErrors::Generic(format!(
                "Length mismatch, expected {expected_len} bytes but found {}",
                pixels.len()
            )));
        }

        Ok(Image {
            width,
            height,
            depth: 8,
            color,
            data: pixels.to_vec()
        })
    }

    /// A background filled canvas with no image content.
    fn blank(
        width: u32, height: u32, depth: u8, color: ColorType, background: u8
    ) -> Result<Image, ImageErrors>
    {
        let bpp = usize::from(color.num_components()) * usize::from(depth / 8);
        let len = checked_buffer_len(width, height, bpp)?;

        Ok(Image {
            width,
            height,
            depth,
            color,
            data: vec![background; len]
        })
    }

    pub const fn width(&self) -> u32
    {
        self.width
    }

    pub const fn height(&self) -> u32
    {
        self.height
    }

    pub const fn depth(&self) -> u8
    {
        self.depth
    }

    pub const fn color_type(&self) -> ColorType
    {
        self.color
    }

    /// Bytes one pixel occupies in the buffer.
    pub fn bytes_per_pixel(&self) -> usize
    {
        usize::from(self.color.num_components()) * usize::from(self.depth / 8)
    }

    /// Bytes one row of pixels occupies in the buffer.
    pub fn stride(&self) -> usize
    {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Length of the pixel buffer in bytes.
    pub fn len(&self) -> usize
    {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8]
    {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8]
    {
        &mut self.data
    }

    /// Overwrite the stored width.
    ///
    /// Dimension only, keeping the buffer consistent with the new
    /// value is the caller's responsibility.
    pub fn set_width(&mut self, new_width: u32)
    {
        self.width = new_width;
    }

    /// Overwrite the stored height, see
    /// [`set_width`](Image::set_width).
    pub fn set_height(&mut self, new_height: u32)
    {
        self.height = new_height;
    }

    fn same_format(&self, other: &Image) -> Result<(), ImageErrors>
    {
        if self.depth != other.depth || self.color != other.color
        {
            return Err(ImageErrors::IncompatibleFormats {
                left:  (self.depth, self.color),
                right: (other.depth, other.color)
            });
        }

        Ok(())
    }

    /// Reallocate this image onto a `new_width` by `new_height`
    /// canvas filled with `background`.
    ///
    /// The original pixels land at column zero, placement itself
    /// is [`insert`](Image::insert), so a canvas smaller than the
    /// image grows back to fit it.
    pub fn resize(
        &self, new_width: u32, new_height: u32, background: u8
    ) -> Result<Image, ImageErrors>
    {
        let canvas = Image::blank(new_width, new_height, self.depth, self.color, background)?;

        canvas.insert(self, 0, background)
    }

    /// Place `source` inside this canvas at `column_offset`
    /// pixels from the left, producing a new image.
    ///
    /// The result is as wide and tall as the larger of the two
    /// images. The offset is clamped so the whole source always
    /// fits. Every byte not covered by the source, including all
    /// rows below it, is `background`. Only the canvas dimensions
    /// matter here, its pixel content does not carry over.
    pub fn insert(
        &self, source: &Image, column_offset: u32, background: u8
    ) -> Result<Image, ImageErrors>
    {
        self.same_format(source)?;

        let bpp = self.bytes_per_pixel();

        let out_width = self.width.max(source.width);
        let out_height = self.height.max(source.height);
        let out_len = checked_buffer_len(out_width, out_height, bpp)?;

        // clamp so the source still fits in full
        let offset = column_offset.min(out_width - source.width) as usize;

        let out_stride = out_width as usize * bpp;
        let src_stride = source.stride();
        let start = offset * bpp;

        let mut data = vec![background; out_len];

        if !source.data.is_empty()
        {
            for (out_row, src_row) in data
                .chunks_exact_mut(out_stride)
                .zip(source.data.chunks_exact(src_stride))
            {
                out_row[start..start + src_stride].copy_from_slice(src_row);
            }
        }

        Ok(Image::from_parts(
            out_width, out_height, self.depth, self.color, data
        ))
    }

    /// Concatenate this image with `other` along `direction`,
    /// producing a new image.
    ///
    /// Merging along the horizontal axis sums widths and pads the
    /// shorter image with `background` rows at the bottom, the
    /// vertical axis sums heights and pads narrower rows at the
    /// right. Both images must share bit depth and colour type.
    pub fn merge(
        &self, other: &Image, direction: MergeDirection, background: u8
    ) -> Result<Image, ImageErrors>
    {
        self.same_format(other)?;

        match direction
        {
            MergeDirection::Horizontal => self.merge_horizontal(other, background),
            MergeDirection::Vertical => self.merge_vertical(other, background)
        }
    }

    fn merge_horizontal(&self, other: &Image, background: u8) -> Result<Image, ImageErrors>
    {
        let bpp = self.bytes_per_pixel();

        let width_sum = u64::from(self.width) + u64::from(other.width);
        let out_width =
            u32::try_from(width_sum).map_err(|_| ImageErrors::OversizedInput(width_sum))?;
        let out_height = self.height.max(other.height);

        let out_len = checked_buffer_len(out_width, out_height, bpp)?;
        let out_stride = out_width as usize * bpp;

        let left_stride = self.stride();
        let right_stride = other.stride();

        let mut data = vec![background; out_len];

        if left_stride != 0
        {
            for (out_row, src_row) in data
                .chunks_exact_mut(out_stride)
                .zip(self.data.chunks_exact(left_stride))
            {
                out_row[..left_stride].copy_from_slice(src_row);
            }
        }

        if right_stride != 0
        {
            for (out_row, src_row) in data
                .chunks_exact_mut(out_stride)
                .zip(other.data.chunks_exact(right_stride))
            {
                out_row[left_stride..left_stride + right_stride].copy_from_slice(src_row);
            }
        }

        Ok(Image::from_parts(
            out_width, out_height, self.depth, self.color, data
        ))
    }

    fn merge_vertical(&self, other: &Image, background: u8) -> Result<Image, ImageErrors>
    {
        let bpp = self.bytes_per_pixel();

        let height_sum = u64::from(self.height) + u64::from(other.height);
        let out_height =
            u32::try_from(height_sum).map_err(|_| ImageErrors::OversizedInput(height_sum))?;
        let out_width = self.width.max(other.width);

        let out_len = checked_buffer_len(out_width, out_height, bpp)?;
        let out_stride = out_width as usize * bpp;

        let top_stride = self.stride();
        let bottom_stride = other.stride();

        let mut data = vec![background; out_len];

        if top_stride != 0
        {
            for (out_row, src_row) in data
                .chunks_exact_mut(out_stride)
                .zip(self.data.chunks_exact(top_stride))
            {
                out_row[..top_stride].copy_from_slice(src_row);
            }
        }

        if bottom_stride != 0
        {
            for (out_row, src_row) in data
                .chunks_exact_mut(out_stride)
                .skip(self.height as usize)
                .zip(other.data.chunks_exact(bottom_stride))
            {
                out_row[..bottom_stride].copy_from_slice(src_row);
            }
        }

        Ok(Image::from_parts(
            out_width, out_height, self.depth, self.color, data
        ))
    }
}
