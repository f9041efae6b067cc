use log::trace;

use crate::bytestream::{tag_to_text, ByteReader};
use crate::constants::PNG_SIGNATURE;
use crate::enums::{ColorType, FilterType, PngChunkType};
use crate::error::ImageErrors;
use crate::filters::{
    handle_avg, handle_avg_first, handle_paeth, handle_paeth_first, handle_sub, handle_up
};
use crate::image::Image;
use crate::inflate::{check_stream_size, inflate_all};
use crate::options::DecoderOptions;

/// A single parsed chunk.
///
/// Chunks are transient, only the header fields and the
/// accumulated IDAT payload outlive parsing.
#[derive(Copy, Clone)]
pub(crate) struct PngChunk
{
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4],
    pub crc:        u32
}

/// Header fields as stored in the IHDR chunk.
#[derive(Default, Debug, Copy, Clone)]
pub struct PngInfo
{
    pub width:     usize,
    pub height:    usize,
    pub depth:     u8,
    pub color:     ColorType,
    pub component: u8
}

/// A PNG decoder over a borrowed byte stream.
///
/// One decoder decodes one image, create it over the file bytes
/// and call [`decode`](PngDecoder::decode).
pub struct PngDecoder<'a>
{
    pub(crate) seen_hdr:    bool,
    pub(crate) stream:      ByteReader<'a>,
    pub(crate) options:     DecoderOptions,
    pub(crate) png_info:    PngInfo,
    pub(crate) idat_chunks: Vec<u8>,
    pub(crate) out:         Vec<u8>
}

impl<'a> PngDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> PngDecoder<'a>
    {
        let default_opt = DecoderOptions::default();

        PngDecoder::new_with_options(data, default_opt)
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a>
    {
        PngDecoder {
            seen_hdr: false,
            stream: ByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            idat_chunks: Vec::new(),
            out: Vec::new()
        }
    }

    /// Image dimensions as `(width, height)`, present once the
    /// header chunk has been parsed.
    pub const fn get_dimensions(&self) -> Option<(usize, usize)>
    {
        if !self.seen_hdr
        {
            return None;
        }

        Some((self.png_info.width, self.png_info.height))
    }

    pub const fn get_depth(&self) -> Option<u8>
    {
        if !self.seen_hdr
        {
            return None;
        }

        Some(self.png_info.depth)
    }

    pub const fn get_color_type(&self) -> Option<ColorType>
    {
        if !self.seen_hdr
        {
            return None;
        }

        Some(self.png_info.color)
    }

    fn read_chunk_header(&mut self) -> Result<PngChunk, ImageErrors>
    {
        // Format is length - chunk type - [data] - crc
        let chunk_length = self.stream.get_u32_be_err()? as usize;
        let chunk_tag = self.stream.get_u32_be_err()?.to_be_bytes();

        if !self.stream.has(chunk_length + 4 /*crc*/)
        {
            return Err(ImageErrors::TruncatedInput {
                expected: chunk_length + 4,
                found:    self.stream.remaining()
            });
        }

        let mut crc_bytes = [0; 4];
        crc_bytes.copy_from_slice(self.stream.peek_at(chunk_length, 4)?);

        let crc = u32::from_be_bytes(crc_bytes);

        let chunk_type = match &chunk_tag
        {
            b"IHDR" => PngChunkType::IHDR,
            b"IDAT" => PngChunkType::IDAT,
            b"IEND" => PngChunkType::IEND,
            _ => PngChunkType::unkn
        };

        if self.options.confirm_crc
        {
            // the crc covers the chunk type and its data, go back
            // and point to the chunk type
            self.stream.rewind(4);

            let bytes = self.stream.peek_at(0, chunk_length + 4)?;
            let computed = crc32fast::hash(bytes);

            // the other parts expect the reader to point to the
            // start of the chunk data
            self.stream.skip(4);

            if crc != computed
            {
                return Err(ImageErrors::ChunkCorrupt { stored: crc, computed });
            }
        }

        Ok(PngChunk {
            length: chunk_length,
            chunk: chunk_tag,
            chunk_type,
            crc
        })
    }

    fn skip_unknown_chunk(&mut self, header: PngChunk) -> Result<(), ImageErrors>
    {
        let name = tag_to_text(u32::from_be_bytes(header.chunk));

        if header.chunk[0] & (1 << 5) == 0
        {
            return Err(ImageErrors::Generic(format!(
                "Chunk {name} unknown but deemed necessary"
            )));
        }

        trace!("Skipping unknown chunk {name:?}, length {}", header.length);

        // data plus the trailing crc
        self.stream.skip(header.length + 4);

        Ok(())
    }

    /// Decode a PNG encoded image into an [`Image`] holding the
    /// raw interleaved pixels.
    pub fn decode(&mut self) -> Result<Image, ImageErrors>
    {
        let signature = self.stream.get_u64_be_err()?;

        if signature != PNG_SIGNATURE
        {
            return Err(ImageErrors::InvalidSignature);
        }

        // the header chunk must come first
        if self.stream.peek_at(4, 4)? != b"IHDR"
        {
            return Err(ImageErrors::MissingOrMalformedHeader(
                "first chunk is not IHDR"
            ));
        }

        // running out of stream is a normal end, so is IEND
        while !self.stream.eof()
        {
            let header = self.read_chunk_header()?;

            match header.chunk_type
            {
                PngChunkType::IHDR => self.parse_ihdr(header)?,
                PngChunkType::IDAT => self.parse_idat(header)?,
                PngChunkType::IEND => break,
                PngChunkType::unkn => self.skip_unknown_chunk(header)?
            }
        }

        if !self.seen_hdr
        {
            return Err(ImageErrors::MissingOrMalformedHeader(
                "no IHDR chunk in stream"
            ));
        }

        let info = self.png_info;

        // pixel bytes per scanline, the filter byte excluded
        let stride = info.width * usize::from(info.component);
        let expected = (stride as u64 + 1) * info.height as u64;

        check_stream_size(expected)?;

        let deflate_data = inflate_all(&self.idat_chunks, expected as usize)?;

        // done with the compressed copy
        self.idat_chunks = Vec::new();

        self.create_image_raw(&deflate_data, stride)?;

        let out = core::mem::take(&mut self.out);

        Ok(Image::from_parts(
            info.width as u32,
            info.height as u32,
            info.depth,
            info.color,
            out
        ))
    }

    /// Reconstruct raw pixels from the decompressed filtered
    /// stream into `self.out`.
    ///
    /// Reconstruction must walk scanlines top to bottom, each row
    /// reads bytes of the row reconstructed just before it.
    fn create_image_raw(&mut self, deflate_data: &[u8], stride: usize)
        -> Result<(), ImageErrors>
    {
        let info = &self.png_info;
        let components = usize::from(info.component);

        // a filter type byte leads every scanline
        let scanline_size = stride + 1;
        let expected = scanline_size as u64 * info.height as u64;

        if (deflate_data.len() as u64) < expected
        {
            return Err(ImageErrors::TruncatedInput {
                expected: expected as usize,
                found:    deflate_data.len()
            });
        }

        self.out = vec![0; stride * info.height];

        let out = &mut self.out;

        let mut prev_row_start = 0;
        let mut out_position = 0;
        let mut first_row = true;

        for in_stride in deflate_data.chunks_exact(scanline_size).take(info.height)
        {
            // Split output into current and previous. current
            // points to the row being reconstructed, prev holds
            // every row already written.
            let (prev, current) = out.split_at_mut(out_position);

            let mut prev_row: &[u8] = &[];

            if !first_row
            {
                prev_row = &prev[prev_row_start..prev_row_start + stride];
                prev_row_start += stride;
            }

            out_position += stride;

            let filter_byte = in_stride[0];
            // filtered image bytes
            let raw = &in_stride[1..];

            let mut filter = FilterType::from_int(filter_byte).ok_or_else(|| {
                ImageErrors::UnsupportedFeature(format!("unknown filter type {filter_byte}"))
            })?;

            if first_row
            {
                // the previous scanline is defined to be zero
                // here, remap to the variants that drop it

                if filter == FilterType::Paeth
                {
                    filter = FilterType::PaethFirst;
                }
                if filter == FilterType::Up
                {
                    // up over a zero row is a memcpy
                    filter = FilterType::None;
                }
                if filter == FilterType::Average
                {
                    filter = FilterType::AvgFirst;
                }

                first_row = false;
            }

            let current = &mut current[0..stride];

            match filter
            {
                FilterType::None => current.copy_from_slice(raw),

                FilterType::Sub => handle_sub(raw, current, components),

                FilterType::Up => handle_up(prev_row, raw, current),

                FilterType::Average => handle_avg(prev_row, raw, current, components),

                FilterType::AvgFirst => handle_avg_first(raw, current, components),

                FilterType::Paeth => handle_paeth(prev_row, raw, current, components),

                FilterType::PaethFirst => handle_paeth_first(raw, current, components)
            }
        }

        Ok(())
    }
}
