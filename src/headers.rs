use log::info;

use crate::decoder::PngChunk;
use crate::enums::ColorType;
use crate::error::ImageErrors;
use crate::PngDecoder;

impl<'a> PngDecoder<'a>
{
    pub(crate) fn parse_ihdr(&mut self, chunk: PngChunk) -> Result<(), ImageErrors>
    {
        if self.seen_hdr
        {
            return Err(ImageErrors::MissingOrMalformedHeader("multiple IHDR chunks"));
        }

        if chunk.length != 13
        {
            return Err(ImageErrors::MissingOrMalformedHeader(
                "IHDR data is not 13 bytes"
            ));
        }

        let pos_start = self.stream.position();

        self.png_info.width = self.stream.get_u32_be() as usize;
        self.png_info.height = self.stream.get_u32_be() as usize;

        if self.png_info.width == 0 || self.png_info.height == 0
        {
            return Err(ImageErrors::MissingOrMalformedHeader(
                "width or height is zero"
            ));
        }

        if self.png_info.width > self.options.max_width
        {
            return Err(ImageErrors::Generic(format!(
                "Image width {}, larger than maximum configured width {}, aborting",
                self.png_info.width, self.options.max_width
            )));
        }

        if self.png_info.height > self.options.max_height
        {
            return Err(ImageErrors::Generic(format!(
                "Image height {}, larger than maximum configured height {}, aborting",
                self.png_info.height, self.options.max_height
            )));
        }

        self.png_info.depth = self.stream.get_u8();

        if self.png_info.depth != 8
        {
            return Err(ImageErrors::UnsupportedFeature(format!(
                "bit depth {}, only 8 bit samples decode",
                self.png_info.depth
            )));
        }

        let color = self.stream.get_u8();

        match ColorType::from_int(color)
        {
            Some(ColorType::IndexedColor) =>
            {
                return Err(ImageErrors::UnsupportedFeature(
                    "indexed colour needs palette resolution, which is not performed".to_string()
                ));
            }
            Some(img_color) => self.png_info.color = img_color,
            None =>
            {
                return Err(ImageErrors::MissingOrMalformedHeader("unknown colour type"));
            }
        }
        self.png_info.component = self.png_info.color.num_components();

        let compression_method = self.stream.get_u8();

        if compression_method != 0
        {
            return Err(ImageErrors::UnsupportedFeature(format!(
                "compression method {compression_method}, only method 0 is defined"
            )));
        }

        let filter_method = self.stream.get_u8();

        if filter_method != 0
        {
            return Err(ImageErrors::UnsupportedFeature(format!(
                "filter method {filter_method}, only method 0 is defined"
            )));
        }

        let interlace_method = self.stream.get_u8();

        if interlace_method != 0
        {
            return Err(ImageErrors::UnsupportedFeature(format!(
                "interlace method {interlace_method}, interlaced images do not decode"
            )));
        }

        let pos_end = self.stream.position();

        assert_eq!(pos_end - pos_start, 13); // we read all bytes

        // skip crc
        self.stream.skip(4);

        info!("Width: {}", self.png_info.width);
        info!("Height: {}", self.png_info.height);
        info!("Depth: {}", self.png_info.depth);
        info!("Color type: {:?}", self.png_info.color);

        self.seen_hdr = true;

        Ok(())
    }

    pub(crate) fn parse_idat(&mut self, png_chunk: PngChunk) -> Result<(), ImageErrors>
    {
        // take a reference to this chunk's data and push it, the
        // whole accumulated payload goes to the inflater at once,
        // in encounter order
        let idat_stream = self.stream.get_as_ref(png_chunk.length)?;

        self.idat_chunks.extend_from_slice(idat_stream);

        // skip crc
        self.stream.skip(4);

        Ok(())
    }
}
