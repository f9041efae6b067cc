//! Whole container tests over synthetic PNG streams.
//!
//! Files are assembled chunk by chunk with flate2 providing the
//! zlib streams, so every test pins the exact bytes the decoder
//! must reconstruct.

use std::io::Write;

use png_canvas::{ColorType, DecoderOptions, ImageErrors, PngDecoder};

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn zlib_compress(data: &[u8]) -> Vec<u8>
{
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());

    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn chunk(tag: &[u8; 4], data: &[u8]) -> Vec<u8>
{
    let mut crc_input = tag.to_vec();
    crc_input.extend_from_slice(data);

    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32fast::hash(&crc_input).to_be_bytes());
    out
}

fn ihdr(width: u32, height: u32, depth: u8, color: u8) -> Vec<u8>
{
    let mut data = Vec::new();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, 0]);

    chunk(b"IHDR", &data)
}

/// A complete file holding `scanlines` (filter bytes included) in
/// a single IDAT chunk.
fn build_png(width: u32, height: u32, color: u8, scanlines: &[u8]) -> Vec<u8>
{
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(width, height, 8, color));
    file.extend_from_slice(&chunk(b"IDAT", &zlib_compress(scanlines)));
    file.extend_from_slice(&chunk(b"IEND", &[]));
    file
}

fn decode(file: &[u8]) -> Result<png_canvas::Image, ImageErrors>
{
    PngDecoder::new(file).decode()
}

#[test]
fn invalid_signature_is_rejected_before_any_chunk()
{
    let mut file = build_png(1, 1, 0, &[0, 42]);
    file[1] = b'J';

    assert!(matches!(
        decode(&file),
        Err(ImageErrors::InvalidSignature)
    ));
}

#[test]
fn none_filter_round_trips()
{
    // 2x2 true colour
    let scanlines = [
        [0, 1, 2, 3, 4, 5, 6].as_slice(),
        [0, 7, 8, 9, 10, 11, 12].as_slice()
    ]
    .concat();

    let image = decode(&build_png(2, 2, 2, &scanlines)).unwrap();

    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(image.depth(), 8);
    assert_eq!(image.color_type(), ColorType::TrueColor);
    assert_eq!(image.bytes_per_pixel(), 3);
    assert_eq!(image.data(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
}

#[test]
fn sub_filter_reconstructs_and_wraps()
{
    let scanlines = [
        // first pixel of the row has no left neighbour
        [1, 10, 20, 30, 1, 2, 3].as_slice(),
        // 5 + 251 wraps to 0
        [1, 5, 5, 5, 251, 252, 253].as_slice()
    ]
    .concat();

    let image = decode(&build_png(2, 2, 2, &scanlines)).unwrap();

    assert_eq!(
        image.data(),
        &[10, 20, 30, 11, 22, 33, 5, 5, 5, 0, 1, 2]
    );
}

#[test]
fn up_filter_adds_the_row_above()
{
    let scanlines = [
        [0, 1, 2, 3, 4, 5, 6].as_slice(),
        [2, 10, 20, 30, 40, 50, 60].as_slice()
    ]
    .concat();

    let image = decode(&build_png(2, 2, 2, &scanlines)).unwrap();

    assert_eq!(
        image.data(),
        &[1, 2, 3, 4, 5, 6, 11, 22, 33, 44, 55, 66]
    );
}

#[test]
fn up_filter_on_the_first_row_is_a_copy()
{
    // the row above the first scanline is defined to be zero
    let scanlines = [2, 9, 9, 9, 9, 9, 9];

    let image = decode(&build_png(2, 1, 2, &scanlines)).unwrap();

    assert_eq!(image.data(), &[9, 9, 9, 9, 9, 9]);
}

#[test]
fn average_filter_uses_the_floored_mean()
{
    let scanlines = [
        [3, 10, 10, 10, 10, 10, 10].as_slice(),
        [3, 10, 10, 10, 10, 10, 10].as_slice()
    ]
    .concat();

    let image = decode(&build_png(2, 2, 2, &scanlines)).unwrap();

    // row one: no row above, first pixel 10, second 10 + 10 / 2
    // row two: first pixel 10 + 10 / 2, second 10 + (15 + 15) / 2
    assert_eq!(
        image.data(),
        &[10, 10, 10, 15, 15, 15, 15, 15, 15, 25, 25, 25]
    );
}

#[test]
fn paeth_filter_follows_the_predictor()
{
    let scanlines = [
        [4, 10, 20, 30, 1, 1, 1].as_slice(),
        [4, 1, 1, 1, 2, 2, 2].as_slice()
    ]
    .concat();

    let image = decode(&build_png(2, 2, 2, &scanlines)).unwrap();

    // first row reduces to sub, second row picks b for the first
    // pixel and a for the second
    assert_eq!(
        image.data(),
        &[10, 20, 30, 11, 21, 31, 11, 21, 31, 13, 23, 33]
    );
}

#[test]
fn unknown_filter_type_is_an_error()
{
    let scanlines = [5, 1, 1, 1, 1, 1, 1];

    assert!(matches!(
        decode(&build_png(2, 1, 2, &scanlines)),
        Err(ImageErrors::UnsupportedFeature(_))
    ));
}

#[test]
fn idat_data_split_across_chunks_concatenates_in_order()
{
    let scanlines = [
        [1, 10, 20, 30, 1, 2, 3].as_slice(),
        [2, 1, 1, 1, 1, 1, 1].as_slice()
    ]
    .concat();

    let single = decode(&build_png(2, 2, 2, &scanlines)).unwrap();

    // same stream, cut into three idat chunks
    let compressed = zlib_compress(&scanlines);
    let (first, rest) = compressed.split_at(3);
    let (second, third) = rest.split_at(rest.len() / 2);

    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(2, 2, 8, 2));
    file.extend_from_slice(&chunk(b"IDAT", first));
    file.extend_from_slice(&chunk(b"IDAT", second));
    file.extend_from_slice(&chunk(b"IDAT", third));
    file.extend_from_slice(&chunk(b"IEND", &[]));

    let split = decode(&file).unwrap();

    assert_eq!(single.data(), split.data());
}

#[test]
fn greyscale_and_alpha_layouts_decode()
{
    // 3x2 greyscale, sub then up
    let grey_lines = [
        [1, 1, 2, 3].as_slice(),
        [2, 10, 10, 10].as_slice()
    ]
    .concat();

    let grey = decode(&build_png(3, 2, 0, &grey_lines)).unwrap();
    assert_eq!(grey.bytes_per_pixel(), 1);
    assert_eq!(grey.data(), &[1, 3, 6, 11, 13, 16]);

    // 2x1 greyscale with alpha
    let luma_a = decode(&build_png(2, 1, 4, &[0, 100, 200, 50, 60])).unwrap();
    assert_eq!(luma_a.bytes_per_pixel(), 2);
    assert_eq!(luma_a.color_type(), ColorType::GreyscaleAlpha);
    assert_eq!(luma_a.data(), &[100, 200, 50, 60]);

    // 1x1 true colour with alpha
    let rgba = decode(&build_png(1, 1, 6, &[0, 1, 2, 3, 4])).unwrap();
    assert_eq!(rgba.bytes_per_pixel(), 4);
    assert_eq!(rgba.data(), &[1, 2, 3, 4]);
}

#[test]
fn truncated_stream_is_reported()
{
    let file = build_png(2, 2, 2, &[0; 14]);
    let cut = &file[..file.len() - 6];

    assert!(matches!(
        decode(cut),
        Err(ImageErrors::TruncatedInput { .. })
    ));
}

#[test]
fn short_image_data_is_reported()
{
    // header says 2x2 but only one scanline arrives
    let file = build_png(2, 2, 2, &[0, 1, 2, 3, 4, 5, 6]);

    assert!(matches!(
        decode(&file),
        Err(ImageErrors::TruncatedInput { .. })
    ));
}

#[test]
fn crc_mismatch_fails_in_strict_mode_only()
{
    let mut file = build_png(1, 1, 0, &[0, 42]);
    // last byte of the IHDR crc sits after the signature, the
    // 8 byte chunk header and 13 data bytes
    file[8 + 8 + 13 + 3] ^= 0xFF;

    assert!(matches!(
        decode(&file),
        Err(ImageErrors::ChunkCorrupt { .. })
    ));

    let options = DecoderOptions::default().set_confirm_crc(false);
    let image = PngDecoder::new_with_options(&file, options).decode().unwrap();

    assert_eq!(image.data(), &[42]);
}

#[test]
fn ancillary_chunks_are_skipped()
{
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(1, 1, 8, 0));
    file.extend_from_slice(&chunk(b"teXt", b"not pixel data"));
    file.extend_from_slice(&chunk(b"IDAT", &zlib_compress(&[0, 42])));
    file.extend_from_slice(&chunk(b"IEND", &[]));

    let image = decode(&file).unwrap();
    assert_eq!(image.data(), &[42]);
}

#[test]
fn unknown_critical_chunks_are_an_error()
{
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(1, 1, 8, 0));
    file.extend_from_slice(&chunk(b"KRIT", b"mystery"));
    file.extend_from_slice(&chunk(b"IDAT", &zlib_compress(&[0, 42])));
    file.extend_from_slice(&chunk(b"IEND", &[]));

    assert!(matches!(decode(&file), Err(ImageErrors::Generic(_))));
}

#[test]
fn missing_image_data_is_empty_input()
{
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(1, 1, 8, 0));
    file.extend_from_slice(&chunk(b"IEND", &[]));

    assert!(matches!(decode(&file), Err(ImageErrors::EmptyInput)));
}

#[test]
fn stream_without_iend_still_decodes()
{
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(1, 1, 8, 0));
    file.extend_from_slice(&chunk(b"IDAT", &zlib_compress(&[0, 42])));

    let image = decode(&file).unwrap();
    assert_eq!(image.data(), &[42]);
}

#[test]
fn unsupported_headers_are_rejected()
{
    // bit depth 16
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(1, 1, 16, 0));
    file.extend_from_slice(&chunk(b"IDAT", &zlib_compress(&[0, 1, 2])));
    assert!(matches!(
        decode(&file),
        Err(ImageErrors::UnsupportedFeature(_))
    ));

    // indexed colour
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(1, 1, 8, 3));
    assert!(matches!(
        decode(&file),
        Err(ImageErrors::UnsupportedFeature(_))
    ));

    // interlaced
    let mut data = Vec::new();
    data.extend_from_slice(&1_u32.to_be_bytes());
    data.extend_from_slice(&1_u32.to_be_bytes());
    data.extend_from_slice(&[8, 0, 0, 0, 1]);

    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&chunk(b"IHDR", &data));
    assert!(matches!(
        decode(&file),
        Err(ImageErrors::UnsupportedFeature(_))
    ));
}

#[test]
fn malformed_headers_are_rejected()
{
    // zero width
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&ihdr(0, 1, 8, 0));
    assert!(matches!(
        decode(&file),
        Err(ImageErrors::MissingOrMalformedHeader(_))
    ));

    // IHDR data too short
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&chunk(b"IHDR", &[0; 12]));
    assert!(matches!(
        decode(&file),
        Err(ImageErrors::MissingOrMalformedHeader(_))
    ));

    // first chunk is not IHDR at all
    let mut file = SIGNATURE.to_vec();
    file.extend_from_slice(&chunk(b"IDAT", &zlib_compress(&[0, 42])));
    assert!(matches!(
        decode(&file),
        Err(ImageErrors::MissingOrMalformedHeader(_))
    ));
}

#[test]
fn header_fields_are_visible_after_decode()
{
    let file = build_png(2, 1, 2, &[0, 1, 2, 3, 4, 5, 6]);

    let mut decoder = PngDecoder::new(&file);
    assert_eq!(decoder.get_dimensions(), None);

    decoder.decode().unwrap();

    assert_eq!(decoder.get_dimensions(), Some((2, 1)));
    assert_eq!(decoder.get_depth(), Some(8));
    assert_eq!(decoder.get_color_type(), Some(ColorType::TrueColor));
}
