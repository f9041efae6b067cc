//! The decompression boundary.
//!
//! Concatenated IDAT payloads hold a single zlib stream. This
//! module feeds that stream to the inflate primitive and pulls
//! output in fixed size blocks until the primitive reports the
//! end of the stream.

use log::trace;
use miniz_oxide::inflate::stream::{inflate, InflateState};
use miniz_oxide::{DataFormat, MZError, MZFlush, MZStatus};

use crate::error::ImageErrors;

/// Output is requested from the inflater in blocks of this size.
const INFLATE_BLOCK_SIZE: usize = 16 * 1024;

/// Hard ceiling for compressed and decompressed stream sizes.
const MAX_STREAM_SIZE: u64 = u32::MAX as u64;

/// Confirm a byte count fits the 4 GiB design limit.
pub(crate) fn check_stream_size(size: u64) -> Result<(), ImageErrors>
{
    if size > MAX_STREAM_SIZE
    {
        return Err(ImageErrors::OversizedInput(size));
    }
    Ok(())
}

/// Inflate a whole zlib stream into a freshly allocated buffer.
///
/// `size_hint` pre-allocates the destination, it does not bound
/// it, the stream decides how many bytes come out.
pub(crate) fn inflate_all(compressed: &[u8], size_hint: usize) -> Result<Vec<u8>, ImageErrors>
{
    if compressed.is_empty()
    {
        return Err(ImageErrors::EmptyInput);
    }
    check_stream_size(compressed.len() as u64)?;

    let mut state = InflateState::new_boxed(DataFormat::Zlib);
    let mut destination = Vec::with_capacity(size_hint);
    let mut block = vec![0_u8; INFLATE_BLOCK_SIZE];
    let mut in_position = 0;

    loop
    {
        let result = inflate(
            &mut state,
            &compressed[in_position..],
            &mut block,
            MZFlush::None
        );

        in_position += result.bytes_consumed;
        destination.extend_from_slice(&block[..result.bytes_written]);

        check_stream_size(destination.len() as u64)?;

        match result.status
        {
            Ok(MZStatus::StreamEnd) => break,
            Ok(_) =>
            {
                // a full output block simply means another pull,
                // an iteration with no progress at all means the
                // stream can never complete
                if result.bytes_consumed == 0 && result.bytes_written == 0
                {
                    return Err(ImageErrors::DecompressionFailed(MZError::Buf));
                }
            }
            Err(error) => return Err(ImageErrors::DecompressionFailed(error))
        }
    }

    trace!(
        "Inflated {} compressed bytes into {} bytes",
        compressed.len(),
        destination.len()
    );

    Ok(destination)
}
