//! Scanline reconstruction.
//!
//! Each function here undoes one filter over one scanline,
//! reading already reconstructed bytes from the previous row and
//! from earlier in the current row where the filter calls for
//! them. Filtered bytes always come from the decompressed input
//! buffer and reconstructed bytes always go to the output buffer,
//! the two are never the same allocation.
//!
//! ```text
//! ┌─────┬─────┐
//! │ c   │  b  │
//! ├─────┼─────┤
//! │ a   │ x   │
//! └─────┴─────┘
//! ```

/// Undo the `Sub` filter, each byte is offset by the byte one
/// pixel to its left.
pub(crate) fn handle_sub(raw: &[u8], current: &mut [u8], components: usize)
{
    let mut recon_a = [0_u8; 4];

    for (filt, out_px) in raw
        .chunks_exact(components)
        .zip(current.chunks_exact_mut(components))
    {
        for i in 0..components
        {
            out_px[i] = filt[i].wrapping_add(recon_a[i]);
            recon_a[i] = out_px[i];
        }
    }
}

/// Undo the `Up` filter, each byte is offset by the byte directly
/// above it.
pub(crate) fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8])
{
    for ((filt, recon_b), out_px) in raw.iter().zip(prev_row).zip(current.iter_mut())
    {
        *out_px = (*filt).wrapping_add(*recon_b);
    }
}

/// Undo the `Average` filter, each byte is offset by the mean of
/// its left and upper neighbours.
pub(crate) fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize)
{
    let mut recon_a = [0_u8; 4];

    for ((filt, recon_b), out_px) in raw
        .chunks_exact(components)
        .zip(prev_row.chunks_exact(components))
        .zip(current.chunks_exact_mut(components))
    {
        for i in 0..components
        {
            // the sum needs at least 9 bits of precision before
            // the shift, so bump it to 16
            let avg = (u16::from(recon_a[i]) + u16::from(recon_b[i])) >> 1;

            out_px[i] = filt[i].wrapping_add((avg & 0xFF) as u8);
            recon_a[i] = out_px[i];
        }
    }
}

/// `Average` on the first scanline, the row above is defined to
/// be zero so only the left neighbour contributes.
pub(crate) fn handle_avg_first(raw: &[u8], current: &mut [u8], components: usize)
{
    let mut recon_a = [0_u8; 4];

    for (filt, out_px) in raw
        .chunks_exact(components)
        .zip(current.chunks_exact_mut(components))
    {
        for i in 0..components
        {
            out_px[i] = filt[i].wrapping_add(recon_a[i] >> 1);
            recon_a[i] = out_px[i];
        }
    }
}

/// Undo the `Paeth` filter, each byte is offset by whichever of
/// its left, upper and upper-left neighbours the predictor picks.
pub(crate) fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize)
{
    let mut recon_a = [0_u8; 4];
    let mut recon_c = [0_u8; 4];

    for ((filt, recon_b), out_px) in raw
        .chunks_exact(components)
        .zip(prev_row.chunks_exact(components))
        .zip(current.chunks_exact_mut(components))
    {
        for i in 0..components
        {
            out_px[i] = filt[i].wrapping_add(paeth(recon_a[i], recon_b[i], recon_c[i]));

            // setup for the following pixel
            recon_a[i] = out_px[i];
            recon_c[i] = recon_b[i];
        }
    }
}

/// `Paeth` on the first scanline, with `b` and `c` both zero the
/// predictor always resolves to the left neighbour.
pub(crate) fn handle_paeth_first(raw: &[u8], current: &mut [u8], components: usize)
{
    handle_sub(raw, current, components);
}

/// The Paeth predictor, closest of `a`, `b` and `c` to
/// `a + b - c`, ties resolved towards `a`, then `b`, then `c`.
#[inline(always)]
pub(crate) fn paeth(a: u8, b: u8, c: u8) -> u8
{
    let a = i16::from(a);
    let b = i16::from(b);
    let c = i16::from(c);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc
    {
        return a as u8;
    }
    if pb <= pc
    {
        return b as u8;
    }
    c as u8
}
