/// The first eight bytes of every PNG file, read as a single
/// big-endian integer.
///
/// `\x89 P N G \r \n \x1a \n`
pub const PNG_SIGNATURE: u64 = 0x8950_4E47_0D0A_1A0A;
