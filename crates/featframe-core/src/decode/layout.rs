/// Header size: one little-endian i32 frame count.
pub const HEADER_LEN: usize = 4;
/// Encoded width of every value, float or int.
pub const VALUE_WIDTH: usize = 4;
/// Cap on speculative preallocation; the declared frame count is untrusted
/// until the bytes actually arrive.
pub const MAX_FRAME_PREALLOC: usize = 65_536;
