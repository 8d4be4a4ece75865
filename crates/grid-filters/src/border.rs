/// Clamp a possibly out-of-range index into `[0, len - 1]`.
///
/// `len` must be non-zero.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    if i < 0 {
        0
    } else {
        (i as usize).min(len - 1)
    }
}
