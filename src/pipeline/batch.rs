/// Split `items` into order-preserving chunks of `size`; only the last may be shorter.
///
/// Panics if `size` is zero.
pub fn batches<T>(items: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    assert!(size > 0, "batch size must be greater than zero");
    items.chunks(size)
}
