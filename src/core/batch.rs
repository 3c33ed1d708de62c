/// Splits `items` into consecutive chunks of at most `chunk_size`.
///
/// The iterator borrows `items`, so calling `divide` again restarts it. Panics if
/// `chunk_size` is zero; configured sizes are validated before use.
pub fn divide<T>(items: &[T], chunk_size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(chunk_size)
}

/// Number of chunks `divide` will yield.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}
