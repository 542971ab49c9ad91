/// Smallest texture dimension ever produced.
pub const MIN_DIMENSION: usize = 2;

/// Side length of the square textures holding `vertex_count` vertices: the
/// smallest power of two, starting at 2, that is not less than `vertex_count`.
///
/// The same value is the number of frames sampled per clip, so frame count and
/// vertex count share one texture layout. `vertex_count` must be at least 1.
pub fn texture_size(vertex_count: usize) -> usize {
    debug_assert!(vertex_count > 0, "texture_size needs at least one vertex");
    let mut dimension = MIN_DIMENSION;
    while dimension < vertex_count {
        dimension *= 2;
    }
    dimension
}

/// `(frame, normalized_time)` for each of the `dimension` samples covering `[0, 1)`.
pub fn frame_times(dimension: usize) -> impl Iterator<Item = (usize, f32)> {
    let step = 1.0 / dimension as f32;
    (0..dimension).map(move |frame| (frame, step * frame as f32))
}
