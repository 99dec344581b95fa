use super::types::ResourceError;

/// The single streaming audio asset a `PlaybackEngine` drives.
///
/// Commands are fire-and-forget: implementations must return promptly and
/// report progress asynchronously as `ResourceEvent`s tagged with the
/// generation passed to the most recent `load`.
pub trait AudioResource {
    /// Replace whatever is loaded with the clip at `url`. The new clip starts paused.
    fn load(&mut self, generation: u64, url: &str);
    /// Start or resume the loaded clip.
    fn play(&mut self) -> Result<(), ResourceError>;
    fn pause(&mut self);
    /// Jump to `seconds` from the start of the clip.
    fn seek(&mut self, seconds: f64);
    /// Output gain in `[0.0, 1.0]`.
    fn set_volume(&mut self, level: f32);
    /// Stop and release the loaded clip.
    fn unload(&mut self);
}
