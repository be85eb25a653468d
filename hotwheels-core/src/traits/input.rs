//! Operator input trait

/// Supplies one requested ramp angle per cycle
///
/// Returning `None` means the input is exhausted and the loop should stop.
/// Any iterator of angles is a source, which is how the interactive prompt
/// plugs in.
pub trait AngleSource {
    /// Block until the next angle (degrees) is available
    fn next_angle(&mut self) -> Option<f64>;
}

impl<I: Iterator<Item = f64>> AngleSource for I {
    fn next_angle(&mut self) -> Option<f64> {
        self.next()
    }
}
