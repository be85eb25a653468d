//! Interactive angle prompt
//!
//! One angle per line. Bad lines are rejected and the operator is asked
//! again; end of input ends the iterator.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::warn;

const PROMPT: &str = "ramp angle (deg, 1.23 to stop): ";

/// Why a line was not accepted as an angle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("empty line")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("angle must be finite")]
    NotFinite,
}

/// Parse one line of operator input
pub fn parse_angle(line: &str) -> Result<f64, InputError> {
    let text = line.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }
    let angle: f64 = text
        .parse()
        .map_err(|_| InputError::NotANumber(text.to_string()))?;
    if !angle.is_finite() {
        return Err(InputError::NotFinite);
    }
    Ok(angle)
}

/// Reads angles from a line source, prompting on `output`
pub struct AnglePrompt<R, W> {
    input: R,
    output: W,
    line: String,
}

impl AnglePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> AnglePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            line: String::new(),
        }
    }
}

impl<R: BufRead, W: Write> Iterator for AnglePrompt<R, W> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            // A closed terminal is not a reason to stop reading
            let _ = write!(self.output, "{PROMPT}");
            let _ = self.output.flush();

            self.line.clear();
            match self.input.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    return None;
                }
            }

            match parse_angle(&self.line) {
                Ok(angle) => return Some(angle),
                Err(e) => warn!(input = %self.line.trim(), "rejected: {e}"),
            }
        }
    }
}
