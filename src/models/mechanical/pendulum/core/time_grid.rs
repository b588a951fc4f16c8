use uom::si::{
    f64::{Frequency, Time},
    frequency::hertz,
    time::second,
};

use super::ConfigurationError;

/// Output sample times in seconds.
///
/// A valid grid is non-empty, finite, starts at exactly zero, and is strictly
/// increasing. The solver chooses its own internal steps; the grid only fixes
/// where the trajectory is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Creates a grid from explicit sample times in seconds.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the grid is empty, contains a
    /// non-finite value, does not start at zero, or is not strictly increasing.
    pub fn new(times: Vec<f64>) -> Result<Self, ConfigurationError> {
        let Some(&first) = times.first() else {
            return Err(ConfigurationError::EmptyTimeGrid);
        };
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(ConfigurationError::NonFiniteTime { index });
        }
        if first != 0.0 {
            return Err(ConfigurationError::TimeGridStart { first });
        }
        if let Some(index) = times.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(ConfigurationError::NonIncreasingTimeGrid { index: index + 1 });
        }
        Ok(Self { times })
    }

    /// Creates `count` evenly spaced samples from zero to `stop`, inclusive.
    ///
    /// A single sample yields the grid `[0]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `count` is zero or the resulting
    /// grid is invalid (for example, a non-positive `stop` with `count > 1`).
    pub fn linspace(stop: Time, count: usize) -> Result<Self, ConfigurationError> {
        let stop = stop.get::<second>();
        let times = match count {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let step = stop / (count - 1) as f64;
                (0..count)
                    .map(|i| if i == count - 1 { stop } else { i as f64 * step })
                    .collect()
            }
        };
        Self::new(times)
    }

    /// Creates a grid spanning `[0, stop]` with `floor(stop · rate)` evenly spaced samples.
    ///
    /// The sample spacing is therefore slightly wider than `1 / rate`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if fewer than one sample results or
    /// the resulting grid is invalid.
    pub fn from_sample_rate(stop: Time, rate: Frequency) -> Result<Self, ConfigurationError> {
        let samples = stop.get::<second>() * rate.get::<hertz>();
        if !samples.is_finite() || samples < 1.0 {
            return Err(ConfigurationError::EmptyTimeGrid);
        }
        // Truncation is intended: `samples` is finite and at least 1.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = samples as usize;
        Self::linspace(stop, count)
    }

    /// Sample times in seconds.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    /// Number of samples, always at least one.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.times.len()
    }

    /// Last sample time.
    #[must_use]
    pub fn end(&self) -> Time {
        Time::new::<second>(self.times[self.times.len() - 1])
    }
}

impl AsRef<[f64]> for TimeGrid {
    fn as_ref(&self) -> &[f64] {
        &self.times
    }
}
