/// Tolerances and method-switching controls for [`integrate`](super::integrate).
///
/// The defaults mirror the classic LSODA driver: relative and absolute
/// tolerances of about `1.49e-8` and automatic stiffness detection.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Relative tolerance applied to each state component.
    pub rel_tol: f64,

    /// Absolute tolerance applied to each state component.
    pub abs_tol: f64,

    /// Maximum step attempts allowed between two consecutive output samples.
    pub max_steps_per_sample: usize,

    /// First step size to try. Chosen automatically when `None`.
    pub initial_step: Option<f64>,

    /// Upper bound on the internal step size. Unbounded when `None`.
    pub max_step: Option<f64>,

    /// Bound on `h·|λ|` above which an explicit step is considered stiff.
    ///
    /// The Dormand-Prince 5(4) stability region reaches about 3.3 along the
    /// negative real axis.
    pub stiffness_threshold: f64,

    /// Consecutive stiff detections required before switching to the stiff method.
    pub stiff_switch_steps: usize,

    /// Consecutive non-stiff steps required before switching back to the explicit method.
    pub nonstiff_switch_steps: usize,

    /// Safety factor applied to every step-size prediction.
    pub safety: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rel_tol: 1.490_116_119_384_765_6e-8,
            abs_tol: 1.490_116_119_384_765_6e-8,
            max_steps_per_sample: 10_000,
            initial_step: None,
            max_step: None,
            stiffness_threshold: 3.25,
            stiff_switch_steps: 15,
            nonstiff_switch_steps: 15,
            safety: 0.9,
        }
    }
}

impl SolverConfig {
    /// Returns a copy of this configuration with both tolerances replaced.
    #[must_use]
    pub fn with_tolerances(self, rel_tol: f64, abs_tol: f64) -> Self {
        Self {
            rel_tol,
            abs_tol,
            ..self
        }
    }
}
