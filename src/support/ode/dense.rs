use super::{Vector, rosenbrock};

/// Continuous extension of one accepted step.
///
/// The extension is expressed as the secant slope from the start of the
/// step, so a state at `dt` is the start state stepped by `slope(dt)` over
/// `dt`.
pub(super) enum DenseOutput<const N: usize> {
    /// Hairer's fourth-order interpolant for Dormand-Prince 5(4).
    DormandPrince { h: f64, coeffs: [Vector<N>; 4] },

    /// Second-order interpolant of the Shampine-Reichelt Rosenbrock pair.
    Rosenbrock { h: f64, k1: Vector<N>, k2: Vector<N> },
}

impl<const N: usize> DenseOutput<N> {
    /// Mean slope over the first `dt` of the step, with `0 < dt <= h`.
    pub(super) fn slope(&self, dt: f64) -> Vector<N> {
        match self {
            Self::DormandPrince { h, coeffs } => {
                let s = dt / h;
                let s1 = 1.0 - s;
                let [r1, r2, r3, r4] = *coeffs;
                (r1 + (r2 + (r3 + r4 * s1) * s) * s1) / *h
            }
            Self::Rosenbrock { h, k1, k2 } => {
                let s = dt / h;
                let d = rosenbrock::D;
                (*k1 * (1.0 - s) + *k2 * (s - 2.0 * d)) / (1.0 - 2.0 * d)
            }
        }
    }
}
