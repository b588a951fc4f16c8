//! Dormand-Prince 5(4) step with stiffness estimate and dense output.
//!
//! Coefficients follow Hairer, Nørsett and Wanner, *Solving Ordinary
//! Differential Equations I*, Table 5.2 and the `DOPRI5` dense output.

use super::{Attempt, IntegrationError, Rhs, SolverConfig, Vector, dense::DenseOutput, error_norm};

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// Fifth-order minus embedded fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339_200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const D1: f64 = -12_715_105_075.0 / 11_282_082_432.0;
const D3: f64 = 87_487_479_700.0 / 32_700_410_799.0;
const D4: f64 = -10_690_763_975.0 / 1_880_347_072.0;
const D5: f64 = 701_980_252_875.0 / 199_316_789_632.0;
const D6: f64 = -1_453_857_185.0 / 822_651_844.0;
const D7: f64 = 69_997_945.0 / 29_380_423.0;

/// Attempts one step of size `h` from the start of the current step.
pub(super) fn step<R: Rhs<N>, const N: usize>(
    rhs: &mut R,
    h: f64,
    config: &SolverConfig,
) -> Result<Attempt<R::State, N>, IntegrationError> {
    let y = *rhs.y0();
    let k1 = *rhs.f0();
    let k2 = stage(rhs, C2 * h, &(k1 * A21), h)?;
    let k3 = stage(rhs, C3 * h, &(k1 * A31 + k2 * A32), h)?;
    let k4 = stage(rhs, C4 * h, &(k1 * A41 + k2 * A42 + k3 * A43), h)?;
    let k5 = stage(rhs, C5 * h, &(k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54), h)?;

    let state6 = rhs.advance(&(k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65), h);
    let k6 = rhs.eval(h, &state6)?;
    let state = rhs.advance(&(k1 * A71 + k3 * A73 + k4 * A74 + k5 * A75 + k6 * A76), h);
    let k7 = rhs.eval(h, &state)?;

    let y6 = R::components(&state6);
    let y_new = R::components(&state);
    let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
    let error = error_norm(&err, &y, &y_new, config);

    // k6 and k7 are both evaluated at t + h, so their difference over the
    // state difference approximates the dominant eigenvalue.
    let stiff_den = (y_new - y6).norm_squared();
    let stiffness = if stiff_den > 0.0 {
        h * ((k7 - k6).norm_squared() / stiff_den).sqrt()
    } else {
        0.0
    };

    let ydiff = y_new - y;
    let bspl = k1 * h - ydiff;
    let dense = DenseOutput::DormandPrince {
        h,
        coeffs: [
            ydiff,
            bspl,
            ydiff - k7 * h - bspl,
            (k1 * D1 + k3 * D3 + k4 * D4 + k5 * D5 + k6 * D6 + k7 * D7) * h,
        ],
    };

    Ok(Attempt {
        state,
        error,
        dense,
        stiffness,
    })
}

/// Evaluates the stage at `dt` reached along the combined `slope` over `h`.
fn stage<R: Rhs<N>, const N: usize>(
    rhs: &mut R,
    dt: f64,
    slope: &Vector<N>,
    h: f64,
) -> Result<Vector<N>, IntegrationError> {
    let state = rhs.advance(slope, h);
    rhs.eval(dt, &state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::ode::{
        System,
        test_support::{Field, FieldProblem, at},
    };

    #[test]
    fn single_step_is_fifth_order_accurate() {
        // `y' = y`, so every stage is an exponential.
        let growth = Field::new(|_, y: [f64; 1]| y);
        let mut system =
            System::<_, _, 1>::new(&growth, &FieldProblem, at(0.0, [1.0]), 0.0).unwrap();
        let h: f64 = 0.1;

        let attempt = step(&mut system, h, &SolverConfig::default()).unwrap();

        assert_relative_eq!(attempt.state.0[0], h.exp(), epsilon = 1e-8);
        assert_eq!(system.evals, 7);
    }

    #[test]
    fn dense_output_matches_endpoint_and_interior() {
        let growth = Field::new(|_, y: [f64; 1]| y);
        let mut system =
            System::<_, _, 1>::new(&growth, &FieldProblem, at(0.0, [1.0]), 0.0).unwrap();
        let h: f64 = 0.1;

        let attempt = step(&mut system, h, &SolverConfig::default()).unwrap();

        let at_end = system.advance(&attempt.dense.slope(h), h);
        assert_relative_eq!(at_end.0[0], attempt.state.0[0], epsilon = 1e-14);

        let inside = system.advance(&attempt.dense.slope(0.04), 0.04);
        assert_relative_eq!(inside.0[0], 0.04_f64.exp(), epsilon = 1e-6);
    }

    #[test]
    fn estimates_linear_stiffness_exactly() {
        // `y' = -50 y`, whose exact `h·|λ|` is `50 h`.
        let decay = Field::new(|_, y: [f64; 1]| [-50.0 * y[0]]);
        let mut system =
            System::<_, _, 1>::new(&decay, &FieldProblem, at(0.0, [1.0]), 0.0).unwrap();

        let attempt = step(&mut system, 0.01, &SolverConfig::default()).unwrap();
        assert_relative_eq!(attempt.stiffness, 0.5, max_relative = 1e-6);
    }
}
