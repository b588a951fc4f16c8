//! Rosenbrock 2(3) step of Shampine and Reichelt (the `ode23s` pair).
//!
//! The method is L-stable and linearly implicit: each step solves three
//! linear systems with the iteration matrix `W = I - h·d·J`, which is
//! LU-factored once per step.

use std::f64::consts::SQRT_2;

use nalgebra::{Const, DimMin, LU};

use super::{
    Attempt, IntegrationError, Matrix, Rhs, SolverConfig, Vector, dense::DenseOutput, error_norm,
};

pub(super) const D: f64 = 1.0 / (2.0 + SQRT_2);
const E32: f64 = 6.0 + SQRT_2;

/// Forward-difference Jacobian `∂f/∂y` and time derivative `∂f/∂t` at the
/// start of the step.
pub(super) fn jacobian<R: Rhs<N>, const N: usize>(
    rhs: &mut R,
) -> Result<(Matrix<N>, Vector<N>), IntegrationError> {
    let sqrt_eps = f64::EPSILON.sqrt();
    let y = *rhs.y0();
    let f0 = *rhs.f0();
    let mut jac = Matrix::<N>::zeros();

    for j in 0..N {
        let delta = sqrt_eps * y[j].abs().max(1.0);
        let mut unit = Vector::<N>::zeros();
        unit[j] = 1.0;
        let shifted = rhs.advance(&unit, delta);
        let column = (rhs.eval(0.0, &shifted)? - f0) / delta;
        jac.set_column(j, &column);
    }

    let dt = sqrt_eps * rhs.time().abs().max(1.0);
    let start = rhs.start();
    let dfdt = (rhs.eval(dt, &start)? - f0) / dt;

    Ok((jac, dfdt))
}

/// Attempts one step of size `h` from the start of the current step.
///
/// Returns `Ok(None)` when the iteration matrix is singular for this `h`.
pub(super) fn step<R: Rhs<N>, const N: usize>(
    rhs: &mut R,
    jac: &Matrix<N>,
    dfdt: &Vector<N>,
    h: f64,
    config: &SolverConfig,
) -> Result<Option<Attempt<R::State, N>>, IntegrationError>
where
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    let y = *rhs.y0();
    let f0 = *rhs.f0();
    let hd_dfdt = *dfdt * (h * D);
    let lu = (Matrix::<N>::identity() - *jac * (h * D)).lu();

    let Some(k1) = solve(&lu, &(f0 + hd_dfdt)) else {
        return Ok(None);
    };
    let midpoint = rhs.advance(&k1, 0.5 * h);
    let f1 = rhs.eval(0.5 * h, &midpoint)?;
    let Some(k2) = solve(&lu, &(f1 - k1)) else {
        return Ok(None);
    };
    let k2 = k2 + k1;

    let state = rhs.advance(&k2, h);
    let f2 = rhs.eval(h, &state)?;
    let Some(k3) = solve(&lu, &(f2 - (k2 - f1) * E32 - (k1 - f0) * 2.0 + hd_dfdt)) else {
        return Ok(None);
    };

    let y_new = R::components(&state);
    let err = (k1 - k2 * 2.0 + k3) * (h / 6.0);
    let error = error_norm(&err, &y, &y_new, config);

    Ok(Some(Attempt {
        state,
        error,
        dense: DenseOutput::Rosenbrock { h, k1, k2 },
        stiffness: h * jac.abs().column_sum().max(),
    }))
}

/// Solves `W·x = b`, treating a singular or ill-conditioned `W` as unusable.
fn solve<const N: usize>(lu: &LU<f64, Const<N>, Const<N>>, b: &Vector<N>) -> Option<Vector<N>>
where
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    lu.solve(b).filter(|x| x.iter().all(|v| v.is_finite()))
}
