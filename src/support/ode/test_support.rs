//! A plain vector system `y' = f(t, y)` for exercising the integrator.

use std::convert::Infallible;

use twine_core::{Model, OdeProblem, StepIntegrable};

/// State vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Point<const N: usize>(pub [f64; N]);

/// Time derivative of a [`Point`].
#[derive(Debug, Clone, Copy)]
pub(super) struct Slope<const N: usize>(pub [f64; N]);

impl<const N: usize> StepIntegrable<f64> for Point<N> {
    type Derivative = Slope<N>;

    fn step(&self, derivative: Slope<N>, delta: f64) -> Self {
        Point(std::array::from_fn(|i| self.0[i] + derivative.0[i] * delta))
    }
}

impl<const N: usize> From<Point<N>> for [f64; N] {
    fn from(point: Point<N>) -> Self {
        point.0
    }
}

impl<const N: usize> From<[f64; N]> for Slope<N> {
    fn from(values: [f64; N]) -> Self {
        Slope(values)
    }
}

impl<const N: usize> From<Slope<N>> for [f64; N] {
    fn from(slope: Slope<N>) -> Self {
        slope.0
    }
}

/// Model input: a time and the state there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct At<const N: usize> {
    pub time: f64,
    pub point: Point<N>,
}

pub(super) fn at<const N: usize>(time: f64, y: [f64; N]) -> At<N> {
    At {
        time,
        point: Point(y),
    }
}

/// The vector field `f` as a model.
pub(super) struct Field<const N: usize, F>(F);

impl<const N: usize, F: Fn(f64, [f64; N]) -> [f64; N]> Field<N, F> {
    pub(super) fn new(f: F) -> Self {
        Self(f)
    }
}

impl<const N: usize, F: Fn(f64, [f64; N]) -> [f64; N]> Model for Field<N, F> {
    type Input = At<N>;
    type Output = [f64; N];
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok((self.0)(input.time, input.point.0))
    }
}

/// Couples a [`Field`] to the integrator.
pub(super) struct FieldProblem<const N: usize>;

impl<const N: usize> OdeProblem for FieldProblem<N> {
    type Input = At<N>;
    type Output = [f64; N];
    type Delta = f64;
    type State = Point<N>;
    type Error = Infallible;

    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error> {
        Ok(input.point)
    }

    fn derivative(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<Slope<N>, Self::Error> {
        Ok(Slope(*output))
    }

    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &f64,
    ) -> Result<Self::Input, Self::Error> {
        Ok(At {
            time: base.time + delta,
            point: *state,
        })
    }
}
