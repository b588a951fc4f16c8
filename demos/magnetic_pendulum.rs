//! Laboratory magnetic pendulum.
//!
//! Releases the default laboratory pendulum from 2 rad and simulates 40 s at
//! 100 Hz. The trajectory is written to stdout as CSV; a short summary goes to
//! stderr.
//!
//! ```text
//! cargo run --example magnetic_pendulum > trajectory.csv
//! ```

use std::{
    error::Error,
    io::{self, BufWriter, Write},
};

use pendulum_models::models::mechanical::pendulum::{
    InitialState, PendulumParameters, TimeGrid, oscillation_period, peak_envelope, simulate,
};
use uom::si::{
    f64::{Frequency, Time},
    frequency::hertz,
    time::second,
};

fn main() -> Result<(), Box<dyn Error>> {
    let parameters = PendulumParameters::default();
    let initial_state = InitialState::from_radians(2.0, 0.0);
    let time_grid =
        TimeGrid::from_sample_rate(Time::new::<second>(40.0), Frequency::new::<hertz>(100.0))?;

    let trajectory = simulate(&time_grid, initial_state, &parameters)?;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "time_s,angle_deg,angular_velocity_deg_s")?;
    for sample in trajectory.samples() {
        writeln!(
            out,
            "{:.6},{:.6},{:.6}",
            sample.time, sample.angle, sample.angular_velocity
        )?;
    }
    out.flush()?;

    let stats = trajectory.solver_stats();
    eprintln!("samples:        {}", trajectory.len());
    eprintln!(
        "solver steps:   {} accepted, {} rejected, {} stiff, {} method switches",
        stats.accepted_steps, stats.rejected_steps, stats.stiff_steps, stats.method_switches
    );

    let peaks = peak_envelope(&trajectory);
    if let (Some(first), Some(last)) = (peaks.first(), peaks.last()) {
        eprintln!(
            "peaks:          {:.2} deg at {:.2} s -> {:.2} deg at {:.2} s",
            first.angle, first.time, last.angle, last.time
        );
    }
    if let Some(period) = oscillation_period(&trajectory)? {
        eprintln!("mean period:    {:.4} s", period.get::<second>());
    }

    Ok(())
}
