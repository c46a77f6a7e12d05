//! Small numeric helpers for notebooks.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};

use crate::error::{Error, Result};

/// State of a stepping ODE solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Finished,
    Failed,
}

/// A solver that advances one adaptive step at a time.
pub trait Integrator {
    fn status(&self) -> Status;
    fn step(&mut self);
    /// Current time.
    fn t(&self) -> f64;
    /// Current state vector.
    fn y(&self) -> &[f64];
}

/// Evenly strided states of a solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshots {
    pub t: Array1<f64>,
    /// One row per snapshot.
    pub y: Array2<f64>,
}

/// Run `solver` to completion and keep every `steps / n_snapshots`-th state,
/// starting with the first step.
///
/// Fewer steps than snapshots keeps every step.
pub fn make_snapshots<I>(solver: &mut I, n_snapshots: usize) -> Result<Snapshots>
where
    I: Integrator + ?Sized,
{
    if n_snapshots == 0 {
        return Err(Error::Shape("at least one snapshot is required".into()));
    }

    let mut times = Vec::new();
    let mut states: Vec<Vec<f64>> = Vec::new();
    loop {
        match solver.status() {
            Status::Finished => break,
            Status::Failed => {
                return Err(Error::Integrator(format!(
                    "solver failed at t = {} after {} steps",
                    solver.t(),
                    times.len()
                )));
            }
            Status::Running => {}
        }
        solver.step();
        times.push(solver.t());
        states.push(solver.y().to_vec());
    }

    let stride = (times.len() / n_snapshots).max(1);
    let dim = states.first().map_or(0, Vec::len);
    if let Some(bad) = states.iter().position(|y| y.len() != dim) {
        return Err(Error::Shape(format!(
            "state {bad} has {} components, expected {dim}",
            states[bad].len()
        )));
    }

    let t: Array1<f64> = times.into_iter().step_by(stride).collect();
    let flat: Vec<f64> = states.into_iter().step_by(stride).flatten().collect();
    let y = Array2::from_shape_vec((t.len(), dim), flat)
        .map_err(|e| Error::Shape(e.to_string()))?;

    Ok(Snapshots { t, y })
}

/// Rebuild `u · diag(s) · v` keeping only the first `rank` singular values.
///
/// `u` is `m × k`, `s` has `k` values, `v` is `k × n`. A `rank` above `k`
/// keeps everything.
pub fn inverse_svd(
    u: ArrayView2<'_, f64>,
    s: ArrayView1<'_, f64>,
    v: ArrayView2<'_, f64>,
    rank: usize,
) -> Result<Array2<f64>> {
    let k = s.len();
    if u.ncols() != k || v.nrows() != k {
        return Err(Error::Shape(format!(
            "u is {:?}, s has {k} values, v is {:?}",
            u.dim(),
            v.dim()
        )));
    }

    let mut kept = s.to_owned();
    kept.slice_mut(s![rank.min(k)..]).fill(0.0);

    let sv = &v * &kept.insert_axis(Axis(1));
    Ok(u.dot(&sv))
}
