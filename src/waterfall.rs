//! Geometry for 3D cascading waveform ("waterfall") plots.
//!
//! Each row of `zs` becomes a polygon in the x/z plane placed at its `y`
//! value. Rendering is up to the caller's plotting library; this computes
//! the axis limits and the vertex lists it needs.

use crate::error::{Error, Result};
use crate::palette::{self, Color};

/// Inclusive axis range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Limits { min: v, max: v }),
            Some(l) => Some(Limits {
                min: l.min.min(v),
                max: l.max.max(v),
            }),
        })
    }
}

/// One waveform: vertices `(x, z)` drawn in the plane at `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub y: f64,
    pub vertices: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waterfall {
    pub x_limits: Limits,
    pub y_limits: Limits,
    pub z_limits: Limits,
    pub slices: Vec<Slice>,
    pub face_color: Color,
    pub edge_color: Color,
}

impl Waterfall {
    /// Build from sample positions `x`, slice positions `y` and one row of
    /// `zs` per slice, each as long as `x`.
    pub fn new(x: &[f64], y: &[f64], zs: &[Vec<f64>]) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(Error::Shape("waterfall needs at least one x and one y".into()));
        }
        if zs.len() != y.len() {
            return Err(Error::Shape(format!(
                "{} rows of z for {} y values",
                zs.len(),
                y.len()
            )));
        }
        if let Some((row, z)) = zs.iter().enumerate().find(|(_, z)| z.len() != x.len()) {
            return Err(Error::Shape(format!(
                "z row {row} has {} values, expected {}",
                z.len(),
                x.len()
            )));
        }

        let limits = |values: Vec<f64>| {
            Limits::of(values).ok_or_else(|| Error::Shape("empty axis".into()))
        };
        let x_limits = limits(x.to_vec())?;
        let y_limits = limits(y.to_vec())?;
        let z_limits = limits(zs.iter().flatten().copied().collect())?;

        let slices = y
            .iter()
            .zip(zs)
            .map(|(&y, z)| Slice {
                y,
                vertices: x.iter().copied().zip(z.iter().copied()).collect(),
            })
            .collect();

        Ok(Self {
            x_limits,
            y_limits,
            z_limits,
            slices,
            face_color: palette::WHITE,
            edge_color: palette::BLUE,
        })
    }
}
