//! Generators for per-key function tables.
//!
//! These build the `key → ColorFunction` maps consumed by per-key
//! schemes, assigning each key a function from its column-major board
//! position (`(0, 0)` bottom left). An angle rotates the gradient axis
//! across the board; `length` controls how stretched it is, in keys.

use std::collections::HashMap;

use crate::color::{scale_map, Color, Gradient};
use crate::error::LightingError;
use crate::function::ColorFunction;
use crate::layout::{self, KeyIndex};

/// Gradient index of a key at `(col, row)` for a given axis rotation.
fn grid_index(col: usize, row: usize, length: usize, angle_deg: f64) -> usize {
    let rads = (-angle_deg).to_radians();
    let projected = (col as f64 * rads.cos() - row as f64 * rads.sin()).abs();
    (projected.round() as usize).min(length - 1)
}

fn positioned_keys() -> impl Iterator<Item = (KeyIndex, usize, usize)> {
    layout::all_key_names().filter_map(|name| {
        layout::position_col_major(name).map(|(col, row)| (KeyIndex::new(name), col, row))
    })
}

/// The same fixed color for every key.
pub fn solid_map(color: Color) -> HashMap<KeyIndex, ColorFunction> {
    layout::all_key_names()
        .map(|name| (KeyIndex::new(name), ColorFunction::solid(color)))
        .collect()
}

/// A static gradient laid across the board at `angle_deg`.
pub fn solid_gradient_map(
    gradient: &Gradient,
    length: usize,
    angle_deg: f64,
) -> HashMap<KeyIndex, ColorFunction> {
    positioned_keys()
        .map(|(key, col, row)| {
            let i = grid_index(col, row, length, angle_deg);
            let t = scale_map(
                i as f64,
                0.0,
                (length - 1) as f64,
                gradient.t_min(),
                gradient.t_max(),
            );
            (key, ColorFunction::solid(gradient.color_at(t)))
        })
        .collect()
}

/// Static gradient varying across the board's columns.
pub fn column_gradient_map(gradient: &Gradient) -> HashMap<KeyIndex, ColorFunction> {
    solid_gradient_map(gradient, layout::COLS, 0.0)
}

/// Static gradient varying across the board's rows.
pub fn row_gradient_map(gradient: &Gradient) -> HashMap<KeyIndex, ColorFunction> {
    solid_gradient_map(gradient, layout::ROWS, 90.0)
}

/// Every key walking the same gradient in phase.
pub fn uniform_periodic_map(
    gradient: &Gradient,
    period: f64,
) -> Result<HashMap<KeyIndex, ColorFunction>, LightingError> {
    layout::all_key_names()
        .map(|name| {
            Ok((
                KeyIndex::new(name),
                ColorFunction::periodic(gradient.clone(), period)?,
            ))
        })
        .collect()
}

/// A gradient traveling across the board: each key walks the gradient
/// phase-shifted by its position along the rotated axis.
pub fn periodic_gradient_map(
    gradient: &Gradient,
    period: f64,
    length: usize,
    angle_deg: f64,
    reverse: bool,
) -> Result<HashMap<KeyIndex, ColorFunction>, LightingError> {
    positioned_keys()
        .map(|(key, col, row)| {
            let i = grid_index(col, row, length, angle_deg);
            let mut phase = scale_map(i as f64, 0.0, (length - 1) as f64, 0.0, period);
            if reverse {
                phase = period - phase;
            }
            Ok((
                key,
                ColorFunction::periodic_with_phase(gradient.clone(), period, phase)?,
            ))
        })
        .collect()
}
