//! Hand-authored edits applied on top of (or instead of) generated surfaces.

use serde::{Deserialize, Serialize};

use crate::error::{DemError, DemResult};
use crate::field::Field;

/// A single assignment to part of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Override {
    /// Every cell with the given `y`.
    Row { y: usize, value: f32 },
    /// Every cell with the given `x`.
    Column { x: usize, value: f32 },
    Cell { x: usize, y: usize, value: f32 },
}

/// Apply overrides in order; later writes win on overlapping cells.
///
/// All overrides are checked against the grid before any cell is written.
pub fn apply_overrides(surface: &mut Field<f32>, edits: &[Override]) -> DemResult<()> {
    let (nx, ny) = surface.shape();
    for edit in edits {
        let (x, y) = match *edit {
            Override::Row { y, .. } => (0, y),
            Override::Column { x, .. } => (x, 0),
            Override::Cell { x, y, .. } => (x, y),
        };
        if !surface.contains(x, y) {
            return Err(DemError::OutOfBounds { x, y, nx, ny });
        }
    }

    for edit in edits {
        match *edit {
            Override::Row { y, value } => {
                for x in 0..nx {
                    surface.set(x, y, value);
                }
            }
            Override::Column { x, value } => {
                for y in 0..ny {
                    surface.set(x, y, value);
                }
            }
            Override::Cell { x, y, value } => surface.set(x, y, value),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_edits_win() {
        let mut f = Field::new(4, 3, 0.0f32);
        apply_overrides(
            &mut f,
            &[
                Override::Row { y: 1, value: 5.0 },
                Override::Column { x: 2, value: 7.0 },
                Override::Cell { x: 2, y: 1, value: 9.0 },
            ],
        )
        .unwrap();
        assert_eq!(f.get(0, 1), 5.0);
        assert_eq!(f.get(2, 0), 7.0);
        assert_eq!(f.get(2, 2), 7.0);
        assert_eq!(f.get(2, 1), 9.0);
        assert_eq!(f.get(0, 0), 0.0);
    }

    #[test]
    fn out_of_bounds_edit_leaves_surface_untouched() {
        let mut f = Field::new(3, 3, 1.0f32);
        let err = apply_overrides(
            &mut f,
            &[Override::Row { y: 0, value: 4.0 }, Override::Column { x: 3, value: 2.0 }],
        )
        .unwrap_err();
        assert!(matches!(err, DemError::OutOfBounds { x: 3, .. }));
        assert!(f.data.iter().all(|&v| v == 1.0));
    }
}
