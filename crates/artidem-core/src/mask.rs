//! Ice-type classification of a surface against sea level.

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Ice-type category, stored in datasets as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IceType {
    IceFreeBedrock = 1,
    GroundedIce = 2,
    FloatingIce = 3,
    IceFreeOcean = 4,
}

impl IceType {
    pub const ALL: [IceType; 4] =
        [IceType::IceFreeBedrock, IceType::GroundedIce, IceType::FloatingIce, IceType::IceFreeOcean];

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Token used in the dataset's `flag_meanings` attribute.
    pub fn flag_meaning(self) -> &'static str {
        match self {
            IceType::IceFreeBedrock => "ice_free_bedrock",
            IceType::GroundedIce    => "grounded_ice",
            IceType::FloatingIce    => "floating_ice",
            IceType::IceFreeOcean   => "ice_free_ocean",
        }
    }
}

/// Classify every cell: ocean where `surface <= level`, grounded ice elsewhere.
///
/// Bedrock and floating ice are never produced by this rule.
pub fn compute_ice_mask(surface: &Field<f32>, level: f32) -> Field<i32> {
    surface.map(|h| {
        if h <= level { IceType::IceFreeOcean.code() } else { IceType::GroundedIce.code() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::notched_square;

    #[test]
    fn codes_round_trip() {
        for t in IceType::ALL {
            assert_eq!(IceType::from_code(t.code()), Some(t));
        }
        assert_eq!(IceType::from_code(0), None);
    }

    #[test]
    fn threshold_is_inclusive() {
        let f = Field::from_vec(4, 1, vec![-1.0, 0.0, 0.5, 10.0]).unwrap();
        let m = compute_ice_mask(&f, 0.5);
        assert_eq!(m.data, vec![4, 4, 4, 2]);
    }

    #[test]
    fn only_grounded_or_ocean_codes_appear() {
        let f = Field::from_fn(16, 9, |x, y| x as f32 - y as f32);
        let m = compute_ice_mask(&f, 0.0);
        for (h, c) in f.data.iter().zip(&m.data) {
            assert_eq!(*c == 4, *h <= 0.0);
            assert!(*c == 2 || *c == 4);
        }
    }

    #[test]
    fn notched_square_has_single_ocean_cell() {
        let surface = notched_square(7).unwrap();
        let m = compute_ice_mask(&surface, 0.0);
        for y in 0..7 {
            for x in 0..7 {
                let expected = if (x, y) == (0, 2) { 4 } else { 2 };
                assert_eq!(m.get(x, y), expected, "cell ({x}, {y})");
            }
        }
    }
}
