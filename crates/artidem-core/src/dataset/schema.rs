//! Variable names, dimension order, and metadata for each dataset layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::geometry::Geometry;
use crate::mask::IceType;

/// Dataset layout version. Downstream readers exist for each, so all are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// `(x, y)` grids, `x value`/`y value` coordinates, units only.
    V1,
    /// `(y, x)` grids with CF coordinate and variable metadata.
    V2,
    /// V2 plus the ice-type mask.
    #[default]
    V3,
}

/// Storage order of the 2-D variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridOrder {
    /// Declared over `(x, y)`: x varies slowest.
    XY,
    /// Declared over `(y, x)`: y varies slowest.
    YX,
}

impl GridOrder {
    pub fn dims(self) -> [&'static str; 2] {
        match self {
            GridOrder::XY => ["x", "y"],
            GridOrder::YX => ["y", "x"],
        }
    }
}

impl SchemaVersion {
    pub fn grid_order(self) -> GridOrder {
        match self {
            SchemaVersion::V1 => GridOrder::XY,
            SchemaVersion::V2 | SchemaVersion::V3 => GridOrder::YX,
        }
    }

    pub fn has_cf_metadata(self) -> bool {
        !matches!(self, SchemaVersion::V1)
    }

    pub fn supports_mask(self) -> bool {
        matches!(self, SchemaVersion::V3)
    }

    /// Names of the `x` and `y` coordinate variables.
    pub fn coordinate_names(self) -> [&'static str; 2] {
        match self {
            SchemaVersion::V1 => ["x value", "y value"],
            SchemaVersion::V2 | SchemaVersion::V3 => ["x", "y"],
        }
    }

    /// String attributes of the coordinate variable along `axis` ("x" or "y").
    pub fn coordinate_attributes(self, axis: &str) -> Vec<(&'static str, &'static str)> {
        if !self.has_cf_metadata() {
            return Vec::new();
        }
        match axis {
            "x" => vec![
                ("units", "m"),
                ("axis", "X"),
                ("standard_name", "projection_x_coordinate"),
                ("long_name", "x coordinate of projection"),
            ],
            _ => vec![
                ("units", "m"),
                ("axis", "Y"),
                ("standard_name", "projection_y_coordinate"),
                ("long_name", "y coordinate of projection"),
            ],
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
            SchemaVersion::V3 => "v3",
        };
        f.write_str(s)
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(SchemaVersion::V1),
            "v2" | "2" => Ok(SchemaVersion::V2),
            "v3" | "3" => Ok(SchemaVersion::V3),
            other => Err(format!("unknown schema version `{other}` (expected v1, v2 or v3)")),
        }
    }
}

/// The single-precision 2-D variables every layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridVariable {
    Surface,
    Bed,
    Thickness,
    MeltRate,
    BasalTemp,
}

impl GridVariable {
    pub const ALL: [GridVariable; 5] = [
        GridVariable::Surface,
        GridVariable::Bed,
        GridVariable::Thickness,
        GridVariable::MeltRate,
        GridVariable::BasalTemp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GridVariable::Surface   => "surf",
            GridVariable::Bed       => "bed",
            GridVariable::Thickness => "thickness",
            GridVariable::MeltRate  => "meltrates",
            GridVariable::BasalTemp => "base_temp",
        }
    }

    pub fn select(self, geometry: &Geometry) -> &Field<f32> {
        match self {
            GridVariable::Surface   => &geometry.surface,
            GridVariable::Bed       => &geometry.bed,
            GridVariable::Thickness => &geometry.thickness,
            GridVariable::MeltRate  => &geometry.melt,
            GridVariable::BasalTemp => &geometry.basal_temp,
        }
    }

    /// String attributes written for this variable under `version`.
    pub fn attributes(self, version: SchemaVersion) -> Vec<(&'static str, &'static str)> {
        if !version.has_cf_metadata() {
            let units = match self {
                GridVariable::MeltRate  => "m/s Water equivalent",
                GridVariable::BasalTemp => "K",
                _ => "m",
            };
            return vec![("units", units)];
        }
        match self {
            GridVariable::Surface => vec![
                ("units", "m"),
                ("standard_name", "surface_altitude"),
                ("long_name", "ice surface elevation"),
            ],
            GridVariable::Bed => vec![
                ("units", "m"),
                ("standard_name", "bedrock_altitude"),
                ("long_name", "bed elevation"),
                ("comment", "flat bed at zero"),
            ],
            GridVariable::Thickness => vec![
                ("units", "m"),
                ("standard_name", "land_ice_thickness"),
                ("long_name", "ice thickness"),
                ("comment", "surface elevation minus bed elevation"),
            ],
            GridVariable::MeltRate => vec![
                ("units", "m s-1"),
                ("standard_name", "land_ice_basal_melt_rate"),
                ("long_name", "basal melt rate"),
                ("comment", "water equivalent, positive values denote melting"),
            ],
            GridVariable::BasalTemp => vec![
                ("units", "degC"),
                ("standard_name", "temperature_at_base_of_ice_sheet_model"),
                ("long_name", "basal temperature"),
                ("comment", "offset from the pressure melting point"),
            ],
        }
    }
}

pub const MASK_NAME: &str = "mask";

/// String attributes of the mask variable. `flag_values` is written separately
/// as an integer attribute.
pub fn mask_attributes() -> Vec<(&'static str, String)> {
    let meanings: Vec<&str> = IceType::ALL.iter().map(|t| t.flag_meaning()).collect();
    vec![
        ("long_name", "ice-type mask".to_string()),
        ("flag_meanings", meanings.join(" ")),
        (
            "comment",
            "1 = ice-free bedrock, 2 = grounded ice, 3 = floating ice, 4 = ice-free ocean".to_string(),
        ),
    ]
}

pub fn mask_flag_values() -> Vec<i32> {
    IceType::ALL.iter().map(|t| t.code()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_parse_and_display() {
        for v in [SchemaVersion::V1, SchemaVersion::V2, SchemaVersion::V3] {
            assert_eq!(v.to_string().parse::<SchemaVersion>(), Ok(v));
        }
        assert_eq!("V2".parse::<SchemaVersion>(), Ok(SchemaVersion::V2));
        assert!("v4".parse::<SchemaVersion>().is_err());
        assert_eq!(SchemaVersion::default(), SchemaVersion::V3);
    }

    #[test]
    fn first_layout_keeps_units_only() {
        for var in GridVariable::ALL {
            let attrs = var.attributes(SchemaVersion::V1);
            assert_eq!(attrs.len(), 1);
            assert_eq!(attrs[0].0, "units");
        }
        assert!(SchemaVersion::V1.coordinate_attributes("x").is_empty());
        assert_eq!(SchemaVersion::V1.grid_order(), GridOrder::XY);
    }

    #[test]
    fn basal_temperature_units_depend_on_version() {
        let units = |v| {
            GridVariable::BasalTemp
                .attributes(v)
                .into_iter()
                .find(|(k, _)| *k == "units")
                .map(|(_, u)| u)
        };
        assert_eq!(units(SchemaVersion::V1), Some("K"));
        assert_eq!(units(SchemaVersion::V3), Some("degC"));
    }

    #[test]
    fn mask_flags_list_all_categories() {
        assert_eq!(mask_flag_values(), vec![1, 2, 3, 4]);
        let meanings = &mask_attributes()[1].1;
        assert_eq!(meanings, "ice_free_bedrock grounded_ice floating_ice ice_free_ocean");
    }
}
