//! NetCDF export of a [`Geometry`] for flux routing, and the matching reader.
//!
//! The writer validates every array against the coordinate vectors before
//! the file is created, so a shape error never leaves a file behind. Once the
//! file exists, any failure closes the handle and removes the partial file.

pub mod schema;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{DemError, DemResult};
use crate::field::Field;
use crate::geometry::Geometry;
pub use schema::{GridOrder, GridVariable, SchemaVersion, MASK_NAME};

pub const DEFAULT_DESCRIPTION: &str = "Input data for flux routing";
pub const DEFAULT_SOURCE: &str = "Generated from artidem";

/// Writes geometries as self-describing gridded datasets.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    pub schema: SchemaVersion,
    /// Global `description` attribute.
    pub description: String,
    /// Global `source` attribute naming the generator.
    pub source: String,
}

impl DatasetWriter {
    pub fn new(schema: SchemaVersion) -> Self {
        Self {
            schema,
            description: DEFAULT_DESCRIPTION.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Write `geometry` to `path`, replacing any existing file.
    pub fn write(&self, geometry: &Geometry, path: impl AsRef<Path>) -> DemResult<()> {
        let path = path.as_ref();
        validate_shapes(geometry)?;

        let io_failure = |source: netcdf::Error| DemError::IoFailure { path: path.to_path_buf(), source };
        let mut file = netcdf::create(path).map_err(io_failure)?;
        let written = self.write_contents(&mut file, geometry);
        drop(file);

        if let Err(source) = written {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "could not remove partial dataset");
            }
            return Err(io_failure(source));
        }
        info!(path = %path.display(), schema = %self.schema, nx = geometry.nx(), ny = geometry.ny(), "dataset written");
        Ok(())
    }

    fn write_contents(&self, file: &mut netcdf::FileMut, geometry: &Geometry) -> Result<(), netcdf::Error> {
        let schema = self.schema;
        let order = schema.grid_order();

        file.add_attribute("description", self.description.as_str())?;
        file.add_attribute("history", creation_stamp().as_str())?;
        file.add_attribute("source", self.source.as_str())?;
        if schema.has_cf_metadata() {
            file.add_attribute("Conventions", "CF-1.8")?;
        }

        file.add_dimension("x", geometry.nx())?;
        file.add_dimension("y", geometry.ny())?;

        let [x_name, y_name] = schema.coordinate_names();
        for (name, axis, values) in [(x_name, "x", &geometry.x_values), (y_name, "y", &geometry.y_values)] {
            let mut var = file.add_variable::<f32>(name, &[axis])?;
            for (key, value) in schema.coordinate_attributes(axis) {
                var.put_attribute(key, value)?;
            }
            var.put_values(values, ..)?;
        }

        for grid_var in GridVariable::ALL {
            let mut var = file.add_variable::<f32>(grid_var.name(), &order.dims())?;
            for (key, value) in grid_var.attributes(schema) {
                var.put_attribute(key, value)?;
            }
            var.put_values(&ordered(grid_var.select(geometry), order)[..], ..)?;
            debug!(variable = grid_var.name(), "variable written");
        }

        match &geometry.mask {
            Some(mask) if schema.supports_mask() => {
                let mut var = file.add_variable::<i32>(MASK_NAME, &order.dims())?;
                for (key, value) in schema::mask_attributes() {
                    var.put_attribute(key, value.as_str())?;
                }
                var.put_attribute("flag_values", schema::mask_flag_values())?;
                var.put_values(&ordered(mask, order)[..], ..)?;
            }
            Some(_) => warn!(schema = %schema, "schema has no mask variable, mask not written"),
            None => {}
        }
        Ok(())
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new(SchemaVersion::default())
    }
}

/// Write `geometry` to `path` with the default attributes of `schema`.
pub fn write_dataset(geometry: &Geometry, path: impl AsRef<Path>, schema: SchemaVersion) -> DemResult<()> {
    DatasetWriter::new(schema).write(geometry, path)
}

/// `Created <ctime>` in local time.
fn creation_stamp() -> String {
    format!("Created {}", Local::now().format("%a %b %e %H:%M:%S %Y"))
}

fn ordered<T: Copy>(field: &Field<T>, order: GridOrder) -> Cow<'_, [T]> {
    match order {
        GridOrder::YX => Cow::Borrowed(&field.data),
        GridOrder::XY => Cow::Owned(field.x_major()),
    }
}

/// Check every array against the `(nx, ny)` declared by the coordinate vectors.
pub fn validate_shapes(geometry: &Geometry) -> DemResult<()> {
    let expected = (geometry.nx(), geometry.ny());
    if expected.0 == 0 || expected.1 == 0 {
        return Err(DemError::InvalidShape(format!("grid must be non-empty, got {}x{}", expected.0, expected.1)));
    }
    let check = |variable: &str, found: (usize, usize), len: usize| {
        if found != expected || len != expected.0 * expected.1 {
            return Err(DemError::ShapeMismatch { variable: variable.to_string(), expected, found });
        }
        Ok(())
    };
    for grid_var in GridVariable::ALL {
        let field = grid_var.select(geometry);
        check(grid_var.name(), field.shape(), field.data.len())?;
    }
    if let Some(mask) = &geometry.mask {
        check(MASK_NAME, mask.shape(), mask.data.len())?;
    }
    Ok(())
}

// ── Reading ──────────────────────────────────────────────────────────────────

/// Everything a written dataset holds, with grids in the in-memory layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetContents {
    pub nx: usize,
    pub ny: usize,
    pub x_values: Vec<f32>,
    pub y_values: Vec<f32>,
    /// 2-D single-precision variables by name.
    pub grids: BTreeMap<String, Field<f32>>,
    pub mask: Option<Field<i32>>,
    /// Dimension names of every variable, in declared order.
    pub dimensions: BTreeMap<String, Vec<String>>,
    /// String attributes of every variable.
    pub variable_attributes: BTreeMap<String, BTreeMap<String, String>>,
    pub global_attributes: BTreeMap<String, String>,
}

impl DatasetContents {
    /// Rebuild the geometry record from the stored variables.
    pub fn to_geometry(&self) -> DemResult<Geometry> {
        let grid = |var: GridVariable| {
            self.grids
                .get(var.name())
                .cloned()
                .ok_or_else(|| DemError::MissingVariable(var.name().to_string()))
        };
        Ok(Geometry {
            x_values: self.x_values.clone(),
            y_values: self.y_values.clone(),
            surface: grid(GridVariable::Surface)?,
            bed: grid(GridVariable::Bed)?,
            thickness: grid(GridVariable::Thickness)?,
            melt: grid(GridVariable::MeltRate)?,
            basal_temp: grid(GridVariable::BasalTemp)?,
            mask: self.mask.clone(),
        })
    }

    pub fn attribute(&self, variable: &str, key: &str) -> Option<&str> {
        self.variable_attributes.get(variable)?.get(key).map(String::as_str)
    }
}

/// Read a dataset written by [`DatasetWriter`] under any schema version.
pub fn read_dataset(path: impl AsRef<Path>) -> DemResult<DatasetContents> {
    let path = path.as_ref();
    let io_failure = |source: netcdf::Error| DemError::IoFailure { path: path.to_path_buf(), source };
    let file = netcdf::open(path).map_err(io_failure)?;

    let dim_len = |name: &str| {
        file.dimension(name)
            .map(|d| d.len())
            .ok_or_else(|| DemError::MissingVariable(format!("dimension {name}")))
    };
    let nx = dim_len("x")?;
    let ny = dim_len("y")?;

    let mut contents = DatasetContents {
        nx,
        ny,
        x_values: Vec::new(),
        y_values: Vec::new(),
        grids: BTreeMap::new(),
        mask: None,
        dimensions: BTreeMap::new(),
        variable_attributes: BTreeMap::new(),
        global_attributes: string_attributes(file.attributes()),
    };

    for var in file.variables() {
        let name = var.name();
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        contents.variable_attributes.insert(name.clone(), string_attributes(var.attributes()));

        match dims.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            ["x"] => contents.x_values = var.get_values::<f32, _>(..).map_err(io_failure)?,
            ["y"] => contents.y_values = var.get_values::<f32, _>(..).map_err(io_failure)?,
            [a, b] => {
                let order = match (*a, *b) {
                    ("x", "y") => GridOrder::XY,
                    ("y", "x") => GridOrder::YX,
                    _ => {
                        return Err(DemError::InvalidShape(format!(
                            "variable `{name}` has unexpected dimensions {dims:?}"
                        )))
                    }
                };
                if name == MASK_NAME {
                    let values = var.get_values::<i32, _>(..).map_err(io_failure)?;
                    contents.mask = Some(reorder(nx, ny, values, order)?);
                } else {
                    let values = var.get_values::<f32, _>(..).map_err(io_failure)?;
                    contents.grids.insert(name.clone(), reorder(nx, ny, values, order)?);
                }
            }
            _ => debug!(variable = %name, "skipping variable with unrecognised dimensions"),
        }
        contents.dimensions.insert(name, dims);
    }
    Ok(contents)
}

fn reorder<T: Copy>(nx: usize, ny: usize, values: Vec<T>, order: GridOrder) -> DemResult<Field<T>> {
    match order {
        GridOrder::YX => Field::from_vec(nx, ny, values),
        GridOrder::XY => Field::from_x_major(nx, ny, &values),
    }
}

fn string_attributes<'a>(attrs: impl Iterator<Item = netcdf::Attribute<'a>>) -> BTreeMap<String, String> {
    attrs
        .filter_map(|attr| match attr.value() {
            Ok(netcdf::AttributeValue::Str(s)) => Some((attr.name().to_string(), s)),
            _ => None,
        })
        .collect()
}

/// Paths used by multi-file exports: `<dir>/<stem>_<name>.nc`.
pub fn named_output(dir: &Path, stem: &str, name: &str) -> PathBuf {
    dir.join(format!("{stem}_{name}.nc"))
}
