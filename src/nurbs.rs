//! Numeric decoding of NURBS data from OCX elements
//!
//! OCX stores knot vectors in flattened textbook form (every knot repeated
//! to its multiplicity) while geometry kernels want the compressed form of
//! unique knots with multiplicity counts. This module does that compression
//! plus the walk over control-point lists into weighted pole sequences and
//! grids. Both decoders deliver a result with a validity flag instead of
//! failing: a count mismatch or a missing nested point element marks the
//! whole result invalid, and callers must check the flag before issuing a
//! kernel request from it.

use crate::dom::{Element, tokenize};
use crate::geometry::Point3;
use crate::units::{UnitTable, parse_numeric};
use log::warn;

/// Absolute tolerance below which two knot tokens merge into one knot
///
/// The comparison is strict less-than: tokens differing by exactly this
/// value are distinct knots.
pub const KNOT_MERGE_TOLERANCE: f64 = 1e-3;

/// A knot vector in compressed (unique knot, multiplicity) form
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    /// Unique knot values in order of first occurrence
    pub knots: Vec<f64>,
    /// Multiplicity of each knot, parallel to `knots`
    pub multiplicities: Vec<u32>,
    /// False when the input did not match the declared token count or a
    /// token failed to parse; the other fields are empty in that case
    pub is_valid: bool,
}

impl KnotVector {
    /// Compress a whitespace-separated flattened knot vector
    ///
    /// `expected_count` is the token count the surrounding element
    /// declared. A mismatch marks the result invalid rather than erroring,
    /// matching the partial-failure contract of the readers.
    pub fn parse(text: &str, expected_count: usize) -> Self {
        let tokens = tokenize(text, " \t\r\n", true);
        if tokens.len() != expected_count {
            warn!(
                "Knot vector declares {} values but carries {}",
                expected_count,
                tokens.len()
            );
            return Self::invalid();
        }

        let mut knots = Vec::new();
        let mut multiplicities: Vec<u32> = Vec::new();
        let mut current: Option<f64> = None;
        let mut count: u32 = 0;

        for token in tokens {
            let value = match token.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    warn!("Knot vector token '{}' is not a real number", token);
                    return Self::invalid();
                }
            };
            match current {
                Some(run) if (value - run).abs() < KNOT_MERGE_TOLERANCE => {
                    count += 1;
                }
                Some(run) => {
                    knots.push(run);
                    multiplicities.push(count);
                    current = Some(value);
                    count = 1;
                }
                None => {
                    current = Some(value);
                    count = 1;
                }
            }
        }
        if let Some(run) = current {
            knots.push(run);
            multiplicities.push(count);
        }

        Self {
            knots,
            multiplicities,
            is_valid: true,
        }
    }

    fn invalid() -> Self {
        Self {
            knots: Vec::new(),
            multiplicities: Vec::new(),
            is_valid: false,
        }
    }

    /// Number of unique knots
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// True when no knots were decoded
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Re-flatten to textbook form, repeating each knot by its multiplicity
    pub fn expand(&self) -> Vec<f64> {
        let mut flat = Vec::new();
        for (knot, mult) in self.knots.iter().zip(&self.multiplicities) {
            for _ in 0..*mult {
                flat.push(*knot);
            }
        }
        flat
    }
}

/// The weighted control points of a NURBS curve
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints {
    /// Poles in document order, already unit-scaled to meters
    pub points: Vec<Point3>,
    /// Weight per pole, 1.0 where the document gives none
    pub weights: Vec<f64>,
    /// False when a point was missing its nested coordinates or the count
    /// did not match the declaration; the other fields are empty then
    pub is_valid: bool,
}

/// The weighted control-point grid of a NURBS surface
///
/// Poles are stored flattened row-major with the u index varying fastest,
/// matching the document order of the control-point list.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointGrid {
    /// Poles, `num_u * num_v` entries when valid
    pub points: Vec<Point3>,
    /// Weight per pole, parallel to `points`
    pub weights: Vec<f64>,
    /// Declared pole count in the u direction
    pub num_u: usize,
    /// Declared pole count in the v direction
    pub num_v: usize,
    /// False when any point was missing or the counts did not match
    pub is_valid: bool,
}

/// Walk a `ControlPtList` element into a curve's control points
///
/// Each `ControlPoint` child carries an optional `weight` attribute and a
/// nested `Point3D` whose axis children are resolved through the unit
/// table. A missing `Point3D` invalidates the whole sequence; the callers
/// never see a partially filled one.
pub fn parse_control_points(
    list: &Element,
    declared_count: usize,
    units: &UnitTable,
) -> ControlPoints {
    let mut points = Vec::new();
    let mut weights = Vec::new();

    for control_point in list.child_elements() {
        if control_point.local_name() != "ControlPoint" {
            continue;
        }
        match read_weighted_point(control_point, units) {
            Some((point, weight)) => {
                points.push(point);
                weights.push(weight);
            }
            None => {
                return ControlPoints {
                    points: Vec::new(),
                    weights: Vec::new(),
                    is_valid: false,
                };
            }
        }
    }

    if points.len() != declared_count {
        warn!(
            "Control point list declares {} points but carries {}",
            declared_count,
            points.len()
        );
        return ControlPoints {
            points: Vec::new(),
            weights: Vec::new(),
            is_valid: false,
        };
    }

    ControlPoints {
        points,
        weights,
        is_valid: true,
    }
}

/// Walk a `ControlPtList` element into a surface's control-point grid
///
/// The flat document order is interpreted as rows of `num_u` poles, one
/// row per v value. A total count other than `num_u * num_v` invalidates
/// the grid.
pub fn parse_control_point_grid(
    list: &Element,
    num_u: usize,
    num_v: usize,
    units: &UnitTable,
) -> ControlPointGrid {
    let flat = parse_control_points(list, num_u * num_v, units);
    if !flat.is_valid {
        return ControlPointGrid {
            points: Vec::new(),
            weights: Vec::new(),
            num_u,
            num_v,
            is_valid: false,
        };
    }
    ControlPointGrid {
        points: flat.points,
        weights: flat.weights,
        num_u,
        num_v,
        is_valid: true,
    }
}

fn read_weighted_point(control_point: &Element, units: &UnitTable) -> Option<(Point3, f64)> {
    let weight = match control_point.attr("weight") {
        Some(text) => parse_numeric(text, "weight").unwrap_or(1.0),
        None => 1.0,
    };
    let Some(point_el) = control_point.first_child("Point3D") else {
        warn!("ControlPoint without a nested Point3D invalidates the list");
        return None;
    };
    Some((read_point3(point_el, units), weight))
}

/// Resolve a `Point3D` element's axis children through the unit table
///
/// A missing axis child resolves to 0.0 with a diagnostic.
pub fn read_point3(point_el: &Element, units: &UnitTable) -> Point3 {
    let axis = |name: &str| -> f64 {
        match point_el.first_child(name) {
            Some(el) => units.read_dimension(el),
            None => {
                warn!(
                    "Point3D under '{}' is missing its {} coordinate, using 0.0",
                    point_el.local_name(),
                    name
                );
                0.0
            }
        }
    };
    Point3::new(axis("X"), axis("Y"), axis("Z"))
}
