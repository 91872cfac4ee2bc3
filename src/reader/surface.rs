//! Surface reading
//!
//! Converts surface-describing OCX subtrees into face and shell requests.
//! A `SurfaceCollection` delegates per child and sews the resulting faces
//! into one shell. Unknown surface tags are logged and skipped without
//! affecting their siblings.

use crate::dom::Element;
use crate::geometry::{GeometryKernel, Shape};
use crate::nurbs::{KnotVector, parse_control_point_grid, read_point3};
use crate::units::parse_numeric;
use log::warn;

use super::context::Context;
use super::curve::read_curve;
use super::{attr_usize, read_dir3, try_request};

/// Read one surface element, dispatched by local tag name
pub(crate) fn read_surface(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    match element.local_name() {
        "Plane3D" => read_plane(element, ctx, kernel),
        "Cylinder3D" => read_cylinder(element, ctx, kernel),
        "Cone3D" => read_cone(element, ctx, kernel),
        "Sphere3D" => read_sphere(element, ctx, kernel),
        "ExtrudedSurface" => read_extruded(element, ctx, kernel),
        "NURBSSurface" => read_nurbs_surface(element, ctx, kernel),
        "SurfaceCollection" => read_collection(element, ctx, kernel),
        other => {
            warn!("Unknown surface element '{}', skipped", other);
            None
        }
    }
}

fn read_plane(element: &Element, ctx: &Context, kernel: &mut dyn GeometryKernel) -> Option<Shape> {
    let Some(origin_el) = element.first_child("Origin") else {
        warn!("Plane3D without Origin, skipped");
        return None;
    };
    let Some(normal_el) = element.first_child("Normal") else {
        warn!("Plane3D without Normal, skipped");
        return None;
    };
    let origin = read_point3(origin_el, &ctx.units);
    let normal = read_dir3(normal_el);
    try_request("plane face", kernel.plane_face(origin, normal))
}

fn read_cylinder(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let (origin, axis) = read_axis_placement(element, ctx)?;
    let Some(radius_el) = element.first_child("Radius") else {
        warn!("Cylinder3D without Radius, skipped");
        return None;
    };
    let radius = ctx.units.read_dimension(radius_el);
    try_request(
        "cylindrical face",
        kernel.cylindrical_face(origin, axis, radius),
    )
}

fn read_cone(element: &Element, ctx: &Context, kernel: &mut dyn GeometryKernel) -> Option<Shape> {
    let (origin, axis) = read_axis_placement(element, ctx)?;
    let Some(radius_el) = element.first_child("Radius") else {
        warn!("Cone3D without Radius, skipped");
        return None;
    };
    let radius = ctx.units.read_dimension(radius_el);
    // The half angle is dimensionless (radians), read without unit scaling.
    let half_angle = element
        .first_child("SemiAngle")
        .and_then(|el| el.attr("numericvalue"))
        .and_then(|text| parse_numeric(text, "SemiAngle"))
        .unwrap_or_else(|| {
            warn!("Cone3D without a usable SemiAngle, assuming 0");
            0.0
        });
    try_request(
        "conical face",
        kernel.conical_face(origin, axis, radius, half_angle),
    )
}

fn read_sphere(element: &Element, ctx: &Context, kernel: &mut dyn GeometryKernel) -> Option<Shape> {
    let Some(center_el) = element.first_child("Center") else {
        warn!("Sphere3D without Center, skipped");
        return None;
    };
    let Some(radius_el) = element.first_child("Radius") else {
        warn!("Sphere3D without Radius, skipped");
        return None;
    };
    let center = read_point3(center_el, &ctx.units);
    let radius = ctx.units.read_dimension(radius_el);
    try_request("spherical face", kernel.spherical_face(center, radius))
}

fn read_extruded(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let Some(base) = element.first_child("BaseCurve") else {
        warn!("ExtrudedSurface without BaseCurve, skipped");
        return None;
    };
    let profile = base
        .child_elements()
        .next()
        .and_then(|curve_el| read_curve(curve_el, ctx, kernel))?;

    let Some(direction_el) = element.first_child("Direction") else {
        warn!("ExtrudedSurface without Direction, skipped");
        return None;
    };
    let direction = read_dir3(direction_el);
    let length = match element.first_child("Length") {
        Some(el) => ctx.units.read_dimension(el),
        None => {
            warn!("ExtrudedSurface without Length, skipped");
            return None;
        }
    };
    try_request(
        "extruded face",
        kernel.extruded_face(&profile, direction, length),
    )
}

fn read_nurbs_surface(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let Some(properties) = element.first_child("NURBSproperties") else {
        warn!("NURBSSurface without NURBSproperties, skipped");
        return None;
    };
    let u_degree = attr_usize(properties, "degreeU")?;
    let v_degree = attr_usize(properties, "degreeV")?;
    let num_u = attr_usize(properties, "numUCtrlPts")?;
    let num_v = attr_usize(properties, "numVCtrlPts")?;
    let num_u_knots = attr_usize(properties, "numUKnots")?;
    let num_v_knots = attr_usize(properties, "numVKnots")?;

    let u_knots = read_knot_vector(element, "UknotVector", num_u_knots)?;
    let v_knots = read_knot_vector(element, "VknotVector", num_v_knots)?;

    let Some(list) = element.first_child("ControlPtList") else {
        warn!("NURBSSurface without ControlPtList, skipped");
        return None;
    };
    let grid = parse_control_point_grid(list, num_u, num_v, &ctx.units);
    if !grid.is_valid {
        warn!("NURBSSurface carries an invalid control point grid, skipped");
        return None;
    }

    try_request(
        "bspline face",
        kernel.bspline_face(
            &grid.points,
            &grid.weights,
            grid.num_u,
            grid.num_v,
            &u_knots.knots,
            &u_knots.multiplicities,
            &v_knots.knots,
            &v_knots.multiplicities,
            u_degree as u32,
            v_degree as u32,
        ),
    )
}

fn read_collection(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let mut faces = Vec::new();
    for child in element.child_elements() {
        if let Some(face) = read_surface(child, ctx, kernel) {
            faces.push(face);
        }
    }
    match faces.len() {
        0 => {
            warn!("SurfaceCollection produced no faces");
            None
        }
        1 => faces.pop(),
        _ => try_request("sew", kernel.sew(&faces)),
    }
}

fn read_knot_vector(element: &Element, child: &str, expected: usize) -> Option<KnotVector> {
    let Some(knot_el) = element.first_child(child) else {
        warn!("NURBSSurface without {}, skipped", child);
        return None;
    };
    let text = match knot_el.attr("value") {
        Some(value) => value.to_string(),
        None => knot_el.text(),
    };
    let knots = KnotVector::parse(&text, expected);
    if !knots.is_valid {
        warn!("NURBSSurface {} is invalid, skipped", child);
        return None;
    }
    Some(knots)
}

/// Shared axis placement of cylinders and cones: a `Position` point plus a
/// `Direction` vector.
fn read_axis_placement(
    element: &Element,
    ctx: &Context,
) -> Option<(crate::geometry::Point3, crate::geometry::Dir3)> {
    let Some(position_el) = element.first_child("Position") else {
        warn!("'{}' without Position, skipped", element.local_name());
        return None;
    };
    let Some(direction_el) = element.first_child("Direction") else {
        warn!("'{}' without Direction, skipped", element.local_name());
        return None;
    };
    Some((
        read_point3(position_el, &ctx.units),
        read_dir3(direction_el),
    ))
}
