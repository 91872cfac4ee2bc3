//! Curve reading
//!
//! Converts curve-describing OCX subtrees into edge and wire requests.
//! Every curve kind is independently fault-tolerant: a curve that cannot
//! be decoded or that the kernel rejects is logged and skipped, and its
//! siblings still contribute to the surrounding contour.

use crate::dom::Element;
use crate::geometry::{GeometryKernel, Shape};
use crate::nurbs::{KnotVector, parse_control_points, read_point3};
use log::warn;

use super::context::Context;
use super::{attr_usize, read_dir3, try_request};

/// Read a contour element into a single wire
///
/// The contour's children are read as individual curves; whatever could be
/// built is connected into one wire. A contour with no buildable curve
/// yields nothing.
pub(crate) fn read_contour(
    contour: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let mut edges = Vec::new();
    for child in contour.child_elements() {
        if let Some(edge) = read_curve(child, ctx, kernel) {
            edges.push(edge);
        }
    }
    if edges.is_empty() {
        warn!(
            "Contour '{}' produced no edges",
            contour.local_name()
        );
        return None;
    }
    try_request("wire", kernel.wire(&edges))
}

/// Read one curve element, dispatched by local tag name
pub(crate) fn read_curve(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    match element.local_name() {
        "Line3D" => read_line(element, ctx, kernel),
        "Circle3D" => read_circle(element, ctx, kernel),
        "CircumCircle3D" => read_circum_circle(element, ctx, kernel),
        "NURBS3D" => read_nurbs_curve(element, ctx, kernel),
        "PolyLine3D" => read_polyline(element, ctx, kernel),
        "CompositeCurve3D" => read_composite(element, ctx, kernel),
        other => {
            warn!("Unknown curve element '{}', skipped", other);
            None
        }
    }
}

fn read_line(element: &Element, ctx: &Context, kernel: &mut dyn GeometryKernel) -> Option<Shape> {
    let Some(start_el) = element.first_child("StartPoint") else {
        warn!("Line3D without StartPoint, skipped");
        return None;
    };
    let Some(end_el) = element.first_child("EndPoint") else {
        warn!("Line3D without EndPoint, skipped");
        return None;
    };
    let start = read_point3(start_el, &ctx.units);
    let end = read_point3(end_el, &ctx.units);
    try_request("line edge", kernel.line_edge(start, end))
}

fn read_circle(element: &Element, ctx: &Context, kernel: &mut dyn GeometryKernel) -> Option<Shape> {
    let Some(center_el) = element.first_child("Center") else {
        warn!("Circle3D without Center, skipped");
        return None;
    };
    let Some(radius_el) = element.first_child("Radius") else {
        warn!("Circle3D without Radius, skipped");
        return None;
    };
    let center = read_point3(center_el, &ctx.units);
    let normal = match element.first_child("Normal") {
        Some(el) => read_dir3(el),
        None => {
            warn!("Circle3D without Normal, assuming Z axis");
            crate::geometry::Dir3::z_axis()
        }
    };
    let radius = ctx.units.read_dimension(radius_el);
    try_request("circle edge", kernel.circle_edge(center, normal, radius))
}

fn read_circum_circle(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let Some(positions) = element.first_child("Positions") else {
        warn!("CircumCircle3D without Positions, skipped");
        return None;
    };
    let points: Vec<_> = positions
        .child_elements()
        .filter(|el| el.local_name() == "Point3D")
        .map(|el| read_point3(el, &ctx.units))
        .collect();
    if points.len() != 3 {
        warn!(
            "CircumCircle3D needs exactly 3 points, found {}",
            points.len()
        );
        return None;
    }
    try_request(
        "circle through points",
        kernel.circle_through_points(points[0], points[1], points[2]),
    )
}

fn read_nurbs_curve(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let Some(properties) = element.first_child("NURBSproperties") else {
        warn!("NURBS3D without NURBSproperties, skipped");
        return None;
    };
    let degree = attr_usize(properties, "degree")?;
    let num_ctrl_pts = attr_usize(properties, "numCtrlPts")?;
    let num_knots = attr_usize(properties, "numKnots")?;

    let Some(knot_el) = element.first_child("KnotVector") else {
        warn!("NURBS3D without KnotVector, skipped");
        return None;
    };
    let knot_text = knot_text(knot_el);
    let knots = KnotVector::parse(&knot_text, num_knots);
    if !knots.is_valid {
        warn!("NURBS3D carries an invalid knot vector, skipped");
        return None;
    }

    let Some(list) = element.first_child("ControlPtList") else {
        warn!("NURBS3D without ControlPtList, skipped");
        return None;
    };
    let poles = parse_control_points(list, num_ctrl_pts, &ctx.units);
    if !poles.is_valid {
        warn!("NURBS3D carries invalid control points, skipped");
        return None;
    }

    try_request(
        "bspline edge",
        kernel.bspline_edge(
            &poles.points,
            &poles.weights,
            &knots.knots,
            &knots.multiplicities,
            degree as u32,
        ),
    )
}

fn read_polyline(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let points: Vec<_> = element
        .child_elements()
        .filter(|el| el.local_name() == "Point3D")
        .map(|el| read_point3(el, &ctx.units))
        .collect();
    if points.len() < 2 {
        warn!("PolyLine3D needs at least 2 points, found {}", points.len());
        return None;
    }
    let mut edges = Vec::new();
    for pair in points.windows(2) {
        if let Some(edge) = try_request("line edge", kernel.line_edge(pair[0], pair[1])) {
            edges.push(edge);
        }
    }
    if edges.is_empty() {
        return None;
    }
    try_request("wire", kernel.wire(&edges))
}

fn read_composite(
    element: &Element,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let mut parts = Vec::new();
    for child in element.child_elements() {
        if let Some(shape) = read_curve(child, ctx, kernel) {
            parts.push(shape);
        }
    }
    if parts.is_empty() {
        warn!("CompositeCurve3D produced no segments");
        return None;
    }
    try_request("wire", kernel.wire(&parts))
}

/// The knot tokens live in the element's `value` attribute, with the text
/// content as a fallback for older writers.
fn knot_text(knot_el: &Element) -> String {
    match knot_el.attr("value") {
        Some(value) => value.to_string(),
        None => knot_el.text(),
    }
}
