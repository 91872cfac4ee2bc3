//! Shared test support
//!
//! Provides a recording geometry kernel: every request mints a fresh
//! opaque handle of the appropriate kind and appends the request name to
//! an operation log, so tests can assert on both the assembled tree and
//! the request sequence. Individual operations can be forced to fail to
//! exercise the isolate-and-continue paths.

use ocx_reader::{Dir3, Error, GeometryKernel, Point3, Result, Shape, ShapeKind};
use std::collections::HashSet;

/// Geometry kernel double that records requests instead of doing math
#[derive(Default)]
pub struct MockKernel {
    next_id: u64,
    /// Request names in call order
    pub ops: Vec<String>,
    /// Origins and normals of every plane face request
    pub planes: Vec<(Point3, Dir3)>,
    /// Center, normal and radius of every circle edge request
    pub circles: Vec<(Point3, Dir3, f64)>,
    /// Radius of every cylindrical face request
    pub cylinders: Vec<f64>,
    /// Half angle of every conical face request
    pub cones: Vec<f64>,
    /// (degree, pole count) of every B-spline edge request
    pub bspline_edges: Vec<(u32, usize)>,
    failing: HashSet<&'static str>,
}

impl MockKernel {
    pub fn new() -> Self {
        // Surface the crate's diagnostics in test output.
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    /// Force every request with this name to fail
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    fn request(&mut self, op: &'static str, kind: ShapeKind) -> Result<Shape> {
        self.ops.push(op.to_string());
        if self.failing.contains(op) {
            return Err(Error::kernel(op, "forced failure"));
        }
        self.next_id += 1;
        Ok(Shape::new(self.next_id, kind))
    }
}

impl GeometryKernel for MockKernel {
    fn plane_face(&mut self, origin: Point3, normal: Dir3) -> Result<Shape> {
        self.planes.push((origin, normal));
        self.request("plane_face", ShapeKind::Face)
    }

    fn line_edge(&mut self, _start: Point3, _end: Point3) -> Result<Shape> {
        self.request("line_edge", ShapeKind::Edge)
    }

    fn circle_edge(&mut self, center: Point3, normal: Dir3, radius: f64) -> Result<Shape> {
        self.circles.push((center, normal, radius));
        self.request("circle_edge", ShapeKind::Edge)
    }

    fn circle_through_points(&mut self, _p1: Point3, _p2: Point3, _p3: Point3) -> Result<Shape> {
        self.request("circle_through_points", ShapeKind::Edge)
    }

    fn bspline_edge(
        &mut self,
        poles: &[Point3],
        _weights: &[f64],
        _knots: &[f64],
        _multiplicities: &[u32],
        degree: u32,
    ) -> Result<Shape> {
        self.bspline_edges.push((degree, poles.len()));
        self.request("bspline_edge", ShapeKind::Edge)
    }

    fn wire(&mut self, _edges: &[Shape]) -> Result<Shape> {
        self.request("wire", ShapeKind::Wire)
    }

    fn bspline_face(
        &mut self,
        _poles: &[Point3],
        _weights: &[f64],
        _num_u: usize,
        _num_v: usize,
        _u_knots: &[f64],
        _u_multiplicities: &[u32],
        _v_knots: &[f64],
        _v_multiplicities: &[u32],
        _u_degree: u32,
        _v_degree: u32,
    ) -> Result<Shape> {
        self.request("bspline_face", ShapeKind::Face)
    }

    fn cylindrical_face(&mut self, _origin: Point3, _axis: Dir3, radius: f64) -> Result<Shape> {
        self.cylinders.push(radius);
        self.request("cylindrical_face", ShapeKind::Face)
    }

    fn conical_face(
        &mut self,
        _origin: Point3,
        _axis: Dir3,
        _radius: f64,
        half_angle: f64,
    ) -> Result<Shape> {
        self.cones.push(half_angle);
        self.request("conical_face", ShapeKind::Face)
    }

    fn spherical_face(&mut self, _center: Point3, _radius: f64) -> Result<Shape> {
        self.request("spherical_face", ShapeKind::Face)
    }

    fn extruded_face(&mut self, _profile: &Shape, _direction: Dir3, _length: f64) -> Result<Shape> {
        self.request("extruded_face", ShapeKind::Face)
    }

    fn sew(&mut self, _faces: &[Shape]) -> Result<Shape> {
        self.request("sew", ShapeKind::Shell)
    }

    fn restrict_face(&mut self, _face: &Shape, _wire: &Shape) -> Result<Shape> {
        self.request("restrict_face", ShapeKind::Face)
    }
}

/// Wrap document content in a valid ocxXML root
pub fn ocx_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ocx:ocxXML xmlns:ocx="https://3docx.org/fileadmin//ocx_schema//V285//OCX_Schema.xsd" schemaVersion="2.8.5">
{}
</ocx:ocxXML>"#,
        body
    )
}
