//! The boundary to the external geometry kernel
//!
//! The translation core never performs solid modeling itself. It assembles
//! requests ("build a plane face here", "sew these faces") against the
//! [`GeometryKernel`] trait and holds on to the opaque [`Shape`] handles
//! that come back. A kernel rejection is an `Err` from the request method;
//! the readers catch it at the call site, log it, and carry on with that
//! stage's geometry absent.

use crate::error::Result;

/// A point in 3D model space, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Point3 {
    /// Create a point from its coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// A direction vector, not necessarily normalized
///
/// Normalization is the kernel's business; the readers hand over whatever
/// the document declares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dir3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Dir3 {
    /// Create a direction from its components
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit X axis
    pub fn x_axis() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Unit Y axis
    pub fn y_axis() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Unit Z axis
    pub fn z_axis() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Topological classification of a kernel-built shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A single point
    Vertex,
    /// A bounded curve
    Edge,
    /// A connected sequence of edges
    Wire,
    /// A bounded surface
    Face,
    /// A connected set of faces
    Shell,
    /// A closed volume
    Solid,
    /// A heterogeneous collection
    Compound,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeKind::Vertex => "vertex",
            ShapeKind::Edge => "edge",
            ShapeKind::Wire => "wire",
            ShapeKind::Face => "face",
            ShapeKind::Shell => "shell",
            ShapeKind::Solid => "solid",
            ShapeKind::Compound => "compound",
        };
        f.write_str(name)
    }
}

/// An opaque handle to a shape owned by the geometry kernel
///
/// The core never inspects or mutates the kernel's representation; it only
/// stores handles, compares them, and passes them back into later requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    id: u64,
    kind: ShapeKind,
}

impl Shape {
    /// Mint a handle; called by kernel implementations only
    pub fn new(id: u64, kind: ShapeKind) -> Self {
        Self { id, kind }
    }

    /// Kernel-assigned identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Topological kind of the shape
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }
}

/// An RGB display color attached to a group in the output tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A named node in the assembled output shape tree
///
/// This tree is what the translation session hands to the export
/// collaborators. Interior nodes group related geometry (one node per
/// panel, one per reader stage); leaves usually carry a shape handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    /// Display name of the node
    pub name: String,
    /// Optional display color
    pub color: Option<Color>,
    /// Shape handle carried by this node, if any
    pub shape: Option<Shape>,
    /// Ordered key/value metadata harvested from the source element
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<ShapeNode>,
}

impl ShapeNode {
    /// Create an empty group node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            shape: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a leaf node carrying a shape
    pub fn leaf(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            color: None,
            shape: Some(shape),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the display color, builder style
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Append a child node
    pub fn push(&mut self, child: ShapeNode) {
        self.children.push(child);
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&ShapeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Total number of shape handles in this subtree
    pub fn shape_count(&self) -> usize {
        let own = usize::from(self.shape.is_some());
        own + self
            .children
            .iter()
            .map(ShapeNode::shape_count)
            .sum::<usize>()
    }
}

/// The requests the translation core issues to the geometry kernel
///
/// All methods are synchronous and return either an opaque shape handle or
/// a failure. Implementations decide what "failure" means (unsatisfiable
/// constraints, tolerance problems, open shells); the core only requires
/// that a failed request leaves the kernel usable for the next one.
pub trait GeometryKernel {
    /// Build an unbounded planar face through `origin` with `normal`
    fn plane_face(&mut self, origin: Point3, normal: Dir3) -> Result<Shape>;

    /// Build a straight edge between two points
    fn line_edge(&mut self, start: Point3, end: Point3) -> Result<Shape>;

    /// Build a full circular edge from center, plane normal and radius
    fn circle_edge(&mut self, center: Point3, normal: Dir3, radius: f64) -> Result<Shape>;

    /// Build a circular edge through three points
    fn circle_through_points(&mut self, p1: Point3, p2: Point3, p3: Point3) -> Result<Shape>;

    /// Build a B-spline edge from poles, weights and a compressed knot vector
    fn bspline_edge(
        &mut self,
        poles: &[Point3],
        weights: &[f64],
        knots: &[f64],
        multiplicities: &[u32],
        degree: u32,
    ) -> Result<Shape>;

    /// Connect edges (or wires) into a single wire
    fn wire(&mut self, edges: &[Shape]) -> Result<Shape>;

    /// Build a B-spline face from a pole grid flattened row-major, u fastest
    #[allow(clippy::too_many_arguments)]
    fn bspline_face(
        &mut self,
        poles: &[Point3],
        weights: &[f64],
        num_u: usize,
        num_v: usize,
        u_knots: &[f64],
        u_multiplicities: &[u32],
        v_knots: &[f64],
        v_multiplicities: &[u32],
        u_degree: u32,
        v_degree: u32,
    ) -> Result<Shape>;

    /// Build a cylindrical face from axis origin, direction and radius
    fn cylindrical_face(&mut self, origin: Point3, axis: Dir3, radius: f64) -> Result<Shape>;

    /// Build a conical face; `half_angle` is in radians
    fn conical_face(
        &mut self,
        origin: Point3,
        axis: Dir3,
        radius: f64,
        half_angle: f64,
    ) -> Result<Shape>;

    /// Build a spherical face from center and radius
    fn spherical_face(&mut self, center: Point3, radius: f64) -> Result<Shape>;

    /// Sweep a profile curve along a direction into a face
    fn extruded_face(&mut self, profile: &Shape, direction: Dir3, length: f64) -> Result<Shape>;

    /// Sew faces into a shell
    fn sew(&mut self, faces: &[Shape]) -> Result<Shape>;

    /// Restrict an unbounded face to the region enclosed by a wire
    fn restrict_face(&mut self, face: &Shape, wire: &Shape) -> Result<Shape>;
}
