//! # ocx-reader
//!
//! Translates OCX ship-hull XML documents into an in-memory engineering
//! model and drives a geometry kernel to materialize CAD shapes for
//! export.
//!
//! The crate is the ingestion front end of a CAD interoperability
//! pipeline: it resolves namespaces and units, decodes NURBS knot vectors
//! and control points, registers reference surfaces by GUID, and walks
//! panels and plates into a named, colored shape tree. The geometry
//! kernel itself is an external collaborator behind the
//! [`GeometryKernel`] trait; the crate only assembles requests and holds
//! the opaque shapes it returns.
//!
//! Translation is deliberately forgiving: apart from the root-tag and
//! schema-version checks, every problem in the document is logged and the
//! affected element skipped, so a semi-conformant document still yields
//! the most complete shape tree possible.
//!
//! ## Example
//!
//! ```no_run
//! use ocx_reader::{OcxReader, TranslatorConfig};
//! # use ocx_reader::GeometryKernel;
//! # fn run(kernel: impl GeometryKernel) -> ocx_reader::Result<()> {
//! let mut reader = OcxReader::with_config(kernel, TranslatorConfig::new());
//! reader.read_file("hull.3docx")?;
//! let tree = reader.transfer()?;
//! println!("Translated {} shapes", tree.shape_count());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dom;
pub mod error;
pub mod geometry;
pub mod model;
pub mod nurbs;
pub mod reader;
pub mod units;

pub use error::{Error, Result};
pub use geometry::{Color, Dir3, GeometryKernel, Point3, Shape, ShapeKind, ShapeNode};
pub use model::{EntityInfo, Panel, Plate, TranslatorConfig};
pub use nurbs::{ControlPointGrid, ControlPoints, KnotVector, KNOT_MERGE_TOLERANCE};
pub use reader::{
    Context, OcxReader, TranslationState, SUPPORTED_SCHEMA_VERSION, translate_str,
};
pub use units::UnitTable;
