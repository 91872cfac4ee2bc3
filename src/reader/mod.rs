//! Document readers and the translation orchestrator
//!
//! [`OcxReader`] drives a two-phase protocol. `read_file`/`read_str`
//! parses the document and performs the only fatal validation this crate
//! does: the root element must be `ocxXML` with a consistent namespace
//! prefix and the exact supported `schemaVersion`. `transfer` then runs
//! the stage readers in a fixed dependency order. The order matters:
//! reference surfaces must be registered before panels try to resolve
//! `GridRef`/`SurfaceRef` GUIDs against them.

mod context;
mod coordinate_system;
mod curve;
mod panel;
mod reference_surfaces;
mod surface;

pub use context::Context;

use crate::dom::{Document, Element};
use crate::error::{Error, Result};
use crate::geometry::{Dir3, GeometryKernel, Shape, ShapeNode};
use crate::model::TranslatorConfig;
use crate::units::parse_numeric;
use log::{debug, warn};
use std::path::Path;

/// The exact `schemaVersion` literal this reader accepts
pub const SUPPORTED_SCHEMA_VERSION: &str = "2.8.5";

/// Lifecycle of a translation session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationState {
    /// No document has been read yet
    Unread,
    /// The document passed the root checks; ready to transfer
    Parsed,
    /// The shape tree has been assembled
    Transferred,
    /// A fatal condition occurred; the session is unusable
    Failed,
}

/// Translates one OCX document into a shape tree via a geometry kernel
pub struct OcxReader<K: GeometryKernel> {
    kernel: K,
    config: TranslatorConfig,
    state: TranslationState,
    document: Option<Document>,
    context: Option<Context>,
}

impl<K: GeometryKernel> OcxReader<K> {
    /// Create a reader with the default configuration
    pub fn new(kernel: K) -> Self {
        Self::with_config(kernel, TranslatorConfig::new())
    }

    /// Create a reader with an explicit configuration
    pub fn with_config(kernel: K, config: TranslatorConfig) -> Self {
        Self {
            kernel,
            config,
            state: TranslationState::Unread,
            document: None,
            context: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TranslationState {
        self.state
    }

    /// Borrow the geometry kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The assembled output tree, available once `transfer` has run
    pub fn output(&self) -> Option<&ShapeNode> {
        self.context.as_ref().map(|ctx| &ctx.output)
    }

    /// Consume the reader, yielding the output tree if one was assembled
    pub fn into_output(self) -> Option<ShapeNode> {
        self.context.map(|ctx| ctx.output)
    }

    /// Read and validate an OCX document from a file
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let xml = match std::fs::read_to_string(path) {
            Ok(xml) => xml,
            Err(e) => {
                self.state = TranslationState::Failed;
                return Err(e.into());
            }
        };
        self.read_str(&xml)
    }

    /// Read and validate an OCX document from a string
    ///
    /// On any failure the session moves to `Failed`, no context is
    /// constructed and no partial state is retained.
    pub fn read_str(&mut self, xml: &str) -> Result<()> {
        match self.parse_and_validate(xml) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state = TranslationState::Failed;
                self.document = None;
                self.context = None;
                Err(e)
            }
        }
    }

    fn parse_and_validate(&mut self, xml: &str) -> Result<()> {
        let document = Document::parse(xml)?;
        let root = &document.root;

        if root.local_name() != "ocxXML" {
            return Err(Error::schema_mismatch(
                &root.name,
                "root element is not ocxXML",
            ));
        }

        let prefix = match root.prefix() {
            Some(prefix) => {
                // The prefix the root uses must actually be bound on it.
                let declaration = format!("xmlns:{}", prefix);
                if root.attr_exact(&declaration).is_none() {
                    return Err(Error::schema_mismatch(
                        &root.name,
                        &format!("namespace prefix '{}' is not declared", prefix),
                    ));
                }
                prefix.to_string()
            }
            None => String::new(),
        };

        match root.attr("schemaVersion") {
            Some(version) if version == SUPPORTED_SCHEMA_VERSION => {}
            Some(version) => {
                return Err(Error::schema_mismatch(
                    &root.name,
                    &format!(
                        "schemaVersion '{}' is not the supported '{}'",
                        version, SUPPORTED_SCHEMA_VERSION
                    ),
                ));
            }
            None => {
                return Err(Error::schema_mismatch(
                    &root.name,
                    "missing schemaVersion attribute",
                ));
            }
        }

        debug!("Document accepted with namespace prefix '{}'", prefix);
        self.context = Some(Context::new(prefix));
        self.document = Some(document);
        self.state = TranslationState::Parsed;
        Ok(())
    }

    /// Run the stage readers and assemble the output shape tree
    ///
    /// Requires a prior successful `read_str`/`read_file`. Stage order is
    /// fixed: units, coordinate system, reference surfaces, panels.
    /// Missing optional subtrees degrade to logged warnings; reaching the
    /// end of the panel stage completes the session.
    pub fn transfer(&mut self) -> Result<&ShapeNode> {
        if self.state != TranslationState::Parsed {
            self.state = TranslationState::Failed;
            return Err(Error::Precondition(
                "transfer requires a successfully read document".to_string(),
            ));
        }

        let document = self
            .document
            .as_ref()
            .ok_or_else(|| Error::Precondition("no document retained".to_string()))?;
        let context = self
            .context
            .as_mut()
            .ok_or_else(|| Error::Precondition("no context constructed".to_string()))?;

        context.units.prepare(&document.root);

        match document.root.first_child("Vessel") {
            Some(vessel) => {
                coordinate_system::read(vessel, context, &mut self.kernel);
                reference_surfaces::read(vessel, context, &mut self.kernel);
                panel::read(vessel, context, &mut self.kernel, &self.config);
            }
            None => {
                warn!("Document has no Vessel, nothing to translate");
            }
        }

        self.state = TranslationState::Transferred;
        match &self.context {
            Some(ctx) => Ok(&ctx.output),
            None => Err(Error::Precondition("no context constructed".to_string())),
        }
    }
}

/// Translate an OCX document string in one call
///
/// Convenience front door over [`OcxReader`]: read, transfer, hand back
/// the assembled tree.
pub fn translate_str<K: GeometryKernel>(
    xml: &str,
    kernel: K,
    config: TranslatorConfig,
) -> Result<ShapeNode> {
    let mut reader = OcxReader::with_config(kernel, config);
    reader.read_str(xml)?;
    reader.transfer()?;
    reader
        .into_output()
        .ok_or_else(|| Error::Precondition("transfer produced no output tree".to_string()))
}

/// Log and absorb a kernel rejection, turning the request into `None`
pub(crate) fn try_request(label: &str, result: Result<Shape>) -> Option<Shape> {
    match result {
        Ok(shape) => Some(shape),
        Err(e) => {
            warn!("Geometry kernel rejected {} request: {}", label, e);
            None
        }
    }
}

/// Read a direction vector from plain `x`/`y`/`z` attributes
///
/// Components are dimensionless; a missing or unparseable component
/// resolves to 0.0 through the numeric fallback chain.
pub(crate) fn read_dir3(element: &Element) -> Dir3 {
    let component = |name: &str| -> f64 {
        element
            .attr(name)
            .and_then(|text| parse_numeric(text, name))
            .unwrap_or(0.0)
    };
    Dir3::new(component("x"), component("y"), component("z"))
}

/// Read a declared count attribute, warning on absence or garbage
pub(crate) fn attr_usize(element: &Element, name: &str) -> Option<usize> {
    let Some(text) = element.attr(name) else {
        warn!(
            "Element '{}' is missing its {} attribute",
            element.local_name(),
            name
        );
        return None;
    };
    match text.parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                "Element '{}' attribute {}='{}' is not a count",
                element.local_name(),
                name,
                text
            );
            None
        }
    }
}
