//! Per-session translation state
//!
//! One [`Context`] exists per translation session. It is created when the
//! document passes the root checks, mutated in place by the readers while
//! `transfer` runs, and dropped with the session. There is exactly one
//! logical owner at any time; sub-readers receive it by mutable reference.

use crate::geometry::{Shape, ShapeKind, ShapeNode};
use crate::units::UnitTable;
use log::warn;
use std::collections::HashMap;

/// Document-wide state shared by all readers of one session
#[derive(Debug)]
pub struct Context {
    /// Namespace prefix the document binds to the OCX schema
    pub prefix: String,
    /// Unit identifier table for dimensioned values
    pub units: UnitTable,
    /// Root of the in-progress output shape tree
    pub output: ShapeNode,
    registry: HashMap<String, Shape>,
}

impl Context {
    /// Create the context for a freshly parsed document
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            units: UnitTable::new(),
            output: ShapeNode::new("OCX"),
            registry: HashMap::new(),
        }
    }

    /// Register a surface shape under a GUID
    ///
    /// Only faces and shells qualify as referenceable surfaces; any other
    /// kind is rejected with a diagnostic and the registry is left
    /// unchanged. Overwriting an existing GUID is allowed but logged, since
    /// duplicate GUIDs usually indicate a malformed document.
    pub fn register_surface(&mut self, shape: Shape, guid: &str) {
        match shape.kind() {
            ShapeKind::Face | ShapeKind::Shell => {
                if let Some(previous) = self.registry.insert(guid.to_string(), shape) {
                    warn!(
                        "GUID '{}' registered twice, replacing earlier {}",
                        guid,
                        previous.kind()
                    );
                }
            }
            other => {
                warn!(
                    "Refusing to register {} under GUID '{}': only faces and shells are referenceable",
                    other, guid
                );
            }
        }
    }

    /// Look up a previously registered surface by GUID
    ///
    /// A miss is diagnosed and returns `None`; callers must check before
    /// using the result.
    pub fn lookup_surface(&self, guid: &str) -> Option<&Shape> {
        let found = self.registry.get(guid);
        if found.is_none() {
            warn!("No surface registered under GUID '{}'", guid);
        }
        found
    }

    /// Number of registered surfaces
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut ctx = Context::new("ocx");
        let face = Shape::new(1, ShapeKind::Face);
        ctx.register_surface(face.clone(), "G1");
        assert_eq!(ctx.lookup_surface("G1"), Some(&face));
    }

    #[test]
    fn test_register_rejects_non_surface_kinds() {
        let mut ctx = Context::new("ocx");
        ctx.register_surface(Shape::new(1, ShapeKind::Wire), "G1");
        assert_eq!(ctx.registered_count(), 0);
        assert!(ctx.lookup_surface("G1").is_none());
    }

    #[test]
    fn test_register_overwrite_is_allowed() {
        let mut ctx = Context::new("ocx");
        ctx.register_surface(Shape::new(1, ShapeKind::Face), "G1");
        let shell = Shape::new(2, ShapeKind::Shell);
        ctx.register_surface(shell.clone(), "G1");
        assert_eq!(ctx.lookup_surface("G1"), Some(&shell));
        assert_eq!(ctx.registered_count(), 1);
    }
}
