//! Reference surface reading
//!
//! Walks the vessel's `ReferenceSurfaces` subtree, delegates geometric
//! construction per child to the surface reader, and registers every
//! successfully built shape under its GUID. This stage must run before the
//! panel reader: panels resolve `GridRef`/`SurfaceRef` GUIDs against the
//! registry this stage populates.

use crate::dom::Element;
use crate::geometry::{Color, GeometryKernel, ShapeNode};
use log::warn;

use super::context::Context;
use super::surface::read_surface;

const REFERENCE_SURFACE_COLOR: Color = Color::new(80, 140, 200);

/// Read `Vessel/ReferenceSurfaces` into the GUID registry
pub(crate) fn read(vessel: &Element, ctx: &mut Context, kernel: &mut dyn GeometryKernel) {
    let Some(reference_surfaces) = vessel.first_child("ReferenceSurfaces") else {
        warn!("Vessel has no ReferenceSurfaces, skipping that stage");
        return;
    };

    let mut group = ShapeNode::new("Reference surfaces").with_color(REFERENCE_SURFACE_COLOR);
    for surface_el in reference_surfaces.child_elements() {
        let Some(shape) = read_surface(surface_el, ctx, kernel) else {
            continue;
        };
        match surface_el.attr("GUIDRef") {
            Some(guid) => ctx.register_surface(shape.clone(), guid),
            None => warn!(
                "Reference surface '{}' has no GUIDRef and cannot be referenced",
                surface_el.local_name()
            ),
        }
        let name = surface_el
            .attr("name")
            .unwrap_or_else(|| surface_el.local_name());
        group.push(ShapeNode::leaf(name, shape));
    }

    if !group.children.is_empty() {
        ctx.output.push(group);
    }
}
