//! Panel and plate reading
//!
//! Per panel: outer contour, underlying surface (inline or resolved by
//! GUID through the registry), an optional contour-bounded surface, and
//! the composed plates. Every stage is independently fault-tolerant; a
//! failed stage is logged and its geometry is simply absent from the
//! panel's group while sibling panels, plates and stages continue.

use crate::dom::Element;
use crate::geometry::{Color, GeometryKernel, Shape, ShapeNode};
use crate::model::{Panel, Plate, TranslatorConfig};
use log::warn;

use super::context::Context;
use super::curve::read_contour;
use super::surface::read_surface;
use super::try_request;

const PANEL_COLOR: Color = Color::new(200, 120, 60);

/// Read all `Panel` children of the vessel into one top-level group
pub(crate) fn read(
    vessel: &Element,
    ctx: &mut Context,
    kernel: &mut dyn GeometryKernel,
    config: &TranslatorConfig,
) {
    let mut group = ShapeNode::new("Panels").with_color(PANEL_COLOR);
    for panel_el in vessel.child_elements() {
        if panel_el.local_name() != "Panel" {
            continue;
        }
        group.push(read_panel(panel_el, ctx, kernel, config));
    }

    if group.children.is_empty() {
        warn!("Vessel carries no panels");
        return;
    }
    ctx.output.push(group);
}

fn read_panel(
    panel_el: &Element,
    ctx: &mut Context,
    kernel: &mut dyn GeometryKernel,
    config: &TranslatorConfig,
) -> ShapeNode {
    let panel = Panel::from_element(panel_el);
    let mut node = ShapeNode::new(panel.info.label());
    node.attributes = panel.info.properties.clone();

    let mut contour: Option<Shape> = None;
    if config.read_outer_contours {
        match panel_el.first_child("OuterContour") {
            Some(contour_el) => {
                contour = read_contour(contour_el, ctx, kernel);
            }
            None => {
                warn!("Panel '{}' has no OuterContour", panel.info.label());
            }
        }
    }
    if let Some(wire) = &contour {
        node.push(ShapeNode::leaf("OuterContour", wire.clone()));
    }

    let mut surface: Option<Shape> = None;
    if config.read_panel_surfaces {
        surface = read_panel_surface(panel_el, &panel, ctx, kernel);
    }

    // Restricting can fail on a sloppy contour; the unbounded surface is
    // still worth exporting in that case.
    if config.bound_panel_surface {
        if let (Some(face), Some(wire)) = (&surface, &contour) {
            if let Some(bounded) =
                try_request("restrict face", kernel.restrict_face(face, wire))
            {
                surface = Some(bounded);
            }
        }
    }

    if let Some(face) = &surface {
        node.push(ShapeNode::leaf("PanelSurface", face.clone()));
        // The panel's own surface becomes referenceable by later panels.
        if let Some(guid) = &panel.info.guid {
            ctx.register_surface(face.clone(), guid);
        }
    }

    if config.read_plates {
        if let Some(composed) = panel_el.first_child("ComposedOf") {
            for plate_el in composed.child_elements() {
                if plate_el.local_name() != "Plate" {
                    continue;
                }
                node.push(read_plate(plate_el, surface.as_ref(), ctx, kernel));
            }
        }
    }

    node
}

/// Resolve the panel's underlying surface
///
/// `UnboundedGeometry` holds either a `GridRef`/`SurfaceRef` pointing at a
/// registered GUID or an inline surface definition. A registry miss is a
/// logged failure local to this panel.
fn read_panel_surface(
    panel_el: &Element,
    panel: &Panel,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> Option<Shape> {
    let Some(unbounded) = panel_el.first_child("UnboundedGeometry") else {
        warn!(
            "Panel '{}' has no UnboundedGeometry",
            panel.info.label()
        );
        return None;
    };

    for ref_tag in ["GridRef", "SurfaceRef"] {
        if let Some(reference) = unbounded.first_child(ref_tag) {
            let Some(guid) = reference.attr("GUIDRef") else {
                warn!(
                    "Panel '{}' carries a {} without GUIDRef",
                    panel.info.label(),
                    ref_tag
                );
                return None;
            };
            return ctx.lookup_surface(guid).cloned();
        }
    }

    match unbounded.child_elements().next() {
        Some(surface_el) => read_surface(surface_el, ctx, kernel),
        None => {
            warn!(
                "Panel '{}' UnboundedGeometry is empty",
                panel.info.label()
            );
            None
        }
    }
}

fn read_plate(
    plate_el: &Element,
    panel_surface: Option<&Shape>,
    ctx: &Context,
    kernel: &mut dyn GeometryKernel,
) -> ShapeNode {
    let plate = Plate::from_element(plate_el);
    let mut node = ShapeNode::new(plate.info.label());
    node.attributes = plate.info.properties.clone();

    let contour = match plate_el.first_child("OuterContour") {
        Some(contour_el) => read_contour(contour_el, ctx, kernel),
        None => {
            warn!("Plate '{}' has no OuterContour", plate.info.label());
            None
        }
    };

    if let Some(wire) = &contour {
        node.push(ShapeNode::leaf("OuterContour", wire.clone()));
        if let Some(face) = panel_surface {
            if let Some(restricted) =
                try_request("restrict face", kernel.restrict_face(face, wire))
            {
                node.push(ShapeNode::leaf("PlateSurface", restricted));
            }
        }
    }

    node
}
