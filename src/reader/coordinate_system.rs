//! Coordinate system reading
//!
//! Reads the vessel's frame tables: for each axis, every `RefPlane` child
//! becomes an axis-aligned plane face at its dimensioned offset, registered
//! in the GUID registry so grids can be referenced by panels later. A
//! missing axis subtree skips that axis only.

use crate::dom::Element;
use crate::geometry::{Color, Dir3, GeometryKernel, Point3, ShapeNode};
use log::warn;

use super::context::Context;
use super::try_request;

const REF_PLANE_COLOR: Color = Color::new(160, 160, 160);

/// Read `CoordinateSystem/FrameTables` into registered reference planes
pub(crate) fn read(vessel: &Element, ctx: &mut Context, kernel: &mut dyn GeometryKernel) {
    let Some(coordinate_system) = vessel.first_child("CoordinateSystem") else {
        warn!("Vessel has no CoordinateSystem, skipping reference planes");
        return;
    };
    let Some(frame_tables) = coordinate_system.first_child("FrameTables") else {
        warn!("CoordinateSystem has no FrameTables, skipping reference planes");
        return;
    };

    let mut group = ShapeNode::new("Coordinate system").with_color(REF_PLANE_COLOR);
    for (subtree, normal) in [
        ("XRefPlanes", Dir3::x_axis()),
        ("YRefPlanes", Dir3::y_axis()),
        ("ZRefPlanes", Dir3::z_axis()),
    ] {
        let Some(planes) = frame_tables.first_child(subtree) else {
            warn!("FrameTables has no {}, skipping that axis", subtree);
            continue;
        };
        read_axis(planes, normal, ctx, kernel, &mut group);
    }

    if !group.children.is_empty() {
        ctx.output.push(group);
    }
}

fn read_axis(
    planes: &Element,
    normal: Dir3,
    ctx: &mut Context,
    kernel: &mut dyn GeometryKernel,
    group: &mut ShapeNode,
) {
    for ref_plane in planes.child_elements() {
        if ref_plane.local_name() != "RefPlane" {
            continue;
        }
        let Some(guid) = ref_plane.attr("GUIDRef") else {
            warn!("RefPlane without GUIDRef, skipped");
            continue;
        };
        let Some(location_el) = ref_plane.first_child("ReferenceLocation") else {
            warn!("RefPlane '{}' without ReferenceLocation, skipped", guid);
            continue;
        };
        let offset = ctx.units.read_dimension(location_el);
        let origin = Point3::new(normal.x * offset, normal.y * offset, normal.z * offset);

        let Some(face) = try_request("plane face", kernel.plane_face(origin, normal)) else {
            continue;
        };
        ctx.register_surface(face.clone(), guid);

        let name = ref_plane.attr("name").unwrap_or(guid);
        group.push(ShapeNode::leaf(name, face));
    }
}
