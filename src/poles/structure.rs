//! Idealized pole reconstruction used for extract overlays.

use super::attachments::{
    attachment_z, BIPOLE_SPACING, CROSSARM_COUNT, CROSSARM_LENGTH, CROSSARM_RADIUS, POLE_RADIUS,
    TRANSFORMER_HEIGHT,
};
use super::{Pole, PoleKind};
use crate::geometry::{Cuboid, FacetedCylinder, SurfacePrimitive};
use nalgebra::{Point3, Vector3};

/// Surface primitives of a reconstructed pole under the uniform corridor
/// height. `sides` controls cylinder faceting for sampling.
///
/// A monoposte is one shaft with three crossarms reaching +X. A biposte is
/// two such assemblies split along Y plus the transformer box spanning the
/// gap at mid-height.
pub fn pole_primitives(pole: &Pole, uniform_height: f64, sides: usize) -> Vec<SurfacePrimitive> {
    match pole.kind {
        PoleKind::Monoposte => assembly(
            pole.center_x,
            pole.center_y,
            pole.base_z,
            uniform_height,
            sides,
        ),
        PoleKind::Biposte => {
            let half = BIPOLE_SPACING / 2.0;
            let mut primitives = assembly(
                pole.center_x,
                pole.center_y - half,
                pole.base_z,
                uniform_height,
                sides,
            );
            primitives.extend(assembly(
                pole.center_x,
                pole.center_y + half,
                pole.base_z,
                uniform_height,
                sides,
            ));
            primitives.push(SurfacePrimitive::Cuboid(Cuboid {
                min: Point3::new(
                    pole.center_x - POLE_RADIUS,
                    pole.center_y - (half + POLE_RADIUS),
                    pole.base_z + uniform_height / 2.0,
                ),
                size: Vector3::new(
                    2.0 * POLE_RADIUS,
                    BIPOLE_SPACING + 2.0 * POLE_RADIUS,
                    TRANSFORMER_HEIGHT,
                ),
            }));
            primitives
        }
    }
}

/// Shaft plus crossarms for one upright at `(x, y)`.
fn assembly(x: f64, y: f64, base_z: f64, uniform_height: f64, sides: usize) -> Vec<SurfacePrimitive> {
    let mut primitives = Vec::with_capacity(1 + CROSSARM_COUNT);
    primitives.push(SurfacePrimitive::Cylinder(FacetedCylinder {
        p1: Point3::new(x, y, base_z),
        p2: Point3::new(x, y, base_z + uniform_height),
        radius: POLE_RADIUS,
        sides,
    }));
    for i in 0..CROSSARM_COUNT {
        let z = attachment_z(base_z, uniform_height, i);
        primitives.push(SurfacePrimitive::Cylinder(FacetedCylinder {
            // arm starts at the shaft surface, axis along +X
            p1: Point3::new(x + POLE_RADIUS, y, z),
            p2: Point3::new(x + POLE_RADIUS + CROSSARM_LENGTH, y, z),
            radius: CROSSARM_RADIUS,
            sides,
        }));
    }
    primitives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoleId;

    fn pole(kind: PoleKind) -> Pole {
        Pole {
            id: PoleId(1),
            center_x: 10.0,
            center_y: 20.0,
            base_z: 5.0,
            height_m: Some(8.0),
            kind,
        }
    }

    #[test]
    fn monoposte_has_shaft_and_three_arms() {
        let primitives = pole_primitives(&pole(PoleKind::Monoposte), 8.0, 12);
        assert_eq!(primitives.len(), 4);
        let SurfacePrimitive::Cylinder(shaft) = &primitives[0] else {
            panic!("shaft must be a cylinder");
        };
        assert_eq!(shaft.p1, Point3::new(10.0, 20.0, 5.0));
        assert_eq!(shaft.p2, Point3::new(10.0, 20.0, 13.0));
        assert_eq!(shaft.radius, POLE_RADIUS);

        for (i, primitive) in primitives[1..].iter().enumerate() {
            let SurfacePrimitive::Cylinder(arm) = primitive else {
                panic!("arms must be cylinders");
            };
            let z = attachment_z(5.0, 8.0, i);
            assert_eq!(arm.p1, Point3::new(10.25, 20.0, z));
            assert_eq!(arm.p2, Point3::new(12.25, 20.0, z));
            assert_eq!(arm.radius, CROSSARM_RADIUS);
        }
    }

    #[test]
    fn biposte_doubles_the_assembly_and_adds_the_transformer() {
        let primitives = pole_primitives(&pole(PoleKind::Biposte), 8.0, 12);
        // two shafts, six arms, one box
        assert_eq!(primitives.len(), 9);

        let shaft_ys: Vec<f64> = primitives
            .iter()
            .filter_map(|p| match p {
                SurfacePrimitive::Cylinder(c) if c.radius == POLE_RADIUS => Some(c.p1.y),
                _ => None,
            })
            .collect();
        assert_eq!(shaft_ys, vec![19.25, 20.75]);

        let SurfacePrimitive::Cuboid(transformer) = &primitives[8] else {
            panic!("last primitive must be the transformer box");
        };
        assert_eq!(transformer.min, Point3::new(9.75, 19.0, 9.0));
        assert_eq!(transformer.size, Vector3::new(0.5, 2.0, 2.0));
    }
}
