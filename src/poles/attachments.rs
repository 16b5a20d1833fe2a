//! Attachment-point derivation on the reconstructed crossarms.

use super::Pole;
use crate::types::PoleId;
use nalgebra::Point3;

// Idealized reconstruction geometry, metres.
pub const POLE_RADIUS: f64 = 0.25; // shaft radius
pub const CROSSARM_COUNT: usize = 3; // conductor levels per pole
pub const CROSSARM_LENGTH: f64 = 2.0; // reach beyond the shaft surface
pub const CROSSARM_RADIUS: f64 = 0.06;
pub const CROSSARM_SPACING: f64 = 1.0; // vertical gap between levels
pub const BIPOLE_SPACING: f64 = 1.5; // center distance of a biposte pair
pub const TRANSFORMER_HEIGHT: f64 = 2.0;

/// Conductor attachment on one crossarm level of a pole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachmentPoint {
    pub pole_id: PoleId,
    pub crossarm_index: usize,
    pub position: Point3<f64>,
}

/// Attachment elevation of `crossarm_index` for a pole based at `base_z`
/// under the uniform corridor height. Level 0 sits at the crossarm axis of
/// the topmost arm, each further level one spacing below.
#[inline]
pub fn attachment_z(base_z: f64, uniform_height: f64, crossarm_index: usize) -> f64 {
    base_z + uniform_height - CROSSARM_RADIUS - crossarm_index as f64 * CROSSARM_SPACING
}

/// The three attachment points of a pole, top crossarm first. The count
/// never depends on the pole kind; biposte attachments sit on the pair
/// center axis.
pub fn attachment_points(pole: &Pole, uniform_height: f64) -> [AttachmentPoint; CROSSARM_COUNT] {
    std::array::from_fn(|i| AttachmentPoint {
        pole_id: pole.id,
        crossarm_index: i,
        position: Point3::new(
            pole.center_x,
            pole.center_y,
            attachment_z(pole.base_z, uniform_height, i),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poles::PoleKind;

    fn pole(kind: PoleKind) -> Pole {
        Pole {
            id: PoleId(7),
            center_x: 3.0,
            center_y: -2.0,
            base_z: 100.0,
            height_m: Some(11.0),
            kind,
        }
    }

    #[test]
    fn levels_descend_from_the_top_arm() {
        let points = attachment_points(&pole(PoleKind::Monoposte), 12.0);
        let expected_z = [111.94, 110.94, 109.94];
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.pole_id, PoleId(7));
            assert_eq!(point.crossarm_index, i);
            assert!(
                (point.position.z - expected_z[i]).abs() < 1e-12,
                "level {} expected z {}, got {}",
                i,
                expected_z[i],
                point.position.z
            );
            assert_eq!(point.position.x, 3.0);
            assert_eq!(point.position.y, -2.0);
        }
    }

    #[test]
    fn biposte_attachments_match_monoposte() {
        let mono = attachment_points(&pole(PoleKind::Monoposte), 12.0);
        let bi = attachment_points(&pole(PoleKind::Biposte), 12.0);
        assert_eq!(mono, bi);
    }

    #[test]
    fn uniform_height_overrides_the_measured_one() {
        // measured 11 m, corridor says 9 m
        let points = attachment_points(&pole(PoleKind::Monoposte), 9.0);
        assert!((points[0].position.z - 108.94).abs() < 1e-12);
    }
}
