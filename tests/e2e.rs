mod common;

use clearance_detector::cloud::SceneCloud;
use clearance_detector::types::PoleId;
use clearance_detector::{CollisionScanner, ScanParams};
use common::synthetic_corridor::{cluster_at_all_levels, two_pole_corridor};

#[test]
fn planted_building_cluster_yields_one_record() {
    let corridor = two_pole_corridor();
    // 25 building points at mid-span of every crossarm level
    let cloud = SceneCloud::new(cluster_at_all_levels(
        25,
        4,
        5.0,
        0.0,
        0.0,
        corridor.uniform_height,
    ));

    let scanner = CollisionScanner::new(ScanParams {
        tube_radius: 1.0,
        min_points_collision: 20,
    });
    let outcome = scanner
        .scan(&corridor.poles, &corridor.edges, &cloud)
        .expect("scan must succeed");

    assert_eq!(
        outcome.report.collisions.len(),
        1,
        "exactly one colliding pair expected"
    );
    assert_eq!(outcome.report.tube_radius, 1.0);

    let record = &outcome.report.collisions[0];
    assert_eq!(record.collision_id, 1);
    assert_eq!(record.from_pole, PoleId(1));
    assert_eq!(record.to_pole, PoleId(2));
    assert_eq!(record.per_class.len(), 1, "only the building class is present");

    let hit = &record.per_class[0];
    assert_eq!(hit.class_id, 4);
    assert_eq!(hit.class_name, "Building");
    assert!(
        hit.point_count >= 75,
        "every level contributes its 25 points, got {}",
        hit.point_count
    );

    assert_eq!(outcome.spans.len(), 1);
    assert_eq!(outcome.spans[0].tubes.len(), 3);
    assert!(outcome.spans[0].colliding, "the span must be flagged");
}

#[test]
fn identical_inputs_produce_identical_reports() {
    let corridor = two_pole_corridor();
    let cloud = SceneCloud::new(cluster_at_all_levels(
        25,
        5,
        5.0,
        0.0,
        0.0,
        corridor.uniform_height,
    ));
    let scanner = CollisionScanner::new(ScanParams {
        tube_radius: 1.0,
        min_points_collision: 20,
    });

    let first = scanner
        .scan(&corridor.poles, &corridor.edges, &cloud)
        .expect("first scan");
    let second = scanner
        .scan(&corridor.poles, &corridor.edges, &cloud)
        .expect("second scan");

    let a = serde_json::to_string(&first.report).expect("serialize first");
    let b = serde_json::to_string(&second.report).expect("serialize second");
    assert_eq!(a, b, "reports must be byte-identical across reruns");
}

#[test]
fn clean_corridor_reports_nothing() {
    let corridor = two_pole_corridor();
    // ground-level points far below the tubes
    let cloud = SceneCloud::new(cluster_at_all_levels(25, 1, 5.0, 0.0, -20.0, 5.0));
    let scanner = CollisionScanner::new(ScanParams {
        tube_radius: 1.0,
        min_points_collision: 20,
    });
    let outcome = scanner
        .scan(&corridor.poles, &corridor.edges, &cloud)
        .expect("scan must succeed");

    assert!(outcome.report.collisions.is_empty());
    assert!(!outcome.spans[0].colliding);
    assert_eq!(
        outcome.spans[0].tubes.len(),
        3,
        "all three levels are attempted even without collisions"
    );
}
