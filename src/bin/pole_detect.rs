use clearance_detector::cloud::io::{ensure_parent_dir, load_cloud, save_cloud};
use clearance_detector::cloud::{SceneCloud, ScenePoint, DEFAULT_GRAY};
use clearance_detector::config::load_config;
use clearance_detector::error::Error;
use clearance_detector::stages::{
    cluster_features, detect_pole_clusters, write_features_csv, ClusterParams,
};
use std::env;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "pole_detect".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| Error::InvalidArguments(format!("Usage: {program} <config.json>")))?;
    if args.next().is_some() {
        return Err(Error::InvalidArguments(format!(
            "Usage: {program} <config.json>"
        )));
    }
    let config = load_config(config_path.as_ref())?;

    let cloud = load_cloud(&config.input_cloud)?;
    let clusters = detect_pole_clusters(&cloud, config.label_mt, &ClusterParams::default());
    let features = cluster_features(&clusters);

    // one cloud per candidate for the external pole classifier
    std::fs::create_dir_all(&config.models_dir)
        .map_err(|e| Error::Write {
            path: config.models_dir.clone(),
            source: e,
        })?;
    for (i, cluster) in clusters.iter().enumerate() {
        let points: Vec<ScenePoint> = cluster
            .points
            .iter()
            .map(|&position| ScenePoint {
                position,
                color: DEFAULT_GRAY,
                class: config.label_mt,
            })
            .collect();
        let path = config.models_dir.join(format!("pole_{:02}.las", i + 1));
        save_cloud(&path, &SceneCloud::new(points))?;
    }

    let features_path = config.detected_poles_path();
    ensure_parent_dir(&features_path)?;
    write_features_csv(&features_path, &features)?;

    println!("Detection summary");
    println!("  cloud points         : {}", cloud.len());
    println!("  pole candidates      : {}", clusters.len());
    for f in &features {
        println!(
            "    {}: center=({:.1}, {:.1}) height={:.1} m points={}",
            f.pole_id, f.center_x, f.center_y, f.height_m, f.point_count
        );
    }
    println!("Features written to {}", features_path.display());
    println!("Candidate clouds in {}", config.models_dir.display());
    Ok(())
}
