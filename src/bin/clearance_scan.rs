use clearance_detector::cloud::io::{load_cloud, write_json_file};
use clearance_detector::config::load_config;
use clearance_detector::error::Error;
use clearance_detector::fusion::load_connections;
use clearance_detector::poles::PoleTable;
use clearance_detector::CollisionScanner;
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json> [--radius <metres>]")
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .map(String::as_str)
        .unwrap_or("clearance_scan");

    let mut config_path: Option<PathBuf> = None;
    let mut radius_override: Option<f64> = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--radius" => {
                let value = iter
                    .next()
                    .ok_or_else(|| Error::InvalidArguments(usage(program)))?;
                let parsed = value.parse::<f64>().map_err(|_| {
                    Error::InvalidArguments(format!("invalid --radius value {value:?}"))
                })?;
                if parsed.is_nan() || parsed <= 0.0 {
                    return Err(Error::InvalidArguments(format!(
                        "--radius must be positive, got {parsed}"
                    )));
                }
                radius_override = Some(parsed);
            }
            "--help" | "-h" => {
                println!("{}", usage(program));
                return Ok(());
            }
            other if config_path.is_none() => config_path = Some(PathBuf::from(other)),
            other => {
                return Err(Error::InvalidArguments(format!(
                    "unexpected argument {other:?}\n{}",
                    usage(program)
                )))
            }
        }
    }
    let config_path = config_path.ok_or_else(|| Error::InvalidArguments(usage(program)))?;
    let config = load_config(&config_path)?;

    let poles = PoleTable::from_csv(&config.poles_csv)?;
    let edges = load_connections(&config.connections, &poles)?;
    let cloud = load_cloud(&config.input_cloud)?;
    let environment = cloud.without_classes(&config.scan_exclusions());

    let mut params = config.scan_params();
    if let Some(radius) = radius_override {
        params.tube_radius = radius;
    }

    let scanner = CollisionScanner::new(params);
    let outcome = scanner.scan(&poles, &edges, &environment)?;

    let report_path = config.report_path();
    write_json_file(&report_path, &outcome.report)?;

    println!("Scan summary");
    println!("  poles                : {}", poles.len());
    println!("  spans                : {}", edges.len());
    println!("  environment points   : {}", environment.len());
    println!("  tube radius          : {:.2} m", params.tube_radius);
    println!("  colliding spans      : {}", outcome.report.collisions.len());
    for record in &outcome.report.collisions {
        let classes: Vec<String> = record
            .per_class
            .iter()
            .map(|c| format!("{} x{}", c.class_name, c.point_count))
            .collect();
        println!(
            "    #{} {} -> {}: {}",
            record.collision_id,
            record.from_pole,
            record.to_pole,
            classes.join(", ")
        );
    }
    println!("Report written to {}", report_path.display());
    Ok(())
}
