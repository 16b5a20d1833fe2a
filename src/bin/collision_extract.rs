use clearance_detector::cloud::io::{load_cloud, read_json_file};
use clearance_detector::config::load_config;
use clearance_detector::error::Error;
use clearance_detector::poles::PoleTable;
use clearance_detector::stages::export_collision_extracts;
use clearance_detector::CollisionReport;
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
    let program = args.next().unwrap_or_else(|| "collision_extract".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| Error::InvalidArguments(format!("Usage: {program} <config.json>")))?;
    if args.next().is_some() {
        return Err(Error::InvalidArguments(format!(
            "Usage: {program} <config.json>"
        )));
    }
    let config = load_config(config_path.as_ref())?;

    let poles = PoleTable::from_csv(&config.poles_csv)?;
    let report_path = config.report_path();
    let report: CollisionReport = read_json_file(&report_path)?;
    // extracts keep the raw corridor cloud, no class filtering
    let cloud = load_cloud(&config.input_cloud)?;

    // tubes must match the ones the report was scanned with
    let mut params = config.extract_params();
    params.tube_radius = report.tube_radius;

    let written =
        export_collision_extracts(&report, &poles, &cloud, &params, &config.collisions_dir)?;

    println!("Extract summary");
    println!("  report               : {}", report_path.display());
    println!("  collisions           : {}", report.collisions.len());
    println!("  extracts written     : {}", written.len());
    for path in &written {
        println!("    {}", path.display());
    }
    Ok(())
}
