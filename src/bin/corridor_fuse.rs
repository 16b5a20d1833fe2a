use clearance_detector::config::load_config;
use clearance_detector::error::Error;
use clearance_detector::fusion::save_connections;
use clearance_detector::poles::PoleTable;
use clearance_detector::stages::fuse_corridor;
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
    let program = args.next().unwrap_or_else(|| "corridor_fuse".to_string());
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
    let edges = fuse_corridor(&poles);
    save_connections(&config.connections, &edges)?;

    let total: f64 = edges.iter().filter_map(|e| e.distance).sum();
    println!("Fusion summary");
    println!("  poles                : {}", poles.len());
    println!("  spans                : {}", edges.len());
    println!("  corridor length      : {total:.1} m");
    for edge in &edges {
        println!(
            "    {} -> {} ({:.1} m)",
            edge.from_id,
            edge.to_id,
            edge.distance.unwrap_or(0.0)
        );
    }
    println!("Connections written to {}", config.connections.display());
    Ok(())
}
