use argh::FromArgs;
use std::path::PathBuf;

use planemeter::{MeasurementConfig, PixelPoint};

#[derive(FromArgs)]
/// Scale the camera intrinsics and measure the distance between two pixels once
struct Args {
    /// path to a JSON measurement configuration, defaults to the still-image setup
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// first pixel as `u,v`
    #[argh(option, from_str_fn(parse_pixel), default = "PixelPoint::new(974.0, 958.0)")]
    p1: PixelPoint,

    /// second pixel as `u,v`
    #[argh(option, from_str_fn(parse_pixel), default = "PixelPoint::new(1241.0, 959.0)")]
    p2: PixelPoint,
}

fn parse_pixel(s: &str) -> Result<PixelPoint, String> {
    let (u, v) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `u,v`, got `{s}`"))?;
    let u = u.trim().parse::<f64>().map_err(|e| format!("bad u `{u}`: {e}"))?;
    let v = v.trim().parse::<f64>().map_err(|e| format!("bad v `{v}`: {e}"))?;
    Ok(PixelPoint::new(u, v))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => MeasurementConfig::from_file(path)?,
        None => MeasurementConfig::reference_still()?,
    };
    let calibration = config.calibration()?;

    if let (Some(calib), Some(target)) = (config.calibration_resolution, config.target_resolution)
    {
        log::info!("scaling intrinsics from {calib} to {target}");
    }

    println!("Camera matrix at the measured resolution:");
    for row in calibration.intrinsics().to_matrix() {
        println!("  [{:>12.4} {:>12.4} {:>12.4}]", row[0], row[1], row[2]);
    }

    let (p1, p2) = (args.p1, args.p2);
    let measurement = calibration.measure(&p1, &p2)?;
    let result = measurement
        .result
        .with_sign(calibration.delta_sign())
        .rounded();

    println!();
    println!("--- Measurement summary ---");
    println!("Points: P1=({}, {}), P2=({}, {})", p1.u, p1.v, p2.u, p2.v);
    println!("Object distance Z = {:.2}", calibration.object_distance());
    println!(
        "Pixel differences: du = {}, dv = {}",
        p2.u - p1.u,
        p2.v - p1.v
    );
    println!(
        "Plane points: ({:.4}, {:.4}) -> ({:.4}, {:.4})",
        measurement.p1.x, measurement.p1.y, measurement.p2.x, measurement.p2.y
    );
    println!("dX = {:.4}", result.delta_x);
    println!("dY = {:.4}", result.delta_y);
    println!("Distance = {:.4}", result.distance);

    Ok(())
}
