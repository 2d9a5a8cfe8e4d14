use std::io::BufRead;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use wifi_trilateration::{
    api::PositionEstimate,
    core::{CalibrationSample, SignalReading},
    Calibrator, CommandSignalSource, ConfigurationManager, OutputFormat, PositioningConfig,
    PositioningPipeline, RssiSampler, ScanOutputParser,
};

const PROGRAM: &str = "wifi-trilateration";

fn usage(program: &str) {
    eprintln!("Usage: {} locate <config.json> <readings.json|scan.txt> [--json]", program);
    eprintln!("   or: {} scan <config.json> [--json]", program);
    eprintln!("   or: {} calibrate <samples.json> [--save <config.json>] [--json]", program);
    eprintln!("   or: {} survey <config.json> [--save] [--json]", program);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Readings from a JSON list or from a saved scan report
fn load_readings(path: &str) -> Result<Vec<SignalReading>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let readings: Vec<SignalReading> = if is_json {
        serde_json::from_str(&content)?
    } else {
        ScanOutputParser::new().parse(&content)?
    };
    tracing::info!(path, count = readings.len(), "readings loaded");
    Ok(readings)
}

fn locate(
    config: &PositioningConfig,
    readings: &[SignalReading],
) -> Result<PositionEstimate, Box<dyn std::error::Error>> {
    let ordered = config.order_readings(readings)?;
    let anchors = config.anchor_points();

    let estimate = if anchors.len() == 3 {
        PositioningPipeline::estimate_with_details(&ordered, &anchors, &config.path_loss)?
    } else {
        PositioningPipeline::estimate_position_least_squares(&ordered, &anchors, &config.path_loss)?
    };
    tracing::info!(
        position = %estimate.position,
        residual = estimate.residual,
        "position estimated"
    );
    Ok(estimate)
}

fn wait_for_operator(distance: f64) {
    eprintln!("Place the device {:.2} m from the access point and press Enter", distance);
    let mut line = String::new();
    if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
        tracing::warn!(error = %e, "could not read from stdin, continuing");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut args: Vec<String> = std::env::args().collect();
    let program = if args.is_empty() {
        PROGRAM.to_string()
    } else {
        args.remove(0)
    };

    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");
    let format = if json { OutputFormat::Json } else { OutputFormat::Text };
    let formatter = format.formatter();

    let command = match args.first() {
        Some(command) => command.as_str(),
        None => {
            usage(&program);
            return Err("Missing command".into());
        }
    };

    match (command, &args[1..]) {
        ("locate", [config_path, readings_path]) => {
            let manager = ConfigurationManager::from_file(config_path)?;
            let readings = load_readings(readings_path)?;
            let estimate = locate(manager.config(), &readings)?;
            println!("{}", formatter.format_position(&estimate)?);
        }
        ("scan", [config_path]) => {
            let manager = ConfigurationManager::from_file(config_path)?;
            let config = manager.config();
            let source = CommandSignalSource::new(config.scanner.clone());
            let mut sampler = RssiSampler::new(source, config.sampling.clone());

            let readings = sampler.averaged_scan()?;
            if !json {
                println!("{}", formatter.format_readings(&readings)?);
            }
            let estimate = locate(config, &readings)?;
            println!("{}", formatter.format_position(&estimate)?);
        }
        ("calibrate", rest) => {
            let (samples_path, save_path) = match rest {
                [samples] => (samples, None),
                [samples, flag, config] if flag == "--save" => (samples, Some(config)),
                _ => {
                    usage(&program);
                    return Err("Invalid arguments".into());
                }
            };

            let samples: Vec<CalibrationSample> =
                serde_json::from_str(&std::fs::read_to_string(samples_path)?)?;
            tracing::info!(
                path = %samples_path,
                count = samples.len(),
                "calibration samples loaded"
            );

            let mut manager = match save_path {
                Some(path) => Some(ConfigurationManager::from_file(path)?),
                None => None,
            };
            let calibrator = match &manager {
                Some(m) => {
                    Calibrator::with_reference_distance(m.config().path_loss.reference_distance)?
                }
                None => Calibrator::new(),
            };

            let report = calibrator.fit_with_report(&samples)?;
            println!("{}", formatter.format_calibration(&report)?);

            if let Some(manager) = manager.as_mut() {
                manager.set_path_loss(report.parameters)?;
                manager.save()?;
            }
        }
        ("survey", rest) => {
            let (config_path, save) = match rest {
                [config] => (config, false),
                [config, flag] if flag == "--save" => (config, true),
                _ => {
                    usage(&program);
                    return Err("Invalid arguments".into());
                }
            };

            let mut manager = ConfigurationManager::from_file(config_path)?;
            let config = manager.config().clone();
            let identifier = config
                .sampling
                .identifier
                .clone()
                .ok_or("sampling.identifier must name the access point to survey")?;

            let source = CommandSignalSource::new(config.scanner.clone());
            let mut sampler = RssiSampler::new(source, config.sampling.clone());
            let samples = sampler.collect_samples(
                &config.calibration.distances,
                &identifier,
                wait_for_operator,
            )?;

            let calibrator =
                Calibrator::with_reference_distance(config.path_loss.reference_distance)?;
            let report = calibrator.fit_with_report(&samples)?;
            println!("{}", formatter.format_calibration(&report)?);

            if save {
                manager.set_path_loss(report.parameters)?;
                manager.save()?;
            }
        }
        _ => {
            usage(&program);
            return Err("Invalid arguments".into());
        }
    }

    Ok(())
}
