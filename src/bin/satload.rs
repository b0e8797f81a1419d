use clap::{App, Arg};
use colored::*;
use satload::config::{pacing_period, GeneratorConfig, DEFAULT_HOST, PUBLISH_TIMEOUT};
use satload::{HttpPublisher, RunController};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("satload")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("🛰️  Satellite telemetry load generator - synthetic traffic with scheduled anomalies")
        .arg(
            Arg::with_name("host")
                .long("host")
                .value_name("URL")
                .help("Base URL of the ingestion service (events go to <URL>/telemetry)")
                .takes_value(true)
                .default_value(DEFAULT_HOST),
        )
        .arg(
            Arg::with_name("qps")
                .long("qps")
                .value_name("EVENTS")
                .help("Upper bound on events per second")
                .takes_value(true)
                .default_value("20")
                .validator(|v| match v.parse::<f64>() {
                    Ok(qps) if pacing_period(qps).is_ok() => Ok(()),
                    _ => Err("qps must be a positive number with a representable period".into()),
                }),
        )
        .arg(
            Arg::with_name("seconds")
                .long("seconds")
                .value_name("SECONDS")
                .help("Run duration in seconds")
                .takes_value(true)
                .default_value("60")
                .validator(|v| match v.parse::<u64>() {
                    Ok(seconds) if seconds > 0 => Ok(()),
                    _ => Err("seconds must be a positive integer".into()),
                }),
        )
        .arg(
            Arg::with_name("sats")
                .long("sats")
                .value_name("COUNT")
                .help("Number of simulated satellites (SAT-001, SAT-002, ...)")
                .takes_value(true)
                .default_value("5")
                .validator(|v| match v.parse::<u32>() {
                    Ok(sats) if sats > 0 => Ok(()),
                    _ => Err("sats must be a positive integer".into()),
                }),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for reproducible metric values")
                .takes_value(true)
                .validator(|v| match v.parse::<u64>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Seed must be a valid number".into()),
                }),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable debug logging on stderr"),
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    init_tracing(verbose);

    let config = GeneratorConfig {
        host: matches.value_of("host").unwrap_or(DEFAULT_HOST).to_string(),
        qps: matches.value_of("qps").unwrap_or("20").parse()?,
        seconds: matches.value_of("seconds").unwrap_or("60").parse()?,
        sats: matches.value_of("sats").unwrap_or("5").parse()?,
        publish_timeout: PUBLISH_TIMEOUT,
        seed: matches.value_of("seed").map(str::parse::<u64>).transpose()?,
    };
    config.validate()?;

    if verbose {
        eprintln!("{}", "🛰️  satload - Satellite Telemetry Load Generator".bright_blue().bold());
        eprintln!(
            "{} {} at {} eps for {}s across {} satellites",
            "Targeting".dimmed(),
            config.endpoint_url(),
            config.qps,
            config.seconds,
            config.sats
        );
    }

    let publisher = HttpPublisher::new(config.endpoint_url(), config.publish_timeout)?;
    let mut controller = RunController::new(config, publisher)?;
    let summary = controller.run().await?;

    println!("{}", summary);

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
