use anyhow::{Context, Result};
use clap::Parser;
use diskled::collectors::{diskstats, leds};
use diskled::config::{Config, MonitorConfig};
use diskled::led::SysfsLed;
use diskled::monitor::{self, Monitor};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "diskled",
    about = "Blink an LED whenever a disk shows activity in /proc/diskstats",
    version,
    after_help = "Examples:\n  diskled -d sda -l led0\n  diskled -d nvme0n1 -l input0::capslock -v\n\n\
                  Browse /sys/class/leds (or run --list) for LEDs you can control.\n\
                  Changing LED state usually requires elevated privileges."
)]
struct Cli {
    /// Disk to monitor (e.g. sda, nvme0n1)
    #[arg(short, long, required_unless_present_any = ["list", "print_config"])]
    disk: Option<String>,

    /// LED to control (e.g. led0, input0::capslock)
    #[arg(short, long, required_unless_present_any = ["list", "print_config"])]
    led: Option<String>,

    /// Enable verbose/debug output
    #[arg(short, long)]
    verbose: bool,

    /// Config file (default: ~/.config/diskled/diskled.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Statistics source to poll
    #[arg(long, value_name = "PATH")]
    diskstats: Option<PathBuf>,

    /// Directory holding LED class devices
    #[arg(long, value_name = "DIR")]
    leds_dir: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// How long the LED stays lit per activity, in milliseconds
    #[arg(short, long, value_name = "MS")]
    pulse: Option<u64>,

    /// Print the run summary as JSON on exit
    #[arg(long)]
    json: bool,

    /// List disks and LEDs, then exit
    #[arg(long)]
    list: bool,

    /// Print config file path and effective values, then exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Registered before anything slow so an early Ctrl+C still exits cleanly.
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, shutdown.clone())
        .context("registering SIGINT handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, shutdown.clone())
        .context("registering SIGTERM handler")?;

    init_logging(cli.verbose);

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            std::process::exit(1);
        }
    };

    if cli.print_config {
        return run_print_config(&cli, &cfg);
    }
    if cli.list {
        return run_list(&cfg);
    }

    let disk = cli.disk.as_deref().context("--disk is required")?;
    let led = cli.led.as_deref().context("--led is required")?;
    let mc = cfg.monitor_config(disk, led, cli.verbose);
    run_monitor(mc, cli.json, &shutdown)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "diskled=debug" } else { "diskled=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .init();
}

/// File config with command-line overrides applied on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(p) = &cli.diskstats { cfg.paths.diskstats = p.clone(); }
    if let Some(d) = &cli.leds_dir  { cfg.paths.leds_dir = d.clone(); }
    if let Some(ms) = cli.interval  { cfg.general.poll_interval_ms = ms; }
    if let Some(ms) = cli.pulse     { cfg.general.pulse_ms = ms; }
    cfg.validate()?;
    Ok(cfg)
}

fn run_monitor(mc: MonitorConfig, json: bool, shutdown: &AtomicBool) -> Result<()> {
    info!("Disk LED Monitor starting");
    info!("Monitoring disk: {}", mc.disk);
    info!("Controlling LED: {}", mc.led);

    if let Err(e) = monitor::preflight(&mc) {
        eprintln!("ERROR: {}", e);
        eprintln!();
        eprintln!("Browse {} for available LEDs, or run `diskled --list`.", mc.leds_dir.display());
        eprintln!("Note that this program must be run with elevated privileges to change LED state!");
        std::process::exit(1);
    }

    if !nix::unistd::Uid::effective().is_root() {
        warn!("not running as root; LED writes may be refused");
    }

    info!(
        "Starting disk activity monitoring (interval {}ms, pulse {}ms), press Ctrl+C to stop",
        mc.poll_interval.as_millis(),
        mc.pulse_width.as_millis()
    );

    let verbose = mc.verbose;
    let led = SysfsLed::new(&mc.leds_dir, &mc.led);
    let mut mon = Monitor::new(mc, led);
    let summary = mon.run(shutdown);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if verbose {
        println!("{}", summary);
    }
    Ok(())
}

fn run_list(cfg: &Config) -> Result<()> {
    let source = &cfg.paths.diskstats;
    let devices = diskstats::list_devices(source)?;
    println!("Disks in {}:", source.display());
    if devices.is_empty() {
        println!("  (none)");
    }
    for dev in &devices {
        if dev.partition {
            println!("  {:<16} (partition)", dev.name);
        } else {
            println!(
                "  {:<16} reads {:<10} writes {:<10} in-flight {}",
                dev.name, dev.stat.reads_completed, dev.stat.writes_completed, dev.stat.ios_in_progress
            );
        }
    }

    println!();
    let led_list = leds::list_leds(&cfg.paths.leds_dir);
    println!("LEDs in {}:", cfg.paths.leds_dir.display());
    if led_list.is_empty() {
        println!("  (none)");
    }
    for led in &led_list {
        let level = match (led.brightness, led.max_brightness) {
            (Some(b), Some(m)) => format!("{}/{}", b, m),
            (Some(b), None)    => b.to_string(),
            _                  => "?".to_string(),
        };
        let trigger = led.trigger.as_deref().unwrap_or("none");
        println!("  {:<24} brightness {:<8} trigger {}", led.name, level, trigger);
    }
    Ok(())
}

fn run_print_config(cli: &Cli, cfg: &Config) -> Result<()> {
    let path = cli.config.clone()
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("# Config: {}", path);
    println!();
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
