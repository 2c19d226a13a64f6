use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use s2c_core::environment::{HostSignals, OverriddenSignals, SignalSource, StaticSignals};
use s2c_core::presentation::background;
use s2c_core::presentation::{LoadingStyle, LoadingView};
use s2c_core::runtime::TickerFrameClock;
use s2c_core::types::{EffectiveConnectionType, FrameRateTrigger};
use s2c_core::{Locale, MonitorCfg, PerformanceMonitor};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Particle count the home page background asks for.
const REQUESTED_PARTICLES: u32 = 50;

/// Run the School2Career performance monitor against this host and print
/// what the UI would do.
#[derive(Debug, Parser)]
#[command(name = "s2c-perf", version)]
struct Args {
    /// How long to sample before reporting.
    #[arg(long, default_value_t = 3)]
    duration_secs: u64,

    /// Message locale (ar, en, fr). Defaults to the configured locale.
    #[arg(long)]
    locale: Option<Locale>,

    /// Device memory hint in GiB.
    #[arg(long)]
    memory: Option<f64>,

    #[arg(long)]
    cores: Option<usize>,

    /// Effective connection type (slow-2g, 2g, 3g, 4g).
    #[arg(long)]
    network: Option<EffectiveConnectionType>,

    /// Battery charge ratio, 0.0 to 1.0.
    #[arg(long)]
    battery: Option<f64>,

    /// Viewport width in pixels.
    #[arg(long)]
    viewport: Option<u32>,

    #[arg(long)]
    reduced_motion: bool,

    #[arg(long)]
    user_agent: Option<String>,

    /// Low frame rate trigger (published, post_reset).
    #[arg(long)]
    trigger: Option<FrameRateTrigger>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut cfg = MonitorCfg::from_env();
    if let Some(locale) = args.locale {
        cfg.locale = locale;
    }
    if let Some(trigger) = args.trigger {
        cfg.frame_rate_trigger = trigger;
    }

    if args.print_config {
        for (key, value, desc) in cfg.to_entries() {
            println!("{key:<20} {value:<10} {desc}");
        }
        return Ok(());
    }

    let signals = Arc::new(OverriddenSignals::new(HostSignals::gather(), overrides(&args)));
    let host = signals.base();
    tracing::info!(
        os = %host.os_name,
        cpus = host.cpu_count,
        ram_mb = host.total_ram_mb,
        "host signals gathered"
    );

    let locale = cfg.locale;
    let clock = TickerFrameClock::new(cfg.frame_period());
    let tier = background::assess(signals.as_ref(), &cfg);
    let monitor = PerformanceMonitor::mount(
        Arc::new(cfg),
        signals.clone() as Arc<dyn SignalSource>,
        Arc::new(clock),
    );

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(args.duration_secs)) => {}
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("interrupted, reporting early");
        }
    }

    let report = monitor.report(locale);
    let loading = LoadingView::resolve(LoadingStyle::Spinner, true, &monitor.state(), locale);
    monitor.shutdown().await;

    let output = serde_json::json!({
        "report": report,
        "background": {
            "tier": tier,
            "particles": tier.particle_budget(REQUESTED_PARTICLES),
            "shapes": tier.shows_shapes(),
        },
        "loading": loading,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn overrides(args: &Args) -> StaticSignals {
    let signals = StaticSignals {
        memory_gb: args.memory,
        cores: args.cores,
        connection: args.network,
        viewport_width: args.viewport,
        reduced_motion: args.reduced_motion.then_some(true),
        user_agent: args.user_agent.clone(),
        battery: None,
    };
    match args.battery {
        Some(level) => signals.with_battery(level),
        None => signals,
    }
}

fn init_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
