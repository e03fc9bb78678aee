//! Command-line front end for the greenhouse console.
//!
//! Usage:
//!   greenhouse-console watch --select GH-1
//!   greenhouse-console toggle GH-1 irrigation on
//!   greenhouse-console --yes delete GH-1
//!   greenhouse-console logs GH-1 --page 2

use clap::{Parser, Subcommand};
use greenhouse_console::api::HttpBackend;
use greenhouse_console::config::{self, Config};
use greenhouse_console::model::{DeviceKind, SensorForm, SensorType, SensorUnit, UnitForm};
use greenhouse_console::view::LogView;
use greenhouse_console::{Console, ConsoleError, Result};
use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "greenhouse-console")]
#[command(about = "Supervise greenhouse units through their REST backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "GREENHOUSE_API_BASE")]
    api_base: Option<String>,

    /// Poll interval in seconds
    #[arg(long, env = "GREENHOUSE_POLL_INTERVAL_SECS")]
    interval: Option<u64>,

    /// Confirm destructive actions without asking
    #[arg(long, short)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the fleet and report changes until Ctrl+C
    Watch {
        /// Keep this unit selected
        #[arg(long)]
        select: Option<String>,
    },
    /// Show one unit in detail
    Show { code: String },
    /// Switch a device on or off
    Toggle {
        code: String,
        /// irrigation, ventilation, shade, light or humidifier
        device: DeviceKind,
        #[arg(value_parser = parse_switch)]
        state: bool,
    },
    /// Activate (or with --off deactivate) a unit
    Activate {
        code: String,
        #[arg(long)]
        off: bool,
    },
    /// Create a new unit
    Create {
        code: String,
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        plant_type: String,
        #[arg(long, default_value_t)]
        city: String,
        #[arg(long, default_value_t, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, default_value_t, allow_hyphen_values = true)]
        lon: String,
    },
    /// Delete a unit
    Delete { code: String },
    /// Add or update a sensor slot
    SensorAdd {
        code: String,
        sensor_code: String,
        /// Existing sensor id, to update instead of add
        #[arg(long)]
        id: Option<String>,
        /// e.g. temperature, humidityPct, soilMoisturePct
        #[arg(long = "type")]
        sensor_type: SensorType,
        /// e.g. CELSIUS, PERCENT
        #[arg(long)]
        unit: SensorUnit,
        #[arg(long, default_value_t, allow_hyphen_values = true)]
        value: String,
    },
    /// Remove a sensor slot
    SensorDelete { code: String, sensor_id: String },
    /// Show the action history of a unit
    Logs {
        code: String,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Show the most recent entries instead of a page
        #[arg(long, conflicts_with = "page")]
        limit: Option<u32>,
    },
}

fn parse_switch(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "open" | "true" => Ok(true),
        "off" | "close" | "closed" | "false" => Ok(false),
        other => Err(format!("expected on or off, got '{}'", other)),
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() -> ExitCode {
    config::load_dotenv();
    init_logger();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(base_url) = cli.api_base {
        config.backend.base_url = base_url;
    }
    if let Some(secs) = cli.interval {
        config.polling.interval_secs = secs;
    }
    info!("Configuration loaded:");
    info!("  Backend: {}", config.backend.base_url);
    info!("  Poll interval: {}s", config.polling.interval().as_secs());

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let view = Arc::new(LogView::new(cli.yes));
    let console = Console::new(backend, view, config.console.clone());

    match cli.command {
        Commands::Watch { select } => watch(&console, config.polling.interval(), select).await,
        Commands::Show { code } => open(&console, &code).await,
        Commands::Toggle {
            code,
            device,
            state,
        } => {
            open(&console, &code).await?;
            console.dispatcher().toggle(&code, device, state).await
        }
        Commands::Activate { code, off } => {
            console.scheduler().tick().await;
            console.manager().set_active(&code, !off).await.map(|_| ())
        }
        Commands::Create {
            code,
            name,
            plant_type,
            city,
            lat,
            lon,
        } => {
            let form = UnitForm {
                code,
                name,
                plant_type,
                city,
                lat,
                lon,
            };
            console.scheduler().tick().await;
            console.manager().create_unit(form).await.map(|_| ())
        }
        Commands::Delete { code } => {
            open(&console, &code).await?;
            console.dispatcher().delete_selected().await
        }
        Commands::SensorAdd {
            code,
            sensor_code,
            id,
            sensor_type,
            unit,
            value,
        } => {
            open(&console, &code).await?;
            let form = SensorForm {
                id,
                code: sensor_code,
                sensor_type,
                unit,
                value,
            };
            console.manager().save_sensor(&code, form).await.map(|_| ())
        }
        Commands::SensorDelete { code, sensor_id } => {
            open(&console, &code).await?;
            console
                .manager()
                .delete_sensor(&code, &sensor_id)
                .await
                .map(|_| ())
        }
        Commands::Logs { code, page, limit } => logs(&console, &code, page, limit).await,
    }
}

/// Load the list and select `code`.
async fn open(console: &Console, code: &str) -> Result<()> {
    console.scheduler().tick().await;
    match console.selection().select(code).await {
        Some(_) => Ok(()),
        None => Err(ConsoleError::UnknownUnit(code.to_string())),
    }
}

async fn watch(console: &Console, period: Duration, select: Option<String>) -> Result<()> {
    let shutdown = CancellationToken::new();
    let poller = tokio::spawn(
        console
            .scheduler()
            .clone()
            .run(period, shutdown.clone()),
    );

    if let Some(code) = select {
        console.selection().select(&code).await;
    }

    info!("Watching greenhouses, press Ctrl+C to exit");
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }

    shutdown.cancel();
    if let Err(e) = poller.await {
        error!("Poll loop ended abnormally: {}", e);
    }
    info!("Greenhouse console stopped");
    Ok(())
}

async fn logs(console: &Console, code: &str, page: u32, limit: Option<u32>) -> Result<()> {
    let mut pager = console.pager(code);

    if let Some(limit) = limit {
        let entries = pager.recent(limit).await?;
        info!("[Pager] {} most recent action(s) of {}", entries.len(), code);
        for entry in &entries {
            info!("[Pager] {}", entry);
        }
        return Ok(());
    }

    let view = pager.load(page).await?;
    match view.total_pages {
        Some(total) => info!("[Pager] {} page {} of {}", code, view.page + 1, total),
        None => info!("[Pager] {} page {}", code, view.page + 1),
    }
    if view.entries.is_empty() {
        info!("[Pager] No actions recorded yet");
    }
    for entry in &view.entries {
        info!("[Pager] {}", entry);
    }
    if view.has_next {
        info!("[Pager] More entries: --page {}", view.page + 1);
    }
    Ok(())
}
