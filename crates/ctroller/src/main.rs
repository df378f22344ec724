//! ctroller daemon entry point.
//!
//! Loads the configuration, creates the virtual devices, binds the UDP
//! listener and runs the receive loop until SIGINT or SIGTERM.
//!
//! # Usage
//!
//! ```text
//! ctroller [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Config file [default: ~/.config/ctroller/config.toml]
//!   --port <PORT>          UDP port to listen on [default: 15708]
//!   --bind <ADDR>          IP address to bind [default: 0.0.0.0]
//!   --keymap <PATH>        Gamepad keymap file
//!   --devices <LIST>       Comma-separated devices to create [default: all]
//!   --timeout-ms <MS>      Silence before devices reset [default: 1000]
//!   --log-level <FILTER>   Log filter when RUST_LOG is unset [default: info]
//!   --dry-run              Simulate devices instead of using uinput
//!   --print-config         Print the effective configuration and exit
//! ```
//!
//! Virtual devices are always created through `/dev/uinput`.  There is no
//! option to pick another uinput node.
//!
//! # Environment variable overrides
//!
//! Every option can also come from a `CTROLLER_*` variable (`CTROLLER_PORT`,
//! `CTROLLER_DEVICES`, ...).  Command-line arguments take precedence over
//! variables, which take precedence over the config file.
//!
//! # Receive loop
//!
//! ```text
//! UDP datagram ─► decode ─► DeviceRegistry::dispatch ─► gamepad / touch / gyro / accel
//! timeout ──────► neutral snapshot (once per disconnect)
//! SIGINT/TERM ──► break ─► DeviceRegistry::shutdown
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ctroller::application::forward_input::ForwardInputUseCase;
use ctroller::application::registry::DeviceRegistry;
use ctroller::infrastructure::input_emulation::mock::MockPlatform;
use ctroller::infrastructure::network::{ListenerEvent, PacketListener, RECV_BUFFER_SIZE};
use ctroller::infrastructure::storage::config::{load_config, render_config, AppConfig};
use ctroller_core::{DeviceKind, DeviceMask, KeyRemapTable, ProtocolVersion};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Use a handheld console as a gamepad, touchscreen and motion controller.
///
/// Options left unset fall back to the config file, then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "ctroller",
    version,
    after_help = "Virtual devices are always created through /dev/uinput; the node path is not configurable."
)]
struct Cli {
    /// Config file to load instead of the default location.
    #[arg(long, env = "CTROLLER_CONFIG")]
    config: Option<PathBuf>,

    /// UDP port the handheld streams to.
    #[arg(long, env = "CTROLLER_PORT")]
    port: Option<u16>,

    /// IP address to bind the UDP socket to.
    #[arg(long, env = "CTROLLER_BIND")]
    bind: Option<String>,

    /// Gamepad keymap file: ten button names, one per line.
    #[arg(long, env = "CTROLLER_KEYMAP")]
    keymap: Option<PathBuf>,

    /// Devices to create, e.g. `gamepad,touchscreen`.
    #[arg(long, env = "CTROLLER_DEVICES", value_delimiter = ',')]
    devices: Option<Vec<DeviceKind>>,

    /// Milliseconds of silence before every device is reset to rest.
    #[arg(long, env = "CTROLLER_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[arg(long, env = "CTROLLER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log frames instead of creating real devices.
    #[arg(long, env = "CTROLLER_DRY_RUN")]
    dry_run: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Overlays every option that was given onto `config`.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(bind) = &self.bind {
            config.network.bind_address = bind.clone();
        }
        if let Some(keymap) = &self.keymap {
            config.input.keymap = Some(keymap.clone());
        }
        if let Some(devices) = &self.devices {
            config.devices.enabled = devices.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.network.receive_timeout_ms = timeout_ms;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);

    init_tracing(&config.log_level);

    if cli.print_config {
        print!("{}", render_config(&config)?);
        return Ok(());
    }

    info!(
        "ctroller {} starting (protocol {})",
        env!("CARGO_PKG_VERSION"),
        ProtocolVersion::LOCAL
    );

    let listener_config = config
        .network
        .listener_config()
        .context("invalid network configuration")?;
    let listener = PacketListener::bind(&listener_config)
        .await
        .context("failed to start UDP listener")?;

    let keymap = KeyRemapTable::load_or_default(config.input.keymap.as_deref());
    let mask = config.devices.mask();
    if mask.is_empty() {
        warn!("no devices enabled; datagrams will be decoded and discarded");
    }
    let registry = create_registry(mask, &keymap, cli.dry_run)?;
    let mut use_case = ForwardInputUseCase::new(registry, listener_config.receive_timeout);

    let result = run(&listener, &mut use_case).await;

    use_case.shutdown();
    info!("ctroller stopped");
    result
}

/// Initialises structured logging: `RUST_LOG` wins, then `level`.
fn init_tracing(level: &str) {
    let (filter, rejected) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => match EnvFilter::try_new(level) {
            Ok(filter) => (filter, None),
            Err(e) => (EnvFilter::new("info"), Some(e)),
        },
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(e) = rejected {
        warn!("invalid log level {level:?} ({e}); using \"info\"");
    }
}

/// Creates every enabled device on the platform backend.
fn create_registry(
    mask: DeviceMask,
    keymap: &KeyRemapTable,
    dry_run: bool,
) -> anyhow::Result<DeviceRegistry> {
    if dry_run {
        info!("dry run: devices are simulated and frames are logged at debug level");
        return DeviceRegistry::initialize(mask, keymap, &MockPlatform::logging_only())
            .context("failed to create virtual devices");
    }

    #[cfg(target_os = "linux")]
    {
        use ctroller::infrastructure::input_emulation::linux::UinputPlatform;

        DeviceRegistry::initialize(mask, keymap, &UinputPlatform::new())
            .context("failed to create virtual devices (is /dev/uinput writable?)")
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = keymap;
        anyhow::bail!("no virtual input backend on this platform; run with --dry-run")
    }
}

/// Receives and dispatches datagrams until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the socket fails; the caller still shuts the
/// registry down.
async fn run(listener: &PacketListener, use_case: &mut ForwardInputUseCase) -> anyhow::Result<()> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    info!("ready; waiting for handheld");
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown signal received");
                return Ok(());
            }
            event = listener.recv(&mut buf) => match event.context("UDP receive failed")? {
                ListenerEvent::Datagram { len, peer } => {
                    if let Err(e) = use_case.handle_datagram(&buf[..len], peer) {
                        warn!("dropping datagram from {peer}: {e}");
                    }
                }
                ListenerEvent::Timeout => {
                    use_case.handle_timeout();
                }
            }
        }
    }
}

/// Completes on Ctrl-C, or on SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_replace_config_values() {
        // Arrange
        let cli = Cli::parse_from([
            "ctroller",
            "--port",
            "9000",
            "--devices",
            "gamepad,gyroscope",
            "--timeout-ms",
            "250",
        ]);
        let mut config = AppConfig::default();

        // Act
        cli.apply_to(&mut config);

        // Assert
        assert_eq!(config.network.port, 9000);
        assert_eq!(config.network.receive_timeout_ms, 250);
        assert_eq!(
            config.devices.enabled,
            vec![DeviceKind::Gamepad, DeviceKind::Gyroscope]
        );
        assert_eq!(config.network.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_cli_without_options_leaves_config_untouched() {
        let cli = Cli::parse_from(["ctroller"]);
        let mut config = AppConfig::default();

        cli.apply_to(&mut config);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_cli_rejects_unknown_device_name() {
        let result = Cli::try_parse_from(["ctroller", "--devices", "gamepad,mouse"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_names_uinput_node() {
        use clap::CommandFactory;

        let help = Cli::command().render_long_help().to_string();

        assert!(help.contains("/dev/uinput"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
