use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, I2cdev, SpidevDevice};

use einkstatus::config::PanelConfig;
use einkstatus::sensors::SystemSensors;
use einkstatus::ssd1680::Ssd1680;
use einkstatus::status::{font_by_name, FONT_NAMES};
use einkstatus::{App, Config, Orientation, PanelSession, RefreshController, StatusRenderer};

type Panel = Ssd1680<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

/// Show time, load, battery and temperature on a 2.13" e-paper HAT
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML config file, defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw in portrait or landscape
    #[arg(short, long, value_enum)]
    orientation: Option<Orientation>,

    /// Seconds between sensor polls
    #[arg(short, long)]
    interval: Option<u64>,

    /// Draw one frame, then clear the panel and exit
    #[arg(long)]
    once: bool,
}

fn open_panel(config: &PanelConfig) -> anyhow::Result<Panel> {
    let mut spi = SpidevDevice::open(&config.spi_device)
        .with_context(|| format!("opening SPI device {}", config.spi_device.display()))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(config.spi_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options).context("configuring SPI")?;

    let mut chip = Chip::new(&config.gpio_chip)
        .with_context(|| format!("opening GPIO chip {}", config.gpio_chip.display()))?;

    let mut output = |line: u32, consumer: &str| -> anyhow::Result<CdevPin> {
        let handle = chip
            .get_line(line)
            .with_context(|| format!("getting GPIO line {}", line))?
            .request(LineRequestFlags::OUTPUT, 0, consumer)
            .with_context(|| format!("requesting {} line {}", consumer, line))?;
        CdevPin::new(handle).with_context(|| format!("creating {} pin", consumer))
    };
    let dc = output(config.dc, "einkstatus-dc")?;
    let rst = output(config.rst, "einkstatus-rst")?;

    let busy_handle = chip
        .get_line(config.busy)
        .with_context(|| format!("getting GPIO line {}", config.busy))?
        .request(LineRequestFlags::INPUT, 0, "einkstatus-busy")
        .context("requesting BUSY line")?;
    let busy = CdevPin::new(busy_handle).context("creating BUSY pin")?;

    Ok(Ssd1680::new(spi, busy, dc, rst, Delay))
}

fn open_ups(config: &Config) -> Option<I2cdev> {
    if !config.ups.enabled {
        log::info!("UPS gauge disabled, battery will read N/A");
        return None;
    }
    match I2cdev::new(&config.ups.i2c_bus) {
        Ok(i2c) => Some(i2c),
        Err(e) => {
            log::warn!(
                "Cannot open I2C bus {}: {}, battery will read N/A",
                config.ups.i2c_bus.display(),
                e
            );
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .and_then(|config| config.with_overrides(cli.orientation, cli.interval))
        .context("loading configuration")?;

    let font = font_by_name(&config.font).ok_or_else(|| {
        anyhow!(
            "unknown font {:?}, expected one of {}",
            config.font,
            FONT_NAMES.join(", ")
        )
    })?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            log::info!("Received shutdown signal");
            shutdown.store(true, Ordering::SeqCst);
        })
        .context("installing signal handler")?;
    }

    let panel = open_panel(&config.panel)?;
    let controller = RefreshController::new(panel, config.orientation);
    let (width, height) = controller.geometry().logical_size();
    log::info!(
        "Panel ready, drawing {}x{} in {:?} orientation",
        width,
        height,
        config.orientation
    );

    let sensors = SystemSensors::new(open_ups(&config), &config);
    let mut app = App::new(
        PanelSession::new(controller, config.clear_fill),
        sensors,
        StatusRenderer::new(font),
        config.update_interval(),
    );

    if cli.once {
        app.start().context("drawing status frame")?;
    } else {
        app.run(&shutdown).context("running status loop")?;
    }

    log::info!("Exiting");
    Ok(())
}
