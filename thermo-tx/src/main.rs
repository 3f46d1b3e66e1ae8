use clap::Parser;
use linux_embedded_hal::{
    CdevPin, Delay, SpidevBus,
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
};
use max31856::{Access, BusTrace, Max31856Builder, ThermocoupleType};
use std::{path::PathBuf, thread, time::Duration};

mod config;

/// Poll a MAX31856 thermocouple converter and log its readings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the configured SPI bus path (e.g., /dev/spidev0.0)
    #[arg(long)]
    spi: Option<String>,
}

/// Forwards every register transaction to the logger.
struct SpiTrace;

impl BusTrace for SpiTrace {
    fn record(&mut self, access: Access, start_addr: u8, bytes: &[u8]) {
        log::trace!(
            "{access:?} {} bytes at {start_addr:#04x}: {bytes:02x?}",
            bytes.len()
        );
    }
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    let mut cfg = args
        .config
        .as_deref()
        .map_or_else(config::Config::default, config::Config::load);
    if let Some(spi) = args.spi {
        cfg.spi = spi;
    }
    log::info!("config: {cfg:?}");
    let tc_type: ThermocoupleType = cfg
        .tc_type
        .parse()
        .expect("Unrecognized thermocouple type in configuration");
    // Open the SPI bus in the chip's required mode
    let mut spi = SpidevBus::open(&cfg.spi).expect("Failed to open SPI device");
    spi.0
        .configure(
            &SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(1_000_000)
                .mode(SpiModeFlags::SPI_MODE_1)
                .build(),
        )
        .expect("Failed to configure SPI device");
    // Request the chip-select line, idle high
    let mut chip = Chip::new(&cfg.gpiochip).expect("Failed to open GPIO chip");
    let cs = chip
        .get_line(cfg.cs_line)
        .and_then(|line| line.request(LineRequestFlags::OUTPUT, 1, "thermo-tx"))
        .expect("Failed to request chip-select line");
    let cs = CdevPin::new(cs).expect("Failed to wrap chip-select line");
    // Create a MAX31856 instance
    let mut sensor = Max31856Builder::default()
        .with_thermocouple(tc_type)
        .build_with_trace(spi, cs, Delay, SpiTrace)
        .expect("Failed to create MAX31856 instance");
    log::info!("thermocouple type {:?}", sensor.thermocouple());
    loop {
        thread::sleep(Duration::from_secs(cfg.interval_seconds));
        let tc = sensor
            .temperature(true)
            .expect("Failed to read temperature");
        let cj = sensor
            .cold_junction(false)
            .expect("Failed to read cold-junction temperature");
        let faults = sensor.faults(false).expect("Failed to read fault status");
        if faults.any() {
            log::warn!("fault {:#04x}: {faults}", faults.into_bits());
        } else {
            log::info!("thermocouple {tc:7.2} C, cold junction {cj:7.2} C");
        }
    }
}
