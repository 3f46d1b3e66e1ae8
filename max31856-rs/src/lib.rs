#![no_std]
#![deny(missing_docs)]

//! # max31856
//! A no-std register-mirroring driver for the MAX31856 precision thermocouple-to-digital
//! converter.
//!
//! The driver owns an SPI bus (implementing the [`SpiBus`](embedded_hal::spi::SpiBus) trait),
//! a chip-select pin and a delay provider, and keeps an in-memory shadow of the chip's 16
//! registers. Configuration is pushed to hardware at construction through
//! [`Max31856Builder`]; afterwards operation is a pull model: [`Max31856::read_data`]
//! refreshes the data registers in a single transaction, and [`Max31856::temperature`],
//! [`Max31856::cold_junction`] and [`Max31856::faults`] decode the mirror without further
//! bus traffic unless asked to refresh.
//!
//! Hardware-reported sensor faults are surfaced as a [`FaultStatus`] value, never as an
//! error; bus failures propagate untouched through [`Max31856Error`].

use embedded_hal::spi::{MODE_1, Mode};

mod config;
mod decode;
mod error;
mod registers;
mod trace;

pub use config::{AveragingMode, ControlRegister0, ControlRegister1, ThermocoupleType};
pub use decode::FaultStatus;
pub use error::{InvalidThermocoupleType, Max31856Error};
pub use registers::{Max31856, Max31856Builder};
pub use trace::{Access, BusTrace, NoTrace};

/// Results of MAX31856-specific function calls.
pub type Max31856Result<T, S, P> = Result<T, Max31856Error<S, P>>;

/// SPI mode required by the chip (CPOL = 0, CPHA = 1).
///
/// The host must open the bus in this mode; a clock rate of 1 MHz is a safe choice
/// (the chip tolerates up to 5 MHz).
pub const MODE: Mode = MODE_1;
