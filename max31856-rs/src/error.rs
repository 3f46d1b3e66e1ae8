use core::fmt;

/// MAX31856 driver errors.
#[derive(Debug)]
pub enum Max31856Error<S, P> {
    /// SPI bus errors.
    Spi(S),
    /// Chip-select pin errors.
    Pin(P),
    /// The thermocouple type code is not one the chip recognizes.
    InvalidThermocoupleType,
}

/// Error returned when parsing a thermocouple type code fails.
///
/// Recognized codes are `B`, `E`, `J`, `K`, `N`, `R`, `S`, `T`, `VG8` and `VG32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidThermocoupleType;

impl fmt::Display for InvalidThermocoupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognized thermocouple type code")
    }
}

impl<S, P> From<InvalidThermocoupleType> for Max31856Error<S, P> {
    fn from(_: InvalidThermocoupleType) -> Self {
        Self::InvalidThermocoupleType
    }
}
