use crate::{
    Max31856Result,
    registers::{CJTH_REG, CJTL_REG, LTCBH_REG, LTCBL_REG, LTCBM_REG, Max31856, SR_REG},
    trace::BusTrace,
};
use bitfield_struct::bitfield;
use core::fmt;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

/// Degrees Celsius per count of the 32-bit linearized-temperature word.
///
/// 2^-20: the chip's 19-bit, 0.0078125 °C-resolution value sits left-justified
/// across the three LTCB registers, and the decoder appends the status byte as
/// low-order padding to make a 4-byte big-endian integer.
const TC_DEGREES_PER_COUNT: f32 = 9.53674316406e-7;

/// Degrees Celsius per count of the 16-bit cold-junction word.
const CJ_DEGREES_PER_COUNT: f32 = 1.0 / 256.0;

pub(crate) fn thermocouple_degrees(raw: [u8; 4]) -> f32 {
    i32::from_be_bytes(raw) as f32 * TC_DEGREES_PER_COUNT
}

pub(crate) fn cold_junction_degrees(raw: [u8; 2]) -> f32 {
    i16::from_be_bytes(raw) as f32 * CJ_DEGREES_PER_COUNT
}

/// Fault descriptions ordered by ascending bit value, so the rendered
/// concatenation is deterministic.
const FAULT_NAMES: [&str; 8] = [
    "open", "OV/UV", "tclow", "tchigh", "cjlow", "cjhigh", "tcrange", "cjrange",
];

/// # Fault status register (SR, address 0x0F)
///
/// Each bit independently reports one hardware-detected fault; several may be
/// set at once. These are sensor conditions, not driver errors, and reach the
/// caller as a value. The [`core::fmt::Display`] impl joins every active
/// fault description with `+`, iterating from least- to most-significant bit.
#[bitfield(u8)]
pub struct FaultStatus {
    /// Thermocouple open-circuit fault.
    pub open_circuit: bool,
    /// Over- or undervoltage on the input pins.
    pub over_under_voltage: bool,
    /// Thermocouple temperature below the low fault threshold.
    pub thermocouple_low: bool,
    /// Thermocouple temperature above the high fault threshold.
    pub thermocouple_high: bool,
    /// Cold-junction temperature below the low fault threshold.
    pub cold_junction_low: bool,
    /// Cold-junction temperature above the high fault threshold.
    pub cold_junction_high: bool,
    /// Thermocouple temperature outside the type's rated range.
    pub thermocouple_range: bool,
    /// Cold-junction temperature outside its operating range.
    pub cold_junction_range: bool,
}

impl FaultStatus {
    /// Whether any fault bit is set.
    pub const fn any(self) -> bool {
        self.into_bits() != 0
    }

    /// Descriptions of all active faults, ascending by bit value.
    pub fn active_names(self) -> impl Iterator<Item = &'static str> {
        let bits = self.into_bits();
        FAULT_NAMES
            .iter()
            .enumerate()
            .filter(move |(bit, _)| bits & (1 << bit) != 0)
            .map(|(_, &name)| name)
    }
}

impl fmt::Display for FaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in self.active_names() {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

impl<SPI: SpiBus, CS: OutputPin, D: DelayNs, T: BusTrace> Max31856<SPI, CS, D, T> {
    /// The linearized thermocouple temperature in degrees Celsius.
    ///
    /// With `refresh` the data registers are pulled from hardware first;
    /// otherwise this is a pure function of the mirror, valid as long as the
    /// last [`read_data`](Max31856::read_data) covered the temperature block.
    pub fn temperature(&mut self, refresh: bool) -> Max31856Result<f32, SPI::Error, CS::Error> {
        if refresh {
            self.read_data()?;
        }
        Ok(thermocouple_degrees([
            self.regs[LTCBH_REG as usize],
            self.regs[LTCBM_REG as usize],
            self.regs[LTCBL_REG as usize],
            self.regs[SR_REG as usize],
        ]))
    }

    /// The cold-junction temperature in degrees Celsius.
    pub fn cold_junction(&mut self, refresh: bool) -> Max31856Result<f32, SPI::Error, CS::Error> {
        if refresh {
            self.read_data()?;
        }
        Ok(cold_junction_degrees([
            self.regs[CJTH_REG as usize],
            self.regs[CJTL_REG as usize],
        ]))
    }

    /// The fault status register.
    ///
    /// A zero value means no fault; the raw byte is available through
    /// [`FaultStatus::into_bits`].
    pub fn faults(&mut self, refresh: bool) -> Max31856Result<FaultStatus, SPI::Error, CS::Error> {
        if refresh {
            self.read_data()?;
        }
        Ok(FaultStatus::from_bits(self.regs[SR_REG as usize]))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;
    use std::vec;

    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    use super::*;
    use crate::config::ThermocoupleType;
    use crate::registers::REGISTER_COUNT;
    use crate::trace::NoTrace;

    #[test]
    fn thermocouple_scale() {
        // ±100_000_000 counts at 2^-20 degrees per count
        let t = thermocouple_degrees([0x05, 0xf5, 0xe1, 0x00]);
        assert!((t - 95.367432).abs() < 0.01, "{t}");
        let t = thermocouple_degrees([0xfa, 0x0a, 0x1f, 0x00]);
        assert!((t + 95.367432).abs() < 0.01, "{t}");
        // 25 °C is 25 << 20 counts
        assert_eq!(thermocouple_degrees([0x01, 0x90, 0x00, 0x00]), 25.0);
        assert_eq!(thermocouple_degrees([0x00, 0x00, 0x00, 0x00]), 0.0);
    }

    #[test]
    fn cold_junction_scale() {
        assert_eq!(cold_junction_degrees([0x19, 0x00]), 25.0);
        assert_eq!(cold_junction_degrees([0xf7, 0x00]), -9.0);
    }

    #[test]
    fn fault_rendering_is_ordered_and_lossless() {
        let faults = FaultStatus::from_bits(0x11);
        assert_eq!(faults.into_bits(), 17);
        assert!(faults.open_circuit());
        assert!(faults.cold_junction_low());
        assert_eq!(faults.to_string(), "open+cjlow");

        assert_eq!(
            FaultStatus::from_bits(0xff).to_string(),
            "open+OV/UV+tclow+tchigh+cjlow+cjhigh+tcrange+cjrange"
        );
    }

    #[test]
    fn zero_fault_byte_renders_empty() {
        let faults = FaultStatus::from_bits(0x00);
        assert!(!faults.any());
        assert_eq!(faults.active_names().count(), 0);
        assert_eq!(faults.to_string(), "");
    }

    fn data_read(response: [u8; 6]) -> SpiTransaction<u8> {
        let mut rsp = vec![0u8];
        rsp.extend_from_slice(&response);
        SpiTransaction::transfer_in_place(vec![0x0a, 0, 0, 0, 0, 0, 0], rsp)
    }

    #[test]
    fn refresh_pulls_data_registers_before_decoding() {
        let spi_expect = [data_read([0x19, 0x00, 0x05, 0xf5, 0xe1, 0x00])];
        let pin_expect = [
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ];
        let spi = SpiMock::new(&spi_expect);
        let pin = PinMock::new(&pin_expect);
        let mut spi_done = spi.clone();
        let mut pin_done = pin.clone();

        let mut dev = Max31856 {
            spi,
            cs: pin,
            delay: NoopDelay,
            trace: NoTrace,
            regs: [0; REGISTER_COUNT],
            tc_type: ThermocoupleType::K,
            conversion_delay_ms: 200,
        };
        let t = dev.temperature(true).unwrap();
        assert!((t - 95.367432).abs() < 0.01, "{t}");
        // the same refresh covers the cold junction and status, no extra bus traffic
        assert_eq!(dev.cold_junction(false).unwrap(), 25.0);
        assert!(!dev.faults(false).unwrap().any());

        spi_done.done();
        pin_done.done();
    }
}
