#![allow(dead_code)] // the full register map is spelled out even where unused

use crate::{
    Max31856Result,
    config::{AveragingMode, ControlRegister0, ControlRegister1, ThermocoupleType},
    error::Max31856Error,
    trace::{Access, BusTrace, NoTrace},
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

/// Number of addressable registers (0x00..=0x0F).
pub(crate) const REGISTER_COUNT: usize = 16;

// Register address map, straight from the datasheet.
pub(crate) const CR0_REG: u8 = 0x00; // Configuration register 0
pub(crate) const CR1_REG: u8 = 0x01; // Configuration register 1
pub(crate) const MASK_REG: u8 = 0x02; // Fault mask
pub(crate) const CJHF_REG: u8 = 0x03; // Cold-junction high fault threshold
pub(crate) const CJLF_REG: u8 = 0x04; // Cold-junction low fault threshold
pub(crate) const LTHFTH_REG: u8 = 0x05; // Linearized temperature high fault threshold, MSB
pub(crate) const LTHFTL_REG: u8 = 0x06; // Linearized temperature high fault threshold, LSB
pub(crate) const LTLFTH_REG: u8 = 0x07; // Linearized temperature low fault threshold, MSB
pub(crate) const LTLFTL_REG: u8 = 0x08; // Linearized temperature low fault threshold, LSB
pub(crate) const CJTO_REG: u8 = 0x09; // Cold-junction temperature offset
pub(crate) const CJTH_REG: u8 = 0x0a; // Cold-junction temperature, MSB
pub(crate) const CJTL_REG: u8 = 0x0b; // Cold-junction temperature, LSB
pub(crate) const LTCBH_REG: u8 = 0x0c; // Linearized thermocouple temperature, byte 2
pub(crate) const LTCBM_REG: u8 = 0x0d; // Linearized thermocouple temperature, byte 1
pub(crate) const LTCBL_REG: u8 = 0x0e; // Linearized thermocouple temperature, byte 0
pub(crate) const SR_REG: u8 = 0x0f; // Fault status

// High bit of the address byte marks a write transaction.
pub(crate) const WRITE_INDICATOR: u8 = 0x80;

/// A MAX31856 thermocouple-to-digital converter behind an SPI bus.
///
/// Takes ownership of an SPI bus (implementing the
/// [`SpiBus`](embedded_hal::spi::SpiBus) trait), an active-low chip-select
/// pin and a timer object implementing the
/// [`DelayNs`](embedded_hal::delay::DelayNs) trait, and maintains a 16-byte
/// mirror of the chip's register file. The mirror holds, per address, the
/// last value written or the last value read back from hardware; decoding a
/// multi-byte field is only valid after a read covering its full range,
/// which [`Max31856::read_data`] provides in one transaction.
///
/// Constructed through [`Max31856Builder`]. Not thread-safe: every operation
/// takes `&mut self`, and a caller sharing the driver across contexts must
/// serialize access.
pub struct Max31856<SPI, CS, D, T = NoTrace> {
    pub(crate) spi: SPI,
    pub(crate) cs: CS,
    pub(crate) delay: D,
    pub(crate) trace: T,
    pub(crate) regs: [u8; REGISTER_COUNT],
    pub(crate) tc_type: ThermocoupleType,
    pub(crate) conversion_delay_ms: u32,
}

/// Builder for creating a [`Max31856`] instance with custom configuration.
pub struct Max31856Builder {
    tc_type: ThermocoupleType,
    cr0: ControlRegister0,
    cr1: ControlRegister1,
    conversion_delay_ms: u32,
}

impl Default for Max31856Builder {
    fn default() -> Self {
        Max31856Builder {
            tc_type: ThermocoupleType::K,
            cr0: ControlRegister0::recommended(),
            cr1: ControlRegister1::recommended(),
            conversion_delay_ms: 200,
        }
    }
}

impl Max31856Builder {
    /// Sets the thermocouple type written into CR1's low nibble.
    pub fn with_thermocouple(mut self, tc_type: ThermocoupleType) -> Self {
        self.tc_type = tc_type;
        self
    }

    /// Replaces the CR0 value pushed at construction.
    pub fn with_cr0(mut self, cr0: ControlRegister0) -> Self {
        self.cr0 = cr0;
        self
    }

    /// Replaces the CR1 value pushed at construction.
    ///
    /// Only the high nibble (averaging) is kept; the low nibble is filled in
    /// from the configured thermocouple type.
    pub fn with_cr1(mut self, cr1: ControlRegister1) -> Self {
        self.cr1 = cr1;
        self
    }

    /// Sets the averaging window, keeping the rest of CR1.
    pub fn with_averaging(mut self, averaging: AveragingMode) -> Self {
        self.cr1 = self.cr1.with_averaging(averaging as u8);
        self
    }

    /// Sets the settling delay for [`Max31856::one_shot`], in milliseconds.
    ///
    /// The 200 ms default covers a single conversion; it is not recomputed
    /// from the averaging or rejection settings, so raise it for large
    /// averaging windows per the datasheet's timing table.
    pub fn with_conversion_delay_ms(mut self, delay_ms: u32) -> Self {
        self.conversion_delay_ms = delay_ms;
        self
    }

    /// Builds a new `Max31856`, pushing the configuration to hardware.
    pub fn build<SPI: SpiBus, CS: OutputPin, D: DelayNs>(
        self,
        spi: SPI,
        cs: CS,
        delay: D,
    ) -> Max31856Result<Max31856<SPI, CS, D>, SPI::Error, CS::Error> {
        self.build_with_trace(spi, cs, delay, NoTrace)
    }

    /// Builds a new `Max31856` that reports every bus transaction to `trace`.
    ///
    /// The construction sequence mirrors the chip's power-on expectations:
    /// chip-select is driven inactive, the full register file is read into
    /// the mirror, CR0/CR1/mask are assembled locally (CR1's averaging
    /// nibble merged with the thermocouple type code, mask zeroed to unmask
    /// all faults), pushed in one 3-byte write and read back. The readback
    /// refreshes the mirror but is not compared against what was written.
    pub fn build_with_trace<SPI: SpiBus, CS: OutputPin, D: DelayNs, T: BusTrace>(
        self,
        spi: SPI,
        mut cs: CS,
        delay: D,
        trace: T,
    ) -> Max31856Result<Max31856<SPI, CS, D, T>, SPI::Error, CS::Error> {
        cs.set_high().map_err(Max31856Error::Pin)?;
        let mut dev = Max31856 {
            spi,
            cs,
            delay,
            trace,
            regs: [0; REGISTER_COUNT],
            tc_type: self.tc_type,
            conversion_delay_ms: self.conversion_delay_ms,
        };
        dev.read_range(CR0_REG, REGISTER_COUNT)?;
        dev.regs[CR0_REG as usize] = self.cr0.into_bits();
        dev.regs[CR1_REG as usize] = self
            .cr1
            .with_thermocouple(self.tc_type.code())
            .into_bits();
        dev.regs[MASK_REG as usize] = 0; // unmask all faults
        dev.write_range(CR0_REG, 3)?;
        dev.read_range(CR0_REG, 3)?;
        Ok(dev)
    }
}

impl<SPI: SpiBus, CS: OutputPin, D: DelayNs, T: BusTrace> Max31856<SPI, CS, D, T> {
    /// Pushes `count` mirror bytes starting at `start_addr` to hardware in
    /// one transaction.
    ///
    /// The mirror is the source of the payload: callers update it first,
    /// then push (write-then-push). Chip-select is deasserted even when the
    /// transfer fails. Panics if `start_addr + count` exceeds the register
    /// file.
    pub fn write_range(
        &mut self,
        start_addr: u8,
        count: usize,
    ) -> Max31856Result<(), SPI::Error, CS::Error> {
        let start = start_addr as usize;
        let mut buf = [0u8; REGISTER_COUNT + 1];
        buf[0] = start_addr | WRITE_INDICATOR;
        buf[1..=count].copy_from_slice(&self.regs[start..start + count]);
        self.cs.set_low().map_err(Max31856Error::Pin)?;
        let res = self.spi.write(&buf[..count + 1]);
        self.cs.set_high().map_err(Max31856Error::Pin)?;
        res.map_err(Max31856Error::Spi)?;
        self.trace.record(Access::Write, start_addr, &buf[1..=count]);
        Ok(())
    }

    /// Refreshes `count` mirror bytes starting at `start_addr` from hardware
    /// in one full-duplex transaction of `count + 1` bytes.
    ///
    /// This is the only way fresh hardware state enters the mirror. Bytes
    /// outside the addressed range are left untouched. Chip-select is
    /// deasserted even when the transfer fails. Panics if
    /// `start_addr + count` exceeds the register file.
    pub fn read_range(
        &mut self,
        start_addr: u8,
        count: usize,
    ) -> Max31856Result<(), SPI::Error, CS::Error> {
        let start = start_addr as usize;
        let mut buf = [0u8; REGISTER_COUNT + 1];
        buf[0] = start_addr;
        self.cs.set_low().map_err(Max31856Error::Pin)?;
        let res = self.spi.transfer_in_place(&mut buf[..count + 1]);
        self.cs.set_high().map_err(Max31856Error::Pin)?;
        res.map_err(Max31856Error::Spi)?;
        self.regs[start..start + count].copy_from_slice(&buf[1..=count]);
        self.trace.record(Access::Read, start_addr, &buf[1..=count]);
        Ok(())
    }

    /// Refreshes the data registers: cold-junction temperature, linearized
    /// thermocouple temperature and fault status, in a single 6-byte read so
    /// the two temperatures cannot tear against each other.
    pub fn read_data(&mut self) -> Max31856Result<(), SPI::Error, CS::Error> {
        self.read_range(CJTH_REG, 6)
    }

    /// Triggers a one-shot conversion, disabling autoconversion.
    ///
    /// Blocks for the configured settling delay, then refreshes the data
    /// registers.
    pub fn one_shot(&mut self) -> Max31856Result<(), SPI::Error, CS::Error> {
        let cr0 = ControlRegister0::from_bits(self.regs[CR0_REG as usize])
            .with_autoconvert(false)
            .with_one_shot(true);
        self.regs[CR0_REG as usize] = cr0.into_bits();
        self.write_range(CR0_REG, 1)?;
        self.delay.delay_ms(self.conversion_delay_ms);
        self.read_data()
    }

    /// The current register mirror.
    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.regs
    }

    /// The thermocouple type the driver was built with.
    pub fn thermocouple(&self) -> ThermocoupleType {
        self.tc_type
    }
}
