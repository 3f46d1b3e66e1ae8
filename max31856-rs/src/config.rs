use crate::error::InvalidThermocoupleType;
use bitfield_struct::bitfield;
use core::str::FromStr;

/// # Configuration register 0 (CR0, address 0x00)
///
/// Selects the conversion mode, open-circuit fault detection, cold-junction
/// sensing, fault reporting behavior and line-frequency rejection.
///
/// The chip's power-on value is 0x00 (one-shot off, autoconversion off, 60 Hz
/// rejection). [`ControlRegister0::recommended`] holds the defaults this driver
/// pushes at construction.
#[bitfield(u8)]
pub struct ControlRegister0 {
    /// Reject 50 Hz mains interference instead of 60 Hz.
    pub reject_50hz: bool,
    /// Writing 1 clears the latched fault status bits (interrupt mode).
    pub fault_clear: bool,
    /// Fault status in interrupt mode rather than comparator mode.
    pub fault_interrupt: bool,
    /// Disable the cold-junction sensor; its registers become writable.
    pub cold_junction_disable: bool,
    /// Open-circuit fault detection mode (0 = disabled, 1..=3 per the
    /// datasheet's source-resistance / time-constant classes).
    #[bits(2)]
    pub open_circuit_mode: u8,
    /// Trigger a single conversion cycle.
    pub one_shot: bool,
    /// Convert continuously at the conversion rate instead of on demand.
    pub autoconvert: bool,
}

impl ControlRegister0 {
    /// Defaults written at construction: autoconversion with open-circuit
    /// fault detection mode 1, fault-clear and 50 Hz rejection (0x93).
    pub const fn recommended() -> Self {
        Self::new()
            .with_autoconvert(true)
            .with_open_circuit_mode(1)
            .with_fault_clear(true)
            .with_reject_50hz(true)
    }
}

/// # Configuration register 1 (CR1, address 0x01)
///
/// The low nibble always holds the thermocouple type code and the high nibble
/// the averaging selection. The driver merges the two, never overwrites the
/// register wholesale, so a caller-supplied averaging preference survives the
/// type injection at construction and vice versa.
#[bitfield(u8)]
pub struct ControlRegister1 {
    /// Thermocouple type code, see [`ThermocoupleType`].
    #[bits(4)]
    pub thermocouple: u8,
    /// Averaging sample count code, see [`AveragingMode`].
    #[bits(3)]
    pub averaging: u8,
    reserved: bool,
}

impl ControlRegister1 {
    /// Defaults written at construction: 16-sample averaging (0x40); the type
    /// nibble is filled in from the builder's [`ThermocoupleType`].
    pub const fn recommended() -> Self {
        Self::new().with_averaging(AveragingMode::Sixteen as u8)
    }
}

/// Thermocouple types the chip can linearize, with their CR1 codes.
///
/// `Vg8` and `Vg32` bypass linearization and report the raw input voltage at
/// a gain of 8 or 32.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermocoupleType {
    /// Type B
    B = 0,
    /// Type E
    E = 1,
    /// Type J
    J = 2,
    /// Type K
    K = 3,
    /// Type N
    N = 4,
    /// Type R
    R = 5,
    /// Type S
    S = 6,
    /// Type T
    T = 7,
    /// Voltage mode, gain 8
    Vg8 = 8,
    /// Voltage mode, gain 32
    Vg32 = 12,
}

impl ThermocoupleType {
    /// The code written into CR1's low nibble.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl FromStr for ThermocoupleType {
    type Err = InvalidThermocoupleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ThermocoupleType::*;
        match s {
            "B" => Ok(B),
            "E" => Ok(E),
            "J" => Ok(J),
            "K" => Ok(K),
            "N" => Ok(N),
            "R" => Ok(R),
            "S" => Ok(S),
            "T" => Ok(T),
            "VG8" => Ok(Vg8),
            "VG32" => Ok(Vg32),
            _ => Err(InvalidThermocoupleType),
        }
    }
}

impl TryFrom<u8> for ThermocoupleType {
    type Error = InvalidThermocoupleType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ThermocoupleType::*;
        match value {
            0 => Ok(B),
            1 => Ok(E),
            2 => Ok(J),
            3 => Ok(K),
            4 => Ok(N),
            5 => Ok(R),
            6 => Ok(S),
            7 => Ok(T),
            8 => Ok(Vg8),
            12 => Ok(Vg32),
            _ => Err(InvalidThermocoupleType),
        }
    }
}

/// Averaging window selection for CR1's high nibble.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AveragingMode {
    /// No averaging, single sample.
    Single = 0,
    /// Average 2 samples.
    Two = 1,
    /// Average 4 samples.
    Four = 2,
    /// Average 8 samples.
    Eight = 3,
    /// Average 16 samples.
    Sixteen = 4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_register_values() {
        assert_eq!(ControlRegister0::recommended().into_bits(), 0x93);
        assert_eq!(ControlRegister1::recommended().into_bits(), 0x40);
    }

    #[test]
    fn type_codes_match_datasheet() {
        let table = [
            ("B", 0),
            ("E", 1),
            ("J", 2),
            ("K", 3),
            ("N", 4),
            ("R", 5),
            ("S", 6),
            ("T", 7),
            ("VG8", 8),
            ("VG32", 12),
        ];
        for (name, code) in table {
            let tc: ThermocoupleType = name.parse().unwrap();
            assert_eq!(tc.code(), code, "{name}");
            assert_eq!(ThermocoupleType::try_from(code).unwrap(), tc);
        }
    }

    #[test]
    fn unrecognized_type_codes_are_rejected() {
        assert_eq!(
            "Q".parse::<ThermocoupleType>(),
            Err(InvalidThermocoupleType)
        );
        assert_eq!("k".parse::<ThermocoupleType>(), Err(InvalidThermocoupleType));
        assert_eq!(ThermocoupleType::try_from(9), Err(InvalidThermocoupleType));
        assert_eq!(ThermocoupleType::try_from(13), Err(InvalidThermocoupleType));
    }

    #[test]
    fn cr1_nibbles_merge_without_clobbering() {
        let cr1 = ControlRegister1::recommended().with_thermocouple(ThermocoupleType::K.code());
        assert_eq!(cr1.into_bits(), 0x43);

        // averaging survives a change of thermocouple type
        let cr1 = cr1.with_thermocouple(ThermocoupleType::T.code());
        assert_eq!(cr1.averaging(), AveragingMode::Sixteen as u8);
        assert_eq!(cr1.into_bits(), 0x47);

        // and the type nibble survives a change of averaging
        let cr1 = cr1.with_averaging(AveragingMode::Four as u8);
        assert_eq!(cr1.thermocouple(), ThermocoupleType::T.code());
        assert_eq!(cr1.into_bits(), 0x27);
    }
}
