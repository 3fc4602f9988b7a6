//! TPA2016D2 register map
//!
//! Source: Texas Instruments TPA2016D2 datasheet (SLOS593)
//! <https://www.ti.com/lit/ds/symlink/tpa2016d2.pdf>
//!
//! # Key I²C constraints
//!
//! ## Single-byte register file
//! Every register is 8 bits wide and individually addressed; a read is one
//! address byte out followed by exactly one data byte back in a combined
//! `write_read` transaction. The chip holds no multi-byte payloads.
//!
//! ## Fault bits are read-only
//! Control register bits 4/3/2 (right / left / thermal fault) are set and
//! cleared by the chip itself. The driver only ever reads them; writing them
//! has no effect.
//!
//! ## Limiter disable precondition
//! The output limiter can only be disabled while the compression ratio is
//! 1:1. Disabling the limiter therefore touches AGC2 (ratio to 0) before
//! AGC1 (bit 7) — see [`crate::Tpa2016d2::disable_limiter`].

/// 7-bit I²C device address (fixed in silicon).
pub const DEVICE_ADDR: u8 = 0x58;

/// The seven addressable registers of the TPA2016D2.
///
/// The discriminant is the register index as sent on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Function control: speaker enables, software shutdown, fault flags,
    /// noise gate enable. Power-on default `0xC3` (both speakers on, noise
    /// gate on).
    Control = 0x01,
    /// AGC attack time, bits \[5:0\], 0.1067 ms per step per 6 dB of gain
    /// change.
    Attack = 0x02,
    /// AGC release time, bits \[5:0\], 0.0137 s per step per 6 dB.
    Release = 0x03,
    /// AGC hold time, bits \[5:0\], 0.0137 s per step; 0 disables the hold.
    Hold = 0x04,
    /// AGC fixed gain, bits \[5:0\], 6-bit two's complement in dB. Usable
    /// range −28..=+30 dB per datasheet.
    Gain = 0x05,
    /// AGC control 1: limiter disable, noise gate threshold, output limiter
    /// level.
    Agc1 = 0x06,
    /// AGC control 2: maximum gain, compression ratio.
    Agc2 = 0x07,
}

impl Register {
    /// Register index as sent on the bus.
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Bit-layout metadata for one named field within a register.
///
/// All field accessors go through [`Field::insert`] / [`Field::extract`] so
/// the mask and shift for each field live in exactly one place (the
/// associated constants below) instead of being scattered through the
/// driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Register holding the field.
    pub register: Register,
    /// Right-aligned field mask (before shifting into position).
    pub mask: u8,
    /// Bit position of the field's least-significant bit.
    pub shift: u8,
}

impl Field {
    /// Right speaker enable (1 = on).
    pub const SPK_EN_R: Field = Field::new(Register::Control, 0b1, 7);
    /// Left speaker enable (1 = on).
    pub const SPK_EN_L: Field = Field::new(Register::Control, 0b1, 6);
    /// Software shutdown (1 = shutdown, ~1 µA draw).
    pub const SWS: Field = Field::new(Register::Control, 0b1, 5);
    /// Right channel over-current fault (read-only).
    pub const FAULT_R: Field = Field::new(Register::Control, 0b1, 4);
    /// Left channel over-current fault (read-only).
    pub const FAULT_L: Field = Field::new(Register::Control, 0b1, 3);
    /// Thermal shutdown fault (read-only).
    pub const FAULT_THERMAL: Field = Field::new(Register::Control, 0b1, 2);
    /// Noise gate enable (1 = enabled).
    pub const NG_EN: Field = Field::new(Register::Control, 0b1, 0);
    /// Attack time, 0–63.
    pub const ATK_TIME: Field = Field::new(Register::Attack, 0b11_1111, 0);
    /// Release time, 0–63.
    pub const REL_TIME: Field = Field::new(Register::Release, 0b11_1111, 0);
    /// Hold time, 0–63.
    pub const HOLD_TIME: Field = Field::new(Register::Hold, 0b11_1111, 0);
    /// Fixed gain, 6-bit two's complement (see [`decode_fixed_gain`]).
    pub const FIXED_GAIN: Field = Field::new(Register::Gain, 0b11_1111, 0);
    /// Output limiter disable (1 = disabled; requires 1:1 compression).
    pub const LIMITER_DISABLE: Field = Field::new(Register::Agc1, 0b1, 7);
    /// Noise gate threshold: 0 = 1 mV, 1 = 4 mV, 2 = 10 mV, 3 = 20 mV.
    pub const NG_THRESHOLD: Field = Field::new(Register::Agc1, 0b11, 5);
    /// Output limiter level, 0–31: −6.5 dBV + 0.5 dB × value.
    pub const LIMITER_LEVEL: Field = Field::new(Register::Agc1, 0b1_1111, 0);
    /// Maximum gain, 0–15: 18 dB + value.
    pub const MAX_GAIN: Field = Field::new(Register::Agc2, 0b1111, 4);
    /// Compression ratio: 0 = 1:1 (off), 1 = 2:1, 2 = 4:1, 3 = 8:1.
    pub const COMPRESSION_RATIO: Field = Field::new(Register::Agc2, 0b11, 0);

    const fn new(register: Register, mask: u8, shift: u8) -> Self {
        Self {
            register,
            mask,
            shift,
        }
    }

    /// Field mask shifted into register position.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // shift <= 7 by construction
    pub const fn in_place_mask(self) -> u8 {
        self.mask << self.shift
    }

    /// Replace this field within `reg_val` with `value`.
    ///
    /// `value` is masked to the field width; bits outside the field are
    /// preserved exactly (read-modify-write contract).
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // shift <= 7 by construction
    pub const fn insert(self, reg_val: u8, value: u8) -> u8 {
        (reg_val & !(self.mask << self.shift)) | ((value & self.mask) << self.shift)
    }

    /// Extract this field from `reg_val`, right-aligned.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // shift <= 7 by construction
    pub const fn extract(self, reg_val: u8) -> u8 {
        (reg_val >> self.shift) & self.mask
    }
}

/// Decode the 6-bit two's-complement fixed-gain field to a signed dB value.
///
/// Bit 5 is the sign bit; when set, the upper two bits of the result are
/// forced to 1 so the byte reads correctly as an `i8` in −32..=31.
/// The datasheet restricts the usable range to −28..=+30 dB.
#[must_use]
#[allow(clippy::cast_possible_wrap)] // the wrap is the sign extension
pub const fn decode_fixed_gain(raw: u8) -> i8 {
    let field = raw & 0x3F;
    if field & 0x20 != 0 {
        (field | 0xC0) as i8
    } else {
        field as i8
    }
}

/// Encode a signed dB gain into the 6-bit fixed-gain field.
#[must_use]
#[allow(clippy::cast_sign_loss)] // two's-complement reinterpretation
pub const fn encode_fixed_gain(gain: i8) -> u8 {
    (gain as u8) & 0x3F
}

/// Decoded view of the Control register fault flags.
///
/// All three flags are set and cleared by the chip; the driver never writes
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Faults {
    /// Over-current fault on the right channel.
    pub right: bool,
    /// Over-current fault on the left channel.
    pub left: bool,
    /// Die temperature above 150 °C (thermal shutdown).
    pub thermal: bool,
}

impl Faults {
    /// Decode the fault flags from a raw Control register byte.
    #[must_use]
    pub const fn from_control(raw: u8) -> Self {
        Self {
            right: Field::FAULT_R.extract(raw) != 0,
            left: Field::FAULT_L.extract(raw) != 0,
            thermal: Field::FAULT_THERMAL.extract(raw) != 0,
        }
    }

    /// Returns `true` if any fault flag is set.
    #[must_use]
    pub const fn any(self) -> bool {
        self.right || self.left || self.thermal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_addr_is_0x58() {
        assert_eq!(DEVICE_ADDR, 0x58);
    }

    #[test]
    fn register_addresses_are_correct_per_datasheet() {
        assert_eq!(Register::Control.addr(), 0x01);
        assert_eq!(Register::Attack.addr(), 0x02);
        assert_eq!(Register::Release.addr(), 0x03);
        assert_eq!(Register::Hold.addr(), 0x04);
        assert_eq!(Register::Gain.addr(), 0x05);
        assert_eq!(Register::Agc1.addr(), 0x06);
        assert_eq!(Register::Agc2.addr(), 0x07);
    }

    #[test]
    fn control_register_fields_do_not_overlap() {
        let fields = [
            Field::SPK_EN_R,
            Field::SPK_EN_L,
            Field::SWS,
            Field::FAULT_R,
            Field::FAULT_L,
            Field::FAULT_THERMAL,
            Field::NG_EN,
        ];
        let mut seen = 0u8;
        for f in fields {
            assert_eq!(seen & f.in_place_mask(), 0, "overlap at {:?}", f);
            seen |= f.in_place_mask();
        }
    }

    #[test]
    fn agc1_register_fields_do_not_overlap() {
        assert_eq!(
            Field::LIMITER_DISABLE.in_place_mask() & Field::NG_THRESHOLD.in_place_mask(),
            0
        );
        assert_eq!(
            Field::LIMITER_DISABLE.in_place_mask() & Field::LIMITER_LEVEL.in_place_mask(),
            0
        );
        assert_eq!(
            Field::NG_THRESHOLD.in_place_mask() & Field::LIMITER_LEVEL.in_place_mask(),
            0
        );
    }

    #[test]
    fn agc2_register_fields_do_not_overlap() {
        assert_eq!(
            Field::MAX_GAIN.in_place_mask() & Field::COMPRESSION_RATIO.in_place_mask(),
            0
        );
    }

    #[test]
    fn insert_preserves_other_bits() {
        // Spec vectors: right speaker on from 0x00, off from 0xFF.
        assert_eq!(Field::SPK_EN_R.insert(0b0000_0000, 1), 0b1000_0000);
        assert_eq!(Field::SPK_EN_R.insert(0b1111_1111, 0), 0b0111_1111);
    }

    #[test]
    fn insert_masks_oversized_values() {
        // A value wider than the field must not clobber neighbours.
        assert_eq!(Field::COMPRESSION_RATIO.insert(0xF0, 0xFF), 0xF3);
        assert_eq!(Field::ATK_TIME.insert(0b1100_0000, 0xFF), 0b1111_1111);
    }

    #[test]
    fn extract_noise_gate_threshold() {
        assert_eq!(Field::NG_THRESHOLD.extract(0b0110_0000), 3);
        assert_eq!(Field::NG_THRESHOLD.extract(0b0000_0000), 0);
        assert_eq!(Field::NG_THRESHOLD.extract(0b0010_0000), 1);
    }

    #[test]
    fn fixed_gain_sign_extension() {
        // Bit 5 set: 0b10_0101 -> 0b1110_0101 as signed = -27.
        assert_eq!(decode_fixed_gain(0b0010_0101), -27);
        // Bit 5 clear: no extension.
        assert_eq!(decode_fixed_gain(0b0000_1111), 15);
        // Field extremes.
        assert_eq!(decode_fixed_gain(0b0010_0000), -32);
        assert_eq!(decode_fixed_gain(0b0001_1111), 31);
        // Upper register bits are ignored.
        assert_eq!(decode_fixed_gain(0b1110_0101), decode_fixed_gain(0b0010_0101));
    }

    #[test]
    fn fixed_gain_encode_decode_round_trip() {
        for gain in -32i8..=31 {
            assert_eq!(decode_fixed_gain(encode_fixed_gain(gain)), gain);
        }
    }

    #[test]
    fn faults_decode_from_control() {
        let f = Faults::from_control(0b0001_1100);
        assert!(f.right && f.left && f.thermal);
        assert!(f.any());

        let f = Faults::from_control(0b1110_0011);
        assert!(!f.right && !f.left && !f.thermal);
        assert!(!f.any());

        let f = Faults::from_control(0b0000_0100);
        assert!(f.thermal);
        assert!(!f.right && !f.left);
    }
}
