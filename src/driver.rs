//! Blocking TPA2016D2 driver.
//!
//! Communicates with the chip via I²C using the `embedded_hal::i2c::I2c`
//! trait so it is HAL-agnostic. The audio signal itself never passes through
//! this driver — the TPA2016D2 amplifies its analog inputs directly; I²C
//! only configures gain, AGC and speaker switching.

use embedded_hal::i2c::I2c;

use crate::error::Error;
use crate::registers::{decode_fixed_gain, encode_fixed_gain, Faults, Field, Register, DEVICE_ADDR};

/// TPA2016D2 driver over a blocking I²C bus.
///
/// Owns the injected bus handle; substitute a mock bus for testing. The
/// driver keeps no shadow copy of the register file — the chip is the single
/// source of truth, and every set-field operation re-reads the register
/// before writing it back. This costs one extra bus transaction per write
/// but can never go stale.
///
/// The read-modify-write sequences are not atomic across their two bus
/// transactions. The driver assumes exclusive, single-master access; callers
/// sharing it across tasks must serialize externally.
pub struct Tpa2016d2<I> {
    i2c: I,
}

impl<I: I2c> Tpa2016d2<I> {
    /// Create a new driver from a configured I²C peripheral.
    ///
    /// No bus traffic is issued; the chip powers up with both speakers
    /// enabled at 6 dB fixed gain (register defaults).
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Destroy the driver and release the bus.
    pub fn release(self) -> I {
        self.i2c
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Write a raw byte to a register.
    ///
    /// Escape hatch for values this driver has no named operation for.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<I::Error>> {
        self.i2c.write(DEVICE_ADDR, &[register.addr(), value])?;
        Ok(())
    }

    /// Read a raw byte from a register.
    ///
    /// One combined transaction: the register index out, exactly one data
    /// byte back. The HAL fails the whole transaction unless the buffer is
    /// filled, so a short read surfaces as [`Error::I2c`] and no value is
    /// returned.
    pub fn read_register(&mut self, register: Register) -> Result<u8, Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(DEVICE_ADDR, &[register.addr()], &mut buf)?;
        let [value] = buf;
        Ok(value)
    }

    /// Read-modify-write one field, preserving all other bits.
    ///
    /// A failed read aborts before anything is written.
    fn modify_field(&mut self, field: Field, value: u8) -> Result<(), Error<I::Error>> {
        let old = self.read_register(field.register)?;
        self.write_register(field.register, field.insert(old, value))
    }

    fn read_field(&mut self, field: Field) -> Result<u8, Error<I::Error>> {
        Ok(field.extract(self.read_register(field.register)?))
    }

    // ------------------------------------------------------------------
    // Speakers / shutdown / faults / noise gate (Control register)
    // ------------------------------------------------------------------

    /// Enable both speaker channels in a single read-modify-write.
    pub fn enable_speakers(&mut self) -> Result<(), Error<I::Error>> {
        let old = self.read_register(Register::Control)?;
        let new = Field::SPK_EN_L.insert(Field::SPK_EN_R.insert(old, 1), 1);
        self.write_register(Register::Control, new)
    }

    /// Disable (mute) both speaker channels in a single read-modify-write.
    pub fn disable_speakers(&mut self) -> Result<(), Error<I::Error>> {
        let old = self.read_register(Register::Control)?;
        let new = Field::SPK_EN_L.insert(Field::SPK_EN_R.insert(old, 0), 0);
        self.write_register(Register::Control, new)
    }

    /// Enable the right speaker channel.
    pub fn enable_right_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_R, 1)
    }

    /// Disable (mute) the right speaker channel.
    pub fn disable_right_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_R, 0)
    }

    /// Enable the left speaker channel.
    pub fn enable_left_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_L, 1)
    }

    /// Disable (mute) the left speaker channel.
    pub fn disable_left_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_L, 0)
    }

    /// Enter software shutdown (~1 µA draw). The register file keeps its
    /// contents and remains accessible over I²C.
    pub fn enable_shutdown(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SWS, 1)
    }

    /// Leave software shutdown.
    pub fn disable_shutdown(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SWS, 0)
    }

    /// Read the three fault flags (right / left over-current, thermal).
    pub fn read_faults(&mut self) -> Result<Faults, Error<I::Error>> {
        Ok(Faults::from_control(self.read_register(Register::Control)?))
    }

    /// Enable the noise gate.
    ///
    /// Datasheet: the noise gate only operates while the compression ratio
    /// is not 1:1.
    pub fn enable_noise_gate(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::NG_EN, 1)
    }

    /// Disable the noise gate.
    pub fn disable_noise_gate(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::NG_EN, 0)
    }

    // ------------------------------------------------------------------
    // AGC timing (Attack / Release / Hold registers)
    // ------------------------------------------------------------------

    /// Set the AGC attack time, 0–63 (0.1067 ms per step per 6 dB).
    ///
    /// Values above 63 are masked to the field width.
    pub fn write_attack(&mut self, attack: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::ATK_TIME, attack)
    }

    /// Read the AGC attack time, 0–63.
    pub fn read_attack(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::ATK_TIME)
    }

    /// Set the AGC release time, 0–63 (0.0137 s per step per 6 dB).
    ///
    /// Values above 63 are masked to the field width.
    pub fn write_release(&mut self, release: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::REL_TIME, release)
    }

    /// Read the AGC release time, 0–63.
    pub fn read_release(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::REL_TIME)
    }

    /// Set the AGC hold time, 0–63 (0.0137 s per step; 0 disables hold).
    ///
    /// Values above 63 are masked to the field width.
    pub fn write_hold(&mut self, hold: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::HOLD_TIME, hold)
    }

    /// Read the AGC hold time, 0–63.
    pub fn read_hold(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::HOLD_TIME)
    }

    // ------------------------------------------------------------------
    // Gain (Gain / AGC2 registers)
    // ------------------------------------------------------------------

    /// Set the fixed gain in dB, −32..=31 (datasheet usable range
    /// −28..=+30). Truncated to the 6-bit two's-complement field.
    pub fn write_fixed_gain(&mut self, gain: i8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::FIXED_GAIN, encode_fixed_gain(gain))
    }

    /// Read the fixed gain in dB, sign-extended from the 6-bit field.
    pub fn read_fixed_gain(&mut self) -> Result<i8, Error<I::Error>> {
        Ok(decode_fixed_gain(self.read_register(Register::Gain)?))
    }

    /// Set the maximum AGC gain, 0–15 (18 dB + value). Masked to 4 bits.
    pub fn write_max_gain(&mut self, max_gain: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::MAX_GAIN, max_gain)
    }

    /// Read the maximum AGC gain, 0–15.
    pub fn read_max_gain(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::MAX_GAIN)
    }

    // ------------------------------------------------------------------
    // Limiter / compression (AGC1 / AGC2 registers)
    // ------------------------------------------------------------------

    /// Enable the output limiter (clear AGC1 bit 7).
    pub fn enable_limiter(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::LIMITER_DISABLE, 0)
    }

    /// Disable the output limiter.
    ///
    /// Hardware precondition: the limiter can only be disabled while the
    /// compression ratio is 1:1, so this first forces the ratio to 0 (AGC2
    /// read-modify-write) and then sets the disable bit (AGC1
    /// read-modify-write). If the AGC2 leg fails, AGC1 is never touched and
    /// the error is returned.
    pub fn disable_limiter(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::COMPRESSION_RATIO, 0)?;
        self.modify_field(Field::LIMITER_DISABLE, 1)
    }

    /// Set the noise gate threshold, 0–3 (1 / 4 / 10 / 20 mV). Masked to
    /// 2 bits.
    pub fn write_noise_gate_threshold(&mut self, threshold: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::NG_THRESHOLD, threshold)
    }

    /// Read the noise gate threshold, 0–3.
    pub fn read_noise_gate_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::NG_THRESHOLD)
    }

    /// Set the output limiter level, 0–31 (−6.5 dBV + 0.5 dB × value).
    /// Masked to 5 bits.
    pub fn write_output_limiter_level(&mut self, level: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::LIMITER_LEVEL, level)
    }

    /// Read the output limiter level, 0–31.
    pub fn read_output_limiter_level(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::LIMITER_LEVEL)
    }

    /// Set the compression ratio, 0–3 (1:1, 2:1, 4:1, 8:1). Masked to
    /// 2 bits.
    ///
    /// Selecting 0 (1:1) turns AGC compression off.
    pub fn write_compression_ratio(&mut self, ratio: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::COMPRESSION_RATIO, ratio)
    }

    /// Read the compression ratio, 0–3.
    pub fn read_compression_ratio(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::COMPRESSION_RATIO)
    }
}
