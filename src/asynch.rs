//! Async TPA2016D2 driver (`async` feature).
//!
//! Mirrors the blocking [`crate::Tpa2016d2`] over
//! `embedded_hal_async::i2c::I2c`. Operation semantics, field encodings and
//! the read-modify-write contract are identical; see the blocking driver and
//! [`crate::registers`] for the details.

use embedded_hal_async::i2c::I2c;

use crate::error::Error;
use crate::registers::{decode_fixed_gain, encode_fixed_gain, Faults, Field, Register, DEVICE_ADDR};

/// TPA2016D2 driver over an async I²C bus.
///
/// Same single-master assumption as the blocking driver: read-modify-write
/// sequences are not atomic across their two transactions, and the driver
/// holds no shadow state.
pub struct Tpa2016d2<I> {
    i2c: I,
}

impl<I: I2c> Tpa2016d2<I> {
    /// Create a new driver from a configured async I²C peripheral.
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Destroy the driver and release the bus.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Write a raw byte to a register.
    pub async fn write_register(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        self.i2c.write(DEVICE_ADDR, &[register.addr(), value]).await?;
        Ok(())
    }

    /// Read a raw byte from a register (one address byte out, one data byte
    /// back in a combined transaction).
    pub async fn read_register(&mut self, register: Register) -> Result<u8, Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(DEVICE_ADDR, &[register.addr()], &mut buf)
            .await?;
        let [value] = buf;
        Ok(value)
    }

    /// Read-modify-write one field; a failed read aborts before writing.
    async fn modify_field(&mut self, field: Field, value: u8) -> Result<(), Error<I::Error>> {
        let old = self.read_register(field.register).await?;
        self.write_register(field.register, field.insert(old, value))
            .await
    }

    async fn read_field(&mut self, field: Field) -> Result<u8, Error<I::Error>> {
        Ok(field.extract(self.read_register(field.register).await?))
    }

    /// Enable both speaker channels in a single read-modify-write.
    pub async fn enable_speakers(&mut self) -> Result<(), Error<I::Error>> {
        let old = self.read_register(Register::Control).await?;
        let new = Field::SPK_EN_L.insert(Field::SPK_EN_R.insert(old, 1), 1);
        self.write_register(Register::Control, new).await
    }

    /// Disable (mute) both speaker channels in a single read-modify-write.
    pub async fn disable_speakers(&mut self) -> Result<(), Error<I::Error>> {
        let old = self.read_register(Register::Control).await?;
        let new = Field::SPK_EN_L.insert(Field::SPK_EN_R.insert(old, 0), 0);
        self.write_register(Register::Control, new).await
    }

    /// Enable the right speaker channel.
    pub async fn enable_right_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_R, 1).await
    }

    /// Disable (mute) the right speaker channel.
    pub async fn disable_right_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_R, 0).await
    }

    /// Enable the left speaker channel.
    pub async fn enable_left_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_L, 1).await
    }

    /// Disable (mute) the left speaker channel.
    pub async fn disable_left_speaker(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SPK_EN_L, 0).await
    }

    /// Enter software shutdown.
    pub async fn enable_shutdown(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SWS, 1).await
    }

    /// Leave software shutdown.
    pub async fn disable_shutdown(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::SWS, 0).await
    }

    /// Read the three fault flags.
    pub async fn read_faults(&mut self) -> Result<Faults, Error<I::Error>> {
        Ok(Faults::from_control(
            self.read_register(Register::Control).await?,
        ))
    }

    /// Enable the noise gate.
    pub async fn enable_noise_gate(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::NG_EN, 1).await
    }

    /// Disable the noise gate.
    pub async fn disable_noise_gate(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::NG_EN, 0).await
    }

    /// Set the AGC attack time, 0–63 (masked).
    pub async fn write_attack(&mut self, attack: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::ATK_TIME, attack).await
    }

    /// Read the AGC attack time.
    pub async fn read_attack(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::ATK_TIME).await
    }

    /// Set the AGC release time, 0–63 (masked).
    pub async fn write_release(&mut self, release: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::REL_TIME, release).await
    }

    /// Read the AGC release time.
    pub async fn read_release(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::REL_TIME).await
    }

    /// Set the AGC hold time, 0–63 (masked).
    pub async fn write_hold(&mut self, hold: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::HOLD_TIME, hold).await
    }

    /// Read the AGC hold time.
    pub async fn read_hold(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::HOLD_TIME).await
    }

    /// Set the fixed gain in dB (truncated to the 6-bit field).
    pub async fn write_fixed_gain(&mut self, gain: i8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::FIXED_GAIN, encode_fixed_gain(gain))
            .await
    }

    /// Read the fixed gain in dB, sign-extended.
    pub async fn read_fixed_gain(&mut self) -> Result<i8, Error<I::Error>> {
        Ok(decode_fixed_gain(self.read_register(Register::Gain).await?))
    }

    /// Set the maximum AGC gain, 0–15 (masked).
    pub async fn write_max_gain(&mut self, max_gain: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::MAX_GAIN, max_gain).await
    }

    /// Read the maximum AGC gain.
    pub async fn read_max_gain(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::MAX_GAIN).await
    }

    /// Enable the output limiter.
    pub async fn enable_limiter(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::LIMITER_DISABLE, 0).await
    }

    /// Disable the output limiter, forcing the compression ratio to 1:1
    /// first (hardware precondition). If the AGC2 leg fails, AGC1 is never
    /// touched.
    pub async fn disable_limiter(&mut self) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::COMPRESSION_RATIO, 0).await?;
        self.modify_field(Field::LIMITER_DISABLE, 1).await
    }

    /// Set the noise gate threshold, 0–3 (masked).
    pub async fn write_noise_gate_threshold(
        &mut self,
        threshold: u8,
    ) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::NG_THRESHOLD, threshold).await
    }

    /// Read the noise gate threshold.
    pub async fn read_noise_gate_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::NG_THRESHOLD).await
    }

    /// Set the output limiter level, 0–31 (masked).
    pub async fn write_output_limiter_level(&mut self, level: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::LIMITER_LEVEL, level).await
    }

    /// Read the output limiter level.
    pub async fn read_output_limiter_level(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::LIMITER_LEVEL).await
    }

    /// Set the compression ratio, 0–3 (masked).
    pub async fn write_compression_ratio(&mut self, ratio: u8) -> Result<(), Error<I::Error>> {
        self.modify_field(Field::COMPRESSION_RATIO, ratio).await
    }

    /// Read the compression ratio.
    pub async fn read_compression_ratio(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_field(Field::COMPRESSION_RATIO).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    use super::*;

    #[tokio::test]
    async fn async_rmw_matches_blocking_framing() {
        let mut amp = Tpa2016d2::new(Mock::new(&[
            Transaction::write_read(DEVICE_ADDR, vec![0x01], vec![0x00]),
            Transaction::write(DEVICE_ADDR, vec![0x01, 0b1000_0000]),
        ]));
        amp.enable_right_speaker().await.unwrap();
        amp.release().done();
    }

    #[tokio::test]
    async fn async_read_fixed_gain_sign_extends() {
        let mut amp = Tpa2016d2::new(Mock::new(&[Transaction::write_read(
            DEVICE_ADDR,
            vec![0x05],
            vec![0b0010_0101],
        )]));
        assert_eq!(amp.read_fixed_gain().await.unwrap(), -27);
        amp.release().done();
    }
}
