//! Driver for the Texas Instruments TPA2016D2 stereo class-D audio
//! amplifier with AGC (automatic gain control).
//!
//! The TPA2016D2 is configured over I²C (7-bit address `0x58`); the audio
//! signal itself stays in the analog domain and never passes through this
//! driver. Every named operation maps onto a bitfield read, or a
//! read-modify-write, of one of the chip's seven 8-bit registers:
//!
//! | Register | Index | Fields |
//! |----------|-------|--------|
//! | Control  | 1 | speaker enables (bits 7/6), shutdown (5), fault flags (4/3/2, read-only), noise gate enable (0) |
//! | Attack   | 2 | AGC attack time, bits 0–5 |
//! | Release  | 3 | AGC release time, bits 0–5 |
//! | Hold     | 4 | AGC hold time, bits 0–5 |
//! | Gain     | 5 | fixed gain, 6-bit two's complement |
//! | AGC1     | 6 | limiter disable (7), noise gate threshold (6–5), limiter level (4–0) |
//! | AGC2     | 7 | max gain (7–4), compression ratio (1–0) |
//!
//! Set-field operations always re-read the register first so neighbouring
//! fields are preserved exactly; the chip is the single source of truth and
//! the driver caches nothing. The two transactions of a read-modify-write
//! are not atomic — the driver assumes exclusive single-master access, and
//! concurrent callers must serialize externally.
//!
//! All failures are I²C transaction failures, surfaced as
//! [`Error::I2c`]; the driver never retries.
//!
//! # Example
//!
//! ```no_run
//! use tpa2016d2::Tpa2016d2;
//!
//! fn bring_up<I: embedded_hal::i2c::I2c>(i2c: I) -> Result<(), tpa2016d2::Error<I::Error>> {
//!     let mut amp = Tpa2016d2::new(i2c);
//!     amp.enable_speakers()?;
//!     amp.write_fixed_gain(6)?; // +6 dB
//!     amp.write_compression_ratio(2)?; // 4:1
//!     amp.write_attack(5)?;
//!     if amp.read_faults()?.any() {
//!         amp.enable_shutdown()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `async`: async driver variant over `embedded-hal-async` ([`asynch`])
//! - `defmt`: `defmt::Format` derives on public types

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

#[cfg(feature = "async")]
pub mod asynch;
mod driver;
mod error;
pub mod registers;

pub use driver::Tpa2016d2;
pub use error::Error;
pub use registers::{Faults, Field, Register, DEVICE_ADDR};
