//! # Driver configuration
//!
//! [`Config`] gathers every knob the driver needs at construction time: bus address,
//! readiness polling, retry bounds, settle delays and the power-up defaults.
//!
//! ```rust,no_run
//! use si4735::config::{Config, DeviceAddress, RetryLimit};
//! use si4735::cmd::cmd_system::Function;
//!
//! let cfg = Config::new(DeviceAddress::SenHigh)
//!     .with_function(Function::AmReceive)
//!     .with_volume(40)
//!     .with_error_retry(RetryLimit::Limited(20));
//! ```

use crate::cmd::cmd_system::{AudioMode, Function};

/// I2C address of the device, selected by the level of the SEN pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceAddress {
    /// SEN pin connected to ground
    #[default]
    SenLow = 0x11,
    /// SEN pin connected to VIO
    SenHigh = 0x63,
}

impl DeviceAddress {
    /// 7-bit I2C address
    pub fn addr(&self) -> u8 {
        *self as u8
    }
}

/// Bound on a polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryLimit {
    /// Keep polling until the device answers (protocol default)
    #[default]
    Unbounded,
    /// Give up after this many unsuccessful attempts
    Limited(u32),
}

impl RetryLimit {
    /// True when `attempts` failed attempts exhaust the limit
    pub fn exhausted(&self, attempts: u32) -> bool {
        match self {
            RetryLimit::Unbounded => false,
            RetryLimit::Limited(n) => attempts >= *n,
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bus address of the device
    pub address: DeviceAddress,
    /// Delay before each CTS poll (µs)
    pub cts_poll_us: u32,
    /// Bound on CTS polls before reporting [`CtsTimeout`](crate::Si4735Error::CtsTimeout)
    pub cts_retry: RetryLimit,
    /// Bound on response re-reads while the error bit is set
    pub error_retry: RetryLimit,
    /// Minimum delay after a tune command (ms)
    pub tune_settle_ms: u32,
    /// Volume applied by `init` (0..=63)
    pub volume: u8,
    /// Function used by `init`
    pub function: Function,
    /// Audio output mode
    pub audio: AudioMode,
    /// Use an external 32.768kHz crystal
    pub crystal: bool,
    /// Enable the CTS interrupt
    pub cts_irq: bool,
    /// Enable the GPO2/INT output
    pub gpo2_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DeviceAddress::SenLow,
            cts_poll_us: 300,
            cts_retry: RetryLimit::Unbounded,
            error_retry: RetryLimit::Unbounded,
            tune_settle_ms: 30,
            volume: 30,
            function: Function::FmReceive,
            audio: AudioMode::Analog,
            crystal: true,
            cts_irq: false,
            gpo2_output: false,
        }
    }
}

impl Config {
    /// Default configuration for a device at the given address
    pub fn new(address: DeviceAddress) -> Self {
        Self { address, ..Self::default() }
    }

    /// Select the function used at start-up
    pub fn with_function(self, function: Function) -> Self {
        Self { function, ..self }
    }

    /// Select the audio output mode
    pub fn with_audio(self, audio: AudioMode) -> Self {
        Self { audio, ..self }
    }

    /// Set the start-up volume (clamped to 63)
    pub fn with_volume(self, volume: u8) -> Self {
        Self { volume: volume.min(63), ..self }
    }

    /// Bound the CTS polling loop
    pub fn with_cts_retry(self, cts_retry: RetryLimit) -> Self {
        Self { cts_retry, ..self }
    }

    /// Bound the retry-on-error loop of status queries
    pub fn with_error_retry(self, error_retry: RetryLimit) -> Self {
        Self { error_retry, ..self }
    }

    /// Set the delay between two CTS polls
    pub fn with_cts_poll_us(self, cts_poll_us: u32) -> Self {
        Self { cts_poll_us, ..self }
    }

    /// Set the minimum settle delay after tuning
    pub fn with_tune_settle_ms(self, tune_settle_ms: u32) -> Self {
        Self { tune_settle_ms, ..self }
    }

    /// Enable/disable the external crystal
    pub fn with_crystal(self, crystal: bool) -> Self {
        Self { crystal, ..self }
    }

    /// Enable the interrupt output (CTS interrupt and GPO2/INT pin)
    pub fn with_irq(self, enable: bool) -> Self {
        Self { cts_irq: enable, gpo2_output: enable, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_limit() {
        assert!(!RetryLimit::Unbounded.exhausted(u32::MAX));
        assert!(!RetryLimit::Limited(3).exhausted(2));
        assert!(RetryLimit::Limited(3).exhausted(3));
        assert!(RetryLimit::Limited(0).exhausted(0));
    }

    #[test]
    fn builder() {
        let cfg = Config::new(DeviceAddress::SenHigh)
            .with_volume(99)
            .with_function(Function::AmReceive)
            .with_irq(true);
        assert_eq!(cfg.address.addr(), 0x63);
        assert_eq!(cfg.volume, 63);
        assert_eq!(cfg.function, Function::AmReceive);
        assert!(cfg.cts_irq && cfg.gpo2_output);
        assert_eq!(cfg.cts_retry, RetryLimit::Unbounded);
    }
}
