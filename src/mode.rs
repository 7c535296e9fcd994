//! # Receive mode selection
//!
//! The device runs either the FM or the AM function, and SSB is the AM function
//! extended by a patch. Changing function requires a power-down/power-up cycle,
//! after which the volume (and the AVC gain in AM) are re-applied.
//! Selecting the current mode again does nothing.
//!
//! ```text
//!   FM <──power cycle──> AM ──(patch loaded)──> SSB(LSB) <──> SSB(USB)
//!                         ^                          │
//!                         └──────power cycle─────────┘
//! ```
//!
//! ## Available Methods
//! - [`set_fm`](Si4735::set_fm) / [`set_fm_band`](Si4735::set_fm_band) - Select FM, optionally with a custom band
//! - [`set_am`](Si4735::set_am) / [`set_am_band`](Si4735::set_am_band) - Select AM, optionally with a custom band
//! - [`set_ssb`](Si4735::set_ssb) / [`set_ssb_band`](Si4735::set_ssb_band) - Select SSB (requires [`load_ssb_patch`](Si4735::load_ssb_patch))
//! - [`mode`](Si4735::mode), [`is_fm`](Si4735::is_fm), [`power_up_config`](Si4735::power_up_config), [`patch_loaded`](Si4735::patch_loaded)

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use super::cmd::cmd_system::{Function, PowerUpConfig};
pub use super::cmd::{Sideband, TuneCmd};
use super::tune::TuningState;
use super::{IrqPin, Si4735, Si4735Error};

/// Receive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveMode {
    Fm,
    Am,
    Ssb(Sideband),
}

impl ReceiveMode {
    /// Mode matching a power-up function
    pub fn from_function(function: Function) -> Self {
        match function {
            Function::FmReceive => ReceiveMode::Fm,
            _ => ReceiveMode::Am,
        }
    }

    /// FM function
    pub fn is_fm(&self) -> bool {
        matches!(self, ReceiveMode::Fm)
    }

    /// Selected sideband (SSB only)
    pub fn sideband(&self) -> Option<Sideband> {
        match self {
            ReceiveMode::Ssb(sb) => Some(*sb),
            _ => None,
        }
    }

    /// Command family used for tune/seek/status
    pub fn tune_cmd(&self) -> TuneCmd {
        if self.is_fm() { TuneCmd::Fm } else { TuneCmd::Am }
    }

    /// Power-up function
    pub fn function(&self) -> Function {
        if self.is_fm() { Function::FmReceive } else { Function::AmReceive }
    }
}

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    /// Current receive mode
    pub fn mode(&self) -> ReceiveMode {
        self.mode
    }

    /// FM function active
    pub fn is_fm(&self) -> bool {
        self.mode.is_fm()
    }

    /// Arguments used on power-up
    pub fn power_up_config(&self) -> &PowerUpConfig {
        &self.power_cfg
    }

    /// SSB patch present in the device RAM
    pub fn patch_loaded(&self) -> bool {
        self.patch_loaded
    }

    /// Power cycle into a new mode and restore the audio settings.
    /// The default band of the new family is installed when the family changes.
    async fn switch_mode(&mut self, target: ReceiveMode) -> Result<(), Si4735Error> {
        debug!("Mode {} -> {}", self.mode, target);
        let family_change = self.mode.is_fm() != target.is_fm();
        self.power_down().await?;
        self.power_cfg = self.power_cfg.with_function(target.function());
        self.power_cfg.patch = false;
        self.mode = target;
        if family_change {
            self.tuning = TuningState::for_mode(target);
        }
        self.power_up().await?;
        let volume = self.volume;
        self.set_volume(volume).await?;
        if target.is_fm() {
            self.disable_fm_debug().await
        } else {
            let gain = self.avc_max_gain;
            self.set_avc_am_max_gain(gain).await
        }
    }

    /// Select FM. Nothing is sent when already in FM.
    #[doc(alias = "mode")]
    pub async fn set_fm(&mut self) -> Result<(), Si4735Error> {
        if self.powered && self.mode == ReceiveMode::Fm {
            return Ok(());
        }
        self.switch_mode(ReceiveMode::Fm).await
    }

    /// Select AM. Nothing is sent when already in AM.
    /// Leaving SSB power cycles the device and discards the patch.
    #[doc(alias = "mode")]
    pub async fn set_am(&mut self) -> Result<(), Si4735Error> {
        if self.powered && self.mode == ReceiveMode::Am {
            return Ok(());
        }
        self.switch_mode(ReceiveMode::Am).await
    }

    /// Select FM with a custom band and tune to `initial` (replaced by `min` when outside the band)
    #[doc(alias = "mode")]
    pub async fn set_fm_band(&mut self, min: u16, max: u16, initial: u16, step: u16) -> Result<(), Si4735Error> {
        self.set_fm().await?;
        self.tuning.set_band(min, max, initial, step);
        let freq = self.tuning.frequency;
        self.set_frequency(freq).await
    }

    /// Select AM with a custom band and tune to `initial` (replaced by `min` when outside the band)
    #[doc(alias = "mode")]
    pub async fn set_am_band(&mut self, min: u16, max: u16, initial: u16, step: u16) -> Result<(), Si4735Error> {
        self.set_am().await?;
        self.tuning.set_band(min, max, initial, step);
        let freq = self.tuning.frequency;
        self.set_frequency(freq).await
    }

    /// Select SSB with the given sideband.
    ///
    /// Requires a loaded patch and AM (or SSB) as current mode. From AM the device is powered up
    /// with the AM profile without a power-down, which would discard the patch.
    /// Between LSB and USB only the sideband changes, it is applied by the next tune.
    #[doc(alias = "mode")]
    pub async fn set_ssb(&mut self, sideband: Sideband) -> Result<(), Si4735Error> {
        if !self.patch_loaded {
            return Err(Si4735Error::PatchNotLoaded);
        }
        match self.mode {
            ReceiveMode::Fm => Err(Si4735Error::WrongMode),
            ReceiveMode::Ssb(sb) => {
                if sb != sideband {
                    debug!("Sideband {} -> {}", sb, sideband);
                    self.mode = ReceiveMode::Ssb(sideband);
                }
                Ok(())
            }
            ReceiveMode::Am => {
                self.power_cfg = self.power_cfg.with_function(Function::AmReceive);
                self.power_cfg.patch = false;
                self.power_up().await?;
                let volume = self.volume;
                self.set_volume(volume).await?;
                self.mode = ReceiveMode::Ssb(sideband);
                Ok(())
            }
        }
    }

    /// Select SSB with a custom band and tune to `initial` (replaced by `min` when outside the band)
    #[doc(alias = "mode")]
    pub async fn set_ssb_band(&mut self, min: u16, max: u16, initial: u16, step: u16, sideband: Sideband) -> Result<(), Si4735Error> {
        self.set_ssb(sideband).await?;
        self.tuning.set_band(min, max, initial, step);
        let freq = self.tuning.frequency;
        self.set_frequency(freq).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_helpers() {
        assert!(ReceiveMode::Fm.is_fm());
        assert_eq!(ReceiveMode::Fm.tune_cmd(), TuneCmd::Fm);
        assert_eq!(ReceiveMode::Ssb(Sideband::Usb).tune_cmd(), TuneCmd::Am);
        assert_eq!(ReceiveMode::Ssb(Sideband::Lsb).sideband(), Some(Sideband::Lsb));
        assert_eq!(ReceiveMode::Am.sideband(), None);
        assert_eq!(ReceiveMode::from_function(Function::AmReceive), ReceiveMode::Am);
        assert_eq!(ReceiveMode::Ssb(Sideband::Lsb).function(), Function::AmReceive);
    }
}
