//! # SSB configuration API
//!
//! Properties of the SSB demodulator, available once the patch is loaded.
//! All setters are ignored while the FM function is active.
//! The SSB_MODE property packs several fields: each individual setter updates one field
//! of the cached value and sends the whole property.
//!
//! ## Available Methods
//! - [`set_ssb_config`](Si4735::set_ssb_config) - Set all SSB_MODE fields at once
//! - [`set_ssb_bfo`](Si4735::set_ssb_bfo) - Set the BFO offset in Hz
//! - [`set_ssb_audio_bandwidth`](Si4735::set_ssb_audio_bandwidth) - Set the audio filter bandwidth
//! - [`set_ssb_sideband_cutoff_filter`](Si4735::set_ssb_sideband_cutoff_filter) - Band pass or low pass cutoff
//! - [`set_ssb_avc_divider`](Si4735::set_ssb_avc_divider) - AVC divider (SSB or SYNC)
//! - [`set_ssb_automatic_volume_control`](Si4735::set_ssb_automatic_volume_control) - Enable/disable AVC
//! - [`set_ssb_soft_mute`](Si4735::set_ssb_soft_mute) - Soft mute based on RSSI or SNR
//! - [`set_ssb_dsp_afc`](Si4735::set_ssb_dsp_afc) - Enable/disable the DSP AFC
//! - [`ssb_mode`](Si4735::ssb_mode) - Last SSB_MODE value sent

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub use super::cmd::cmd_ssb::*;
use super::constants::*;
use super::{IrqPin, Si4735, Si4735Error};

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    /// Last SSB_MODE value sent (default until a setter is called)
    pub fn ssb_mode(&self) -> &SsbMode {
        &self.ssb_mode
    }

    /// Store and send a new SSB_MODE value
    async fn apply_ssb_mode(&mut self, ssb_mode: SsbMode) -> Result<(), Si4735Error> {
        if self.mode.is_fm() {
            return Ok(());
        }
        self.ssb_mode = ssb_mode;
        self.send_property(PROP_SSB_MODE, ssb_mode.value()).await
    }

    /// Set all SSB_MODE fields
    #[doc(alias = "ssb")]
    pub async fn set_ssb_config(&mut self, audio_bw: SsbAudioBw, sideband_cutoff: u8, avc_divider: u8, avc_enable: bool, soft_mute_snr: bool, dsp_afc_disable: bool) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode {
            audio_bw: audio_bw as u8,
            sideband_cutoff, avc_divider, avc_enable, soft_mute_snr, dsp_afc_disable,
        };
        self.apply_ssb_mode(ssb_mode).await
    }

    /// Set the BFO offset in Hz, applied on top of the tuned frequency
    #[doc(alias = "ssb")]
    pub async fn set_ssb_bfo(&mut self, offset: i16) -> Result<(), Si4735Error> {
        if self.mode.is_fm() {
            return Ok(());
        }
        self.send_property(PROP_SSB_BFO, ssb_bfo_value(offset)).await
    }

    /// Set the audio filter bandwidth.
    /// Bandwidth above 2.2kHz should be used with the band pass sideband cutoff.
    #[doc(alias = "ssb")]
    pub async fn set_ssb_audio_bandwidth(&mut self, audio_bw: SsbAudioBw) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode { audio_bw: audio_bw as u8, ..self.ssb_mode };
        self.apply_ssb_mode(ssb_mode).await
    }

    /// Select the sideband cutoff filter: 0 for band pass, 1 for low pass
    #[doc(alias = "ssb")]
    pub async fn set_ssb_sideband_cutoff_filter(&mut self, sideband_cutoff: u8) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode { sideband_cutoff, ..self.ssb_mode };
        self.apply_ssb_mode(ssb_mode).await
    }

    /// Set the AVC divider: 0 in SSB mode, 3 in SYNC mode
    #[doc(alias = "ssb")]
    pub async fn set_ssb_avc_divider(&mut self, avc_divider: u8) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode { avc_divider, ..self.ssb_mode };
        self.apply_ssb_mode(ssb_mode).await
    }

    /// Enable/disable the automatic volume control
    #[doc(alias = "ssb")]
    pub async fn set_ssb_automatic_volume_control(&mut self, avc_enable: bool) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode { avc_enable, ..self.ssb_mode };
        self.apply_ssb_mode(ssb_mode).await
    }

    /// Soft mute driven by SNR (true) or RSSI (false)
    #[doc(alias = "ssb")]
    pub async fn set_ssb_soft_mute(&mut self, soft_mute_snr: bool) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode { soft_mute_snr, ..self.ssb_mode };
        self.apply_ssb_mode(ssb_mode).await
    }

    /// Enable/disable the DSP AFC
    #[doc(alias = "ssb")]
    pub async fn set_ssb_dsp_afc(&mut self, enable: bool) -> Result<(), Si4735Error> {
        let ssb_mode = SsbMode { dsp_afc_disable: !enable, ..self.ssb_mode };
        self.apply_ssb_mode(ssb_mode).await
    }
}
