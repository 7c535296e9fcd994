//! # Tuning and receiver status API
//!
//! Frequencies are expressed in the device units: 10kHz in FM (10390 = 103.9MHz)
//! and 1kHz in AM/SSB (810 = 810kHz). The current frequency is cached by every
//! tuning operation so [`current_frequency`](Si4735::current_frequency) never touches the bus,
//! while [`get_frequency`](Si4735::get_frequency) reads it back from the device.
//!
//! ## Available Methods
//!
//! ### Tuning
//! - [`set_frequency`](Si4735::set_frequency) - Tune to a frequency inside the current band
//! - [`set_frequency_step`](Si4735::set_frequency_step) - Set the step used by up/down
//! - [`frequency_up`](Si4735::frequency_up) / [`frequency_down`](Si4735::frequency_down) - Step with wrap-around at the band edges
//! - [`set_tune_antenna_capacitor`](Si4735::set_tune_antenna_capacitor) - Force an antenna capacitor value (0 = automatic)
//!
//! ### Seek
//! - [`seek_station`](Si4735::seek_station) - Start a seek
//! - [`seek_station_up`](Si4735::seek_station_up) / [`seek_station_down`](Si4735::seek_station_down) - Seek and read back the frequency
//! - [`set_seek_am_limits`](Si4735::set_seek_am_limits), [`set_seek_am_spacing`](Si4735::set_seek_am_spacing),
//!   [`set_seek_snr_threshold`](Si4735::set_seek_snr_threshold), [`set_seek_rssi_threshold`](Si4735::set_seek_rssi_threshold)
//!
//! ### Status
//! - [`get_status`](Si4735::get_status) - Tune status (frequency, RSSI, SNR, antenna capacitor)
//! - [`get_frequency`](Si4735::get_frequency) - Frequency read back from the device
//! - [`get_rsq`](Si4735::get_rsq) - Received signal quality
//! - [`get_agc`](Si4735::get_agc) / [`set_agc`](Si4735::set_agc) - Automatic gain control
//!
//! ### AM front-end
//! - [`set_avc_am_max_gain`](Si4735::set_avc_am_max_gain) - Maximum gain of the AM automatic volume control
//! - [`set_bandwidth`](Si4735::set_bandwidth) - AM/SSB channel filter

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub use super::cmd::cmd_tune::*;
use super::constants::*;
use super::mode::ReceiveMode;
use super::{IrqPin, Si4735, Si4735Error};

/// Band limits, step and cached frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningState {
    /// Last frequency tuned or read back
    pub frequency: u16,
    /// Lowest frequency of the band
    pub min: u16,
    /// Highest frequency of the band
    pub max: u16,
    /// Step used by frequency up/down
    pub step: u16,
    /// Command family used to tune
    pub cmd: TuneCmd,
    /// Fast tuning (less accurate RSSI/SNR during the settle)
    pub fast: bool,
    /// Freeze the audio during the tune (FM only)
    pub freeze: bool,
    /// Antenna capacitor (0 = automatic)
    pub antcap: u16,
}

impl TuningState {
    /// FM broadcast band 64-108MHz starting at 103.9MHz
    pub fn fm_default() -> Self {
        Self {frequency: 10390, min: 6400, max: 10800, step: 10, cmd: TuneCmd::Fm, fast: true, freeze: true, antcap: 0}
    }

    /// AM medium wave band 520-1710kHz starting at 810kHz
    pub fn am_default() -> Self {
        Self {frequency: 810, min: 520, max: 1710, step: 10, cmd: TuneCmd::Am, fast: true, freeze: false, antcap: 0}
    }

    /// Default band for a mode family
    pub fn for_mode(mode: ReceiveMode) -> Self {
        if mode.is_fm() { Self::fm_default() } else { Self::am_default() }
    }

    /// Replace the band limits and step; an initial frequency outside [min,max] is replaced by min
    pub fn set_band(&mut self, min: u16, max: u16, initial: u16, step: u16) {
        self.min = min;
        self.max = max;
        self.step = step;
        self.frequency = if initial < min || initial > max { min } else { initial };
    }

    /// Frequency one step above, wrapping to min past max
    pub fn next_up(&self) -> u16 {
        match self.frequency.checked_add(self.step) {
            Some(f) if f <= self.max => f,
            _ => self.min,
        }
    }

    /// Frequency one step below, wrapping to max past min
    pub fn next_down(&self) -> u16 {
        match self.frequency.checked_sub(self.step) {
            Some(f) if self.frequency > self.min && f >= self.min => f,
            _ => self.max,
        }
    }

    /// True when the frequency is inside the band
    pub fn contains(&self, freq: u16) -> bool {
        freq >= self.min && freq <= self.max
    }
}

/// Last responses of the tune status, RSQ and AGC queries
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub tune: TuneStatusRsp,
    pub rsq: RsqStatusRsp,
    pub agc: AgcStatusRsp,
}

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    /// Tune to a frequency inside the current band
    #[doc(alias = "tune")]
    pub async fn set_frequency(&mut self, freq: u16) -> Result<(), Si4735Error> {
        if !self.tuning.contains(freq) {
            return Err(Si4735Error::FrequencyOutOfRange);
        }
        let t = self.tuning;
        match t.cmd {
            TuneCmd::Fm => {
                let req = fm_tune_freq_cmd(freq, t.fast, t.freeze, t.antcap);
                self.cmd_wr(&req).await?;
            }
            TuneCmd::Am => {
                let req = am_tune_freq_cmd(freq, t.fast, self.mode.sideband(), t.antcap);
                self.cmd_wr(&req).await?;
            }
        }
        self.wait_cts().await?;
        self.tuning.frequency = freq;
        debug!("Tuned to {}", freq);
        self.delay.delay_ms(self.cfg.tune_settle_ms).await;
        Ok(())
    }

    /// Set the step used by frequency up/down
    #[doc(alias = "tune")]
    pub fn set_frequency_step(&mut self, step: u16) {
        self.tuning.step = step;
    }

    /// Tune one step up, wrapping to the bottom of the band past the top
    #[doc(alias = "tune")]
    pub async fn frequency_up(&mut self) -> Result<(), Si4735Error> {
        let freq = self.tuning.next_up();
        self.set_frequency(freq).await
    }

    /// Tune one step down, wrapping to the top of the band past the bottom
    #[doc(alias = "tune")]
    pub async fn frequency_down(&mut self) -> Result<(), Si4735Error> {
        let freq = self.tuning.next_down();
        self.set_frequency(freq).await
    }

    /// Last tuned frequency, without bus access
    pub fn current_frequency(&self) -> u16 {
        self.tuning.frequency
    }

    /// Current band and tuning parameters
    pub fn tuning(&self) -> &TuningState {
        &self.tuning
    }

    /// Antenna capacitor used by the next tune: FM 0..=191, AM 0..=6143, 0 = automatic.
    /// Values out of range are ignored.
    #[doc(alias = "tune")]
    pub fn set_tune_antenna_capacitor(&mut self, capacitor: u16) {
        let max = match self.tuning.cmd {
            TuneCmd::Fm => FM_ANTCAP_MAX,
            TuneCmd::Am => AM_ANTCAP_MAX,
        };
        if capacitor <= max {
            self.tuning.antcap = capacitor;
        }
    }

    /// Query the tune status, optionally acknowledging the STC interrupt and/or cancelling a seek.
    /// The cached frequency is refreshed from the response.
    #[doc(alias = "status")]
    pub async fn get_status(&mut self, intack: bool, cancel: bool) -> Result<TuneStatusRsp, Si4735Error> {
        let req = tune_status_req(self.tuning.cmd, intack, cancel);
        let mut rsp = TuneStatusRsp::new();
        self.cmd_rd_retry(&req, rsp.as_mut()).await?;
        self.wait_cts().await?;
        self.snapshot.tune = rsp;
        self.tuning.frequency = rsp.frequency();
        Ok(rsp)
    }

    /// Read the tuned frequency from the device (INTACK clear, CANCEL set) and refresh the cached value
    #[doc(alias = "status")]
    pub async fn get_frequency(&mut self) -> Result<u16, Si4735Error> {
        let rsp = self.get_status(false, true).await?;
        Ok(rsp.frequency())
    }

    /// Query the received signal quality (AM response only fills the first 6 bytes)
    #[doc(alias = "status")]
    pub async fn get_rsq(&mut self, intack: bool) -> Result<RsqStatusRsp, Si4735Error> {
        let req = rsq_status_req(self.tuning.cmd, intack);
        let mut rsp = RsqStatusRsp::new();
        let len = match self.tuning.cmd {
            TuneCmd::Fm => 8,
            TuneCmd::Am => 6,
        };
        self.cmd_rd(&req, &mut rsp.as_mut()[..len]).await?;
        self.snapshot.rsq = rsp;
        Ok(rsp)
    }

    /// Query the AGC state
    #[doc(alias = "status")]
    pub async fn get_agc(&mut self) -> Result<AgcStatusRsp, Si4735Error> {
        let req = agc_status_req(self.tuning.cmd);
        let mut rsp = AgcStatusRsp::new();
        self.cmd_rd_retry(&req, rsp.as_mut()).await?;
        self.snapshot.agc = rsp;
        Ok(rsp)
    }

    /// Enable/disable the AGC. When disabled, `index` selects the attenuation (0 = minimum)
    #[doc(alias = "status")]
    pub async fn set_agc(&mut self, disable: bool, index: u8) -> Result<(), Si4735Error> {
        let req = agc_override_cmd(self.tuning.cmd, disable, index);
        self.cmd_wr(&req).await?;
        self.wait_cts().await
    }

    /// Last tune status read
    pub fn tune_status(&self) -> &TuneStatusRsp {
        &self.snapshot.tune
    }

    /// Last received signal quality read
    pub fn rsq_status(&self) -> &RsqStatusRsp {
        &self.snapshot.rsq
    }

    /// Last AGC state read
    pub fn agc_status(&self) -> &AgcStatusRsp {
        &self.snapshot.agc
    }

    /// Maximum gain of the AM automatic volume control in dB (12 < gain < 193, 48dB otherwise).
    /// Re-applied each time AM is selected.
    #[doc(alias = "am")]
    pub async fn set_avc_am_max_gain(&mut self, gain: u8) -> Result<(), Si4735Error> {
        self.avc_max_gain = gain;
        self.send_property(PROP_AM_AUTOMATIC_VOLUME_CONTROL_MAX_GAIN, avc_max_gain_value(gain)).await
    }

    /// AM/SSB channel filter (0=6kHz, 1=4kHz, 2=3kHz, 3=2kHz, 4=1kHz, 5=1.8kHz, 6=2.5kHz)
    /// and power line noise filter. Ignored in FM or with an unknown filter code.
    #[doc(alias = "am")]
    pub async fn set_bandwidth(&mut self, filter: u8, power_line_filter: bool) -> Result<(), Si4735Error> {
        if self.mode.is_fm() {
            return Ok(());
        }
        let Some(value) = am_channel_filter_value(filter, power_line_filter) else {
            return Ok(());
        };
        self.send_property(PROP_AM_CHANNEL_FILTER, value).await
    }

    /// Start a seek. The destination is only known after the seek completes (see [`get_frequency`](Self::get_frequency))
    #[doc(alias = "seek")]
    pub async fn seek_station(&mut self, up: bool, wrap: bool) -> Result<(), Si4735Error> {
        match self.tuning.cmd {
            TuneCmd::Fm => self.cmd_wr(&fm_seek_start_cmd(up, wrap)).await?,
            TuneCmd::Am => self.cmd_wr(&am_seek_start_cmd(up, wrap)).await?,
        }
        self.delay.delay_ms(DELAY_SEEK_MS).await;
        Ok(())
    }

    /// Seek up with wrap-around, then read back the frequency
    #[doc(alias = "seek")]
    pub async fn seek_station_up(&mut self) -> Result<u16, Si4735Error> {
        self.seek_station(true, true).await?;
        self.delay.delay_ms(DELAY_SEEK_READBACK_MS).await;
        self.get_frequency().await
    }

    /// Seek down with wrap-around, then read back the frequency
    #[doc(alias = "seek")]
    pub async fn seek_station_down(&mut self) -> Result<u16, Si4735Error> {
        self.seek_station(false, true).await?;
        self.delay.delay_ms(DELAY_SEEK_READBACK_MS).await;
        self.get_frequency().await
    }

    /// AM seek band limits
    #[doc(alias = "seek")]
    pub async fn set_seek_am_limits(&mut self, bottom: u16, top: u16) -> Result<(), Si4735Error> {
        self.send_property(PROP_AM_SEEK_BAND_BOTTOM, bottom).await?;
        self.send_property(PROP_AM_SEEK_BAND_TOP, top).await
    }

    /// AM seek spacing (kHz)
    #[doc(alias = "seek")]
    pub async fn set_seek_am_spacing(&mut self, spacing: u16) -> Result<(), Si4735Error> {
        self.send_property(PROP_AM_SEEK_FREQ_SPACING, spacing).await
    }

    /// Minimum SNR (dB) for a seek to stop on a channel
    #[doc(alias = "seek")]
    pub async fn set_seek_snr_threshold(&mut self, value: u16) -> Result<(), Si4735Error> {
        self.send_property(PROP_AM_SEEK_SNR_THRESHOLD, value).await
    }

    /// Minimum RSSI (dBµV) for a seek to stop on a channel
    #[doc(alias = "seek")]
    pub async fn set_seek_rssi_threshold(&mut self, value: u16) -> Result<(), Si4735Error> {
        self.send_property(PROP_AM_SEEK_RSSI_THRESHOLD, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_wrap() {
        let mut t = TuningState::am_default();
        t.frequency = 1710;
        assert_eq!(t.next_up(), 520);
        t.frequency = 1700;
        assert_eq!(t.next_up(), 1710);
        t.frequency = 520;
        assert_eq!(t.next_down(), 1710);
        t.frequency = 525;
        assert_eq!(t.next_down(), 1710);
        t.frequency = 530;
        assert_eq!(t.next_down(), 520);
    }

    #[test]
    fn band_wrap_no_overflow() {
        let mut t = TuningState::fm_default();
        t.set_band(0, u16::MAX, u16::MAX, 10);
        assert_eq!(t.next_up(), 0);
        t.frequency = 5;
        assert_eq!(t.next_down(), u16::MAX);
    }

    #[test]
    fn set_band() {
        let mut t = TuningState::am_default();
        t.set_band(1800, 30000, 100, 5);
        assert_eq!(t.frequency, 1800);
        assert_eq!(t.step, 5);
        t.set_band(1800, 30000, 7100, 1);
        assert_eq!(t.frequency, 7100);
        assert!(t.contains(30000));
        assert!(!t.contains(30001));
    }
}
