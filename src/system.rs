//! # System control and audio API
//!
//! This module provides the general APIs to bring the Si4735 up and down, identify it,
//! and control the audio output. These are the functions required before any tuning.
//!
//! ## Available Methods
//!
//! ### Start-up and Power Management
//! - [`detect_address`] - Reset the device and find which address it answers on
//! - [`probe_address`](Si4735::probe_address) - Same as `detect_address` using the driver resources
//! - [`reset`](Si4735::reset) - Pulse the reset pin
//! - [`init`](Si4735::init) - Reset, power-up in the configured function and apply the volume
//! - [`power_up`](Si4735::power_up) - Power-up with the current configuration
//! - [`power_down`](Si4735::power_down) - Power-down (discards a loaded patch)
//!
//! ### Status and Information
//! - [`get_firmware`](Si4735::get_firmware) - Part number, firmware and chip revision
//! - [`get_int_status`](Si4735::get_int_status) - Read the interrupt status bits
//!
//! ### Audio
//! - [`set_volume`](Si4735::set_volume) / [`volume`](Si4735::volume) - Output volume (0..=63)
//! - [`volume_up`](Si4735::volume_up) / [`volume_down`](Si4735::volume_down) - One volume step
//! - [`set_audio_mute`](Si4735::set_audio_mute) - Hard mute both outputs
//! - [`digital_output_format`](Si4735::digital_output_format) / [`digital_output_sample_rate`](Si4735::digital_output_sample_rate) - Digital audio output
//!
//! ### FM Stereo Blend
//! - [`set_fm_blend_stereo_threshold`](Si4735::set_fm_blend_stereo_threshold) / [`set_fm_blend_mono_threshold`](Si4735::set_fm_blend_mono_threshold)
//! - [`set_fm_blend_rssi_stereo_threshold`](Si4735::set_fm_blend_rssi_stereo_threshold) / [`set_fm_blend_rssi_mono_threshold`](Si4735::set_fm_blend_rssi_mono_threshold)
//! - [`set_fm_blend_snr_stereo_threshold`](Si4735::set_fm_blend_snr_stereo_threshold) / [`set_fm_blend_snr_mono_threshold`](Si4735::set_fm_blend_snr_mono_threshold)
//! - [`set_fm_blend_multipath_stereo_threshold`](Si4735::set_fm_blend_multipath_stereo_threshold) / [`set_fm_blend_multipath_mono_threshold`](Si4735::set_fm_blend_multipath_mono_threshold)
//! - [`disable_fm_debug`](Si4735::disable_fm_debug) - Turn off the FM debug feature

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub use super::cmd::cmd_system::*;
pub use super::cmd::cmd_ssb::{DigitalMode, DigitalSize};
use super::cmd::cmd_ssb::digital_output_format_value;
use super::config::DeviceAddress;
use super::constants::*;
use super::mode::ReceiveMode;
use super::status::Status;
use super::tune::TuningState;
use super::{IrqPin, Si4735, Si4735Error};

/// Largest volume accepted by the device
pub const VOLUME_MAX: u8 = 63;

async fn reset_pulse<O: OutputPin, D: DelayNs>(nreset: &mut O, delay: &mut D) -> Result<(), Si4735Error> {
    nreset.set_low().map_err(|_| Si4735Error::Pin)?;
    delay.delay_ms(DELAY_RESET_MS).await;
    nreset.set_high().map_err(|_| Si4735Error::Pin)?;
    delay.delay_ms(DELAY_RESET_MS).await;
    Ok(())
}

/// Reset the device then probe the two possible addresses (SEN low first) with a status read
pub async fn detect_address<I2C, O, D>(i2c: &mut I2C, nreset: &mut O, delay: &mut D) -> Result<DeviceAddress, Si4735Error> where
    I2C: I2c, O: OutputPin, D: DelayNs
{
    reset_pulse(nreset, delay).await?;
    let mut sts = [0u8];
    for addr in [DeviceAddress::SenLow, DeviceAddress::SenHigh] {
        if i2c.read(addr.addr(), &mut sts).await.is_ok() {
            debug!("Si4735 found at {:02x}", addr.addr());
            return Ok(addr);
        }
    }
    warn!("No Si4735 found");
    Err(Si4735Error::NotFound)
}

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    /// Reset the chip
    #[doc(alias = "system")]
    pub async fn reset(&mut self) -> Result<(), Si4735Error> {
        reset_pulse(&mut self.nreset, &mut self.delay).await?;
        self.powered = false;
        self.patch_loaded = false;
        Ok(())
    }

    /// Reset the chip and use the address it answers on
    #[doc(alias = "system")]
    pub async fn probe_address(&mut self) -> Result<DeviceAddress, Si4735Error> {
        let addr = detect_address(&mut self.i2c, &mut self.nreset, &mut self.delay).await?;
        self.cfg.address = addr;
        self.powered = false;
        self.patch_loaded = false;
        Ok(addr)
    }

    /// Reset, power-up in the configured function, apply the configured volume
    /// and return the firmware information
    #[doc(alias = "system")]
    pub async fn init(&mut self) -> Result<FirmwareRsp, Si4735Error> {
        self.power_cfg = PowerUpConfig {
            cts_irq: self.cfg.cts_irq,
            gpo2_output: self.cfg.gpo2_output,
            patch: false,
            crystal: self.cfg.crystal,
            function: self.cfg.function,
            audio: self.cfg.audio,
        };
        self.mode = ReceiveMode::from_function(self.cfg.function);
        self.tuning = TuningState::for_mode(self.mode);
        self.rds.clear();
        self.reset().await?;
        self.power_up().await?;
        let volume = self.cfg.volume;
        self.set_volume(volume).await?;
        self.get_firmware().await
    }

    /// Power-up with the current power-up configuration
    #[doc(alias = "system")]
    pub async fn power_up(&mut self) -> Result<(), Si4735Error> {
        let req = power_up_cmd(&self.power_cfg);
        self.cmd_wr(&req).await?;
        self.wait_cts().await?;
        self.delay.delay_ms(DELAY_POWER_UP_MS).await;
        self.powered = true;
        Ok(())
    }

    /// Power-down the chip. Any patch in RAM is lost.
    #[doc(alias = "system")]
    pub async fn power_down(&mut self) -> Result<(), Si4735Error> {
        self.cmd_wr(&power_down_cmd()).await?;
        self.delay.delay_us(DELAY_POWER_DOWN_US).await;
        self.powered = false;
        self.patch_loaded = false;
        Ok(())
    }

    /// Device powered up
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Read part number, firmware and chip revision
    #[doc(alias = "system")]
    pub async fn get_firmware(&mut self) -> Result<FirmwareRsp, Si4735Error> {
        let req = get_rev_req();
        let mut rsp = FirmwareRsp::new();
        self.cmd_rd_retry(&req, rsp.as_mut()).await?;
        Ok(rsp)
    }

    /// Read the status byte with the interrupt bits updated
    #[doc(alias = "system")]
    pub async fn get_int_status(&mut self) -> Result<Status, Si4735Error> {
        let req = get_int_status_req();
        let mut rsp = [0u8];
        self.cmd_rd(&req, &mut rsp).await?;
        Ok(Status::from_byte(rsp[0]))
    }

    /// Set the volume (0..=63). Larger values are ignored.
    #[doc(alias = "audio")]
    pub async fn set_volume(&mut self, volume: u8) -> Result<(), Si4735Error> {
        if volume > VOLUME_MAX {
            return Ok(());
        }
        self.send_property(PROP_RX_VOLUME, volume as u16).await?;
        self.volume = volume;
        Ok(())
    }

    /// Current volume
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Increase the volume by one (saturates at 63)
    #[doc(alias = "audio")]
    pub async fn volume_up(&mut self) -> Result<(), Si4735Error> {
        let volume = self.volume.saturating_add(1).min(VOLUME_MAX);
        self.set_volume(volume).await
    }

    /// Decrease the volume by one (saturates at 0)
    #[doc(alias = "audio")]
    pub async fn volume_down(&mut self) -> Result<(), Si4735Error> {
        let volume = self.volume.saturating_sub(1);
        self.set_volume(volume).await
    }

    /// Mute/unmute both audio outputs
    #[doc(alias = "audio")]
    pub async fn set_audio_mute(&mut self, mute: bool) -> Result<(), Si4735Error> {
        let value = if mute { 3 } else { 0 };
        self.send_property(PROP_RX_HARD_MUTE, value).await
    }

    /// Configure the digital audio output format
    #[doc(alias = "audio")]
    pub async fn digital_output_format(&mut self, size: DigitalSize, mono: bool, mode: DigitalMode, falling_edge: bool) -> Result<(), Si4735Error> {
        let value = digital_output_format_value(size, mono, mode, falling_edge);
        self.send_property(PROP_DIGITAL_OUTPUT_FORMAT, value).await
    }

    /// Digital audio sample rate in Hz (0 disables the digital output)
    #[doc(alias = "audio")]
    pub async fn digital_output_sample_rate(&mut self, rate: u16) -> Result<(), Si4735Error> {
        self.send_property(PROP_DIGITAL_OUTPUT_SAMPLE_RATE, rate).await
    }

    /// Pilot level (dB) above which the audio is full stereo
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_stereo_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_STEREO_THRESHOLD, value as u16).await
    }

    /// Pilot level (dB) below which the audio is mono
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_mono_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_MONO_THRESHOLD, value as u16).await
    }

    /// RSSI (dBµV) above which the audio is full stereo
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_rssi_stereo_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_RSSI_STEREO_THRESHOLD, value as u16).await
    }

    /// RSSI (dBµV) below which the audio is mono
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_rssi_mono_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_RSSI_MONO_THRESHOLD, value as u16).await
    }

    /// SNR (dB) above which the audio is full stereo
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_snr_stereo_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_SNR_STEREO_THRESHOLD, value as u16).await
    }

    /// SNR (dB) below which the audio is mono
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_snr_mono_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_SNR_MONO_THRESHOLD, value as u16).await
    }

    /// Multipath level (0..=100) below which the audio is full stereo
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_multipath_stereo_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_MULTIPATH_STEREO_THRESHOLD, value as u16).await
    }

    /// Multipath level (0..=100) above which the audio is mono
    #[doc(alias = "blend")]
    pub async fn set_fm_blend_multipath_mono_threshold(&mut self, value: u8) -> Result<(), Si4735Error> {
        self.send_property(PROP_FM_BLEND_MULTIPATH_MONO_THRESHOLD, value as u16).await
    }

    /// Turn off the FM debug feature (enabled by default on some revisions, it adds audio noise)
    #[doc(alias = "system")]
    pub async fn disable_fm_debug(&mut self) -> Result<(), Si4735Error> {
        let req = set_property_cmd(PROP_FM_DEBUG, 0);
        self.cmd_wr(&req).await?;
        self.delay.delay_us(DELAY_POWER_DOWN_US).await;
        Ok(())
    }
}
