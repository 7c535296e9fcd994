// Tuning commands API: tune, seek, tune status, signal quality, AGC

use crate::status::Status;

pub const FM_TUNE_FREQ    : u8 = 0x20;
pub const FM_SEEK_START   : u8 = 0x21;
pub const FM_TUNE_STATUS  : u8 = 0x22;
pub const FM_RSQ_STATUS   : u8 = 0x23;
pub const FM_AGC_STATUS   : u8 = 0x27;
pub const FM_AGC_OVERRIDE : u8 = 0x28;
pub const AM_TUNE_FREQ    : u8 = 0x40;
pub const AM_SEEK_START   : u8 = 0x41;
pub const AM_TUNE_STATUS  : u8 = 0x42;
pub const AM_RSQ_STATUS   : u8 = 0x43;
pub const AM_AGC_STATUS   : u8 = 0x47;
pub const AM_AGC_OVERRIDE : u8 = 0x48;

/// Largest FM antenna capacitor value
pub const FM_ANTCAP_MAX : u16 = 191;
/// Largest AM antenna capacitor value
pub const AM_ANTCAP_MAX : u16 = 6143;

/// Command family targeted by a tune/seek/status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuneCmd {
    /// FM_* commands (0x2x)
    Fm,
    /// AM_* commands (0x4x), shared by SSB
    Am,
}

impl TuneCmd {
    /// TUNE_FREQ opcode
    pub fn tune_opcode(&self) -> u8 {
        match self {
            TuneCmd::Fm => FM_TUNE_FREQ,
            TuneCmd::Am => AM_TUNE_FREQ,
        }
    }
}

/// Sideband selection sent in ARG1 of AM_TUNE_FREQ (USBLSB field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sideband {
    /// Lower sideband
    Lsb = 1,
    /// Upper sideband
    Usb = 2,
}

/// Tune FM: freeze enabled, antenna capacitor 0..=191 (0 = automatic, larger values forced to 0)
pub fn fm_tune_freq_cmd(freq: u16, fast: bool, freeze: bool, antcap: u16) -> [u8; 5] {
    let antcap = if antcap > FM_ANTCAP_MAX { 0 } else { antcap };
    let mut cmd = [0u8; 5];
    cmd[0] = FM_TUNE_FREQ;

    if fast { cmd[1] |= 1; }
    if freeze { cmd[1] |= 2; }
    cmd[2] |= ((freq >> 8) & 0xFF) as u8;
    cmd[3] |= (freq & 0xFF) as u8;
    cmd[4] |= (antcap & 0xFF) as u8;
    cmd
}

/// Tune AM/SSB: sideband only set in SSB, antenna capacitor 0..=6143 (0 = automatic)
pub fn am_tune_freq_cmd(freq: u16, fast: bool, sideband: Option<Sideband>, antcap: u16) -> [u8; 6] {
    let antcap = if antcap > AM_ANTCAP_MAX { 0 } else { antcap };
    let mut cmd = [0u8; 6];
    cmd[0] = AM_TUNE_FREQ;

    if fast { cmd[1] |= 1; }
    if let Some(sb) = sideband { cmd[1] |= (sb as u8) << 6; }
    cmd[2] |= ((freq >> 8) & 0xFF) as u8;
    cmd[3] |= (freq & 0xFF) as u8;
    cmd[4] |= ((antcap >> 8) & 0xFF) as u8;
    cmd[5] |= (antcap & 0xFF) as u8;
    cmd
}

fn seek_arg(up: bool, wrap: bool) -> u8 {
    let mut arg = 0;
    if up { arg |= 8; }
    if wrap { arg |= 4; }
    arg
}

/// Start an FM seek
pub fn fm_seek_start_cmd(up: bool, wrap: bool) -> [u8; 2] {
    [FM_SEEK_START, seek_arg(up, wrap)]
}

/// Start an AM seek: the 4 trailing bytes are reserved and antenna capacitor (automatic)
pub fn am_seek_start_cmd(up: bool, wrap: bool) -> [u8; 6] {
    let mut cmd = [0u8; 6];
    cmd[0] = AM_SEEK_START;

    cmd[1] |= seek_arg(up, wrap);
    cmd
}

/// Query the tune status, optionally cancelling a seek and/or acknowledging the STC interrupt
pub fn tune_status_req(kind: TuneCmd, intack: bool, cancel: bool) -> [u8; 2] {
    let mut cmd = [0u8; 2];
    cmd[0] = match kind {
        TuneCmd::Fm => FM_TUNE_STATUS,
        TuneCmd::Am => AM_TUNE_STATUS,
    };

    if intack { cmd[1] |= 1; }
    if cancel { cmd[1] |= 2; }
    cmd
}

/// Query the received signal quality
pub fn rsq_status_req(kind: TuneCmd, intack: bool) -> [u8; 2] {
    let mut cmd = [0u8; 2];
    cmd[0] = match kind {
        TuneCmd::Fm => FM_RSQ_STATUS,
        TuneCmd::Am => AM_RSQ_STATUS,
    };

    if intack { cmd[1] |= 1; }
    cmd
}

/// Query the AGC state
pub fn agc_status_req(kind: TuneCmd) -> [u8; 1] {
    match kind {
        TuneCmd::Fm => [FM_AGC_STATUS],
        TuneCmd::Am => [AM_AGC_STATUS],
    }
}

/// Enable/disable the AGC and force an attenuation index when disabled
pub fn agc_override_cmd(kind: TuneCmd, disable: bool, index: u8) -> [u8; 3] {
    let mut cmd = [0u8; 3];
    cmd[0] = match kind {
        TuneCmd::Fm => FM_AGC_OVERRIDE,
        TuneCmd::Am => AM_AGC_OVERRIDE,
    };

    if disable { cmd[1] |= 1; }
    cmd[2] |= index;
    cmd
}

/// AM_CHANNEL_FILTER value; None for a filter code outside 0..=6
pub fn am_channel_filter_value(filter: u8, power_line_filter: bool) -> Option<u16> {
    if filter > 6 {
        return None;
    }
    let mut value = (filter & 0x0F) as u16;
    if power_line_filter { value |= 1 << 8; }
    Some(value)
}

/// AM_AUTOMATIC_VOLUME_CONTROL_MAX_GAIN value: gain in dB, 48dB when outside 13..=192
pub fn avc_max_gain_value(gain: u8) -> u16 {
    let gain = if gain > 12 && gain < 193 { gain } else { 48 };
    gain as u16 * 340
}

// Response structs

/// Response for FM/AM_TUNE_STATUS command
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct TuneStatusRsp([u8; 8]);

impl TuneStatusRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// Band limit reached during a seek
    pub fn band_limit(&self) -> bool {
        (self.0[1] >> 7) & 0x1 != 0
    }

    /// AFC rail indicator
    pub fn afc_rail(&self) -> bool {
        (self.0[1] >> 1) & 0x1 != 0
    }

    /// Channel valid according to the seek thresholds
    pub fn valid(&self) -> bool {
        self.0[1] & 0x1 != 0
    }

    /// Tuned frequency (10kHz unit in FM, 1kHz in AM)
    pub fn frequency(&self) -> u16 {
        (self.0[3] as u16) | ((self.0[2] as u16) << 8)
    }

    /// Received signal strength (dBµV)
    pub fn rssi(&self) -> u8 {
        self.0[4]
    }

    /// Signal to noise ratio (dB)
    pub fn snr(&self) -> u8 {
        self.0[5]
    }

    /// Multipath indicator (FM only)
    pub fn multipath(&self) -> u8 {
        self.0[6]
    }

    /// Antenna capacitor: 8 bits in FM (byte 7), 16 bits in AM (bytes 6-7)
    pub fn antenna_cap(&self, kind: TuneCmd) -> u16 {
        match kind {
            TuneCmd::Fm => self.0[7] as u16,
            TuneCmd::Am => (self.0[7] as u16) | ((self.0[6] as u16) << 8),
        }
    }
}

impl AsMut<[u8]> for TuneStatusRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl core::fmt::Debug for TuneStatusRsp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TuneStatusRsp")
            .field("frequency", &self.frequency())
            .field("valid", &self.valid())
            .field("rssi", &self.rssi())
            .field("snr", &self.snr())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TuneStatusRsp {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Freq {} (valid={}) : RSSI={}dBuV, SNR={}dB",
            self.frequency(), self.valid(), self.rssi(), self.snr());
    }
}

/// Response for FM/AM_RSQ_STATUS command (FM is 8 bytes, AM only fills the first 6)
#[derive(Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RsqStatusRsp([u8; 8]);

impl RsqStatusRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// Interrupt flags (RSSI/SNR low/high, multipath, blend)
    pub fn intr_flags(&self) -> u8 {
        self.0[1]
    }

    /// Soft mute engaged
    pub fn soft_mute(&self) -> bool {
        (self.0[2] >> 3) & 0x1 != 0
    }

    /// AFC rail indicator
    pub fn afc_rail(&self) -> bool {
        (self.0[2] >> 1) & 0x1 != 0
    }

    /// Channel valid
    pub fn valid(&self) -> bool {
        self.0[2] & 0x1 != 0
    }

    /// Stereo pilot detected (FM only)
    pub fn pilot(&self) -> bool {
        (self.0[3] >> 7) & 0x1 != 0
    }

    /// Stereo blend in percent (FM only, 100 = full stereo)
    pub fn stereo_blend(&self) -> u8 {
        self.0[3] & 0x7F
    }

    /// Received signal strength (dBµV)
    pub fn rssi(&self) -> u8 {
        self.0[4]
    }

    /// Signal to noise ratio (dB)
    pub fn snr(&self) -> u8 {
        self.0[5]
    }

    /// Multipath indicator (FM only)
    pub fn multipath(&self) -> u8 {
        self.0[6]
    }

    /// Frequency offset in kHz (FM only)
    pub fn freq_offset(&self) -> i8 {
        self.0[7] as i8
    }
}

impl AsMut<[u8]> for RsqStatusRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl core::fmt::Debug for RsqStatusRsp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RsqStatusRsp")
            .field("valid", &self.valid())
            .field("rssi", &self.rssi())
            .field("snr", &self.snr())
            .field("pilot", &self.pilot())
            .finish()
    }
}

/// Response for FM/AM_AGC_STATUS command
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AgcStatusRsp([u8; 3]);

impl AgcStatusRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// AGC disabled
    pub fn agc_disabled(&self) -> bool {
        self.0[1] & 0x1 != 0
    }

    /// Current attenuator index
    pub fn agc_index(&self) -> u8 {
        self.0[2]
    }
}

impl AsMut<[u8]> for AgcStatusRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tune_frames() {
        // 103.9MHz = 10390 = 0x2896
        assert_eq!(fm_tune_freq_cmd(10390, false, true, 0), [0x20, 0x02, 0x28, 0x96, 0x00]);
        assert_eq!(fm_tune_freq_cmd(10390, true, false, 192), [0x20, 0x01, 0x28, 0x96, 0x00]);
        assert_eq!(fm_tune_freq_cmd(8750, false, false, 191), [0x20, 0x00, 0x22, 0x2E, 0xBF]);
        // 810kHz = 0x032A
        assert_eq!(am_tune_freq_cmd(810, false, None, 0), [0x40, 0x00, 0x03, 0x2A, 0x00, 0x00]);
        assert_eq!(am_tune_freq_cmd(7100, false, Some(Sideband::Lsb), 0x1234), [0x40, 0x40, 0x1B, 0xBC, 0x12, 0x34]);
        assert_eq!(am_tune_freq_cmd(14200, true, Some(Sideband::Usb), 6144), [0x40, 0x81, 0x37, 0x78, 0x00, 0x00]);
    }

    #[test]
    fn seek_and_status_frames() {
        assert_eq!(fm_seek_start_cmd(true, true), [0x21, 0x0C]);
        assert_eq!(fm_seek_start_cmd(false, true), [0x21, 0x04]);
        assert_eq!(am_seek_start_cmd(true, false), [0x41, 0x08, 0, 0, 0, 0]);
        assert_eq!(tune_status_req(TuneCmd::Fm, false, true), [0x22, 0x02]);
        assert_eq!(tune_status_req(TuneCmd::Am, true, false), [0x42, 0x01]);
        assert_eq!(rsq_status_req(TuneCmd::Am, true), [0x43, 0x01]);
        assert_eq!(agc_status_req(TuneCmd::Fm), [0x27]);
        assert_eq!(agc_override_cmd(TuneCmd::Am, true, 12), [0x48, 0x01, 12]);
    }

    #[test]
    fn property_values() {
        assert_eq!(am_channel_filter_value(2, true), Some(0x0102));
        assert_eq!(am_channel_filter_value(6, false), Some(6));
        assert_eq!(am_channel_filter_value(7, false), None);
        assert_eq!(avc_max_gain_value(90), 30600);
        assert_eq!(avc_max_gain_value(12), 48 * 340);
        assert_eq!(avc_max_gain_value(193), 48 * 340);
    }

    #[test]
    fn tune_status_fields() {
        let mut rsp = TuneStatusRsp::new();
        rsp.as_mut().copy_from_slice(&[0x81, 0x81, 0x28, 0x96, 45, 20, 3, 0x1F]);
        assert!(rsp.status().stc_int());
        assert!(rsp.band_limit());
        assert!(rsp.valid());
        assert_eq!(rsp.frequency(), 10390);
        assert_eq!(rsp.rssi(), 45);
        assert_eq!(rsp.snr(), 20);
        assert_eq!(rsp.antenna_cap(TuneCmd::Fm), 0x1F);
        assert_eq!(rsp.antenna_cap(TuneCmd::Am), 0x031F);

        let mut rsq = RsqStatusRsp::new();
        rsq.as_mut().copy_from_slice(&[0x80, 0, 0x09, 0xE4, 30, 12, 0, 0xFE]);
        assert!(rsq.soft_mute() && rsq.valid());
        assert!(rsq.pilot());
        assert_eq!(rsq.stereo_blend(), 100);
        assert_eq!(rsq.freq_offset(), -2);
    }
}
