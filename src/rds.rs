//! # RDS API
//!
//! The device delivers one RDS group (blocks A to D) per [`get_rds_status`](Si4735::get_rds_status).
//! Each group is fed to an [`RdsDecoder`] which rebuilds, from groups arriving in any order:
//! - the station name (group 0A/0B, 2 characters per segment, 8 characters)
//! - the radio text (group 2A, 4 characters per segment, 64 characters)
//! - the radio text (group 2B, 2 characters per segment, 32 characters)
//! - the clock time and date (group 4A)
//!
//! Text accessors only return a value when the last group received is of the matching type,
//! so the group type should be checked first. All text is cleared when the tuned frequency changes.
//!
//! ## Available Methods
//! - [`set_rds_config`](Si4735::set_rds_config) - Enable RDS and set the block error thresholds
//! - [`set_rds_int_source`](Si4735::set_rds_int_source) - Select the RDS interrupt sources
//! - [`set_rds_fifo_count`](Si4735::set_rds_fifo_count) - Number of groups raising the RDS interrupt
//! - [`get_rds_status`](Si4735::get_rds_status) - Read one group and decode it
//! - [`rds_status`](Si4735::rds_status) / [`rds`](Si4735::rds) - Last group and decoder state

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub use super::cmd::cmd_rds::*;
use super::constants::*;
use super::{IrqPin, Si4735, Si4735Error};

/// Station name length
pub const PS_LEN: usize = 8;
/// Radio text length for group 2A
pub const RT_2A_LEN: usize = 64;
/// Radio text length for group 2B
pub const RT_2B_LEN: usize = 32;

/// Date and time decoded from a group 4A
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RdsDateTime {
    /// Modified Julian Day
    pub mjd: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// UTC hour
    pub hour: u8,
    /// UTC minute
    pub minute: u8,
    /// Local offset is negative
    pub offset_negative: bool,
    /// Local offset hours
    pub offset_hours: u8,
    /// Local offset minutes (0 or 30)
    pub offset_minutes: u8,
}

impl RdsDateTime {
    /// Convert the raw group 4A fields
    pub fn from_fields(fields: &ClockTimeFields) -> Self {
        let (year, month, day) = mjd_to_date(fields.mjd);
        let offset = fields.offset_half_hours as u16 * 30;
        let offset_hours = (offset / 60) as u8;
        let offset_minutes = (offset - offset_hours as u16 * 60) as u8;
        Self {
            mjd: fields.mjd,
            year, month, day,
            hour: fields.hour,
            minute: fields.minute,
            offset_negative: fields.offset_negative,
            offset_hours,
            offset_minutes,
        }
    }

    /// Sign character of the local offset
    pub fn offset_sign(&self) -> char {
        if self.offset_negative { '-' } else { '+' }
    }
}

/// Formats as `HH:MM +HH:MM` (UTC time and local offset)
impl core::fmt::Display for RdsDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02} {}{:02}:{:02}",
            self.hour, self.minute, self.offset_sign(), self.offset_hours, self.offset_minutes)
    }
}

/// Gregorian date (year, month, day) of a Modified Julian Day
pub fn mjd_to_date(mjd: u32) -> (u16, u8, u8) {
    // Fliegel & Van Flandern
    let jd = mjd as i64 + 2_400_001;
    let mut l = jd + 68_569;
    let n = 4 * l / 146_097;
    l -= (146_097 * n + 3) / 4;
    let i = 4000 * (l + 1) / 1_461_001;
    l = l - 1461 * i / 4 + 31;
    let j = 80 * l / 2447;
    let day = l - 2447 * j / 80;
    l = j / 11;
    let month = j + 2 - 12 * l;
    let year = 100 * (n - 49) + i + l;
    (year as u16, month as u8, day as u8)
}

/// Copy characters at `offset`: CR/LF ends the text, other control or non-ASCII bytes become spaces
fn write_chars(buffer: &mut [u8], offset: usize, chars: &[u8]) {
    for (k, &c) in chars.iter().enumerate() {
        let Some(slot) = buffer.get_mut(offset + k) else {
            return;
        };
        match c {
            0x0D | 0x0A => {
                *slot = 0;
                return;
            }
            0x20..=0x7E => *slot = c,
            _ => *slot = b' ',
        }
    }
}

/// Text up to the first NUL
fn as_text(buffer: &[u8]) -> Option<&str> {
    let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    core::str::from_utf8(&buffer[..end]).ok()
}

/// RDS text accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RdsDecoder {
    /// Frequency of the previous group
    last_freq: Option<u16>,
    /// Last response read (received or not)
    last_rsp: Option<RdsStatusRsp>,
    /// Block B of the last group received
    group: Option<BlockB>,
    /// Program identification
    program_id: Option<u16>,
    /// Last text A/B flag seen in a group 2
    text_ab: Option<bool>,
    station_name: [u8; PS_LEN],
    text_2a: [u8; RT_2A_LEN],
    text_2b: [u8; RT_2B_LEN],
    date_time: Option<RdsDateTime>,
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RdsDecoder {
    /// Create a decoder with blank buffers
    pub fn new() -> Self {
        Self {
            last_freq: None,
            last_rsp: None,
            group: None,
            program_id: None,
            text_ab: None,
            station_name: [b' '; PS_LEN],
            text_2a: [b' '; RT_2A_LEN],
            text_2b: [b' '; RT_2B_LEN],
            date_time: None,
        }
    }

    /// Forget everything, as after a new RDS configuration
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Blank the three text buffers
    fn clear_text(&mut self) {
        self.station_name.fill(b' ');
        self.text_2a.fill(b' ');
        self.text_2b.fill(b' ');
        self.text_ab = None;
        self.date_time = None;
    }

    /// Decode a group read while tuned on `frequency`
    pub fn process(&mut self, frequency: u16, rsp: &RdsStatusRsp) {
        if self.last_freq != Some(frequency) {
            if self.last_freq.is_some() {
                trace!("RDS cleared on new frequency {}", frequency);
            }
            self.last_freq = Some(frequency);
            self.clear_text();
            self.program_id = None;
            self.group = None;
        }
        self.last_rsp = Some(*rsp);
        if !rsp.rds_received() {
            self.group = None;
            return;
        }
        let b = rsp.block_b();
        self.group = Some(b);
        if rsp.new_block_a() {
            self.program_id = Some(rsp.block_a());
        }
        match (b.group_type(), b.version()) {
            (0, _) => {
                let offset = b.ps_address() as usize * 2;
                write_chars(&mut self.station_name, offset, &rsp.block_d_bytes());
            }
            (2, version) => {
                let ab = b.text_ab();
                if self.text_ab.is_some_and(|prev| prev != ab) {
                    if version == 0 {
                        self.text_2a.fill(b' ');
                    } else {
                        self.text_2b.fill(b' ');
                    }
                }
                self.text_ab = Some(ab);
                if version == 0 {
                    let c = rsp.block_c_bytes();
                    let d = rsp.block_d_bytes();
                    let offset = b.text_address() as usize * 4;
                    write_chars(&mut self.text_2a, offset, &[c[0], c[1], d[0], d[1]]);
                } else {
                    let offset = b.text_address() as usize * 2;
                    write_chars(&mut self.text_2b, offset, &rsp.block_d_bytes());
                }
            }
            (4, 0) => {
                let fields = ClockTimeFields::from_blocks(b.value(), rsp.block_c(), rsp.block_d());
                self.date_time = Some(RdsDateTime::from_fields(&fields));
            }
            _ => {}
        }
    }

    /// Last response read
    pub fn last_status(&self) -> Option<&RdsStatusRsp> {
        self.last_rsp.as_ref()
    }

    /// Group type of the last group received
    pub fn group_type(&self) -> Option<u8> {
        self.group.map(|b| b.group_type())
    }

    /// Version of the last group received (0 = A, 1 = B)
    pub fn version(&self) -> Option<u8> {
        self.group.map(|b| b.version())
    }

    /// Program identification code
    pub fn program_id(&self) -> Option<u16> {
        self.program_id
    }

    /// Program type of the last group received
    pub fn program_type(&self) -> Option<u8> {
        self.group.map(|b| b.program_type())
    }

    /// Text A/B flag of the last group 2
    pub fn text_ab_flag(&self) -> Option<bool> {
        self.text_ab
    }

    fn last_is(&self, group_type: u8, version: Option<u8>) -> bool {
        self.group.is_some_and(|b| b.group_type() == group_type && version.is_none_or(|v| v == b.version()))
    }

    /// Station name, when the last group is a group 0
    pub fn station_name(&self) -> Option<&str> {
        if !self.last_is(0, None) {
            return None;
        }
        as_text(&self.station_name)
    }

    /// Radio text of groups 2A, when the last group is a group 2A
    pub fn radio_text_2a(&self) -> Option<&str> {
        if !self.last_is(2, Some(0)) {
            return None;
        }
        as_text(&self.text_2a)
    }

    /// Radio text of groups 2B, when the last group is a group 2B
    pub fn radio_text_2b(&self) -> Option<&str> {
        if !self.last_is(2, Some(1)) {
            return None;
        }
        as_text(&self.text_2b)
    }

    /// Date and time, when the last group is a group 4A
    pub fn date_time(&self) -> Option<&RdsDateTime> {
        if !self.last_is(4, Some(0)) {
            return None;
        }
        self.date_time.as_ref()
    }
}

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    /// Enable/disable RDS and set the maximum block errors (0..=3) accepted for each block.
    /// The decoder state is reset.
    #[doc(alias = "rds")]
    pub async fn set_rds_config(&mut self, enable: bool, blea: u8, bleb: u8, blec: u8, bled: u8) -> Result<(), Si4735Error> {
        self.rds.clear();
        let value = rds_config_value(enable, blea, bleb, blec, bled);
        self.send_property(PROP_FM_RDS_CONFIG, value).await
    }

    /// Select which RDS events raise the RDS interrupt (FM only)
    #[doc(alias = "rds")]
    pub async fn set_rds_int_source(&mut self, new_block_b: bool, new_block_a: bool, sync_found: bool, sync_lost: bool, recv: bool) -> Result<(), Si4735Error> {
        if !self.mode.is_fm() {
            return Ok(());
        }
        let value = rds_int_source_value(new_block_b, new_block_a, sync_found, sync_lost, recv);
        self.send_property(PROP_FM_RDS_INT_SOURCE, value).await
    }

    /// Number of groups in the FIFO before the RDSRECV interrupt (FM only)
    #[doc(alias = "rds")]
    pub async fn set_rds_fifo_count(&mut self, count: u8) -> Result<(), Si4735Error> {
        if !self.mode.is_fm() {
            return Ok(());
        }
        self.send_property(PROP_FM_RDS_INT_FIFO_COUNT, count as u16).await
    }

    /// Read one RDS group and feed it to the decoder.
    /// Returns `None` without bus access outside FM.
    #[doc(alias = "rds")]
    pub async fn get_rds_status(&mut self, intack: bool, mtfifo: bool, status_only: bool) -> Result<Option<RdsStatusRsp>, Si4735Error> {
        if !self.mode.is_fm() {
            return Ok(None);
        }
        let req = fm_rds_status_req(intack, mtfifo, status_only);
        let mut rsp = RdsStatusRsp::new();
        self.cmd_rd_retry(&req, rsp.as_mut()).await?;
        self.delay.delay_us(DELAY_PROPERTY_US).await;
        let freq = self.tuning.frequency;
        self.rds.process(freq, &rsp);
        Ok(Some(rsp))
    }

    /// Last RDS group read
    pub fn rds_status(&self) -> Option<&RdsStatusRsp> {
        self.rds.last_status()
    }

    /// RDS decoder state
    pub fn rds(&self) -> &RdsDecoder {
        &self.rds
    }
}
