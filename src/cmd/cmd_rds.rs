// RDS commands API

use crate::status::Status;

pub const FM_RDS_STATUS : u8 = 0x24;

/// Query the RDS receiver state and pop a group from the FIFO
pub fn fm_rds_status_req(intack: bool, mtfifo: bool, status_only: bool) -> [u8; 2] {
    let mut cmd = [0u8; 2];
    cmd[0] = FM_RDS_STATUS;

    if intack { cmd[1] |= 1; }
    if mtfifo { cmd[1] |= 2; }
    if status_only { cmd[1] |= 4; }
    cmd
}

/// FM_RDS_CONFIG value: block error thresholds are 0 (no error) .. 3 (uncorrectable)
pub fn rds_config_value(enable: bool, blea: u8, bleb: u8, blec: u8, bled: u8) -> u16 {
    let mut value = 0u16;
    if enable { value |= 1; }
    value |= ((bled & 0x3) as u16) << 8;
    value |= ((blec & 0x3) as u16) << 10;
    value |= ((bleb & 0x3) as u16) << 12;
    value |= ((blea & 0x3) as u16) << 14;
    value
}

/// FM_RDS_INT_SOURCE value
pub fn rds_int_source_value(new_block_b: bool, new_block_a: bool, sync_found: bool, sync_lost: bool, recv: bool) -> u16 {
    let mut value = 0u16;
    if recv { value |= 1; }
    if sync_lost { value |= 2; }
    if sync_found { value |= 4; }
    if new_block_a { value |= 16; }
    if new_block_b { value |= 32; }
    value
}

// Response structs

/// Response for FM_RDS_STATUS command
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct RdsStatusRsp([u8; 13]);

impl RdsStatusRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a response from raw bytes
    pub fn from_bytes(bytes: [u8; 13]) -> Self {
        Self(bytes)
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// FIFO filled with at least the configured number of groups
    pub fn rds_received(&self) -> bool {
        self.0[1] & 0x1 != 0
    }

    /// Synchronization lost
    pub fn sync_lost(&self) -> bool {
        (self.0[1] >> 1) & 0x1 != 0
    }

    /// Synchronization found
    pub fn sync_found(&self) -> bool {
        (self.0[1] >> 2) & 0x1 != 0
    }

    /// Valid block A received
    pub fn new_block_a(&self) -> bool {
        (self.0[1] >> 4) & 0x1 != 0
    }

    /// Valid block B received
    pub fn new_block_b(&self) -> bool {
        (self.0[1] >> 5) & 0x1 != 0
    }

    /// RDS decoder synchronized
    pub fn sync(&self) -> bool {
        self.0[2] & 0x1 != 0
    }

    /// Data lost because of a FIFO overrun
    pub fn group_lost(&self) -> bool {
        (self.0[2] >> 2) & 0x1 != 0
    }

    /// Number of groups left in the FIFO
    pub fn fifo_used(&self) -> u8 {
        self.0[3]
    }

    /// Block A: program identification
    pub fn block_a(&self) -> u16 {
        (self.0[5] as u16) | ((self.0[4] as u16) << 8)
    }

    /// Block B: group type and content flags
    pub fn block_b(&self) -> BlockB {
        BlockB((self.0[7] as u16) | ((self.0[6] as u16) << 8))
    }

    /// Block C
    pub fn block_c(&self) -> u16 {
        (self.0[9] as u16) | ((self.0[8] as u16) << 8)
    }

    /// Block D
    pub fn block_d(&self) -> u16 {
        (self.0[11] as u16) | ((self.0[10] as u16) << 8)
    }

    /// Block C as two characters, high byte first
    pub fn block_c_bytes(&self) -> [u8; 2] {
        [self.0[8], self.0[9]]
    }

    /// Block D as two characters, high byte first
    pub fn block_d_bytes(&self) -> [u8; 2] {
        [self.0[10], self.0[11]]
    }

    /// Block A corrected errors (0 = none, 3 = uncorrectable)
    pub fn ble_a(&self) -> u8 {
        (self.0[12] >> 6) & 0x3
    }

    /// Block B corrected errors
    pub fn ble_b(&self) -> u8 {
        (self.0[12] >> 4) & 0x3
    }

    /// Block C corrected errors
    pub fn ble_c(&self) -> u8 {
        (self.0[12] >> 2) & 0x3
    }

    /// Block D corrected errors
    pub fn ble_d(&self) -> u8 {
        self.0[12] & 0x3
    }
}

impl AsMut<[u8]> for RdsStatusRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl core::fmt::Debug for RdsStatusRsp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RdsStatusRsp(sync={} fifo={} A={:04x} B={:04x} C={:04x} D={:04x})",
            self.sync(), self.fifo_used(),
            self.block_a(), self.block_b().value(), self.block_c(), self.block_d())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RdsStatusRsp {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "RDS sync={} fifo={} | {:04x} {:04x} {:04x} {:04x}",
            self.sync(), self.fifo_used(),
            self.block_a(), self.block_b().value(), self.block_c(), self.block_d());
    }
}

/// View over RDS block B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockB(pub u16);

impl BlockB {
    /// Raw value
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Group type (0..=15)
    pub fn group_type(&self) -> u8 {
        ((self.0 >> 12) & 0xF) as u8
    }

    /// Group version: 0 = A, 1 = B
    pub fn version(&self) -> u8 {
        ((self.0 >> 11) & 0x1) as u8
    }

    /// Traffic program flag
    pub fn traffic_program(&self) -> bool {
        (self.0 >> 10) & 0x1 != 0
    }

    /// Program type (0..=31)
    pub fn program_type(&self) -> u8 {
        ((self.0 >> 5) & 0x1F) as u8
    }

    /// Text A/B flag of group 2 (also the TA flag in group 0)
    pub fn text_ab(&self) -> bool {
        (self.0 >> 4) & 0x1 != 0
    }

    /// Segment address of group 2 (0..=15)
    pub fn text_address(&self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// Segment address of group 0 (0..=3)
    pub fn ps_address(&self) -> u8 {
        (self.0 & 0x3) as u8
    }
}

/// Fields of a group 4A (clock time and date)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTimeFields {
    /// Modified Julian Day
    pub mjd: u32,
    /// UTC hour
    pub hour: u8,
    /// UTC minute
    pub minute: u8,
    /// Local offset is negative
    pub offset_negative: bool,
    /// Local offset in half hours
    pub offset_half_hours: u8,
}

impl ClockTimeFields {
    /// Extract the clock-time fields from blocks B, C and D of a group 4A.
    /// Hour and minute each straddle two blocks/fields and are recombined explicitly.
    pub fn from_blocks(b: u16, c: u16, d: u16) -> Self {
        let mjd = (((b & 0x3) as u32) << 15) | ((c >> 1) as u32);
        let hour = (((c & 0x1) << 4) | ((d >> 12) & 0xF)) as u8;
        let minute = ((((d >> 8) & 0xF) << 2) | ((d >> 6) & 0x3)) as u8;
        let offset_negative = (d >> 5) & 0x1 != 0;
        let offset_half_hours = (d & 0x1F) as u8;
        Self { mjd, hour, minute, offset_negative, offset_half_hours }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rds_frames() {
        assert_eq!(fm_rds_status_req(true, false, false), [0x24, 0x01]);
        assert_eq!(fm_rds_status_req(false, true, true), [0x24, 0x06]);
        assert_eq!(rds_config_value(true, 3, 2, 1, 0), 0xE401);
        assert_eq!(rds_config_value(false, 0, 0, 0, 3), 0x0300);
        assert_eq!(rds_int_source_value(false, false, false, false, true), 0x0001);
        assert_eq!(rds_int_source_value(true, true, true, true, true), 0x0037);
    }

    #[test]
    fn status_fields() {
        let rsp = RdsStatusRsp::from_bytes([0x84, 0x15, 0x01, 3, 0xC2, 0x01, 0x25, 0x4A, b'H', b'i', b' ', b'!', 0b1001_0000]);
        assert!(rsp.rds_received());
        assert!(rsp.sync_found());
        assert!(rsp.new_block_a());
        assert!(!rsp.new_block_b());
        assert!(rsp.sync());
        assert_eq!(rsp.fifo_used(), 3);
        assert_eq!(rsp.block_a(), 0xC201);
        assert_eq!(rsp.block_c_bytes(), [b'H', b'i']);
        assert_eq!(rsp.ble_a(), 2);
        assert_eq!(rsp.ble_b(), 1);
        assert_eq!(rsp.ble_d(), 0);
        // 0x254A: group 2A, TP=1, PTY=10, A/B=0, address 10
        let b = rsp.block_b();
        assert_eq!(b.group_type(), 2);
        assert_eq!(b.version(), 0);
        assert!(b.traffic_program());
        assert_eq!(b.program_type(), 10);
        assert!(!b.text_ab());
        assert_eq!(b.text_address(), 10);
        assert_eq!(b.ps_address(), 2);
    }

    #[test]
    fn clock_time() {
        // MJD 58849 (2020-01-01), 13:45 UTC, +02:00
        let mjd: u32 = 58849;
        let b = 0x4000 | ((mjd >> 15) & 0x3) as u16;
        let c = (((mjd & 0x7FFF) as u16) << 1) | (13 >> 4);
        let d = ((13 & 0xF) << 12) | ((45 >> 2) << 8) | ((45 & 0x3) << 6) | 4;
        let t = ClockTimeFields::from_blocks(b, c, d);
        assert_eq!(t.mjd, 58849);
        assert_eq!(t.hour, 13);
        assert_eq!(t.minute, 45);
        assert!(!t.offset_negative);
        assert_eq!(t.offset_half_hours, 4);
    }
}
