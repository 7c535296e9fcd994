//! # Device status byte
//!
//! Every response from the Si4735 starts with the same status byte:
//! - bit 7: CTS, the device is ready to accept a new command
//! - bit 6: ERR, the last command failed (the host retries the read)
//! - bit 3: RSQINT, received signal quality interrupt
//! - bit 2: RDSINT, RDS data available
//! - bit 0: STCINT, seek/tune complete
//!
//! The status is also what the host polls before every command (see [`wait_cts`](crate::Si4735::wait_cts)).

/// Status byte returned first on every read
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct Status(u8);

/// Clear To Send
pub const STATUS_CTS    : u8 = 0x80;
/// Last command reported an error
pub const STATUS_ERR    : u8 = 0x40;
/// Received signal quality interrupt
pub const STATUS_RSQINT : u8 = 0x08;
/// RDS interrupt
pub const STATUS_RDSINT : u8 = 0x04;
/// Seek/Tune complete interrupt
pub const STATUS_STCINT : u8 = 0x01;

impl Status {

    /// Create a status from its raw byte
    pub fn from_byte(byte: u8) -> Status {
        Status(byte)
    }

    /// Create a status from the first byte of a response (0 if empty)
    pub fn from_slice(bytes: &[u8]) -> Status {
        Status(bytes.first().copied().unwrap_or(0))
    }

    /// Raw byte
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Device ready for a new command
    pub fn cts(&self) -> bool {
        self.0 & STATUS_CTS != 0
    }

    /// Last command failed
    pub fn err(&self) -> bool {
        self.0 & STATUS_ERR != 0
    }

    /// Received Signal Quality interrupt pending
    pub fn rsq_int(&self) -> bool {
        self.0 & STATUS_RSQINT != 0
    }

    /// RDS interrupt pending
    pub fn rds_int(&self) -> bool {
        self.0 & STATUS_RDSINT != 0
    }

    /// Seek/Tune complete
    pub fn stc_int(&self) -> bool {
        self.0 & STATUS_STCINT != 0
    }

    /// Ready and without error, i.e. exactly what the device reports after a valid patch frame
    pub fn is_clean(&self) -> bool {
        self.0 == STATUS_CTS
    }
}

impl core::fmt::Debug for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Status({:#04x}", self.0)?;
        if self.cts()     { f.write_str(" CTS")?; }
        if self.err()     { f.write_str(" ERR")?; }
        if self.rsq_int() { f.write_str(" RSQ")?; }
        if self.rds_int() { f.write_str(" RDS")?; }
        if self.stc_int() { f.write_str(" STC")?; }
        f.write_str(")")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, fmt: defmt::Formatter) {
        if self.err() {
            defmt::write!(fmt, "Command error");
        } else if self.cts() {
            defmt::write!(fmt, "Ready");
        } else {
            defmt::write!(fmt, "Busy");
        }
        if self.stc_int() {
            defmt::write!(fmt, " | STC");
        }
        if self.rds_int() {
            defmt::write!(fmt, " | RDS");
        }
        if self.rsq_int() {
            defmt::write!(fmt, " | RSQ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let s = Status::from_byte(0xC5);
        assert!(s.cts());
        assert!(s.err());
        assert!(s.rds_int());
        assert!(s.stc_int());
        assert!(!s.rsq_int());
        assert!(!s.is_clean());
        assert!(Status::from_byte(0x80).is_clean());
        assert!(!Status::from_slice(&[]).cts());
    }
}
