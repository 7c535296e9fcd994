// System commands API: power, revision, properties, interrupt status

use crate::status::Status;

pub const POWER_UP       : u8 = 0x01;
pub const GET_REV        : u8 = 0x10;
pub const POWER_DOWN     : u8 = 0x11;
pub const SET_PROPERTY   : u8 = 0x12;
pub const GET_PROPERTY   : u8 = 0x13;
pub const GET_INT_STATUS : u8 = 0x14;

/// Function selected on power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Function {
    /// FM receiver
    FmReceive = 0,
    /// AM receiver (LW/MW/SW and SSB through a patch)
    AmReceive = 1,
    /// Boot only far enough to report the library ID
    QueryLibraryId = 15,
}

/// Audio output selection (POWER_UP OPMODE field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioMode {
    /// Analog audio on LOUT/ROUT
    Analog = 0x05,
    /// Digital audio on DCLK/DFS/DIO
    Digital = 0x0B,
    /// Analog and digital outputs together
    AnalogDigital = 0xB5,
}

/// Power-up arguments sent on every power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerUpConfig {
    /// Enable the CTS interrupt
    pub cts_irq: bool,
    /// Enable the GPO2 output
    pub gpo2_output: bool,
    /// Boot from a patch downloaded after power-up
    pub patch: bool,
    /// Use the external 32.768kHz crystal
    pub crystal: bool,
    /// Receiver function
    pub function: Function,
    /// Audio output mode
    pub audio: AudioMode,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            cts_irq: false,
            gpo2_output: false,
            patch: false,
            crystal: true,
            function: Function::FmReceive,
            audio: AudioMode::Analog,
        }
    }
}

impl PowerUpConfig {
    /// First argument byte
    pub fn arg1(&self) -> u8 {
        let mut arg = self.function as u8 & 0x0F;
        if self.cts_irq { arg |= 128; }
        if self.gpo2_output { arg |= 64; }
        if self.patch { arg |= 32; }
        if self.crystal { arg |= 16; }
        arg
    }

    /// Same configuration with another function
    pub fn with_function(self, function: Function) -> Self {
        Self { function, ..self }
    }
}

/// Power-up the device with the given configuration
pub fn power_up_cmd(cfg: &PowerUpConfig) -> [u8; 3] {
    let mut cmd = [0u8; 3];
    cmd[0] = POWER_UP;

    cmd[1] |= cfg.arg1();
    cmd[2] |= cfg.audio as u8;
    cmd
}

/// Power-up in library query mode: no interrupt, no GPO2, normal boot, crystal, FUNC=15
pub fn query_library_id_cmd() -> [u8; 3] {
    [POWER_UP, 0x1F, AudioMode::Analog as u8]
}

/// Power-up in AM with the patch flag set, ready to receive a patch image
pub fn patch_power_up_cmd() -> [u8; 3] {
    [POWER_UP, 0x31, AudioMode::Analog as u8]
}

/// Power-down the device
pub fn power_down_cmd() -> [u8; 1] {
    [POWER_DOWN]
}

/// Read part number, firmware, patch and component revisions
pub fn get_rev_req() -> [u8; 1] {
    [GET_REV]
}

/// Set a device property
pub fn set_property_cmd(key: u16, value: u16) -> [u8; 6] {
    let mut cmd = [0u8; 6];
    cmd[0] = SET_PROPERTY;

    cmd[2] |= ((key >> 8) & 0xFF) as u8;
    cmd[3] |= (key & 0xFF) as u8;
    cmd[4] |= ((value >> 8) & 0xFF) as u8;
    cmd[5] |= (value & 0xFF) as u8;
    cmd
}

/// Read a device property
pub fn get_property_req(key: u16) -> [u8; 4] {
    let mut cmd = [0u8; 4];
    cmd[0] = GET_PROPERTY;

    cmd[2] |= ((key >> 8) & 0xFF) as u8;
    cmd[3] |= (key & 0xFF) as u8;
    cmd
}

/// Read the interrupt status bits
pub fn get_int_status_req() -> [u8; 1] {
    [GET_INT_STATUS]
}

// Response structs

/// Response for GET_REV command
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareRsp([u8; 9]);

impl FirmwareRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// Final two digits of the part number (0x23 for Si4735)
    pub fn part_number(&self) -> u8 {
        self.0[1]
    }

    /// Firmware major revision (ASCII)
    pub fn firmware_major(&self) -> u8 {
        self.0[2]
    }

    /// Firmware minor revision (ASCII)
    pub fn firmware_minor(&self) -> u8 {
        self.0[3]
    }

    /// Patch ID
    pub fn patch_id(&self) -> u16 {
        (self.0[5] as u16) | ((self.0[4] as u16) << 8)
    }

    /// Component major revision (ASCII)
    pub fn component_major(&self) -> u8 {
        self.0[6]
    }

    /// Component minor revision (ASCII)
    pub fn component_minor(&self) -> u8 {
        self.0[7]
    }

    /// Chip revision (ASCII)
    pub fn chip_revision(&self) -> u8 {
        self.0[8]
    }
}

impl AsMut<[u8]> for FirmwareRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl core::fmt::Debug for FirmwareRsp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FirmwareRsp")
            .field("part_number", &self.part_number())
            .field("firmware", &(self.firmware_major() as char, self.firmware_minor() as char))
            .field("patch_id", &self.patch_id())
            .field("chip_revision", &(self.chip_revision() as char))
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FirmwareRsp {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Si47{:02x} FW {}.{} patch {:04x} rev {}",
            self.part_number(),
            self.firmware_major() as char,
            self.firmware_minor() as char,
            self.patch_id(),
            self.chip_revision() as char,
        );
    }
}

/// Response for POWER_UP with FUNC=15 (library query)
#[derive(Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LibraryIdRsp([u8; 8]);

impl LibraryIdRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// Final two digits of the part number
    pub fn part_number(&self) -> u8 {
        self.0[1]
    }

    /// Firmware major revision
    pub fn firmware_major(&self) -> u8 {
        self.0[2]
    }

    /// Firmware minor revision
    pub fn firmware_minor(&self) -> u8 {
        self.0[3]
    }

    /// Chip revision
    pub fn chip_revision(&self) -> u8 {
        self.0[6]
    }

    /// Library revision
    pub fn library_id(&self) -> u8 {
        self.0[7]
    }
}

impl AsMut<[u8]> for LibraryIdRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl core::fmt::Debug for LibraryIdRsp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LibraryIdRsp")
            .field("part_number", &self.part_number())
            .field("library_id", &self.library_id())
            .finish()
    }
}

/// Response for GET_PROPERTY command
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PropertyRsp([u8; 4]);

impl PropertyRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Return Status
    pub fn status(&mut self) -> Status {
        Status::from_slice(&self.0)
    }

    /// Property value
    pub fn value(&self) -> u16 {
        (self.0[3] as u16) | ((self.0[2] as u16) << 8)
    }
}

impl AsMut<[u8]> for PropertyRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_up() {
        let cfg = PowerUpConfig::default();
        assert_eq!(power_up_cmd(&cfg), [0x01, 0x10, 0x05]);
        let cfg = PowerUpConfig {cts_irq: true, gpo2_output: true, function: Function::AmReceive, ..cfg};
        assert_eq!(power_up_cmd(&cfg), [0x01, 0xD1, 0x05]);
        let cfg = cfg.with_function(Function::FmReceive);
        assert_eq!(cfg.arg1(), 0xD0);
        assert_eq!(query_library_id_cmd(), [0x01, 0x1F, 0x05]);
        assert_eq!(patch_power_up_cmd(), [0x01, 0x31, 0x05]);
    }

    #[test]
    fn property_frames() {
        assert_eq!(set_property_cmd(0x4000, 0x003F), [0x12, 0x00, 0x40, 0x00, 0x00, 0x3F]);
        assert_eq!(set_property_cmd(0x0100, 0xFF38), [0x12, 0x00, 0x01, 0x00, 0xFF, 0x38]);
        assert_eq!(get_property_req(0x1502), [0x13, 0x00, 0x15, 0x02]);
    }

    #[test]
    fn firmware_fields() {
        let mut rsp = FirmwareRsp::new();
        rsp.as_mut().copy_from_slice(&[0x80, 0x23, b'6', b'0', 0x12, 0x34, b'2', b'0', b'D']);
        assert!(rsp.status().cts());
        assert_eq!(rsp.part_number(), 0x23);
        assert_eq!(rsp.firmware_major(), b'6');
        assert_eq!(rsp.patch_id(), 0x1234);
        assert_eq!(rsp.chip_revision(), b'D');

        let mut lib = LibraryIdRsp::new();
        lib.as_mut().copy_from_slice(&[0x80, 0x23, b'6', b'0', 0, 0, b'D', 0x05]);
        assert_eq!(lib.library_id(), 5);
        assert_eq!(lib.chip_revision(), b'D');
    }
}
