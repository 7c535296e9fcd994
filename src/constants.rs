
/// FM de-emphasis
pub const PROP_FM_DEEMPHASIS : u16 = 0x1100;
/// FM stereo blend: pilot level above which full stereo is used
pub const PROP_FM_BLEND_STEREO_THRESHOLD : u16 = 0x1105;
/// FM stereo blend: pilot level below which mono is used
pub const PROP_FM_BLEND_MONO_THRESHOLD : u16 = 0x1106;
/// FM blend: RSSI for full stereo
pub const PROP_FM_BLEND_RSSI_STEREO_THRESHOLD : u16 = 0x1800;
/// FM blend: RSSI for full mono
pub const PROP_FM_BLEND_RSSI_MONO_THRESHOLD : u16 = 0x1801;
/// FM blend: SNR for full stereo
pub const PROP_FM_BLEND_SNR_STEREO_THRESHOLD : u16 = 0x1804;
/// FM blend: SNR for full mono
pub const PROP_FM_BLEND_SNR_MONO_THRESHOLD : u16 = 0x1805;
/// FM blend: multipath for full stereo
pub const PROP_FM_BLEND_MULTIPATH_STEREO_THRESHOLD : u16 = 0x1808;
/// FM blend: multipath for full mono
pub const PROP_FM_BLEND_MULTIPATH_MONO_THRESHOLD : u16 = 0x1809;

/// RDS interrupt sources
pub const PROP_FM_RDS_INT_SOURCE : u16 = 0x1500;
/// Number of groups in the FIFO before raising RDSRECV
pub const PROP_FM_RDS_INT_FIFO_COUNT : u16 = 0x1501;
/// RDS enable and block error thresholds
pub const PROP_FM_RDS_CONFIG : u16 = 0x1502;

/// AM channel filter bandwidth and power line filter
pub const PROP_AM_CHANNEL_FILTER : u16 = 0x3102;
/// AM automatic volume control maximum gain
pub const PROP_AM_AUTOMATIC_VOLUME_CONTROL_MAX_GAIN : u16 = 0x3103;
/// AM seek lower band limit
pub const PROP_AM_SEEK_BAND_BOTTOM : u16 = 0x3400;
/// AM seek upper band limit
pub const PROP_AM_SEEK_BAND_TOP : u16 = 0x3401;
/// AM seek frequency spacing
pub const PROP_AM_SEEK_FREQ_SPACING : u16 = 0x3402;
/// AM seek SNR threshold
pub const PROP_AM_SEEK_SNR_THRESHOLD : u16 = 0x3403;
/// AM seek RSSI threshold
pub const PROP_AM_SEEK_RSSI_THRESHOLD : u16 = 0x3404;

/// SSB beat frequency offset
pub const PROP_SSB_BFO : u16 = 0x0100;
/// SSB demodulator configuration
pub const PROP_SSB_MODE : u16 = 0x0101;

/// Digital audio output format
pub const PROP_DIGITAL_OUTPUT_FORMAT : u16 = 0x0102;
/// Digital audio output sample rate
pub const PROP_DIGITAL_OUTPUT_SAMPLE_RATE : u16 = 0x0104;

/// Audio volume (0..=63)
pub const PROP_RX_VOLUME : u16 = 0x4000;
/// Hard mute of left/right outputs
pub const PROP_RX_HARD_MUTE : u16 = 0x4001;

/// Undocumented FM debug property, enabled by default on some revisions
pub const PROP_FM_DEBUG : u16 = 0xFF00;

/// Largest patch the device RAM can hold (bytes)
pub const PATCH_MAX_SIZE : usize = 15856;
/// Number of bytes sent in each patch frame
pub const PATCH_FRAME_SIZE : usize = 8;

/// Delay after a property write (µs)
pub const DELAY_PROPERTY_US : u32 = 550;
/// Delay after a power-down or a patch power-up (µs)
pub const DELAY_POWER_DOWN_US : u32 = 2500;
/// Delay after a power-up (ms)
pub const DELAY_POWER_UP_MS : u32 = 10;
/// Delay between two patch frames (µs)
pub const DELAY_PATCH_FRAME_US : u32 = 300;
/// Delay after the last patch frame (µs)
pub const DELAY_PATCH_END_US : u32 = 250;
/// Delay after starting a seek (ms)
pub const DELAY_SEEK_MS : u32 = 100;
/// Extra delay before reading back the frequency after a seek (ms)
pub const DELAY_SEEK_READBACK_MS : u32 = 50;
/// Reset pulse width and recovery (ms)
pub const DELAY_RESET_MS : u32 = 10;
