// SSB and audio output property encoders

/// SSB audio bandwidth (AUDIOBW field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SsbAudioBw {
    Bw1k2 = 0,
    Bw2k2 = 1,
    Bw3k0 = 2,
    Bw4k0 = 3,
    Bw500 = 4,
    Bw1k0 = 5,
}

/// SSB_MODE property content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SsbMode {
    /// Audio bandwidth code (0..=5), see [`SsbAudioBw`]
    pub audio_bw: u8,
    /// Sideband cutoff filter: 0 = band pass, 1 = low pass
    pub sideband_cutoff: u8,
    /// AVC divider (0 in SSB, 3 in SYNC mode)
    pub avc_divider: u8,
    /// Automatic volume control enabled
    pub avc_enable: bool,
    /// Soft mute based on SNR instead of RSSI
    pub soft_mute_snr: bool,
    /// DSP AFC disabled
    pub dsp_afc_disable: bool,
}

impl Default for SsbMode {
    fn default() -> Self {
        Self {
            audio_bw: SsbAudioBw::Bw2k2 as u8,
            sideband_cutoff: 1,
            avc_divider: 0,
            avc_enable: true,
            soft_mute_snr: false,
            dsp_afc_disable: true,
        }
    }
}

impl SsbMode {
    /// Property value
    pub fn value(&self) -> u16 {
        let mut value = (self.audio_bw & 0xF) as u16;
        value |= ((self.sideband_cutoff & 0xF) as u16) << 4;
        value |= ((self.avc_divider & 0xF) as u16) << 8;
        if self.avc_enable { value |= 1 << 12; }
        if self.soft_mute_snr { value |= 1 << 13; }
        if self.dsp_afc_disable { value |= 1 << 15; }
        value
    }
}

/// SSB_BFO property value: signed offset in Hz sent as two's complement
pub fn ssb_bfo_value(offset: i16) -> u16 {
    offset as u16
}

/// Digital audio sample size (OSIZE field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitalSize {
    Bits16 = 0,
    Bits20 = 1,
    Bits24 = 2,
    Bits8 = 3,
}

/// Digital audio framing (OMODE field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitalMode {
    I2s = 0,
    LeftJustified = 6,
    Msb1stDclk = 8,
    Msb2ndDclk = 12,
}

/// DIGITAL_OUTPUT_FORMAT value
pub fn digital_output_format_value(size: DigitalSize, mono: bool, mode: DigitalMode, falling_edge: bool) -> u16 {
    let mut value = (size as u16) & 0x3;
    if mono { value |= 1 << 2; }
    value |= ((mode as u16) & 0xF) << 3;
    if falling_edge { value |= 1 << 7; }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssb_mode() {
        assert_eq!(SsbMode::default().value(), 0x9011);
        let mode = SsbMode {audio_bw: 2, sideband_cutoff: 0, avc_divider: 3, avc_enable: false, soft_mute_snr: true, dsp_afc_disable: false};
        assert_eq!(mode.value(), 0x2302);
    }

    #[test]
    fn bfo_and_digital() {
        assert_eq!(ssb_bfo_value(-200), 0xFF38);
        assert_eq!(ssb_bfo_value(1000), 0x03E8);
        assert_eq!(digital_output_format_value(DigitalSize::Bits16, false, DigitalMode::I2s, false), 0);
        assert_eq!(digital_output_format_value(DigitalSize::Bits24, true, DigitalMode::LeftJustified, true), 0x00B6);
    }
}
