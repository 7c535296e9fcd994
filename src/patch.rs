//! # Patch download API
//!
//! SSB demodulation needs a patch downloaded in the device RAM after a power-up in patch mode.
//! A patch is a sequence of 8-byte frames, each sent as one bus transaction.
//! The patch can be provided as a byte slice or read from a [`PatchStore`] (typically an I2C EEPROM)
//! holding a 2-byte big-endian length followed by the frames.
//!
//! ## Available Methods
//! - [`query_library_id`](Si4735::query_library_id) - Power-up in library query mode
//! - [`patch_power_up`](Si4735::patch_power_up) - Power-up in AM, ready to receive a patch
//! - [`download_patch`](Si4735::download_patch) - Send a patch without checking the device status
//! - [`download_patch_checked`](Si4735::download_patch_checked) - Send a patch, checking the status after each frame
//! - [`download_patch_from_store`](Si4735::download_patch_from_store) - Send a patch read from a store
//! - [`load_ssb_patch`](Si4735::load_ssb_patch) / [`load_ssb_patch_from_store`](Si4735::load_ssb_patch_from_store) - Full sequence, device left in AM with the patch loaded

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use super::cmd::cmd_system::{patch_power_up_cmd, query_library_id_cmd, Function, LibraryIdRsp};
use super::constants::*;
use super::mode::ReceiveMode;
use super::tune::TuningState;
use super::{IrqPin, Si4735, Si4735Error};

/// Byte store holding a patch image, addressed by a 16-bit offset
pub trait PatchStore {
    /// Fill `buf` with the bytes starting at `addr`
    #[allow(async_fn_in_trait)]
    async fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), Si4735Error>;
}

/// I2C EEPROM with 16-bit addressing (24LC256 and similar)
pub struct I2cEeprom<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cEeprom<I2C> {
    /// EEPROM at the given 7-bit address (0x50 with all address pins low)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> PatchStore for I2cEeprom<I2C> {
    async fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), Si4735Error> {
        self.i2c
            .write_read(self.address, &addr.to_be_bytes(), buf).await
            .map_err(|_| Si4735Error::I2c)
    }
}

/// Patch in memory (tests, images stored in flash)
impl PatchStore for &[u8] {
    async fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), Si4735Error> {
        let start = addr as usize;
        let src = self.get(start..start + buf.len()).ok_or(Si4735Error::InvalidSize)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

/// Check a patch image is made of at least one full frame and fits in the device RAM
pub fn check_patch_size(len: usize) -> Result<(), Si4735Error> {
    if len == 0 || len % PATCH_FRAME_SIZE != 0 || len > PATCH_MAX_SIZE {
        return Err(Si4735Error::InvalidSize);
    }
    Ok(())
}

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    /// Power-down then power-up in library query mode and return the library information
    #[doc(alias = "patch")]
    pub async fn query_library_id(&mut self) -> Result<LibraryIdRsp, Si4735Error> {
        self.power_down().await?;
        let req = query_library_id_cmd();
        let mut rsp = LibraryIdRsp::new();
        self.cmd_rd_retry(&req, rsp.as_mut()).await?;
        self.delay.delay_us(DELAY_POWER_DOWN_US).await;
        debug!("Library ID {}", rsp.library_id());
        Ok(rsp)
    }

    /// Power-up in AM with the patch flag set
    #[doc(alias = "patch")]
    pub async fn patch_power_up(&mut self) -> Result<(), Si4735Error> {
        self.cmd_wr(&patch_power_up_cmd()).await?;
        self.delay.delay_us(DELAY_POWER_DOWN_US).await;
        self.powered = true;
        Ok(())
    }

    /// Send a patch in 8-byte frames without checking the device status
    #[doc(alias = "patch")]
    pub async fn download_patch(&mut self, image: &[u8]) -> Result<(), Si4735Error> {
        check_patch_size(image.len())?;
        for frame in image.chunks_exact(PATCH_FRAME_SIZE) {
            self.bus_wr(frame).await?;
            self.delay.delay_us(DELAY_PATCH_FRAME_US).await;
        }
        self.delay.delay_us(DELAY_PATCH_END_US).await;
        Ok(())
    }

    /// Send one frame and check the device reports exactly CTS without error
    async fn patch_frame_checked(&mut self, frame: &[u8]) -> Result<(), Si4735Error> {
        self.bus_wr(frame).await?;
        self.wait_cts().await?;
        let status = self.read_status().await?;
        if !status.is_clean() {
            warn!("Patch frame rejected: {}", status);
            return Err(Si4735Error::PatchRejected);
        }
        Ok(())
    }

    /// Send a patch in 8-byte frames, aborting as soon as the device reports an error
    #[doc(alias = "patch")]
    pub async fn download_patch_checked(&mut self, image: &[u8]) -> Result<(), Si4735Error> {
        check_patch_size(image.len())?;
        for frame in image.chunks_exact(PATCH_FRAME_SIZE) {
            self.patch_frame_checked(frame).await?;
        }
        self.delay.delay_us(DELAY_PATCH_END_US).await;
        Ok(())
    }

    /// Send a patch read from a store: 16-bit big-endian length at offset 0, frames from offset 2.
    /// The device status is checked after each frame.
    #[doc(alias = "patch")]
    pub async fn download_patch_from_store<S: PatchStore>(&mut self, store: &mut S) -> Result<(), Si4735Error> {
        let mut header = [0u8; 2];
        store.read(0, &mut header).await?;
        let len = u16::from_be_bytes(header);
        let size = (len as usize).saturating_sub(2);
        if size < PATCH_FRAME_SIZE || size > PATCH_MAX_SIZE {
            return Err(Si4735Error::InvalidSize);
        }
        debug!("Patch of {} bytes in store", len);
        let mut frame = [0u8; PATCH_FRAME_SIZE];
        let mut offset = 2u16;
        while offset < len {
            store.read(offset, &mut frame).await?;
            self.patch_frame_checked(&frame).await?;
            offset = offset.saturating_add(PATCH_FRAME_SIZE as u16);
        }
        self.delay.delay_us(DELAY_PATCH_END_US).await;
        Ok(())
    }

    /// Device now runs the AM function with the patch in RAM
    fn patch_installed(&mut self) {
        if self.mode.is_fm() {
            self.tuning = TuningState::am_default();
        }
        self.power_cfg = self.power_cfg.with_function(Function::AmReceive);
        self.mode = ReceiveMode::Am;
        self.patch_loaded = true;
    }

    /// Query the library, power-up in patch mode and download the SSB patch.
    /// On success the device is in AM and [`set_ssb`](Self::set_ssb) becomes available.
    #[doc(alias = "patch")]
    pub async fn load_ssb_patch(&mut self, image: &[u8]) -> Result<LibraryIdRsp, Si4735Error> {
        check_patch_size(image.len())?;
        let library = self.query_library_id().await?;
        self.patch_power_up().await?;
        self.download_patch(image).await?;
        self.patch_installed();
        Ok(library)
    }

    /// Same as [`load_ssb_patch`](Self::load_ssb_patch) with the patch read from a store
    #[doc(alias = "patch")]
    pub async fn load_ssb_patch_from_store<S: PatchStore>(&mut self, store: &mut S) -> Result<LibraryIdRsp, Si4735Error> {
        let library = self.query_library_id().await?;
        self.patch_power_up().await?;
        self.download_patch_from_store(store).await?;
        self.patch_installed();
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_size() {
        assert_eq!(check_patch_size(0), Err(Si4735Error::InvalidSize));
        assert!(check_patch_size(8).is_ok());
        assert!(check_patch_size(PATCH_MAX_SIZE).is_ok());
        assert_eq!(check_patch_size(12), Err(Si4735Error::InvalidSize));
        assert_eq!(check_patch_size(PATCH_MAX_SIZE + 8), Err(Si4735Error::InvalidSize));
    }
}
