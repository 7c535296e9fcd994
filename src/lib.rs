#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in every other module
mod fmt;

pub mod status;
pub mod config;
pub mod constants;
pub mod cmd;
pub mod system;
pub mod mode;
pub mod tune;
pub mod rds;
pub mod patch;
pub mod ssb;

use core::marker::PhantomData;

use embassy_time::{with_timeout, Duration};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal_async::{delay::DelayNs, digital::Wait, i2c::I2c};

use cmd::cmd_system::{set_property_cmd, get_property_req, PowerUpConfig, PropertyRsp};
use config::Config;
use constants::DELAY_PROPERTY_US;
use mode::ReceiveMode;
use cmd::cmd_ssb::SsbMode;
use rds::RdsDecoder;
use status::Status;
use tune::{StatusSnapshot, TuningState};

pub use cmd::{Sideband, TuneCmd};
pub use config::{DeviceAddress, RetryLimit};

/// Largest number of argument bytes a single command can carry
pub const MAX_ARGS: usize = 7;

trait Sealed{}
#[allow(private_bounds)]
/// Sealed trait to implement two flavor of the driver where
/// the interrupt line is either not connected or an input implementing the Wait trait
pub trait IrqPin: Sealed {
    type Pin;

    /// Level test of the interrupt line
    fn is_pending(pin: &mut Self::Pin) -> Result<bool, Si4735Error>;

    #[allow(async_fn_in_trait)]
    async fn wait_irq(pin: &mut Self::Pin, timeout: Duration) -> Result<(), Si4735Error>;
}

/// Interrupt line not connected
pub struct NoIrq;
/// Interrupt line connected to an input supporting async edge detection
pub struct IrqAsync<I> {
    _marker: PhantomData<I>
}
impl Sealed for NoIrq {}
impl<I> Sealed for IrqAsync<I> {}

impl IrqPin for NoIrq {
    type Pin = ();

    fn is_pending(_pin: &mut ()) -> Result<bool, Si4735Error> {
        Ok(false)
    }

    async fn wait_irq(_pin: &mut (), _timeout: Duration) -> Result<(), Si4735Error> {
        Err(Si4735Error::NoIrqPin)
    }
}

impl<I: InputPin + Wait> IrqPin for IrqAsync<I> {
    type Pin = I;

    fn is_pending(pin: &mut I) -> Result<bool, Si4735Error> {
        pin.is_high().map_err(|_| Si4735Error::Pin)
    }

    /// Wait for a rising edge on the interrupt line
    async fn wait_irq(pin: &mut I, timeout: Duration) -> Result<(), Si4735Error> {
        match with_timeout(timeout, pin.wait_for_rising_edge()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(_)) => Err(Si4735Error::Pin),
            Err(_) => Err(Si4735Error::IrqTimeout),
        }
    }
}

/// Si4735 Device
pub struct Si4735<I2C, O, D, M: IrqPin = NoIrq> {
    /// I2C bus
    i2c: I2C,
    /// Reset pin (active low)
    nreset: O,
    /// Delay provider
    delay: D,
    /// Interrupt line (GPO2/INT)
    irq: M::Pin,
    /// Driver configuration
    cfg: Config,
    /// Arguments sent on the next power-up
    power_cfg: PowerUpConfig,
    /// Current receive mode
    mode: ReceiveMode,
    /// Frequency range, step and cached frequency
    tuning: TuningState,
    /// Last tune/RSQ/AGC responses
    snapshot: StatusSnapshot,
    /// RDS text accumulator
    rds: RdsDecoder,
    /// Volume re-applied after each power-up
    volume: u8,
    /// AM automatic volume control maximum gain (dB), re-applied when entering AM
    avc_max_gain: u8,
    /// Last SSB_MODE value sent
    ssb_mode: SsbMode,
    /// A patch is loaded in the device RAM
    patch_loaded: bool,
    /// Device powered up
    powered: bool,
    /// Last status byte read from the device
    last_status: Status,
}

/// Error using the Si4735
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Si4735Error {
    /// Unable to Set/Get a pin level
    Pin,
    /// Unable to use I2C
    I2c,
    /// Device never reported Clear To Send within the retry limit
    CtsTimeout,
    /// Device kept reporting an error within the retry limit
    DeviceError,
    /// Command or patch with invalid size
    InvalidSize,
    /// Frequency outside the current band
    FrequencyOutOfRange,
    /// SSB requested without a patch loaded
    PatchNotLoaded,
    /// Device rejected a patch frame
    PatchRejected,
    /// Operation not available in the current mode
    WrongMode,
    /// No device answered on either address
    NotFound,
    /// No interrupt pin connected
    NoIrqPin,
    /// Timeout while waiting for the interrupt line
    IrqTimeout,
}

// Create driver without interrupt line
impl<I2C, O, D> Si4735<I2C, O, D, NoIrq> where
    I2C: I2c, O: OutputPin, D: DelayNs
{
    /// Create a Si4735 Device without interrupt line
    pub fn new(i2c: I2C, nreset: O, delay: D, cfg: Config) -> Self {
        Self::build(i2c, nreset, delay, (), cfg)
    }
}

// Create driver using the embassy timer as delay provider
impl<I2C, O> Si4735<I2C, O, embassy_time::Delay, NoIrq> where
    I2C: I2c, O: OutputPin
{
    /// Create a Si4735 Device without interrupt line, timed by embassy-time
    pub fn new_embassy(i2c: I2C, nreset: O, cfg: Config) -> Self {
        Self::build(i2c, nreset, embassy_time::Delay, (), cfg)
    }
}

// Create driver with interrupt line implementing wait
impl<I2C, O, D, I> Si4735<I2C, O, D, IrqAsync<I>> where
    I2C: I2c, O: OutputPin, D: DelayNs, I: InputPin + Wait
{
    /// Create a Si4735 Device with the GPO2/INT line connected.
    /// The configuration is updated to enable the CTS interrupt and the GPO2 output.
    pub fn new_with_irq(i2c: I2C, nreset: O, delay: D, irq: I, cfg: Config) -> Self {
        Self::build(i2c, nreset, delay, irq, cfg.with_irq(true))
    }
}

impl<I2C, O, D, M> Si4735<I2C, O, D, M> where
    I2C: I2c, O: OutputPin, D: DelayNs, M: IrqPin
{
    fn build(i2c: I2C, nreset: O, delay: D, irq: M::Pin, cfg: Config) -> Self {
        let power_cfg = PowerUpConfig {
            cts_irq: cfg.cts_irq,
            gpo2_output: cfg.gpo2_output,
            patch: false,
            crystal: cfg.crystal,
            function: cfg.function,
            audio: cfg.audio,
        };
        let mode = ReceiveMode::from_function(cfg.function);
        Self {
            i2c, nreset, delay, irq, cfg, power_cfg, mode,
            tuning: TuningState::for_mode(mode),
            snapshot: StatusSnapshot::default(),
            rds: RdsDecoder::new(),
            volume: cfg.volume.min(system::VOLUME_MAX),
            avc_max_gain: 48,
            ssb_mode: SsbMode::default(),
            patch_loaded: false,
            powered: false,
            last_status: Status::default(),
        }
    }

    /// Release the bus, the reset pin and the delay provider
    pub fn release(self) -> (I2C, O, D) {
        (self.i2c, self.nreset, self.delay)
    }

    /// Driver configuration
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Device I2C address
    pub fn address(&self) -> u8 {
        self.cfg.address.addr()
    }

    /// Last status byte read from the device
    pub fn last_status(&self) -> Status {
        self.last_status
    }

    /// Level of the interrupt line (always false without interrupt pin)
    pub fn is_irq_pending(&mut self) -> Result<bool, Si4735Error> {
        M::is_pending(&mut self.irq)
    }

    /// Wait for a rising edge on the interrupt line
    pub async fn wait_irq(&mut self, timeout: Duration) -> Result<(), Si4735Error> {
        M::wait_irq(&mut self.irq, timeout).await
    }

    /// Read only the status byte
    async fn read_status(&mut self) -> Result<Status, Si4735Error> {
        let mut sts = [0u8];
        let addr = self.address();
        self.i2c
            .read(addr, &mut sts).await
            .map_err(|_| Si4735Error::I2c)?;
        self.last_status = Status::from_byte(sts[0]);
        Ok(self.last_status)
    }

    /// Wait for the device to be ready for a command, i.e. CTS bit set in the status byte
    pub async fn wait_cts(&mut self) -> Result<(), Si4735Error> {
        let mut attempts = 0u32;
        loop {
            self.delay.delay_us(self.cfg.cts_poll_us).await;
            if self.read_status().await?.cts() {
                return Ok(());
            }
            attempts += 1;
            if self.cfg.cts_retry.exhausted(attempts) {
                warn!("CTS not set after {} polls", attempts);
                return Err(Si4735Error::CtsTimeout);
            }
        }
    }

    /// Write raw bytes in one transaction, no readiness check
    async fn bus_wr(&mut self, bytes: &[u8]) -> Result<(), Si4735Error> {
        let addr = self.address();
        self.i2c
            .write(addr, bytes).await
            .map_err(|_| Si4735Error::I2c)
    }

    /// Wait for CTS then write a command (opcode and up to 7 arguments)
    pub async fn cmd_wr(&mut self, req: &[u8]) -> Result<(), Si4735Error> {
        if req.is_empty() || req.len() > MAX_ARGS + 1 {
            return Err(Si4735Error::InvalidSize);
        }
        trace!("[CMD WR] {:02x}", req);
        self.wait_cts().await?;
        self.bus_wr(req).await
    }

    /// Write a command and read its response once
    pub async fn cmd_rd(&mut self, req: &[u8], rsp: &mut [u8]) -> Result<(), Si4735Error> {
        self.cmd_wr(req).await?;
        self.rsp_rd(rsp).await
    }

    /// Write a command and read its response, reading again while the error bit is set
    pub async fn cmd_rd_retry(&mut self, req: &[u8], rsp: &mut [u8]) -> Result<(), Si4735Error> {
        self.cmd_wr(req).await?;
        let mut attempts = 0u32;
        loop {
            self.rsp_rd(rsp).await?;
            if !self.last_status.err() {
                return Ok(());
            }
            attempts += 1;
            if self.cfg.error_retry.exhausted(attempts) {
                warn!("Command {:02x} still failing after {} reads", req[0], attempts);
                return Err(Si4735Error::DeviceError);
            }
        }
    }

    /// Wait for CTS then read a response
    async fn rsp_rd(&mut self, rsp: &mut [u8]) -> Result<(), Si4735Error> {
        self.wait_cts().await?;
        let addr = self.address();
        self.i2c
            .read(addr, rsp).await
            .map_err(|_| Si4735Error::I2c)?;
        trace!("[CMD RD] {:02x}", rsp);
        self.last_status = Status::from_slice(rsp);
        Ok(())
    }

    /// Send a command with its argument bytes
    pub async fn send_command(&mut self, code: u8, args: &[u8]) -> Result<(), Si4735Error> {
        if args.len() > MAX_ARGS {
            return Err(Si4735Error::InvalidSize);
        }
        let mut req = [0u8; MAX_ARGS + 1];
        req[0] = code;
        req[1..=args.len()].copy_from_slice(args);
        self.cmd_wr(&req[..=args.len()]).await
    }

    /// Send a command with its argument bytes and read the response (retried while the error bit is set)
    pub async fn send_command_rsp(&mut self, code: u8, args: &[u8], rsp: &mut [u8]) -> Result<(), Si4735Error> {
        if args.len() > MAX_ARGS {
            return Err(Si4735Error::InvalidSize);
        }
        let mut req = [0u8; MAX_ARGS + 1];
        req[0] = code;
        req[1..=args.len()].copy_from_slice(args);
        self.cmd_rd_retry(&req[..=args.len()], rsp).await
    }

    /// Set a property and wait for the device to apply it
    pub async fn send_property(&mut self, key: u16, value: u16) -> Result<(), Si4735Error> {
        debug!("Property {:04x} = {:04x}", key, value);
        let req = set_property_cmd(key, value);
        self.cmd_wr(&req).await?;
        self.delay.delay_us(DELAY_PROPERTY_US).await;
        Ok(())
    }

    /// Read a property value
    pub async fn get_property(&mut self, key: u16) -> Result<u16, Si4735Error> {
        let req = get_property_req(key);
        let mut rsp = PropertyRsp::new();
        self.cmd_rd_retry(&req, rsp.as_mut()).await?;
        Ok(rsp.value())
    }
}
