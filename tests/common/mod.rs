#![allow(dead_code)]

use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use embedded_hal_mock::eh0::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use embedded_hal_mock::eh1::delay::NoopDelay;

use si4735::config::Config;
use si4735::Si4735;

/// Bus activity and scripted behavior of the simulated device
///
/// Single byte reads are status polls: they return 0x00 while the device is busy after a write,
/// then the next scripted status byte or 0x80 (CTS).
/// Longer reads are responses: they return ERR while `error_reads` is non zero,
/// then the next scripted response padded with zeros, or a bare CTS status.
#[derive(Default)]
pub struct FakeState {
    pub address: u8,
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
    /// Number of status polls answered as busy after each write
    pub busy_after_write: usize,
    busy_left: usize,
    pub writes_while_busy: usize,
    pub statuses: VecDeque<u8>,
    pub responses: VecDeque<Vec<u8>>,
    pub error_reads: usize,
    pub never_ready: bool,
}

impl FakeState {
    fn on_write(&mut self, bytes: &[u8]) {
        if self.busy_left > 0 {
            self.writes_while_busy += 1;
        }
        self.writes.push(bytes.to_vec());
        self.busy_left = self.busy_after_write;
    }

    fn on_read(&mut self, buf: &mut [u8]) {
        self.reads += 1;
        buf.fill(0);
        if self.never_ready {
            return;
        }
        if self.busy_left > 0 {
            self.busy_left -= 1;
            return;
        }
        if buf.len() == 1 {
            buf[0] = self.statuses.pop_front().unwrap_or(0x80);
            return;
        }
        if self.error_reads > 0 {
            self.error_reads -= 1;
            buf[0] = 0xC0;
            return;
        }
        match self.responses.pop_front() {
            Some(rsp) => {
                let len = rsp.len().min(buf.len());
                buf[..len].copy_from_slice(&rsp[..len]);
            }
            None => buf[0] = 0x80,
        }
    }
}

/// Simulated Si4735 on the I2C bus. Clones share the same state,
/// so a test keeps one handle while the driver owns the other.
#[derive(Clone)]
pub struct FakeSi4735(Rc<RefCell<FakeState>>);

impl FakeSi4735 {
    pub fn new() -> Self {
        Self::at(0x11)
    }

    pub fn at(address: u8) -> Self {
        Self(Rc::new(RefCell::new(FakeState { address, ..Default::default() })))
    }

    pub fn state(&self) -> RefMut<'_, FakeState> {
        self.0.borrow_mut()
    }

    /// Queue a response, status byte included
    pub fn respond(&self, bytes: &[u8]) {
        self.state().responses.push_back(bytes.to_vec());
    }

    /// Queue a tune status response reporting `freq`
    pub fn respond_tune_status(&self, freq: u16) {
        self.respond(&[0x81, 0x01, (freq >> 8) as u8, freq as u8, 40, 20, 0, 0]);
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state().writes.clone()
    }

    /// Frames starting with `opcode`
    pub fn frames(&self, opcode: u8) -> Vec<Vec<u8>> {
        self.state().writes.iter().filter(|w| w.first() == Some(&opcode)).cloned().collect()
    }

    /// SET_PROPERTY frames as (key, value)
    pub fn properties(&self) -> Vec<(u16, u16)> {
        self.frames(0x12)
            .iter()
            .map(|w| (u16::from_be_bytes([w[2], w[3]]), u16::from_be_bytes([w[4], w[5]])))
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.state().reads
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.writes.clear();
        state.reads = 0;
    }
}

impl ErrorType for FakeSi4735 {
    type Error = ErrorKind;
}

impl I2c for FakeSi4735 {
    async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        let mut state = self.state();
        if address != state.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => state.on_write(bytes),
                Operation::Read(buf) => state.on_read(buf),
            }
        }
        Ok(())
    }
}

pub type Driver = Si4735<FakeSi4735, PinMock, NoopDelay>;

pub fn driver(fake: &FakeSi4735) -> Driver {
    driver_with(fake, Config::default(), &[])
}

pub fn driver_with(fake: &FakeSi4735, cfg: Config, pin: &[PinTransaction]) -> Driver {
    Si4735::new(fake.clone(), PinMock::new(pin), NoopDelay::new(), cfg)
}

/// Expected reset pin activity for one reset pulse
pub fn reset_pulse() -> Vec<PinTransaction> {
    vec![PinTransaction::set(PinState::Low), PinTransaction::set(PinState::High)]
}

/// Release the driver and check the pin expectations
pub fn finish(dev: Driver) {
    let (_fake, mut pin, _delay) = dev.release();
    pin.done();
}
