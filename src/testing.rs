//! Test doubles shared by the unit tests

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::bus::{AddressSet, BusProvider, BusSettings};
use crate::menu::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Nack,
    OpenFailed,
    ConfigRejected,
}

impl i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Self::OpenFailed | Self::ConfigRejected => ErrorKind::Other,
        }
    }
}

#[derive(Debug, Default)]
struct BusState {
    devices: AddressSet,
    writes: Vec<(u8, Vec<u8>)>,
    attempts: usize,
    fail_next: usize,
    fail_after: Option<usize>,
    nack_payloads: Vec<Vec<u8>>,
}

/// Simulated bus; clones share state so a test can keep a handle for inspection
#[derive(Debug, Clone, Default)]
pub struct MockBus(Rc<RefCell<BusState>>);

impl MockBus {
    pub fn with_devices(devices: &[u8]) -> Self {
        let bus = Self::default();
        bus.0.borrow_mut().devices = devices.iter().copied().collect();
        bus
    }

    /// Acknowledged transactions, probes included as empty payloads
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.0.borrow().writes.clone()
    }

    /// Every transaction started, acknowledged or not
    pub fn attempts(&self) -> usize {
        self.0.borrow().attempts
    }

    pub fn clear(&self) {
        let mut state = self.0.borrow_mut();
        state.writes.clear();
        state.attempts = 0;
    }

    /// NACK the next `count` transactions
    pub fn fail_next(&self, count: usize) {
        self.0.borrow_mut().fail_next = count;
    }

    /// NACK every transaction once `count` have been acknowledged
    pub fn fail_after(&self, count: usize) {
        self.0.borrow_mut().fail_after = Some(count);
    }

    /// NACK any transaction carrying exactly `payload`
    pub fn nack_payload(&self, payload: &[u8]) {
        self.0.borrow_mut().nack_payloads.push(payload.to_vec());
    }
}

impl ErrorType for MockBus {
    type Error = MockError;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        state.attempts += 1;

        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(MockError::Nack);
        }
        if state
            .fail_after
            .is_some_and(|limit| state.writes.len() >= limit)
        {
            return Err(MockError::Nack);
        }
        if !state.devices.contains(address) {
            return Err(MockError::Nack);
        }

        let mut payload = Vec::new();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => payload.extend_from_slice(bytes),
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        if state.nack_payloads.contains(&payload) {
            return Err(MockError::Nack);
        }

        state.writes.push((address, payload));
        Ok(())
    }
}

/// The one I2C peripheral of a [`MockProvider`]; dropping it gives it back
#[derive(Debug)]
pub struct MockPeripheral {
    bus: MockBus,
    taken: Rc<Cell<bool>>,
}

impl Drop for MockPeripheral {
    fn drop(&mut self) {
        self.taken.set(false);
    }
}

impl ErrorType for MockPeripheral {
    type Error = MockError;
}

impl I2c for MockPeripheral {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.bus.transaction(address, operations)
    }
}

/// Board with a single I2C peripheral over one shared [`MockBus`]
///
/// Like a HAL, it refuses to open the peripheral while it is still owned.
/// Records the frequencies asked for by `open` and by `apply`.
#[derive(Debug)]
pub struct MockProvider {
    bus: MockBus,
    taken: Rc<Cell<bool>>,
    opened: Vec<u32>,
    applied: Vec<u32>,
    fail_open: bool,
    fail_apply: bool,
}

impl MockProvider {
    pub fn new(bus: MockBus) -> Self {
        Self {
            bus,
            taken: Rc::new(Cell::new(false)),
            opened: Vec::new(),
            applied: Vec::new(),
            fail_open: false,
            fail_apply: false,
        }
    }

    pub fn opened(&self) -> Vec<u32> {
        self.opened.clone()
    }

    pub fn applied(&self) -> Vec<u32> {
        self.applied.clone()
    }

    pub fn fail_open(&mut self, fail: bool) {
        self.fail_open = fail;
    }

    pub fn fail_apply(&mut self, fail: bool) {
        self.fail_apply = fail;
    }
}

impl BusProvider for MockProvider {
    type Bus = MockPeripheral;

    fn open(&mut self, settings: &BusSettings) -> Result<MockPeripheral, MockError> {
        self.opened.push(settings.frequency_hz);
        if self.fail_open || self.taken.get() {
            return Err(MockError::OpenFailed);
        }
        self.taken.set(true);
        Ok(MockPeripheral {
            bus: self.bus.clone(),
            taken: Rc::clone(&self.taken),
        })
    }

    fn apply(
        &mut self,
        _bus: &mut MockPeripheral,
        settings: &BusSettings,
    ) -> Result<(), MockError> {
        self.applied.push(settings.frequency_hz);
        if self.fail_apply {
            return Err(MockError::ConfigRejected);
        }
        Ok(())
    }
}

/// Records requested delays in nanoseconds instead of sleeping
#[derive(Debug, Default)]
pub struct MockDelay {
    calls: Vec<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.clone()
    }

    pub fn total_ms(&self) -> u64 {
        self.calls.iter().map(|ns| u64::from(*ns)).sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns);
    }
}

/// Console fed from a fixed list of lines
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    output: String,
}

impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| String::from(*line)).collect(),
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

impl core::fmt::Write for ScriptedConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl Console for ScriptedConsole {
    fn read_line<'b>(&mut self, buf: &'b mut [u8]) -> Option<&'b str> {
        let line = self.lines.pop_front()?;
        let len = line.len().min(buf.len());
        buf[..len].copy_from_slice(&line.as_bytes()[..len]);
        core::str::from_utf8(&buf[..len]).ok()
    }
}
