//! Recording bus and delay for driver tests.

use crate::i2c::{I2cConnection, I2cConnector, I2cError, I2cResult};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use std::cell::RefCell;
use std::rc::Rc;

const ENABLE: u8 = 0b00000100;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Event {
    Write(u8),
    DelayNs(u64),
}

/// A byte as seen by the controller, rebuilt from the two enable-latched nibbles.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sent {
    Command(u8),
    Data(u8),
}

#[derive(Debug, Default)]
struct Log {
    events: Vec<Event>,
    writes: usize,
    fail_at: Option<usize>,
    connect_error: Option<I2cError>,
    connections: Vec<(u8, u8)>,
}

/// Shared log of everything the driver did to the bus and the clock.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Log>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().events.clone()
    }

    pub fn writes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write(value) => Some(value),
                Event::DelayNs(_) => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<Sent> {
        let latched: Vec<u8> = self
            .writes()
            .into_iter()
            .filter(|value| value & ENABLE != 0)
            .collect();
        assert_eq!(latched.len() % 2, 0, "odd number of nibbles: {:?}", latched);
        latched
            .chunks(2)
            .map(|pair| {
                let byte = (pair[0] & 0xF0) | (pair[1] >> 4);
                if pair[0] & 1 == 1 {
                    Sent::Data(byte)
                } else {
                    Sent::Command(byte)
                }
            })
            .collect()
    }

    pub fn connections(&self) -> Vec<(u8, u8)> {
        self.log.borrow().connections.clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().events.clear();
    }

    /// Makes the `n`-th write from now on fail, counting from 0.
    pub fn fail_on_write(&self, n: usize) {
        let mut log = self.log.borrow_mut();
        log.fail_at = Some(log.writes + n);
    }

    pub fn fail_connection(&self, err: I2cError) {
        self.log.borrow_mut().connect_error = Some(err);
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().events.push(event);
    }
}

#[derive(Debug)]
pub struct RecordingConnector {
    pub recorder: Recorder,
    pub default_bus: u8,
}

impl RecordingConnector {
    pub fn new(recorder: &Recorder) -> Self {
        RecordingConnector {
            recorder: recorder.clone(),
            default_bus: 1,
        }
    }
}

impl I2cConnector for RecordingConnector {
    fn default_bus(&self) -> u8 {
        self.default_bus
    }

    fn get_connection(&self, address: u8, bus: u8) -> I2cResult<Box<dyn I2cConnection>> {
        let mut log = self.recorder.log.borrow_mut();
        log.connections.push((address, bus));
        if let Some(err) = log.connect_error.clone() {
            return Err(err);
        }
        Ok(Box::new(RecordingConnection {
            recorder: self.recorder.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct RecordingConnection {
    recorder: Recorder,
}

impl I2cConnection for RecordingConnection {
    fn write_byte(&mut self, value: u8) -> I2cResult<()> {
        {
            let mut log = self.recorder.log.borrow_mut();
            let index = log.writes;
            log.writes += 1;
            if log.fail_at == Some(index) {
                return Err(I2cError::Bus(ErrorKind::Other));
            }
        }
        self.recorder.record(Event::Write(value));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordingDelay {
    recorder: Recorder,
}

impl RecordingDelay {
    pub fn new(recorder: &Recorder) -> Self {
        RecordingDelay {
            recorder: recorder.clone(),
        }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.recorder.record(Event::DelayNs(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.recorder.record(Event::DelayNs(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.recorder.record(Event::DelayNs(ms as u64 * 1_000_000));
    }
}

/// Events of one enable-latched nibble.
pub fn frame(value: u8) -> Vec<Event> {
    vec![
        Event::Write(value | ENABLE),
        Event::DelayNs(1_000),
        Event::Write(value & !ENABLE),
        Event::DelayNs(50_000),
    ]
}

pub fn command(byte: u8) -> Vec<Event> {
    let mut events = frame(byte & 0xF0);
    events.extend(frame((byte << 4) & 0xF0));
    events
}

pub fn data(byte: u8) -> Vec<Event> {
    let mut events = frame((byte & 0xF0) | 1);
    events.extend(frame(((byte << 4) & 0xF0) | 1));
    events
}
