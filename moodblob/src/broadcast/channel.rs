use std::cell::RefCell;
use std::rc::Rc;

/// Narrow outbound interface the engine depends on.
///
/// `emit` is fire-and-forget: implementations never block the caller, never report failures, and
/// drop (rather than queue) messages while disconnected.
pub trait Broadcaster {
    fn emit(&mut self, label: &str, value: f64);

    fn is_connected(&self) -> bool {
        true
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn emit(&mut self, _label: &str, _value: f64) {}

    fn is_connected(&self) -> bool {
        false
    }
}

/// One message observed by a [`MemoryBroadcaster`].
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub label: String,
    pub value: f64,
}

/// Records emissions in memory; the log handle stays readable after the broadcaster is moved into a
/// session.
#[derive(Clone, Debug)]
pub struct MemoryBroadcaster {
    log: Rc<RefCell<Vec<Emission>>>,
    connected: bool,
}

impl MemoryBroadcaster {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            connected: true,
        }
    }

    /// A broadcaster that behaves like a channel whose connection was never established.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }

    pub fn log(&self) -> Rc<RefCell<Vec<Emission>>> {
        Rc::clone(&self.log)
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MemoryBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster for MemoryBroadcaster {
    fn emit(&mut self, label: &str, value: f64) {
        if !self.connected {
            return;
        }
        self.log.borrow_mut().push(Emission {
            label: label.to_owned(),
            value,
        });
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
#[path = "../../tests/unit/broadcast/channel.rs"]
mod tests;
