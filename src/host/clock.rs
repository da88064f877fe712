// Blocking pauses used by sleep() and the scroll animation

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Suspends script progress for `ms` milliseconds. Browser builds must not
/// block the page's event loop; they hand the wait to the worker host.
pub trait Pause {
    fn pause(&mut self, ms: u64);
}

impl<T: Pause + ?Sized> Pause for Rc<RefCell<T>> {
    fn pause(&mut self, ms: u64) {
        self.borrow_mut().pause(ms)
    }
}

/// Native pause: puts the calling thread to sleep
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Records requested pauses without waiting
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    pub pauses: Vec<u64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> u64 {
        self.pauses.iter().sum()
    }
}

impl Pause for VirtualClock {
    fn pause(&mut self, ms: u64) {
        self.pauses.push(ms);
    }
}
