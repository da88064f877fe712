// Wingbit Output Buffer
// Collects everything a session prints until the host reads it

use std::cell::RefCell;
use std::rc::Rc;

type Listener = Box<dyn FnMut(&str)>;

#[derive(Default)]
struct Inner {
    text: String,
    listener: Option<Listener>,
}

/// Cloneable handle to one session's printed text. Clones share the same
/// buffer, so the interpreter's print sink and the session can both hold one.
#[derive(Clone, Default)]
pub struct OutputBuffer {
    inner: Rc<RefCell<Inner>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `listener` with every chunk appended from now on
    pub fn set_listener(&self, listener: impl FnMut(&str) + 'static) {
        self.inner.borrow_mut().listener = Some(Box::new(listener));
    }

    pub fn append(&self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        // Take the listener out so it may read the buffer while running.
        let mut listener = {
            let mut inner = self.inner.borrow_mut();
            inner.text.push_str(chunk);
            inner.listener.take()
        };
        if let Some(notify) = listener.as_mut() {
            notify(chunk);
        }
        let mut inner = self.inner.borrow_mut();
        if inner.listener.is_none() {
            inner.listener = listener;
        }
    }

    pub fn contents(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// Return everything buffered so far and empty the buffer
    pub fn take(&self) -> String {
        std::mem::take(&mut self.inner.borrow_mut().text)
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().text.is_empty()
    }
}
