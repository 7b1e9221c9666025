use std::cell::{Cell, RefCell};

use super::viewport::Viewport;

/// Input the host delivers between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Page scroll offset in pixels, optionally with a new scrollable range
    Scroll { offset: f32, range: Option<f32> },
    Resize(Viewport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&HostEvent)>;

/// Single-threaded listener registry shared between host and scene
/// Listeners must only record input; they run between frames
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&HostEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was already gone
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn emit(&self, event: &HostEvent) {
        for (_, listener) in self.listeners.borrow_mut().iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Latest input recorded by listeners, consumed at the top of a frame
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PendingInput {
    pub scroll: Option<f32>,
    pub range: Option<f32>,
    pub resize: Option<Viewport>,
}

impl PendingInput {
    pub fn record(&mut self, event: &HostEvent) {
        match *event {
            HostEvent::Scroll { offset, range } => {
                self.scroll = Some(offset);
                if range.is_some() {
                    self.range = range;
                }
            }
            HostEvent::Resize(viewport) => self.resize = Some(viewport),
        }
    }

    pub fn take(&mut self) -> PendingInput {
        std::mem::take(self)
    }
}
