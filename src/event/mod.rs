mod bus;
mod events;

pub use bus::EventBus;
pub use events::CanvasEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &CanvasEvent);
}

/// Collects every event it sees
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: std::sync::Arc<std::sync::Mutex<Vec<CanvasEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &CanvasEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
