use tokio::sync::broadcast;

/// Broadcast after every cart mutation so badge-style UI can update without
/// a full reload. `count` is the total quantity across all lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged {
    pub count: u32,
}

/// In-page broadcast channel for cart changes. Scoped to one page context;
/// nothing propagates across tabs.
#[derive(Debug, Clone)]
pub struct CartEvents {
    tx: broadcast::Sender<CartChanged>,
}

impl CartEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.tx.subscribe()
    }

    /// Fire-and-forget: a notification with no live subscriber is a no-op.
    pub fn emit(&self, count: u32) {
        let _ = self.tx.send(CartChanged { count });
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}
