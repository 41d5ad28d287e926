use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, broadcast};

use crate::{
    api::StorefrontApi,
    auth::SessionProvider,
    dto::cart::AddToCartRequest,
    error::{AppError, AppResult},
    events::{CartChanged, CartEvents},
    models::{CartLine, CartSnapshot, NewCartLine},
    storage::{CART_CACHE_KEY, CacheStore},
};

/// Outcome of a cart mutation. `degraded` marks a best-effort local result
/// applied after a server failure: the two stores may diverge until the next
/// successful load.
#[derive(Debug, Clone)]
pub struct CartMutation {
    pub snapshot: CartSnapshot,
    pub degraded: bool,
}

/// Presents one logical cart while two physical stores (server record, local
/// cache) may disagree.
///
/// Precedence is always explicit: the server snapshot replaces the cache
/// wholesale on a successful load, and the cache is read-only fallback when
/// the server is unreachable or the user is signed out. No field-level merge
/// ever happens. A pre-login local cart is intentionally discarded by the
/// first authenticated load.
pub struct CartController {
    api: Arc<dyn StorefrontApi>,
    cache: Arc<dyn CacheStore>,
    sessions: Arc<dyn SessionProvider>,
    events: CartEvents,
    snapshot: Mutex<CartSnapshot>,
    mutation_seq: AtomicU64,
    applied_seq: AtomicU64,
}

impl CartController {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        cache: Arc<dyn CacheStore>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            api,
            cache,
            sessions,
            events: CartEvents::new(),
            snapshot: Mutex::new(CartSnapshot::empty()),
            mutation_seq: AtomicU64::new(0),
            applied_seq: AtomicU64::new(0),
        }
    }

    /// Receiver for cart-changed notifications (in-page badge updates).
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.events.subscribe()
    }

    /// The snapshot currently published to the UI.
    pub async fn current(&self) -> CartSnapshot {
        self.snapshot.lock().await.clone()
    }

    /// Loads the cart. Authenticated: the server snapshot wins and overwrites
    /// the local cache; on any server failure the cache is the fallback.
    /// Signed out: the cache is authoritative and the server is never
    /// contacted. Load failures are non-fatal — an empty snapshot is an
    /// acceptable degraded result.
    pub async fn load(&self) -> CartSnapshot {
        let loaded = match self.sessions.current_session() {
            Some(session) => match self.api.fetch_cart(&session.email).await {
                Ok(records) => {
                    let snapshot = CartSnapshot {
                        lines: records.into_iter().map(|r| r.into_line()).collect(),
                    };
                    self.persist(&snapshot);
                    snapshot
                }
                Err(err) => {
                    tracing::warn!(error = %err, "cart load failed, falling back to local cache");
                    self.read_cache()
                }
            },
            None => self.read_cache(),
        };

        *self.snapshot.lock().await = loaded.clone();
        loaded
    }

    /// Adds a line. Requires an active session — the shell redirects a
    /// signed-out user to sign-in instead of mutating any cart. On server
    /// failure nothing is mutated anywhere, so the stores cannot silently
    /// diverge on the add path.
    pub async fn add_line(&self, new_line: NewCartLine) -> AppResult<CartSnapshot> {
        if new_line.quantity == 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }
        let session = self
            .sessions
            .current_session()
            .ok_or(AppError::Unauthenticated)?;

        let seq = self.next_seq();
        let request = AddToCartRequest::from_new_line(&session.email, &new_line);
        let record = self.api.add_to_cart(&request).await?;

        let mut snapshot = self.snapshot.lock().await;
        if self.try_apply(seq) {
            // Merge with the requested quantity; the server record may carry
            // the accumulated total for an existing entry.
            let mut line: CartLine = record.into_line();
            line.quantity = new_line.quantity;
            snapshot.merge_line(line);
            let published = snapshot.clone();
            drop(snapshot);
            self.persist(&published);
            self.events.emit(published.item_count());
            Ok(published)
        } else {
            tracing::debug!(seq, "discarding stale add-to-cart response");
            Ok(snapshot.clone())
        }
    }

    /// Sets a line's quantity. Values below 1 are a no-op, not a removal.
    /// On success the whole snapshot is reloaded from the server rather than
    /// patched locally, so server-side adjustments (stock clamping) are
    /// picked up. On server failure the change is applied locally as an
    /// explicitly degraded result.
    pub async fn update_quantity(&self, line_id: &str, quantity: u32) -> AppResult<CartMutation> {
        if quantity < 1 {
            return Ok(CartMutation {
                snapshot: self.current().await,
                degraded: false,
            });
        }

        let Some(session) = self.sessions.current_session() else {
            // Signed out: the local cache is the source of truth, not a
            // degraded copy of anything.
            let snapshot = self
                .apply_local(|snapshot| snapshot.set_quantity(line_id, quantity))
                .await;
            return Ok(CartMutation {
                snapshot,
                degraded: false,
            });
        };

        let seq = self.next_seq();
        match self.api.update_quantity(line_id, quantity).await {
            Ok(_) => Ok(self.reload_after_mutation(&session.email, seq).await),
            Err(err) => {
                tracing::warn!(error = %err, line_id, "quantity update failed, applying locally");
                Ok(self
                    .degrade(seq, |snapshot| snapshot.set_quantity(line_id, quantity))
                    .await)
            }
        }
    }

    /// Removes a line: server-first, reload-on-success, local-only fallback.
    pub async fn remove_line(&self, line_id: &str) -> AppResult<CartMutation> {
        let Some(session) = self.sessions.current_session() else {
            let snapshot = self
                .apply_local(|snapshot| snapshot.remove_line(line_id))
                .await;
            return Ok(CartMutation {
                snapshot,
                degraded: false,
            });
        };

        let seq = self.next_seq();
        match self.api.remove_line(line_id).await {
            Ok(()) => Ok(self.reload_after_mutation(&session.email, seq).await),
            Err(err) => {
                tracing::warn!(error = %err, line_id, "remove failed, applying locally");
                Ok(self
                    .degrade(seq, |snapshot| snapshot.remove_line(line_id))
                    .await)
            }
        }
    }

    /// Empties the cart. A successful server clear leaves a known-empty
    /// server cart, so no reload is needed; the cache entry is dropped.
    pub async fn clear(&self) -> AppResult<CartMutation> {
        let session = self.sessions.current_session();
        let (seq, degraded) = match &session {
            Some(session) => {
                let seq = self.next_seq();
                match self.api.clear_cart(&session.email).await {
                    Ok(()) => (seq, false),
                    Err(err) => {
                        tracing::warn!(error = %err, "clear failed, applying locally");
                        (seq, true)
                    }
                }
            }
            None => (self.next_seq(), false),
        };

        let mut snapshot = self.snapshot.lock().await;
        if self.try_apply(seq) {
            *snapshot = CartSnapshot::empty();
        }
        let published = snapshot.clone();
        drop(snapshot);
        self.cache.remove(CART_CACHE_KEY);
        self.events.emit(published.item_count());
        Ok(CartMutation {
            snapshot: published,
            degraded,
        })
    }

    /// Next request sequence number. Responses publish only in issue order;
    /// a later-issued mutation's response always beats an earlier one that
    /// resolves after it (last-request-wins, not last-response-wins).
    fn next_seq(&self) -> u64 {
        self.mutation_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// True when `seq` is the highest seen so far; stale responses are
    /// discarded by the caller.
    fn try_apply(&self, seq: u64) -> bool {
        let mut current = self.applied_seq.load(Ordering::Acquire);
        loop {
            if seq <= current {
                return false;
            }
            match self.applied_seq.compare_exchange(
                current,
                seq,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    async fn reload_after_mutation(&self, user_email: &str, seq: u64) -> CartMutation {
        match self.api.fetch_cart(user_email).await {
            Ok(records) => {
                let fresh = CartSnapshot {
                    lines: records.into_iter().map(|r| r.into_line()).collect(),
                };
                let mut snapshot = self.snapshot.lock().await;
                if self.try_apply(seq) {
                    *snapshot = fresh;
                    let published = snapshot.clone();
                    drop(snapshot);
                    self.persist(&published);
                    self.events.emit(published.item_count());
                    CartMutation {
                        snapshot: published,
                        degraded: false,
                    }
                } else {
                    tracing::debug!(seq, "discarding stale cart reload");
                    CartMutation {
                        snapshot: snapshot.clone(),
                        degraded: false,
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "post-mutation reload failed, keeping local snapshot");
                let snapshot = self.snapshot.lock().await.clone();
                self.events.emit(snapshot.item_count());
                CartMutation {
                    snapshot,
                    degraded: true,
                }
            }
        }
    }

    async fn degrade(&self, seq: u64, mutate: impl FnOnce(&mut CartSnapshot)) -> CartMutation {
        let mut snapshot = self.snapshot.lock().await;
        if self.try_apply(seq) {
            mutate(&mut snapshot);
        }
        let published = snapshot.clone();
        drop(snapshot);
        self.persist(&published);
        self.events.emit(published.item_count());
        CartMutation {
            snapshot: published,
            degraded: true,
        }
    }

    async fn apply_local(&self, mutate: impl FnOnce(&mut CartSnapshot)) -> CartSnapshot {
        let mut snapshot = self.snapshot.lock().await;
        mutate(&mut snapshot);
        let published = snapshot.clone();
        drop(snapshot);
        self.persist(&published);
        self.events.emit(published.item_count());
        published
    }

    fn read_cache(&self) -> CartSnapshot {
        let Some(raw) = self.cache.get(CART_CACHE_KEY) else {
            return CartSnapshot::empty();
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "cached cart is unreadable, starting empty");
                CartSnapshot::empty()
            }
        }
    }

    fn persist(&self, snapshot: &CartSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(raw) => self.cache.put(CART_CACHE_KEY, &raw),
            Err(err) => tracing::warn!(error = %err, "failed to serialize cart for caching"),
        }
    }
}
