use app_error::{AppError, AppResult};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::{
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::time::timeout;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a session against a backing store
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> AppResult<Self::Handle>;

    /// Where the connector points, for logs
    fn describe(&self) -> String {
        "database".to_string()
    }
}

type PendingConnect<H> = Shared<BoxFuture<'static, Result<H, String>>>;

enum CacheState<H> {
    Empty,
    Pending(PendingConnect<H>),
    Ready(H),
}

/// Lazily connects once and hands every caller the same handle.
///
/// Concurrent callers arriving before the first attempt resolves all await
/// that single attempt. A successful handle is kept for the lifetime of the
/// cache. A failed attempt is reported to everyone awaiting it and then
/// forgotten, so the next `acquire` starts over.
pub struct ConnectionCache<C: Connector> {
    connector: Arc<C>,
    connect_timeout: Duration,
    state: Mutex<CacheState<C::Handle>>,
    attempts: AtomicUsize,
}

impl<C: Connector> ConnectionCache<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            state: Mutex::new(CacheState::Empty),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Number of connection attempts started so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The resolved handle, without triggering a connection
    pub fn handle(&self) -> Option<C::Handle> {
        match &*self.state.lock().ok()? {
            CacheState::Ready(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle().is_some()
    }

    fn lock_state(&self) -> AppResult<MutexGuard<'_, CacheState<C::Handle>>> {
        self.state.lock().map_err(|e| {
            AppError::ServerError(anyhow::anyhow!(
                "Failed to lock connection cache mutex: {}",
                e
            ))
        })
    }

    fn start_attempt(&self) -> PendingConnect<C::Handle> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let connector = Arc::clone(&self.connector);
        let limit = self.connect_timeout;
        let target = connector.describe();

        tracing::info!(attempt, target = %target, "Opening database connection");

        async move {
            match timeout(limit, connector.connect()).await {
                Ok(Ok(handle)) => {
                    tracing::info!(attempt, target = %target, "Database connection established");
                    Ok(handle)
                }
                Ok(Err(e)) => {
                    tracing::error!(attempt, target = %target, error = %e, "Database connection failed");
                    Err(e.to_string())
                }
                Err(_) => {
                    tracing::error!(attempt, target = %target, "Database connection timed out");
                    Err(format!(
                        "could not establish connection to {} within {} ms",
                        target,
                        limit.as_millis()
                    ))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Get the shared handle, connecting on first use
    pub async fn acquire(&self) -> AppResult<C::Handle> {
        let pending = {
            let mut state = self.lock_state()?;
            match &*state {
                CacheState::Ready(handle) => return Ok(handle.clone()),
                CacheState::Pending(pending) => pending.clone(),
                CacheState::Empty => {
                    let pending = self.start_attempt();
                    *state = CacheState::Pending(pending.clone());
                    pending
                }
            }
        };

        let outcome = pending.clone().await;

        let mut state = self.lock_state()?;
        // Only the attempt we awaited may settle the slot
        let settles_slot =
            matches!(&*state, CacheState::Pending(current) if current.ptr_eq(&pending));

        match outcome {
            Ok(handle) => {
                if settles_slot {
                    *state = CacheState::Ready(handle.clone());
                }
                Ok(handle)
            }
            Err(message) => {
                if settles_slot {
                    *state = CacheState::Empty;
                }
                Err(AppError::ConnectionError(message))
            }
        }
    }
}
