use crate::catalog::{Catalog, CatalogConfig};
use crate::descriptor::DescriptorSource;
use crate::error::Error;
use crate::migration::{MigrationConfig, MigrationError, MigrationOutcome};
use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An open catalog database.
pub struct Session {
    db: sled::Db,
    catalog: Catalog,
    config: CatalogConfig,
}

impl Session {
    /// Open the database described by `config` and load its catalog.
    pub fn open(config: CatalogConfig) -> Result<Self, Error> {
        let db = config.open_db()?;
        let catalog = Catalog::open(&db)?;
        Ok(Self {
            db,
            catalog,
            config,
        })
    }

    /// Get the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the configuration this session was opened with.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Reconcile the stored schema with `source` and persist the result.
    pub fn auto_migrate<S>(
        &self,
        source: &S,
        config: &MigrationConfig,
    ) -> Result<MigrationOutcome, MigrationError>
    where
        S: DescriptorSource + ?Sized,
    {
        self.catalog.auto_migrate(source, config)
    }

    /// Flush the catalog and the database to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.catalog.flush()?;
        self.db.flush()?;
        Ok(())
    }
}

#[derive(Default)]
struct SessionState {
    session: Option<Arc<Session>>,
    refs: usize,
}

/// Hands out the single shared session for a default configuration.
///
/// The first [`open`](Self::open) opens the database, later calls share it.
/// The session stays open until the last [`SessionGuard`] is dropped.
#[derive(Default)]
pub struct SessionManager {
    default_config: Mutex<Option<CatalogConfig>>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    /// Create a manager with no default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the given default configuration.
    pub fn with_default_config(config: CatalogConfig) -> Self {
        Self {
            default_config: Mutex::new(Some(config)),
            state: Mutex::default(),
        }
    }

    /// Set the configuration used by the next [`open`](Self::open) that has
    /// to open the database. An already open session is not affected.
    pub fn set_default_config(&self, config: CatalogConfig) {
        *self.default_config.lock() = Some(config);
    }

    /// Get the default configuration, if any.
    pub fn default_config(&self) -> Option<CatalogConfig> {
        self.default_config.lock().clone()
    }

    /// Acquire the session, opening it if needed.
    pub fn open(&self) -> Result<SessionGuard<'_>, Error> {
        let mut state = self.state.lock();

        let session = match state.session.clone() {
            Some(session) => session,
            None => {
                let config = self
                    .default_config()
                    .ok_or(Error::NoDefaultSchemaConfigured)?;
                let session = Arc::new(Session::open(config)?);
                info!(path = %session.config().path.display(), "session opened");
                state.session = Some(session.clone());
                session
            }
        };

        Ok(self.acquire(&mut state, session))
    }

    /// Acquire the already open session. Never opens the database.
    pub fn current(&self) -> Result<SessionGuard<'_>, Error> {
        let mut state = self.state.lock();
        let session = state.session.clone().ok_or(Error::NoOpenInstance)?;
        Ok(self.acquire(&mut state, session))
    }

    /// Number of guards currently holding the session.
    pub fn open_count(&self) -> usize {
        self.state.lock().refs
    }

    /// Check if a session is open.
    pub fn is_open(&self) -> bool {
        self.state.lock().session.is_some()
    }

    fn acquire(&self, state: &mut SessionState, session: Arc<Session>) -> SessionGuard<'_> {
        state.refs += 1;
        debug!(refs = state.refs, "session acquired");
        SessionGuard {
            manager: self,
            session: Some(session),
        }
    }

    /// The guard's handle is dropped under the state lock, so the database
    /// is closed before another `open` can run.
    fn release(&self, held: Option<Arc<Session>>) {
        let mut state = self.state.lock();
        drop(held);
        state.refs = state.refs.saturating_sub(1);
        debug!(refs = state.refs, "session released");
        if state.refs > 0 {
            return;
        }

        if let Some(session) = state.session.take() {
            if let Err(err) = session.flush() {
                warn!(error = %err, "failed to flush session on close");
            }
            drop(session);
            info!("session closed");
        }
    }
}

/// Scoped hold on the shared session. Dropping the last guard closes it.
pub struct SessionGuard<'a> {
    manager: &'a SessionManager,
    /// Only taken in `drop`.
    session: Option<Arc<Session>>,
}

impl Deref for SessionGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        match &self.session {
            Some(session) => session,
            None => unreachable!("session handle taken before drop"),
        }
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.manager.release(self.session.take());
    }
}
