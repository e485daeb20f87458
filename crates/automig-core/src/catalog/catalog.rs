//! Catalog manager for storing and migrating the stored schema.

use super::StoredSchema;
use crate::descriptor::DescriptorSource;
use crate::error::Error;
use crate::migration::{AutoMigration, MigrationConfig, MigrationError, MigrationOutcome};
use parking_lot::{Mutex, RwLock};
use sled::transaction::{TransactionError, TransactionResult};
use sled::{Db, Transactional, Tree};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Tree name for stored schema snapshots.
const SCHEMA_TREE: &str = "catalog:schemas";

/// Tree name for catalog metadata.
const META_TREE: &str = "catalog:meta";

/// Key for current schema version in meta tree.
const CURRENT_VERSION_KEY: &[u8] = b"current_version";

/// The catalog manager for the stored schema.
pub struct Catalog {
    /// Schema snapshots tree.
    schema_tree: Tree,
    /// Metadata tree.
    meta_tree: Tree,
    /// Current schema version (cached).
    current_version: AtomicU64,
    /// Current schema (cached).
    current_schema: RwLock<Option<StoredSchema>>,
    /// Held from reading the current version until the next one is stored.
    write_lock: Mutex<()>,
}

fn decode_version(bytes: &[u8]) -> Option<u64> {
    let buf: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(buf))
}

impl Catalog {
    /// Open or create a catalog using the given sled database.
    pub fn open(db: &Db) -> Result<Self, Error> {
        let schema_tree = db.open_tree(SCHEMA_TREE)?;
        let meta_tree = db.open_tree(META_TREE)?;

        let current_version = match meta_tree.get(CURRENT_VERSION_KEY)? {
            Some(bytes) => decode_version(&bytes).ok_or_else(|| {
                Error::Deserialization("malformed current version".to_string())
            })?,
            None => 0,
        };

        let catalog = Self {
            schema_tree,
            meta_tree,
            current_version: AtomicU64::new(current_version),
            current_schema: RwLock::new(None),
            write_lock: Mutex::new(()),
        };

        if current_version > 0 {
            let schema = catalog
                .schema_at_version(current_version)?
                .ok_or(Error::VersionNotFound(current_version))?;
            *catalog.current_schema.write() = Some(schema);
        }

        debug!(current_version, "catalog opened");
        Ok(catalog)
    }

    /// Get the current schema version. Zero means nothing was ever stored.
    pub fn current_version(&self) -> u64 {
        self.current_version.load(Ordering::SeqCst)
    }

    /// Get the current stored schema.
    pub fn current_schema(&self) -> Option<StoredSchema> {
        self.current_schema.read().clone()
    }

    /// Get the stored schema at a specific version.
    pub fn schema_at_version(&self, version: u64) -> Result<Option<StoredSchema>, Error> {
        let key = version.to_be_bytes();
        match self.schema_tree.get(key)? {
            Some(bytes) => Ok(Some(StoredSchema::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Store a new schema snapshot as the next version.
    ///
    /// The snapshot and the version pointer are written in one transaction.
    /// Returns the new version number.
    pub fn apply_schema(&self, schema: StoredSchema) -> Result<u64, Error> {
        let _write = self.write_lock.lock();
        self.store_schema(schema)
    }

    /// Write the next version. Callers must hold `write_lock`.
    fn store_schema(&self, mut schema: StoredSchema) -> Result<u64, Error> {
        let new_version = self.current_version() + 1;
        schema.version = new_version;

        let key = new_version.to_be_bytes();
        let value = schema.to_bytes()?;
        let version_bytes = new_version.to_be_bytes();

        let result: TransactionResult<(), ()> = (&self.schema_tree, &self.meta_tree)
            .transaction(|(schemas, meta)| {
                schemas.insert(&key[..], value.as_slice())?;
                meta.insert(CURRENT_VERSION_KEY, &version_bytes[..])?;
                Ok(())
            });
        result.map_err(|e| match e {
            TransactionError::Storage(e) => Error::Storage(e),
            TransactionError::Abort(()) => Error::Transaction("schema write aborted".to_string()),
        })?;

        self.current_version.store(new_version, Ordering::SeqCst);
        *self.current_schema.write() = Some(schema);

        info!(version = new_version, "stored schema version applied");
        Ok(new_version)
    }

    /// Reconcile the stored schema with the target entities.
    ///
    /// Runs against a private copy of the current schema. A new version is
    /// written only when the run succeeds, changed something, and is not a
    /// dry run, so a failed run leaves the catalog untouched. Concurrent
    /// runs are serialized, so each one starts from the version the previous
    /// one stored.
    pub fn auto_migrate<S>(
        &self,
        source: &S,
        config: &MigrationConfig,
    ) -> Result<MigrationOutcome, MigrationError>
    where
        S: DescriptorSource + ?Sized,
    {
        let _write = self.write_lock.lock();
        let from_version = self.current_version();
        let mut working = self.current_schema().unwrap_or_default();

        let report = AutoMigration::new(config.clone()).migrate(
            from_version,
            from_version + 1,
            &mut working,
            source,
        )?;

        if report.is_empty() || config.dry_run {
            debug!(
                edits = report.len(),
                dry_run = config.dry_run,
                "stored schema left unchanged"
            );
            return Ok(MigrationOutcome {
                from_version,
                to_version: from_version,
                persisted: false,
                report,
            });
        }

        let to_version = self.store_schema(working)?;
        Ok(MigrationOutcome {
            from_version,
            to_version,
            persisted: true,
            report,
        })
    }

    /// List all entity names in the current schema.
    pub fn list_entities(&self) -> Vec<String> {
        self.current_schema
            .read()
            .as_ref()
            .map(|s| s.entities.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// List all schema versions.
    pub fn list_versions(&self) -> Result<Vec<u64>, Error> {
        let mut versions = Vec::new();
        for result in self.schema_tree.iter() {
            let (key, _) = result?;
            if let Some(version) = decode_version(&key) {
                versions.push(version);
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.schema_tree.flush()?;
        self.meta_tree.flush()?;
        Ok(())
    }
}
