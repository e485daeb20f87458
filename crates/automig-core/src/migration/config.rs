//! Migration configuration.

/// What to do with links that point at an entity being dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DanglingLinkPolicy {
    /// Remove the dangling link fields along with the entity.
    #[default]
    Drop,
    /// Abort the migration with `MigrationError::DanglingLink`.
    Fail,
}

/// Migration configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MigrationConfig {
    /// Handling of links to dropped entities.
    pub dangling_links: DanglingLinkPolicy,
    /// Compute edits without persisting them (catalog runs only).
    pub dry_run: bool,
}

impl MigrationConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dangling link policy.
    pub fn with_dangling_links(mut self, policy: DanglingLinkPolicy) -> Self {
        self.dangling_links = policy;
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
