//! Source Collection: Resolve and Decode
//!
//! This is the first stage of an aggregation run. It walks every declared
//! source in merge order (locals as declared, then remotes as declared),
//! resolves each to raw bytes and decodes those bytes under the run's schema
//! version.
//!
//! ## Failure Policy
//!
//! What happens when a single source fails is decided by [`FailurePolicy`]:
//!
//! - **`Strict`** (the default): the first failure aborts the run with that
//!   source's error.
//! - **`Lenient`**: `Fetch` and `Parse` failures are logged at `warn` level and
//!   the source is left out of the aggregate. Every other error, notably a
//!   remote without a ref or a missing local file, still aborts.
//!
//! Skipped sources are reported back in [`Collection::skipped`] so callers can
//! surface them.

use log::{debug, warn};

use crate::config::{Configuration, Source};
use crate::error::Result;
use crate::schema::SchemaDocument;
use crate::source::SourceResolver;
use crate::version::SchemaVersion;

/// How per-source fetch and parse failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort on the first failing source.
    #[default]
    Strict,
    /// Log and omit sources that fail to fetch or parse.
    Lenient,
}

/// A source left out of the aggregate under the lenient policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub label: String,
    pub reason: String,
}

/// The decoded documents, in merge order, plus any skipped sources.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub documents: Vec<SchemaDocument>,
    pub skipped: Vec<SkippedSource>,
}

/// Resolves and decodes every configured source.
pub struct DocumentHandler<'a> {
    resolver: &'a SourceResolver,
    version: SchemaVersion,
    policy: FailurePolicy,
}

impl<'a> DocumentHandler<'a> {
    pub fn new(resolver: &'a SourceResolver, version: SchemaVersion, policy: FailurePolicy) -> Self {
        Self {
            resolver,
            version,
            policy,
        }
    }

    /// Collects the documents of every source in `config`.
    pub fn collect(&self, config: &Configuration) -> Result<Collection> {
        let initial = Collection {
            documents: Vec::with_capacity(config.source_count()),
            skipped: Vec::new(),
        };

        config
            .sources()
            .try_fold(initial, |collection, source| self.accumulate(collection, source))
    }

    /// Resolves and decodes a single source.
    pub fn load(&self, source: Source<'_>) -> Result<SchemaDocument> {
        let label = source.label();
        let bytes = self.resolver.resolve(source)?;
        let document = SchemaDocument::decode(self.version, &bytes, &label)?;
        debug!(
            "Decoded {} with {} component(s)",
            label,
            document.component_count()
        );
        Ok(document)
    }

    fn accumulate(&self, mut collection: Collection, source: Source<'_>) -> Result<Collection> {
        match self.load(source) {
            Ok(document) => collection.documents.push(document),
            Err(e) if self.policy == FailurePolicy::Lenient && e.is_recoverable() => {
                let label = source.label();
                warn!("Skipping source {}: {}", label, e);
                collection.skipped.push(SkippedSource {
                    label,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
        Ok(collection)
    }
}
