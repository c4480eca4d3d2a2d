//! Aggregation: Merging Collected Documents
//!
//! Builds the single output document from the collected documents:
//!
//! - `components` is the concatenation of every input's components, in input
//!   order. Nothing is sorted or deduplicated; duplicate UUIDs across sources
//!   are kept as they are.
//! - `back-matter.resources` is concatenated the same way.
//! - `uuid` is a fresh random identifier.
//! - `metadata` is the configuration's metadata map with `last-modified` set to
//!   the aggregation time. When the map has no `oscal-version`, the run's
//!   schema version is used.
//!
//! Inputs are borrowed and never modified; the result is a new document.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde_yaml::Value;
use uuid::Uuid;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::schema::{v1_0, v1_1, ComponentModel, SchemaDocument};
use crate::version::{ModelFamily, SchemaVersion};

/// Identity and time stamped onto an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub uuid: Uuid,
    pub timestamp: DateTime<FixedOffset>,
}

impl Stamp {
    /// A random v4 UUID and the current local time.
    pub fn fresh() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            timestamp: Local::now().into(),
        }
    }

    /// The timestamp in RFC3339 with second precision.
    pub fn rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Merges `documents` into a new aggregate stamped with a fresh identity.
pub fn aggregate(
    documents: &[SchemaDocument],
    config: &Configuration,
    version: SchemaVersion,
) -> Result<SchemaDocument> {
    aggregate_with_stamp(documents, config, version, Stamp::fresh())
}

/// Merges `documents` into a new aggregate stamped with `stamp`.
pub fn aggregate_with_stamp(
    documents: &[SchemaDocument],
    config: &Configuration,
    version: SchemaVersion,
    stamp: Stamp,
) -> Result<SchemaDocument> {
    match version.family() {
        ModelFamily::V1_0 => merge::<v1_0::Document>(documents, config, version, stamp),
        ModelFamily::V1_1 => merge::<v1_1::Document>(documents, config, version, stamp),
    }
}

fn merge<M: ComponentModel>(
    documents: &[SchemaDocument],
    config: &Configuration,
    version: SchemaVersion,
    stamp: Stamp,
) -> Result<SchemaDocument> {
    let models = documents
        .iter()
        .map(|document| {
            document
                .model::<M>()
                .filter(|_| document.version() == version)
                .ok_or_else(|| Error::SchemaMismatch {
                    expected: version.to_string(),
                    found: document.version().to_string(),
                })
        })
        .collect::<Result<Vec<&M>>>()?;

    let (components, resources) = models.iter().fold(
        (Vec::new(), Vec::new()),
        |(mut components, mut resources), model| {
            components.extend_from_slice(model.components());
            resources.extend_from_slice(model.resources());
            (components, resources)
        },
    );

    let metadata = build_metadata::<M>(config, version, &stamp)?;
    let merged = M::assemble(stamp.uuid.to_string(), metadata, components, resources);
    SchemaDocument::from_model(version, merged)
}

fn build_metadata<M: ComponentModel>(
    config: &Configuration,
    version: SchemaVersion,
    stamp: &Stamp,
) -> Result<M::Metadata> {
    let mut map = config.metadata.clone();
    if !map.contains_key("oscal-version") {
        map.insert(
            Value::String("oscal-version".to_string()),
            Value::String(version.to_string()),
        );
    }

    let mut metadata: M::Metadata =
        serde_yaml::from_value(Value::Mapping(map)).map_err(|e| Error::Config {
            message: format!("metadata cannot be represented in OSCAL {version}: {e}"),
            hint: Some("metadata needs at least 'title' and 'version'".to_string()),
        })?;
    *M::last_modified_mut(&mut metadata) = stamp.rfc3339();

    Ok(metadata)
}
