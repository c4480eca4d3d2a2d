//! # Versioned Component-Definition Documents
//!
//! This module holds the in-memory representation of OSCAL component
//! definitions for every supported schema revision, and the codec that turns
//! bytes into documents and back.
//!
//! ## Key Components
//!
//! - **`ComponentModel`**: the capability every model family provides. It
//!   exposes the list-valued fields the aggregator merges and the metadata the
//!   diff engine compares, and knows how to build a new document from merged
//!   parts.
//! - **`DocumentBody`**: a closed enum with one variant per model family.
//! - **`SchemaDocument`**: a `DocumentBody` tagged with the exact
//!   [`SchemaVersion`] it was decoded or built under.
//! - **`OutputFormat`**: YAML or JSON rendering, chosen from the output path.
//!
//! Dispatch from a version to its model happens in exactly one place,
//! [`SchemaDocument::decode`]. Everything downstream is generic over
//! `ComponentModel`.

pub mod v1_0;
pub mod v1_1;

use std::fmt::Debug;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::version::{ModelFamily, SchemaVersion};

/// The operations the aggregation engine needs from a model family.
pub trait ComponentModel:
    Sized + Clone + PartialEq + Debug + Serialize + DeserializeOwned
{
    type Metadata: Clone + PartialEq + Debug + Serialize + DeserializeOwned;
    type Component: Clone + PartialEq + Debug;
    type Resource: Clone + PartialEq + Debug;

    const FAMILY: ModelFamily;

    fn uuid(&self) -> &str;
    fn metadata(&self) -> &Self::Metadata;
    fn components(&self) -> &[Self::Component];
    fn resources(&self) -> &[Self::Resource];

    /// Builds a document from already-merged parts.
    fn assemble(
        uuid: String,
        metadata: Self::Metadata,
        components: Vec<Self::Component>,
        resources: Vec<Self::Resource>,
    ) -> Self;

    /// The `last-modified` field, which changes on every run.
    fn last_modified_mut(metadata: &mut Self::Metadata) -> &mut String;

    fn from_body(body: &DocumentBody) -> Option<&Self>;
    fn into_body(self) -> DocumentBody;
}

/// A decoded document of one model family.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
    V1_0(v1_0::Document),
    V1_1(v1_1::Document),
}

/// A component definition tagged with its schema version.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    version: SchemaVersion,
    body: DocumentBody,
}

impl SchemaDocument {
    /// Wraps a typed model. Fails if the model family does not serve
    /// `version`.
    pub fn from_model<M: ComponentModel>(version: SchemaVersion, model: M) -> Result<Self> {
        if version.family() != M::FAMILY {
            return Err(Error::SchemaMismatch {
                expected: format!("{:?}", version.family()),
                found: format!("{:?}", M::FAMILY),
            });
        }
        Ok(Self {
            version,
            body: model.into_body(),
        })
    }

    /// Decodes YAML or JSON bytes under `version`.
    ///
    /// `source_name` is only used to make the error message point at the
    /// offending source.
    pub fn decode(version: SchemaVersion, bytes: &[u8], source_name: &str) -> Result<Self> {
        let parse_error = |e: serde_yaml::Error| Error::Parse {
            source_name: source_name.to_string(),
            version: version.to_string(),
            message: e.to_string(),
        };

        let body = match version.family() {
            ModelFamily::V1_0 => {
                DocumentBody::V1_0(serde_yaml::from_slice(bytes).map_err(parse_error)?)
            }
            ModelFamily::V1_1 => {
                DocumentBody::V1_1(serde_yaml::from_slice(bytes).map_err(parse_error)?)
            }
        };

        Ok(Self { version, body })
    }

    /// Renders the document in `format`.
    pub fn encode(&self, format: OutputFormat) -> Result<String> {
        match &self.body {
            DocumentBody::V1_0(doc) => encode_model(doc, format),
            DocumentBody::V1_1(doc) => encode_model(doc, format),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn body(&self) -> &DocumentBody {
        &self.body
    }

    /// Borrows the typed model if this document belongs to `M`'s family.
    pub fn model<M: ComponentModel>(&self) -> Option<&M> {
        M::from_body(&self.body)
    }

    pub fn uuid(&self) -> &str {
        match &self.body {
            DocumentBody::V1_0(doc) => doc.uuid(),
            DocumentBody::V1_1(doc) => doc.uuid(),
        }
    }

    pub fn component_count(&self) -> usize {
        match &self.body {
            DocumentBody::V1_0(doc) => doc.components().len(),
            DocumentBody::V1_1(doc) => doc.components().len(),
        }
    }

    pub fn resource_count(&self) -> usize {
        match &self.body {
            DocumentBody::V1_0(doc) => doc.resources().len(),
            DocumentBody::V1_1(doc) => doc.resources().len(),
        }
    }

    /// UUIDs of the document's components, in order.
    pub fn component_uuids(&self) -> Vec<&str> {
        match &self.body {
            DocumentBody::V1_0(doc) => doc.components().iter().map(|c| c.uuid.as_str()).collect(),
            DocumentBody::V1_1(doc) => doc.components().iter().map(|c| c.uuid.as_str()).collect(),
        }
    }
}

fn encode_model<M: ComponentModel>(model: &M, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(model)?),
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(model)?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}

/// Text format of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// JSON for `.json` paths, YAML for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}
