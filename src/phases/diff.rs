//! Change Detection
//!
//! Decides whether a freshly built aggregate differs from the output already
//! on disk. Only `metadata` and `components` take part in the comparison, and
//! `last-modified` is cleared on both sides first since it changes on every
//! run. The document `uuid` is fresh on every run too, so it is never
//! compared.
//!
//! Equality is the derived structural equality of the typed model: key order
//! in the source text is irrelevant, sequence order is significant.

use crate::schema::{ComponentModel, DocumentBody, SchemaDocument};

/// Returns `true` when `candidate` carries nothing new relative to `existing`.
///
/// Documents of different schema versions are never unchanged.
pub fn unchanged(existing: &SchemaDocument, candidate: &SchemaDocument) -> bool {
    if existing.version() != candidate.version() {
        return false;
    }

    match (existing.body(), candidate.body()) {
        (DocumentBody::V1_0(old), DocumentBody::V1_0(new)) => unchanged_model(old, new),
        (DocumentBody::V1_1(old), DocumentBody::V1_1(new)) => unchanged_model(old, new),
        _ => false,
    }
}

fn unchanged_model<M: ComponentModel>(existing: &M, candidate: &M) -> bool {
    canonical_metadata::<M>(existing) == canonical_metadata::<M>(candidate)
        && existing.components() == candidate.components()
}

fn canonical_metadata<M: ComponentModel>(model: &M) -> M::Metadata {
    let mut metadata = model.metadata().clone();
    M::last_modified_mut(&mut metadata).clear();
    metadata
}
