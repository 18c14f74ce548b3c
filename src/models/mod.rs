//! Model hydration and the domain object shapes returned by the platform.
//!
//! Hydration turns a decoded JSON payload into a typed object plus two
//! back-references: the owning [`Client`] (so the object can issue further
//! calls) and the full decoded payload (for introspection). Both are fixed
//! at construction; hydrated objects are created fresh per call and never
//! cached.

pub mod query;
pub mod resource;

pub use query::{valid_chunk_size, Query, DEFAULT_CHUNK_SIZE};
pub use resource::{resource_object, File, Folder, ResourceCommon, ResourceObject, Table};

use crate::{Client, Result};
use serde::de::DeserializeOwned;

/// A typed object hydrated from a JSON payload.
///
/// Dereferences to the inner `data` for ergonomic field access.
#[derive(Clone)]
pub struct Hydrated<M> {
    /// The deserialized object.
    pub data: M,

    /// The client that produced this object; further calls made by model
    /// methods go through it.
    pub connection: Client,

    /// The full decoded response payload. For an array response every
    /// element carries the whole array.
    pub raw_response: serde_json::Value,
}

impl<M> std::ops::Deref for Hydrated<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<M> AsRef<M> for Hydrated<M> {
    fn as_ref(&self) -> &M {
        &self.data
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Hydrated<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hydrated")
            .field("data", &self.data)
            .field("raw_response", &self.raw_response)
            .finish_non_exhaustive()
    }
}

/// Result of a hydrating call, tagged by the shape of the decoded payload.
#[derive(Debug)]
pub enum Fetched<M> {
    /// The payload was a single JSON object.
    One(Hydrated<M>),

    /// The payload was a JSON array; order is preserved.
    Many(Vec<Hydrated<M>>),

    /// The server returned 204 No Content; nothing was parsed.
    NoContent,
}

impl<M> Fetched<M> {
    /// Returns the single hydrated object, or `None` for the other shapes.
    pub fn into_one(self) -> Option<Hydrated<M>> {
        match self {
            Fetched::One(hydrated) => Some(hydrated),
            _ => None,
        }
    }

    /// Returns the hydrated sequence, or `None` for the other shapes.
    pub fn into_many(self) -> Option<Vec<Hydrated<M>>> {
        match self {
            Fetched::Many(hydrated) => Some(hydrated),
            _ => None,
        }
    }

    /// Returns `true` if the server responded 204 No Content.
    pub fn is_no_content(&self) -> bool {
        matches!(self, Fetched::NoContent)
    }
}

impl<M: DeserializeOwned> Fetched<M> {
    /// Hydrates a decoded payload: one object per array element for a JSON
    /// array, exactly one object otherwise.
    pub(crate) fn hydrate(connection: Client, payload: serde_json::Value) -> Result<Self> {
        match payload {
            serde_json::Value::Array(items) => {
                let raw_response = serde_json::Value::Array(items.clone());
                let mut hydrated = Vec::with_capacity(items.len());
                for item in items {
                    hydrated.push(Hydrated {
                        data: serde_json::from_value(item)?,
                        connection: connection.clone(),
                        raw_response: raw_response.clone(),
                    });
                }
                Ok(Fetched::Many(hydrated))
            }
            value => Ok(Fetched::One(Hydrated {
                data: serde_json::from_value(value.clone())?,
                connection,
                raw_response: value,
            })),
        }
    }
}
