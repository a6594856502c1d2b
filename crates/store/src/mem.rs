// crates/store/src/mem.rs

//! In-memory reference implementation of [`DocumentStore`].
//!
//! Single-document atomicity only, matching the contract the hosted
//! document database offers: one write lock per call, no multi-document
//! transactions. Used by tests and by the binary when no real backend is
//! configured.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as Json};
use tokio::sync::{Mutex, RwLock};

use crate::adapter::{Collection, DocumentStore, Order};
use crate::{Result, StoreError};

type Shelf = HashMap<String, Json>;

#[derive(Clone, Default)]
pub struct MemStore {
    shelves: Arc<RwLock<HashMap<Collection, Shelf>>>,
    /// Last stamp handed out; keeps `updatedAt` non-decreasing even if the
    /// wall clock steps backwards between writes.
    last_stamp: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn next_stamp(&self) -> DateTime<Utc> {
        let mut last = self.last_stamp.lock().await;
        let now = Utc::now();
        let stamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

fn stamp_str(ts: DateTime<Utc>) -> Json {
    Json::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn compare_field(a: &Json, b: &Json, field: &str) -> Ordering {
    let a = a.get(field);
    let b = b.get(field);
    match (a, b) {
        (Some(Json::String(x)), Some(Json::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => x.to_string().cmp(&y.to_string()),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemStore {
    #[tracing::instrument(skip_all, fields(collection = collection.name(), id = %id))]
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Json>> {
        let shelves = self.shelves.read().await;
        Ok(shelves
            .get(&collection)
            .and_then(|shelf| shelf.get(id))
            .cloned())
    }

    #[tracing::instrument(skip_all, fields(collection = collection.name()))]
    async fn query(
        &self,
        collection: Collection,
        filter: Option<(&str, &Json)>,
        order: Order,
    ) -> Result<Vec<Json>> {
        let shelves = self.shelves.read().await;
        let mut docs: Vec<Json> = shelves
            .get(&collection)
            .map(|shelf| {
                shelf
                    .values()
                    .filter(|doc| match filter {
                        Some((field, expected)) => doc.get(field) == Some(expected),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        match &order {
            Order::Unordered => {
                // HashMap iteration order is arbitrary; sort by id for
                // deterministic output.
                docs.sort_by(|a, b| compare_field(a, b, "id"));
            }
            Order::Asc(field) => docs.sort_by(|a, b| compare_field(a, b, field)),
            Order::Desc(field) => docs.sort_by(|a, b| compare_field(b, a, field)),
        }
        Ok(docs)
    }

    #[tracing::instrument(skip_all, fields(collection = collection.name(), id = %id))]
    async fn set(&self, collection: Collection, id: &str, mut doc: Json) -> Result<()> {
        let stamp = self.next_stamp().await;
        let mut shelves = self.shelves.write().await;
        let shelf = shelves.entry(collection).or_default();

        let created_at = shelf
            .get(id)
            .and_then(|existing| existing.get("createdAt"))
            .cloned()
            .unwrap_or_else(|| stamp_str(stamp));

        match doc.as_object_mut() {
            Some(obj) => {
                obj.insert("createdAt".into(), created_at);
                obj.insert("updatedAt".into(), stamp_str(stamp));
            }
            None => {
                return Err(StoreError::Transient(format!(
                    "refusing to store non-object document {}/{id}",
                    collection.name()
                )))
            }
        }

        shelf.insert(id.to_owned(), doc);
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(collection = collection.name(), id = %id))]
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Json>,
    ) -> Result<()> {
        let stamp = self.next_stamp().await;
        let mut shelves = self.shelves.write().await;
        let shelf = shelves.entry(collection).or_default();

        let doc = shelf
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let obj = doc.as_object_mut().ok_or_else(|| {
            StoreError::Transient(format!(
                "stored document {}/{id} is not an object",
                collection.name()
            ))
        })?;

        for (key, value) in fields {
            // createdAt is stamped once, at creation, and never overwritten.
            if key == "createdAt" {
                continue;
            }
            obj.insert(key, value);
        }
        obj.insert("updatedAt".into(), stamp_str(stamp));
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(collection = collection.name(), id = %id))]
    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut shelves = self.shelves.write().await;
        let removed = shelves
            .get_mut(&collection)
            .and_then(|shelf| shelf.remove(id));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(collection, id)),
        }
    }
}
