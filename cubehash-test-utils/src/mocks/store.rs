//! In-memory object store

use async_trait::async_trait;
use bytes::Bytes;
use cubehash_core::Result;
use cubehash_core::assets::{ObjectStore, StoredObject};
use std::collections::HashMap;
use std::sync::Mutex;

/// Object store backed by a map, recording every key it is asked for
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: HashMap<String, Bytes>,
    lookups: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, key: &str, body: impl Into<Bytes>) -> Self {
        self.objects.insert(key.to_string(), body.into());
        self
    }

    /// Keys looked up so far, oldest first
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        self.lookups.lock().unwrap().push(key.to_string());
        Ok(self
            .objects
            .get(key)
            .map(|body| StoredObject { body: body.clone() }))
    }
}
