//! In-memory ObjectStore for engine tests
//!
//! Keeps object sizes in a sorted map and records every mutating call, so
//! tests can assert that a rejected batch had zero side effects. Page size
//! and failure injection are configurable per test.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pail_core::{Error, ListRequest, ObjectMeta, ObjectPage, ObjectStore, Result};

pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, i64>>,
    pub copies: Mutex<Vec<(String, String)>>,
    pub deletes: Mutex<Vec<String>>,
    /// Keys per listing page, small values exercise the pagination loop
    pub page_size: usize,
    /// Copy reports success without writing the target
    pub drop_copies: bool,
    /// Delete reports success without removing the object
    pub ignore_deletes: bool,
}

impl MemoryStore {
    pub fn new<K: Into<String>>(objects: impl IntoIterator<Item = (K, i64)>) -> Self {
        Self {
            objects: Mutex::new(
                objects
                    .into_iter()
                    .map(|(key, size)| (key.into(), size))
                    .collect(),
            ),
            copies: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            page_size: 1000,
            drop_copies: false,
            ignore_deletes: false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Remove an object behind the engine's back, simulating a concurrent
    /// request between validation and execution.
    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn copy_count(&self) -> usize {
        self.copies.lock().unwrap().len()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn object_exists(&self, key: &str) -> Result<bool> {
        Ok(self.contains(key))
    }

    async fn head_object(&self, key: &str) -> Result<ObjectMeta> {
        match self.objects.lock().unwrap().get(key) {
            Some(size) => Ok(ObjectMeta::new(key, *size)),
            None => Err(Error::NotFound(key.to_string())),
        }
    }

    async fn list_objects(&self, request: ListRequest) -> Result<ObjectPage> {
        let objects = self.objects.lock().unwrap();
        let mut matching: Vec<(String, i64)> = objects
            .iter()
            .filter(|(key, _)| key.starts_with(&request.prefix))
            .filter(|(key, _)| match &request.continuation_token {
                Some(token) => key.as_str() > token.as_str(),
                None => true,
            })
            .map(|(key, size)| (key.clone(), *size))
            .collect();

        let truncated = matching.len() > self.page_size;
        matching.truncate(self.page_size);
        let next_token = if truncated {
            matching.last().map(|(key, _)| key.clone())
        } else {
            None
        };

        let mut prefixes: Vec<String> = Vec::new();
        let mut page_objects: Vec<ObjectMeta> = Vec::new();
        match request.delimiter.as_deref() {
            Some(delimiter) => {
                for (key, size) in matching {
                    let rest = &key[request.prefix.len()..];
                    match rest.find(delimiter) {
                        Some(pos) => {
                            let prefix =
                                format!("{}{}", request.prefix, &rest[..pos + delimiter.len()]);
                            if prefixes.last() != Some(&prefix) {
                                prefixes.push(prefix);
                            }
                        }
                        None => page_objects.push(ObjectMeta::new(key, size)),
                    }
                }
            }
            None => {
                for (key, size) in matching {
                    page_objects.push(ObjectMeta::new(key, size));
                }
            }
        }

        Ok(ObjectPage {
            prefixes,
            objects: page_objects,
            next_token,
        })
    }

    async fn copy_object(&self, source_key: &str, target_key: &str) -> Result<()> {
        let mut objects = self.objects.lock().unwrap();
        let size = *objects
            .get(source_key)
            .ok_or_else(|| Error::NotFound(source_key.to_string()))?;
        self.copies
            .lock()
            .unwrap()
            .push((source_key.to_string(), target_key.to_string()));
        if !self.drop_copies {
            objects.insert(target_key.to_string(), size);
        }
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(key.to_string());
        if !self.ignore_deletes {
            self.objects.lock().unwrap().remove(key);
        }
        Ok(())
    }

    async fn delete_objects(&self, keys: Vec<String>) -> Result<Vec<String>> {
        let mut objects = self.objects.lock().unwrap();
        let mut deleted = Vec::new();
        for key in keys {
            self.deletes.lock().unwrap().push(key.clone());
            if !self.ignore_deletes {
                objects.remove(&key);
            }
            deleted.push(key);
        }
        Ok(deleted)
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        match self.objects.lock().unwrap().get(key) {
            Some(size) => Ok(vec![0u8; *size as usize]),
            None => Err(Error::NotFound(key.to_string())),
        }
    }

    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<ObjectMeta> {
        let size = data.len() as i64;
        self.objects.lock().unwrap().insert(key.to_string(), size);
        Ok(ObjectMeta::new(key, size))
    }

    async fn presign_get(&self, key: &str, expires_secs: u64) -> Result<String> {
        Ok(format!("https://store.test/{key}?expires={expires_secs}"))
    }
}
