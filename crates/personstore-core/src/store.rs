//! Concurrent in-memory person store.
//!
//! A single `RwLock` guards both the record map and the id counter: `list`,
//! `get` and `count` share the read side, every mutation takes the write side.
//! Ids are the decimal form of a per-store counter starting at 0 and are never
//! reused, deletions included.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::person::{NewPerson, Person, PersonPatch};

/// Hard ceiling on simultaneously stored records.
pub const MAX_RECORDS: usize = 100_000;

struct Inner {
    records: HashMap<String, Person>,
    next_id: u64,
}

pub struct PersonStore {
    inner: RwLock<Inner>,
    max_records: usize,
}

impl Default for PersonStore {
    fn default() -> Self {
        Self::new(MAX_RECORDS)
    }
}

impl PersonStore {
    pub fn new(max_records: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                next_id: 0,
            }),
            max_records,
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_records
    }

    /// Up to `count` records starting at offset `start` of the current
    /// iteration order. Order is unspecified and not stable across mutations.
    pub fn list(&self, start: usize, count: usize) -> Vec<Person> {
        let g = self.inner.read();
        g.records.values().skip(start).take(count).cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<Person> {
        self.inner.read().records.get(id).cloned()
    }

    /// Insert unconditionally. Callers are expected to have validated `new`
    /// and checked capacity; prefer [`PersonStore::try_create`] which does the
    /// capacity check under the same write lock.
    pub fn create(&self, new: NewPerson) -> Person {
        let mut g = self.inner.write();
        insert_locked(&mut g, new)
    }

    /// Insert unless the store already holds `capacity()` records.
    pub fn try_create(&self, new: NewPerson) -> Option<Person> {
        let mut g = self.inner.write();
        if g.records.len() >= self.max_records {
            tracing::debug!(max = self.max_records, "store full, create refused");
            return None;
        }
        Some(insert_locked(&mut g, new))
    }

    /// Apply `patch` to `id`. `updated_at` is refreshed on every hit, even if
    /// no value changed.
    pub fn update(&self, id: &str, patch: PersonPatch) -> Option<Person> {
        let mut g = self.inner.write();
        let existing = g.records.get_mut(id)?;
        patch.apply(existing);
        existing.updated_at = Utc::now();
        Some(existing.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.inner.write().records.remove(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.inner.read().records.len()
    }
}

fn insert_locked(g: &mut Inner, new: NewPerson) -> Person {
    let id = g.next_id.to_string();
    g.next_id += 1;

    let now = Utc::now();
    let person = Person {
        id: id.clone(),
        first_name: new.first_name,
        last_name: new.last_name,
        email: new.email.filter(|e| !e.is_empty()),
        created_at: now,
        updated_at: now,
    };
    g.records.insert(id, person.clone());
    person
}
