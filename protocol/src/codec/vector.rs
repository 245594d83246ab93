//! Count-prefixed vectors of encodeable items.
//!
//! Wire form: a 4-byte big-endian element count, then each element in
//! order. An empty vector is just `00 00 00 00`. The container does not
//! bound the count; protocol-level limits belong to the caller.

use std::ops::Deref;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use super::cursor::read_u32;
use super::error::CodecError;
use super::Encodeable;

/// An ordered, count-prefixed sequence of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageVec<T> {
    items: Vec<T>,
}

impl<T> MessageVec<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for MessageVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for MessageVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for MessageVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for MessageVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for MessageVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a MessageVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Encodeable> Encodeable for MessageVec<T> {
    fn decode<B: Buf>(source: &mut B) -> Result<Self, CodecError> {
        let count = read_u32(source)? as usize;
        // Every element occupies at least one byte, so the remaining input
        // bounds how many slots are worth reserving.
        let mut items = Vec::with_capacity(count.min(source.remaining()));
        for _ in 0..count {
            items.push(T::decode(source)?);
        }
        Ok(Self { items })
    }

    fn encode<B: BufMut>(&self, target: &mut B) {
        target.put_u32(self.items.len() as u32);
        for item in &self.items {
            item.encode(target);
        }
    }
}
