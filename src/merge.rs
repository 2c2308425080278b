//! Identifier-scoped edits over a list that other consumers share.
//!
//! Entries are matched only by their identifier. Anything that does not
//! carry the identifier being edited is kept as-is and in the same order.

/// An entry that may carry a stable identifier.
pub trait Identified {
    /// The identifier of the entry, if it has one.
    fn identifier(&self) -> Option<&str>;
}

/// Return `collection` without any entry identified by `id`.
pub fn remove<T: Identified>(collection: Vec<T>, id: &str) -> Vec<T> {
    collection
        .into_iter()
        .filter(|entry| entry.identifier() != Some(id))
        .collect()
}

/// Replace every entry sharing the identifier of `entry` with a single `entry`
/// appended at the end.
pub fn upsert<T: Identified>(collection: Vec<T>, entry: T) -> Vec<T> {
    let mut kept = match entry.identifier() {
        Some(id) => remove(collection, id),
        None => collection,
    };
    kept.push(entry);
    kept
}

/// The edit a lifecycle action applies to one collection.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation<T> {
    /// Insert the entry, replacing any entry with the same identifier
    Upsert(T),
    /// Drop the entries with the given identifier
    Remove(String),
}

impl<T: Identified> Mutation<T> {
    /// Apply the edit. An absent collection is treated as empty.
    pub fn apply(self, collection: Option<Vec<T>>) -> Vec<T> {
        let collection = collection.unwrap_or_default();
        match self {
            Mutation::Upsert(entry) => upsert(collection, entry),
            Mutation::Remove(id) => remove(collection, &id),
        }
    }
}

impl Identified for serde_json::Value {
    fn identifier(&self) -> Option<&str> {
        self.get("Sid").and_then(serde_json::Value::as_str)
    }
}

impl Identified for aws_sdk_s3::model::QueueConfiguration {
    fn identifier(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
