use std::borrow::Cow;

use crate::entities::Entity;

/// Case-insensitive substring match of `term` against any of `fields`.
/// An empty term matches everything.
pub fn matches(fields: &[Cow<'_, str>], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn visible<'a, E: Entity>(records: &'a [E::Record], term: &str) -> Vec<&'a E::Record> {
    records
        .iter()
        .filter(|record| matches(&E::search_fields(record), term))
        .collect()
}
