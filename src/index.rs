use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::github::ContentStore;
use crate::model::difficulty_rank;

/// Repository-relative path of the shared index document.
pub const INDEX_PATH: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub slug: String,
    pub name: String,
    pub difficulty: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub path: String,
    #[serde(default)]
    pub date_solved: String,
}

#[derive(Debug, Default, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    items: Vec<IndexEntry>,
}

#[derive(Serialize)]
struct IndexDocumentRef<'a> {
    items: &'a [IndexEntry],
}

/// Loads the index. An absent file yields an empty list with no revision;
/// a file that exists but does not parse yields an empty list paired with
/// the revision that was returned, so the subsequent overwrite replaces
/// the corrupt document instead of failing.
pub async fn load_index<S: ContentStore + ?Sized>(
    store: &S,
) -> Result<(Vec<IndexEntry>, Option<String>), RepositoryError> {
    match store.get_file(INDEX_PATH).await? {
        None => Ok((Vec::new(), None)),
        Some(file) => {
            let items = serde_json::from_str::<IndexDocument>(&file.content)
                .map(|doc| doc.items)
                .unwrap_or_default();
            Ok((items, Some(file.sha)))
        }
    }
}

/// Merges one entry by slug and re-sorts the whole list.
///
/// An existing entry keeps its `date_solved` unless it never had one; the
/// earliest solve date is sticky across re-syncs. The full re-sort matters
/// even for updates, since an update can move an entry's sort key.
pub fn merge_entry(items: &mut Vec<IndexEntry>, entry: IndexEntry) {
    match items.iter_mut().find(|item| item.slug == entry.slug) {
        Some(existing) => {
            existing.name = entry.name;
            existing.difficulty = entry.difficulty;
            existing.topics = entry.topics;
            existing.path = entry.path;
            if existing.date_solved.is_empty() {
                existing.date_solved = entry.date_solved;
            }
        }
        None => items.push(entry),
    }
    sort_entries(items);
}

/// Total order: `date_solved` descending (lexicographic works for
/// YYYY-MM-DD), then difficulty rank ascending (Hard first), then slug
/// ascending.
pub fn sort_entries(items: &mut [IndexEntry]) {
    items.sort_by(|a, b| {
        b.date_solved
            .cmp(&a.date_solved)
            .then_with(|| difficulty_rank(&a.difficulty).cmp(&difficulty_rank(&b.difficulty)))
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Renders the index as the persisted JSON document: `{"items": [...]}`
/// with 2-space indentation.
pub fn render_index(items: &[IndexEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&IndexDocumentRef { items })
}
