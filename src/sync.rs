use crate::content;
use crate::error::SyncError;
use crate::github::{ContentStore, create_or_update_file};
use crate::index::{self, IndexEntry};
use crate::model::{SolutionSubmission, difficulty_folder};

/// Terminal outcome of one sync request. Failures travel as `SyncError`.
#[derive(Debug, PartialEq)]
pub enum SyncOutcome {
    /// Neither the solution file nor the index entry would change; no
    /// write was issued at all.
    NoChange,
    Synced { path: String, message: String },
}

/// Runs one submission through the full pipeline: validate, compute the
/// target path, build candidate content, diff both artifacts against the
/// remote state, and write only what changed.
///
/// `today` is the YYYY-MM-DD date stamped on a first-time solve; re-syncs
/// of a known slug keep their original date.
pub async fn sync_solution<S: ContentStore + ?Sized>(
    store: &S,
    submission: &SolutionSubmission,
    today: &str,
) -> Result<SyncOutcome, SyncError> {
    submission.validate()?;

    let ext = content::extension_for(&submission.language);
    let folder = difficulty_folder(&submission.difficulty);
    let path = format!("{}/{}/solution.{}", folder, submission.slug, ext);
    let solution_content = content::build_solution_content(submission, ext);

    // Both reads must land before any write decision is made. The index
    // revision is not kept: every write re-fetches its target immediately
    // beforehand and uses that revision.
    let (mut items, _revision) = index::load_index(store).await?;
    let existing_solution = store.get_file(&path).await?;

    let solution_changed = existing_solution
        .as_ref()
        .map_or(true, |file| file.content != solution_content);

    let existing_entry = items.iter().find(|item| item.slug == submission.slug);
    let index_needs_update = existing_entry.map_or(true, |entry| {
        entry.name != submission.title
            || entry.difficulty != submission.difficulty
            || entry.topics != submission.topics
            || entry.path != path
    });

    if !solution_changed && !index_needs_update {
        tracing::info!(slug = %submission.slug, "no changes detected");
        return Ok(SyncOutcome::NoChange);
    }

    if solution_changed {
        create_or_update_file(
            store,
            &path,
            &solution_content,
            &format!("Sync solution: {}", submission.title),
        )
        .await?;
    }

    // The index is re-merged and offered for write whenever anything
    // changed; identical bytes are skipped by the compare-before-write.
    merge_submission(&mut items, submission, &path, today);
    let index_content = index::render_index(&items)?;
    create_or_update_file(
        store,
        index::INDEX_PATH,
        &index_content,
        &format!("Update index: {}", submission.title),
    )
    .await?;

    tracing::info!(slug = %submission.slug, %path, "synced");
    Ok(SyncOutcome::Synced {
        message: format!("Synced: {}", submission.title),
        path,
    })
}

fn merge_submission(
    items: &mut Vec<IndexEntry>,
    submission: &SolutionSubmission,
    path: &str,
    today: &str,
) {
    index::merge_entry(
        items,
        IndexEntry {
            slug: submission.slug.clone(),
            name: submission.title.clone(),
            difficulty: submission.difficulty.clone(),
            topics: submission.topics.clone(),
            path: path.to_string(),
            date_solved: today.to_string(),
        },
    );
}
