//! Cursor-driven batch precompute
//!
//! An external scheduler calls the batch endpoint periodically; each call
//! processes one popular-catalog item through the same compute path as the
//! on-demand route and persists the result proactively. The cursor is read
//! from the store at the start of a step and the advanced cursor is
//! persisted at the end; it is never process-global state. The design
//! assumes at most one batch invocation runs at a time.

use crate::db::{Cache, CacheKey};
use crate::error::AppResult;
use crate::models::{Cursor, MediaKind};
use crate::services::candidates::CandidateStrategy;
use crate::services::catalog::CatalogProvider;
use crate::services::similar::{self, Computed, FULL_RESULT_TTL, PASSTHROUGH_TTL};

/// What a single batch step did, with the cursor to persist
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The popular listing ran out of pages; the cursor starts over
    Exhausted { next: Cursor },
    /// The current page's items are all processed; move to the next page
    PageComplete { finished: u32, next: Cursor },
    /// One item was scored and persisted
    Processed {
        title: String,
        position: Cursor,
        next: Cursor,
    },
}

impl StepOutcome {
    /// Cursor the caller must persist after this step
    pub fn next_cursor(&self) -> Cursor {
        match self {
            StepOutcome::Exhausted { next }
            | StepOutcome::PageComplete { next, .. }
            | StepOutcome::Processed { next, .. } => *next,
        }
    }

    /// Plain-text status line returned to the scheduler
    pub fn status_line(&self) -> String {
        match self {
            StepOutcome::Exhausted { .. } => "Finished all pages, resetting.".to_string(),
            StepOutcome::PageComplete { finished, .. } => {
                format!("Finished page {}. Moving to next page.", finished)
            }
            StepOutcome::Processed { title, position, .. } => format!(
                "Successfully processed: {} (Page: {}, Index: {})",
                title, position.page, position.index
            ),
        }
    }
}

/// Decides how the cursor moves given the fetched page length
///
/// Pure so the reset and page-turn edge cases are testable without IO.
/// Returns `None` when the cursor points at a real item to process.
pub fn plan_step(cursor: Cursor, page_len: usize) -> Option<StepOutcome> {
    if page_len == 0 {
        return Some(StepOutcome::Exhausted {
            next: Cursor::default(),
        });
    }

    if cursor.index >= page_len {
        return Some(StepOutcome::PageComplete {
            finished: cursor.page,
            next: Cursor {
                page: cursor.page + 1,
                index: 0,
            },
        });
    }

    None
}

/// Runs one unit of batch work and persists the advanced cursor
pub async fn run_step(cache: &Cache, provider: &dyn CatalogProvider) -> AppResult<String> {
    let cursor = cache
        .get_from_cache::<Cursor>(&CacheKey::BatchCursor)
        .await?
        .unwrap_or_default();

    let page = provider.popular(MediaKind::Movie, cursor.page).await?;

    let outcome = match plan_step(cursor, page.len()) {
        Some(outcome) => outcome,
        None => {
            let target = &page[cursor.index];
            let key = CacheKey::Similar(MediaKind::Movie, target.id);

            // Same pipeline as the on-demand path, against the fixed
            // top-rated pool the precompute job has always used
            let computed = similar::compute(
                provider,
                CandidateStrategy::FixedPool,
                MediaKind::Movie,
                target.id,
            )
            .await?;

            match computed {
                Computed::Scored(list) => {
                    cache.set_in_background(&key, &list, Some(FULL_RESULT_TTL));
                }
                Computed::Passthrough(list) => {
                    cache.set_in_background(&key, &list, Some(PASSTHROUGH_TTL));
                }
            }

            StepOutcome::Processed {
                title: target.title.clone(),
                position: cursor,
                next: Cursor {
                    page: cursor.page,
                    index: cursor.index + 1,
                },
            }
        }
    };

    cache.set_in_background(&CacheKey::BatchCursor, &outcome.next_cursor(), None);

    let message = outcome.status_line();
    tracing::info!(cursor = ?outcome.next_cursor(), "{}", message);
    Ok(message)
}
