use thiserror::Error;

/// Why a command left the page untouched.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("story {0} is not known to this page")]
    StoryNotFound(String),

    #[error("failed to submit story: {source}")]
    Submission { source: anyhow::Error },

    #[error("failed to update favorite for story {story_id}: {source}")]
    FavoriteToggle {
        story_id: String,
        source: anyhow::Error,
    },

    #[error("failed to delete story {story_id}: {source}")]
    Deletion {
        story_id: String,
        source: anyhow::Error,
    },
}
