use super::api::StoryApi;
use super::model::{NewStory, Story};
use anyhow::Result;
use tracing::debug;

/// Every story the client knows about, newest first.
#[derive(Debug, Clone, Default)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

/// The logged-in user and the stories hanging off their account.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub name: String,
    pub token: String,
    pub favorites: Vec<Story>,
    pub own_stories: Vec<Story>,
}

impl StoryList {
    pub async fn get_stories<A: StoryApi>(api: &A) -> Result<Self> {
        let mut stories = api.fetch_stories().await?;
        dedup_by_id(&mut stories);
        debug!(count = stories.len(), "fetched stories");
        Ok(Self { stories })
    }

    pub fn find(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id == story_id)
    }

    /// Submits a story and places it first in both this list and the
    /// user's own stories.
    pub async fn add_story<A: StoryApi>(
        &mut self,
        api: &A,
        user: &mut CurrentUser,
        info: &NewStory,
    ) -> Result<Story> {
        let story = api.add_story(user, info).await?;
        self.stories.retain(|s| s.story_id != story.story_id);
        self.stories.insert(0, story.clone());
        user.own_stories.retain(|s| s.story_id != story.story_id);
        user.own_stories.insert(0, story.clone());
        Ok(story)
    }

    /// Deletes a story server side, then drops every local reference to it.
    pub async fn remove_story<A: StoryApi>(
        &mut self,
        api: &A,
        user: &mut CurrentUser,
        story_id: &str,
    ) -> Result<()> {
        api.remove_story(user, story_id).await?;
        self.stories.retain(|s| s.story_id != story_id);
        user.own_stories.retain(|s| s.story_id != story_id);
        user.favorites.retain(|s| s.story_id != story_id);
        Ok(())
    }
}

impl CurrentUser {
    pub fn is_favorite(&self, story: &Story) -> bool {
        self.favorites.iter().any(|s| s.story_id == story.story_id)
    }

    pub async fn add_favorite<A: StoryApi>(&mut self, api: &A, story: &Story) -> Result<()> {
        api.add_favorite(self, &story.story_id).await?;
        if !self.is_favorite(story) {
            self.favorites.push(story.clone());
        }
        Ok(())
    }

    pub async fn remove_favorite<A: StoryApi>(&mut self, api: &A, story: &Story) -> Result<()> {
        api.remove_favorite(self, &story.story_id).await?;
        self.favorites.retain(|s| s.story_id != story.story_id);
        Ok(())
    }
}

// Keeps the first occurrence of each id.
fn dedup_by_id(stories: &mut Vec<Story>) {
    let mut seen = std::collections::HashSet::new();
    stories.retain(|s| seen.insert(s.story_id.clone()));
}
