//! Turns user commands into API calls and keeps the page in step with the
//! resulting state.

mod command;
mod error;

pub use command::Command;
pub use error::DispatchError;

use crate::page::{
    ContainerId, Page, RenderMode, render_story, show_all_stories, show_favorited_stories,
    show_own_stories,
};
use crate::stories::{CurrentUser, NewStory, StoryApi, StoryList};
use anyhow::Result;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Everything the page is rendered from.
#[derive(Debug, Default)]
pub struct AppState {
    pub stories: StoryList,
    pub user: Option<CurrentUser>,
}

/// Owns the state and the page; the only place either is mutated.
pub struct Dispatcher<A> {
    api: A,
    state: AppState,
    page: Page,
    queue: VecDeque<Command>,
}

impl<A: StoryApi> Dispatcher<A> {
    pub fn new(api: A, user: Option<CurrentUser>) -> Self {
        Self {
            api,
            state: AppState {
                stories: StoryList::default(),
                user,
            },
            page: Page::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the story list, drops the loading message and shows every
    /// story. Called once when the client starts.
    pub async fn get_and_show_stories_on_start(&mut self) -> Result<()> {
        self.state.stories = StoryList::get_stories(&self.api).await?;
        self.page.remove_loading_msg();
        show_all_stories(&mut self.page, &self.state.stories, self.state.user.as_ref());
        info!(count = self.state.stories.stories.len(), "stories loaded");
        Ok(())
    }

    pub fn enqueue(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs everything queued so far, after coalescing. A failed command does
    /// not stop the ones behind it; its error is returned instead.
    pub async fn run_pending(&mut self) -> Vec<DispatchError> {
        let batch = command::coalesce(self.queue.drain(..).collect());
        let mut errors = Vec::new();
        for command in batch {
            if let Err(err) = self.dispatch(command).await {
                warn!(error = %err, "command failed");
                errors.push(err);
            }
        }
        errors
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<(), DispatchError> {
        debug!(?command, "dispatch");
        match command {
            Command::ShowAll => {
                self.page.hide_page_components();
                show_all_stories(&mut self.page, &self.state.stories, self.state.user.as_ref());
                Ok(())
            }
            Command::ShowOwn => {
                self.page.hide_page_components();
                show_own_stories(&mut self.page, self.state.user.as_ref());
                Ok(())
            }
            Command::ShowFavorites => {
                self.page.hide_page_components();
                show_favorited_stories(&mut self.page, self.state.user.as_ref());
                Ok(())
            }
            Command::SubmitStory { title, author, url } => {
                self.submit_story(title, author, url).await
            }
            Command::ToggleFavorite { story_id } => self.toggle_favorite(story_id).await,
            Command::DeleteStory { story_id } => self.delete_story(story_id).await,
        }
    }

    async fn submit_story(
        &mut self,
        title: String,
        author: String,
        url: String,
    ) -> Result<(), DispatchError> {
        let user = self.state.user.as_mut().ok_or(DispatchError::NotLoggedIn)?;
        let info = NewStory {
            title,
            author,
            url,
            username: user.username.clone(),
        };

        let story = self
            .state
            .stories
            .add_story(&self.api, user, &info)
            .await
            .map_err(|source| DispatchError::Submission { source })?;
        info!(story_id = %story.story_id, "story submitted");

        let fragment = render_story(&story, RenderMode::Default, self.state.user.as_ref());
        self.page.container_mut(ContainerId::AllStories).prepend(fragment);
        self.page.hide_page_components();
        show_all_stories(&mut self.page, &self.state.stories, self.state.user.as_ref());
        Ok(())
    }

    // The star only changes once the server has accepted the change.
    async fn toggle_favorite(&mut self, story_id: String) -> Result<(), DispatchError> {
        let user = self.state.user.as_mut().ok_or(DispatchError::NotLoggedIn)?;
        let story = self
            .state
            .stories
            .find(&story_id)
            .or_else(|| user.favorites.iter().find(|s| s.story_id == story_id))
            .cloned()
            .ok_or_else(|| DispatchError::StoryNotFound(story_id.clone()))?;

        let was_favorite = user.is_favorite(&story);
        let result = if was_favorite {
            user.remove_favorite(&self.api, &story).await
        } else {
            user.add_favorite(&self.api, &story).await
        };
        result.map_err(|source| DispatchError::FavoriteToggle {
            story_id: story_id.clone(),
            source,
        })?;
        debug!(%story_id, favorite = !was_favorite, "favorite toggled");

        let fragment = render_story(&story, RenderMode::Default, self.state.user.as_ref());
        self.page
            .container_mut(ContainerId::AllStories)
            .replace_item(&story_id, fragment);
        if self.page.container(ContainerId::OwnStories).is_visible() {
            show_own_stories(&mut self.page, self.state.user.as_ref());
        }
        if self.page.container(ContainerId::Favorites).is_visible() {
            show_favorited_stories(&mut self.page, self.state.user.as_ref());
        }
        Ok(())
    }

    async fn delete_story(&mut self, story_id: String) -> Result<(), DispatchError> {
        let user = self.state.user.as_mut().ok_or(DispatchError::NotLoggedIn)?;
        self.state
            .stories
            .remove_story(&self.api, user, &story_id)
            .await
            .map_err(|source| DispatchError::Deletion {
                story_id: story_id.clone(),
                source,
            })?;
        info!(%story_id, "story deleted");

        show_own_stories(&mut self.page, self.state.user.as_ref());
        if self.page.container(ContainerId::AllStories).is_visible() {
            show_all_stories(&mut self.page, &self.state.stories, self.state.user.as_ref());
        }
        if self.page.container(ContainerId::Favorites).is_visible() {
            show_favorited_stories(&mut self.page, self.state.user.as_ref());
        }
        Ok(())
    }
}
