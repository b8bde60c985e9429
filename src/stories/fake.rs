//! In-memory `StoryApi` for tests.

use super::api::StoryApi;
use super::list::CurrentUser;
use super::model::{NewStory, Story};
use anyhow::{Result, bail};
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchStories,
    AddStory { username: String, title: String },
    RemoveStory(String),
    AddFavorite(String),
    RemoveFavorite(String),
    FetchUser(String),
}

#[derive(Default)]
pub struct FakeApi {
    stories: Vec<Story>,
    calls: RefCell<Vec<Call>>,
    reject: Cell<bool>,
    next_id: Cell<u32>,
}

pub fn story(id: &str, title: &str) -> Story {
    Story {
        story_id: id.to_string(),
        title: title.to_string(),
        author: "X".to_string(),
        url: format!("http://{}.com", title.to_lowercase()),
        username: "bob".to_string(),
        created_at: None,
    }
}

impl FakeApi {
    pub fn with_stories(stories: Vec<Story>) -> Self {
        Self {
            stories,
            ..Self::default()
        }
    }

    pub fn user(username: &str) -> CurrentUser {
        CurrentUser {
            username: username.to_string(),
            name: username.to_string(),
            token: "token".to_string(),
            favorites: Vec::new(),
            own_stories: Vec::new(),
        }
    }

    /// Makes the next call fail the way a rejected request would.
    pub fn reject_next(&self) {
        self.reject.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.reject.replace(false) {
            bail!("Bad Request (400): rejected");
        }
        Ok(())
    }
}

impl StoryApi for FakeApi {
    async fn fetch_stories(&self) -> Result<Vec<Story>> {
        self.record(Call::FetchStories)?;
        Ok(self.stories.clone())
    }

    async fn add_story(&self, user: &CurrentUser, story: &NewStory) -> Result<Story> {
        self.record(Call::AddStory {
            username: story.username.clone(),
            title: story.title.clone(),
        })?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        Ok(Story {
            story_id: format!("new-{}", n),
            title: story.title.clone(),
            author: story.author.clone(),
            url: story.url.clone(),
            username: user.username.clone(),
            created_at: None,
        })
    }

    async fn remove_story(&self, _user: &CurrentUser, story_id: &str) -> Result<()> {
        self.record(Call::RemoveStory(story_id.to_string()))
    }

    async fn add_favorite(&self, _user: &CurrentUser, story_id: &str) -> Result<()> {
        self.record(Call::AddFavorite(story_id.to_string()))
    }

    async fn remove_favorite(&self, _user: &CurrentUser, story_id: &str) -> Result<()> {
        self.record(Call::RemoveFavorite(story_id.to_string()))
    }

    async fn fetch_user(&self, username: &str, _token: &str) -> Result<CurrentUser> {
        self.record(Call::FetchUser(username.to_string()))?;
        Ok(Self::user(username))
    }
}
