use super::list::CurrentUser;
use super::model::{NewStory, Story};
use anyhow::{Context, Result, anyhow, bail};
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Remote operations the story board depends on.
///
/// Every call either resolves with the server's answer or fails with the
/// reason the server (or the network) gave. Nothing is retried.
#[allow(async_fn_in_trait)]
pub trait StoryApi {
    async fn fetch_stories(&self) -> Result<Vec<Story>>;
    async fn add_story(&self, user: &CurrentUser, story: &NewStory) -> Result<Story>;
    async fn remove_story(&self, user: &CurrentUser, story_id: &str) -> Result<()>;
    async fn add_favorite(&self, user: &CurrentUser, story_id: &str) -> Result<()>;
    async fn remove_favorite(&self, user: &CurrentUser, story_id: &str) -> Result<()>;
    async fn fetch_user(&self, username: &str, token: &str) -> Result<CurrentUser>;
}

/// `StoryApi` over the Hack or Snooze JSON API.
pub struct HttpApi {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct StoriesEnvelope {
    stories: Vec<Story>,
}

#[derive(Deserialize)]
struct StoryEnvelope {
    story: Story,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    username: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    favorites: Vec<Story>,
    #[serde(default)]
    stories: Vec<Story>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    status: Option<u16>,
    title: Option<String>,
    #[serde(default)]
    message: Value,
}

impl UserPayload {
    fn into_user(self, token: &str) -> CurrentUser {
        CurrentUser {
            username: self.username,
            name: self.name,
            token: token.to_string(),
            favorites: self.favorites,
            own_stories: self.stories,
        }
    }
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid api base url: {}", base_url))?;
        if base.cannot_be_a_base() {
            bail!("api base url cannot hold paths: {}", base_url);
        }
        let client = Client::builder()
            .user_agent(concat!("snooze-news/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl StoryApi for HttpApi {
    async fn fetch_stories(&self) -> Result<Vec<Story>> {
        let url = self.endpoint(&["stories"]);
        debug!(%url, "fetching stories");
        let resp = self.client.get(url).send().await?;
        let body: StoriesEnvelope = read_json(resp).await?;
        Ok(body.stories)
    }

    async fn add_story(&self, user: &CurrentUser, story: &NewStory) -> Result<Story> {
        let url = self.endpoint(&["stories"]);
        debug!(username = %story.username, title = %story.title, "submitting story");
        let resp = self
            .client
            .post(url)
            .json(&json!({ "token": user.token, "story": story }))
            .send()
            .await?;
        let body: StoryEnvelope = read_json(resp).await?;
        Ok(body.story)
    }

    async fn remove_story(&self, user: &CurrentUser, story_id: &str) -> Result<()> {
        let url = self.endpoint(&["stories", story_id]);
        let resp = self
            .client
            .delete(url)
            .json(&json!({ "token": user.token }))
            .send()
            .await?;
        read_json::<Value>(resp).await?;
        Ok(())
    }

    async fn add_favorite(&self, user: &CurrentUser, story_id: &str) -> Result<()> {
        let url = self.endpoint(&["users", &user.username, "favorites", story_id]);
        let resp = self
            .client
            .post(url)
            .json(&json!({ "token": user.token }))
            .send()
            .await?;
        read_json::<Value>(resp).await?;
        Ok(())
    }

    async fn remove_favorite(&self, user: &CurrentUser, story_id: &str) -> Result<()> {
        let url = self.endpoint(&["users", &user.username, "favorites", story_id]);
        let resp = self
            .client
            .delete(url)
            .json(&json!({ "token": user.token }))
            .send()
            .await?;
        read_json::<Value>(resp).await?;
        Ok(())
    }

    async fn fetch_user(&self, username: &str, token: &str) -> Result<CurrentUser> {
        let mut url = self.endpoint(&["users", username]);
        url.query_pairs_mut().append_pair("token", token);
        let resp = self.client.get(url).send().await?;
        let body: UserEnvelope = read_json(resp).await?;
        Ok(body.user.into_user(token))
    }
}

/// Streams the body with a size cap, then decodes it. Non-2xx answers
/// become errors carrying the server's message.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let mut stream = resp.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    let max = max_body_bytes();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("failed to read response body")?;
        if buf.len() + chunk.len() > max {
            bail!("response too large (>{} bytes)", max);
        }
        buf.extend_from_slice(&chunk);
    }

    if !status.is_success() {
        return Err(match serde_json::from_slice::<ErrorEnvelope>(&buf) {
            Ok(env) => anyhow!(describe_error(&env.error, status.as_u16())),
            Err(_) => anyhow!("request failed with status {}", status),
        });
    }
    serde_json::from_slice(&buf).context("unexpected response shape")
}

fn describe_error(err: &ApiError, fallback_status: u16) -> String {
    let status = err.status.unwrap_or(fallback_status);
    let message = match &err.message {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    match (&err.title, message.is_empty()) {
        (Some(title), true) => format!("{} ({})", title, status),
        (Some(title), false) => format!("{} ({}): {}", title, status, message),
        (None, true) => format!("request failed with status {}", status),
        (None, false) => format!("{} ({})", message, status),
    }
}

fn max_body_bytes() -> usize {
    // 5 MB cap
    5 * 1024 * 1024
}
