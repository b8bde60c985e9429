use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A submitted link as the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Fields read from the submission form, stamped with the submitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStory {
    pub title: String,
    pub author: String,
    pub url: String,
    #[serde(skip)]
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_story_with_timestamp() {
        let json = r#"{
            "storyId": "0a1b",
            "title": "Rust 2024",
            "author": "Ferris",
            "url": "https://blog.rust-lang.org/",
            "username": "ferris",
            "createdAt": "2024-02-20T18:03:10.493Z",
            "updatedAt": "2024-02-20T18:03:10.493Z"
        }"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.story_id, "0a1b");
        assert_eq!(story.username, "ferris");
        assert_eq!(story.created_at.map(|t| t.year()), Some(2024));
    }

    #[test]
    fn created_at_is_optional() {
        let json = r#"{"storyId":"1","title":"A","author":"X","url":"http://a.com","username":"bob"}"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert!(story.created_at.is_none());
    }

    #[test]
    fn new_story_serializes_without_username() {
        let info = NewStory {
            title: "B".into(),
            author: "Y".into(),
            url: "http://b.com".into(),
            username: "alice".into(),
        };
        let v = serde_json::to_value(&info).unwrap();
        assert_eq!(v, serde_json::json!({"title": "B", "author": "Y", "url": "http://b.com"}));
    }
}
