use super::Fragment;
use crate::stories::{CurrentUser, Story};
use crate::util::sanitize::escape_html;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Default,
    WithDeleteControl,
}

/// Builds the list item for one story. Pure: placing it on the page is up
/// to the caller.
///
/// The star is only drawn when someone is logged in, filled (`fas`) when the
/// story is among their favorites.
pub fn render_story(story: &Story, mode: RenderMode, user: Option<&CurrentUser>) -> Fragment {
    let delete = match mode {
        RenderMode::WithDeleteControl => delete_button_html(),
        RenderMode::Default => "",
    };
    let star = user.map(|u| favorite_html(u.is_favorite(story))).unwrap_or_default();

    let markup = format!(
        "<li id=\"{id}\">\n  {delete}{star}<a href=\"{url}\" target=\"a_blank\" class=\"story-link\">{title}</a>\n  \
         <small class=\"story-hostname\">({host})</small>\n  \
         <small class=\"story-author\">by {author}</small>\n  \
         <small class=\"story-user\">posted by {username}</small>\n</li>",
        id = escape_html(&story.story_id),
        url = escape_html(&story.url),
        title = escape_html(&story.title),
        host = escape_html(&host_name(&story.url)),
        author = escape_html(&story.author),
        username = escape_html(&story.username),
    );

    Fragment::Item {
        story_id: story.story_id.clone(),
        markup,
    }
}

/// Host (and explicit port) of a story link, or an empty string when the
/// link does not parse or has no host.
pub fn host_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

fn delete_button_html() -> &'static str {
    "<span class=\"trash-can\"><i class=\"fas fa-trash-alt\"></i></span>"
}

fn favorite_html(is_favorite: bool) -> String {
    let star_type = if is_favorite { "fas" } else { "far" };
    format!("<span class=\"star\"><i class=\"{} fa-star\"></i></span>", star_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stories::fake::{FakeApi, story};

    fn markup(f: &Fragment) -> &str {
        match f {
            Fragment::Item { markup, .. } => markup,
            Fragment::Message(_) => panic!("expected an item"),
        }
    }

    #[test]
    fn default_item_carries_every_field() {
        let s = story("1", "A");
        let f = render_story(&s, RenderMode::Default, None);
        let html = markup(&f);

        assert_eq!(f.story_id(), Some("1"));
        assert!(html.starts_with("<li id=\"1\">"));
        assert!(html.contains(">A</a>"));
        assert!(html.contains("href=\"http://a.com\""));
        assert!(html.contains("target=\"a_blank\""));
        assert!(html.contains("(a.com)"));
        assert!(html.contains("by X"));
        assert!(html.contains("posted by bob"));
        assert!(!html.contains("trash-can"));
        assert!(!html.contains("star"));
    }

    #[test]
    fn delete_control_only_in_delete_mode() {
        let s = story("1", "A");
        let with = render_story(&s, RenderMode::WithDeleteControl, None);
        let without = render_story(&s, RenderMode::Default, None);
        assert!(markup(&with).contains("class=\"trash-can\""));
        assert!(!markup(&without).contains("trash-can"));
    }

    #[test]
    fn star_reflects_favorite_status() {
        let s = story("1", "A");
        let mut user = FakeApi::user("alice");
        let plain = render_story(&s, RenderMode::Default, Some(&user));
        assert!(markup(&plain).contains("<i class=\"far fa-star\">"));

        user.favorites.push(s.clone());
        let faved = render_story(&s, RenderMode::Default, Some(&user));
        assert!(markup(&faved).contains("<i class=\"fas fa-star\">"));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mut s = story("1", "A");
        s.title = "<script>alert(1)</script>".into();
        s.url = "http://a.com/?q=\"x\"&y".into();
        let f = render_story(&s, RenderMode::Default, None);
        let html = markup(&f);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"http://a.com/?q=&quot;x&quot;&amp;y\""));
    }

    #[test]
    fn host_name_handles_odd_urls() {
        assert_eq!(host_name("http://a.com"), "a.com");
        assert_eq!(host_name("https://news.example.org/item?id=3"), "news.example.org");
        assert_eq!(host_name("http://localhost:8080/x"), "localhost:8080");
        assert_eq!(host_name("https://a.com:443/"), "a.com");
        assert_eq!(host_name("not a url"), "");
        assert_eq!(host_name(""), "");
        assert_eq!(host_name("mailto:bob@a.com"), "");
    }
}
