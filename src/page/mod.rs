//! In-memory model of the story page: three list containers and a loading
//! message, serialized to a standalone HTML document on demand.

mod render;
mod views;

pub use render::{RenderMode, host_name, render_story};
pub use views::{show_all_stories, show_favorited_stories, show_own_stories};

use crate::util::sanitize::escape_html;
use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    AllStories,
    OwnStories,
    Favorites,
}

impl ContainerId {
    pub const ALL: [ContainerId; 3] = [
        ContainerId::AllStories,
        ContainerId::OwnStories,
        ContainerId::Favorites,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            ContainerId::AllStories => "all-stories-list",
            ContainerId::OwnStories => "my-stories",
            ContainerId::Favorites => "favorited-stories",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A rendered `<li>` keyed by its story.
    Item { story_id: String, markup: String },
    /// Placeholder text shown instead of an empty list.
    Message(String),
}

impl Fragment {
    pub fn story_id(&self) -> Option<&str> {
        match self {
            Fragment::Item { story_id, .. } => Some(story_id),
            Fragment::Message(_) => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Fragment::Item { markup, .. } => markup.clone(),
            Fragment::Message(text) => format!("<p>{}</p>", escape_html(text)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    fragments: Vec<Fragment>,
    visible: bool,
}

impl Container {
    pub fn empty(&mut self) {
        self.fragments.clear();
    }

    pub fn append(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn prepend(&mut self, fragment: Fragment) {
        self.fragments.insert(0, fragment);
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Story ids of the rendered items, in page order.
    #[cfg(test)]
    pub fn item_ids(&self) -> Vec<&str> {
        self.fragments.iter().filter_map(Fragment::story_id).collect()
    }

    #[cfg(test)]
    pub fn find_item(&self, story_id: &str) -> Option<&Fragment> {
        self.fragments
            .iter()
            .find(|f| f.story_id() == Some(story_id))
    }

    /// Swaps the item for `story_id` in place. Returns false when no such
    /// item is on the page.
    pub fn replace_item(&mut self, story_id: &str, fragment: Fragment) -> bool {
        match self
            .fragments
            .iter_mut()
            .find(|f| f.story_id() == Some(story_id))
        {
            Some(slot) => {
                *slot = fragment;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    all_stories: Container,
    own_stories: Container,
    favorites: Container,
    loading_msg: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// A freshly loaded page: loading message up, every list hidden.
    pub fn new() -> Self {
        Self {
            all_stories: Container::default(),
            own_stories: Container::default(),
            favorites: Container::default(),
            loading_msg: true,
        }
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        match id {
            ContainerId::AllStories => &self.all_stories,
            ContainerId::OwnStories => &self.own_stories,
            ContainerId::Favorites => &self.favorites,
        }
    }

    pub fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        match id {
            ContainerId::AllStories => &mut self.all_stories,
            ContainerId::OwnStories => &mut self.own_stories,
            ContainerId::Favorites => &mut self.favorites,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading_msg
    }

    pub fn remove_loading_msg(&mut self) {
        self.loading_msg = false;
    }

    pub fn hide_page_components(&mut self) {
        for id in ContainerId::ALL {
            self.container_mut(id).hide();
        }
    }

    pub fn to_html(&self, header: Option<&str>, generated_at: OffsetDateTime) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Hack or Snooze</title>\n\
             <link rel=\"stylesheet\" href=\"https://use.fontawesome.com/releases/v5.15.4/css/all.css\">\n\
             </head>\n<body>\n",
        );
        if let Some(h) = header {
            html.push_str(&format!("<header><h1>{}</h1></header>\n", escape_html(h)));
        }
        html.push_str("<section class=\"stories-container container\">\n");
        if self.loading_msg {
            html.push_str("<div id=\"stories-loading-msg\">Loading&hellip;</div>\n");
        }
        for id in ContainerId::ALL {
            let container = self.container(id);
            let hidden = if container.is_visible() { "" } else { " hidden" };
            html.push_str(&format!(
                "<ol id=\"{}\" class=\"stories-list\"{}>\n",
                id.dom_id(),
                hidden
            ));
            for fragment in container.fragments() {
                html.push_str(&fragment.to_html());
                html.push('\n');
            }
            html.push_str("</ol>\n");
        }
        let stamp = generated_at
            .format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
            .unwrap_or_default();
        html.push_str(&format!(
            "</section>\n<footer><small>generated {}</small></footer>\n</body>\n</html>\n",
            stamp
        ));
        html
    }
}
