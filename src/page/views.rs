use super::{ContainerId, Fragment, Page, RenderMode, render_story};
use crate::stories::{CurrentUser, Story, StoryList};
use tracing::debug;

pub const NO_OWN_STORIES: &str = "No user stories submitted";
pub const NO_FAVORITES: &str = "No stories have been favorited";

/// Re-renders every known story into the all-stories list and shows it.
pub fn show_all_stories(page: &mut Page, list: &StoryList, user: Option<&CurrentUser>) {
    debug!(count = list.stories.len(), "show_all_stories");
    fill(page, ContainerId::AllStories, &list.stories, RenderMode::Default, user, None);
}

/// The user's submissions, each with a delete control.
pub fn show_own_stories(page: &mut Page, user: Option<&CurrentUser>) {
    let stories = user.map(|u| u.own_stories.as_slice()).unwrap_or_default();
    debug!(count = stories.len(), "show_own_stories");
    fill(
        page,
        ContainerId::OwnStories,
        stories,
        RenderMode::WithDeleteControl,
        user,
        Some(NO_OWN_STORIES),
    );
}

pub fn show_favorited_stories(page: &mut Page, user: Option<&CurrentUser>) {
    let stories = user.map(|u| u.favorites.as_slice()).unwrap_or_default();
    debug!(count = stories.len(), "show_favorited_stories");
    fill(
        page,
        ContainerId::Favorites,
        stories,
        RenderMode::Default,
        user,
        Some(NO_FAVORITES),
    );
}

fn fill(
    page: &mut Page,
    id: ContainerId,
    stories: &[Story],
    mode: RenderMode,
    user: Option<&CurrentUser>,
    placeholder: Option<&str>,
) {
    let container = page.container_mut(id);
    container.empty();
    match placeholder {
        Some(text) if stories.is_empty() => container.append(Fragment::Message(text.to_string())),
        _ => {
            for story in stories {
                container.append(render_story(story, mode, user));
            }
        }
    }
    container.show();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stories::fake::{FakeApi, story};

    #[test]
    fn all_stories_scenario() {
        let mut page = Page::new();
        let list = StoryList {
            stories: vec![story("1", "A")],
        };
        show_all_stories(&mut page, &list, None);

        let c = page.container(ContainerId::AllStories);
        assert!(c.is_visible());
        assert_eq!(c.item_ids(), ["1"]);
        let html = c.fragments()[0].to_html();
        assert!(html.contains(">A</a>"));
        assert!(html.contains("(a.com)"));
    }

    #[test]
    fn show_all_is_idempotent() {
        let mut page = Page::new();
        let list = StoryList {
            stories: vec![story("1", "A"), story("2", "B")],
        };
        let user = FakeApi::user("alice");
        show_all_stories(&mut page, &list, Some(&user));
        let first = page.clone();
        show_all_stories(&mut page, &list, Some(&user));
        assert_eq!(page, first);
    }

    #[test]
    fn own_stories_placeholder_when_empty() {
        let mut page = Page::new();
        let user = FakeApi::user("alice");
        show_own_stories(&mut page, Some(&user));

        let c = page.container(ContainerId::OwnStories);
        assert_eq!(c.fragments(), [Fragment::Message(NO_OWN_STORIES.to_string())]);
        assert!(c.item_ids().is_empty());
        assert!(c.is_visible());
    }

    #[test]
    fn own_stories_get_delete_controls() {
        let mut page = Page::new();
        let mut user = FakeApi::user("alice");
        user.own_stories.push(story("3", "C"));
        show_own_stories(&mut page, Some(&user));

        let c = page.container(ContainerId::OwnStories);
        assert_eq!(c.item_ids(), ["3"]);
        assert!(c.fragments()[0].to_html().contains("trash-can"));
    }

    #[test]
    fn favorites_placeholder_without_user() {
        let mut page = Page::new();
        show_favorited_stories(&mut page, None);
        let c = page.container(ContainerId::Favorites);
        assert_eq!(c.fragments(), [Fragment::Message(NO_FAVORITES.to_string())]);
    }

    #[test]
    fn favorites_placeholder_for_user_without_favorites() {
        let mut page = Page::new();
        let user = FakeApi::user("alice");
        show_favorited_stories(&mut page, Some(&user));

        let c = page.container(ContainerId::Favorites);
        assert_eq!(c.fragments(), [Fragment::Message(NO_FAVORITES.to_string())]);
        assert!(c.item_ids().is_empty());
        assert!(c.is_visible());
    }

    #[test]
    fn favorites_render_filled_stars_without_delete() {
        let mut page = Page::new();
        let mut user = FakeApi::user("alice");
        user.favorites.push(story("4", "D"));
        show_favorited_stories(&mut page, Some(&user));

        let html = page.container(ContainerId::Favorites).fragments()[0].to_html();
        assert!(html.contains("fas fa-star"));
        assert!(!html.contains("trash-can"));
    }
}
