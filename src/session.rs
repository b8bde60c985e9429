use crate::config::RuntimeConfig;
use crate::dispatch::{Command, Dispatcher};
use crate::open_url::open_page;
use crate::page::{ContainerId, host_name};
use crate::stories::{CurrentUser, Story, StoryApi};
use crate::ui::{self, MenuChoice};
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::{Context, Result};
use std::fs;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
enum MenuAction {
    AllStories,
    OwnStories,
    Favorites,
    Submit,
    ToggleFavorites,
    DeleteOwn,
    OpenPage,
    Quit,
}

impl MenuAction {
    // Story picks stay queued so a later pick can cancel or replace them.
    fn defers_batch(self) -> bool {
        matches!(self, MenuAction::ToggleFavorites | MenuAction::DeleteOwn)
    }
}

// (label, action, needs a logged-in user)
const MENU: [(&str, MenuAction, bool); 8] = [
    ("All stories", MenuAction::AllStories, false),
    ("My stories", MenuAction::OwnStories, true),
    ("Favorites", MenuAction::Favorites, true),
    ("Submit a story", MenuAction::Submit, true),
    ("Toggle favorites", MenuAction::ToggleFavorites, true),
    ("Delete my stories", MenuAction::DeleteOwn, true),
    ("Open page in browser", MenuAction::OpenPage, false),
    ("Quit", MenuAction::Quit, false),
];

const LABEL_CHARS: usize = 120;

/// Interactive loop: every menu pick becomes one or more commands. Story
/// picks wait in the queue; any other pick sends the queued batch and
/// rewrites the page on disk.
pub async fn run<A: StoryApi>(
    cfg: &RuntimeConfig,
    dispatcher: &mut Dispatcher<A>,
    auto_open: bool,
) -> Result<()> {
    write_page(cfg, dispatcher)?;
    if auto_open {
        if let Err(e) = open_page(&cfg.page_path, cfg.open_command.as_deref()) {
            warn!(error = %e, "could not open page");
        }
    }

    loop {
        let logged_in = dispatcher.state().user.is_some();
        let actions: Vec<MenuAction> = MENU
            .iter()
            .filter(|(_, _, needs_user)| logged_in || !needs_user)
            .map(|(_, action, _)| *action)
            .collect();
        let labels: Vec<String> = MENU
            .iter()
            .filter(|(_, _, needs_user)| logged_in || !needs_user)
            .map(|(label, _, _)| label.to_string())
            .collect();

        let prompt = view_summary(dispatcher);
        let action = match ui::prompt_menu(&prompt, &labels, Some(0), cfg.header.as_deref()) {
            Ok(MenuChoice::Index(i)) => actions[i],
            Ok(MenuChoice::Back) | Ok(MenuChoice::Quit) => MenuAction::Quit,
            Err(e) => {
                debug!(error = %e, "menu input ignored");
                continue;
            }
        };

        match action {
            MenuAction::AllStories => dispatcher.enqueue(Command::ShowAll),
            MenuAction::OwnStories => dispatcher.enqueue(Command::ShowOwn),
            MenuAction::Favorites => dispatcher.enqueue(Command::ShowFavorites),
            MenuAction::Submit => {
                if let Some(form) = ui::read_story_form()? {
                    dispatcher.enqueue(Command::SubmitStory {
                        title: form.title,
                        author: form.author,
                        url: form.url,
                    });
                }
            }
            MenuAction::ToggleFavorites => {
                let stories = dispatcher.state().stories.stories.clone();
                let user = dispatcher.state().user.as_ref();
                let labels: Vec<String> = stories.iter().map(|s| story_label(s, user)).collect();
                for i in ui::pick_stories("Toggle favorites", &labels)? {
                    dispatcher.enqueue(Command::ToggleFavorite {
                        story_id: stories[i].story_id.clone(),
                    });
                }
            }
            MenuAction::DeleteOwn => {
                let own = dispatcher
                    .state()
                    .user
                    .as_ref()
                    .map(|u| u.own_stories.clone())
                    .unwrap_or_default();
                let labels: Vec<String> = own.iter().map(|s| story_label(s, None)).collect();
                let picked = ui::pick_stories("Delete stories", &labels)?;
                if !picked.is_empty() {
                    dispatcher.enqueue(Command::ShowOwn);
                }
                for i in picked {
                    dispatcher.enqueue(Command::DeleteStory {
                        story_id: own[i].story_id.clone(),
                    });
                }
            }
            MenuAction::OpenPage | MenuAction::Quit => {}
        }

        if action.defers_batch() {
            continue;
        }
        flush(cfg, dispatcher).await?;

        match action {
            MenuAction::OpenPage => {
                if let Err(e) = open_page(&cfg.page_path, cfg.open_command.as_deref()) {
                    ui::report_error(&format!("{:#}", e));
                    ui::pause()?;
                }
            }
            MenuAction::Quit => break,
            _ => {}
        }
    }
    Ok(())
}

async fn flush<A: StoryApi>(cfg: &RuntimeConfig, dispatcher: &mut Dispatcher<A>) -> Result<()> {
    let errors = dispatcher.run_pending().await;
    write_page(cfg, dispatcher)?;
    if !errors.is_empty() {
        for err in &errors {
            ui::report_error(&err.to_string());
        }
        ui::pause()?;
    }
    Ok(())
}

pub fn write_page<A: StoryApi>(cfg: &RuntimeConfig, dispatcher: &Dispatcher<A>) -> Result<()> {
    let html = dispatcher
        .page()
        .to_html(cfg.header.as_deref(), OffsetDateTime::now_utc());
    fs::write(&cfg.page_path, html)
        .with_context(|| format!("failed to write page: {}", cfg.page_path.display()))?;
    debug!(path = %cfg.page_path.display(), "page written");
    Ok(())
}

fn story_label(story: &Story, user: Option<&CurrentUser>) -> String {
    let star = match user {
        Some(u) if u.is_favorite(story) => "★ ",
        Some(_) => "☆ ",
        None => "",
    };
    let host = host_name(&story.url);
    let mut label = format!(
        "{}{} ({}) by {}",
        star,
        sanitize_for_terminal(&story.title, LABEL_CHARS),
        sanitize_for_terminal(&host, LABEL_CHARS),
        sanitize_for_terminal(&story.author, LABEL_CHARS)
    );
    if let Some(date) = story
        .created_at
        .and_then(|t| t.format(format_description!("[year]-[month]-[day]")).ok())
    {
        label.push_str(" · ");
        label.push_str(&date);
    }
    label
}

/// Terminal rendition of whichever list the page currently shows.
fn view_summary<A: StoryApi>(dispatcher: &Dispatcher<A>) -> String {
    let state = dispatcher.state();
    let user = state.user.as_ref();
    let page = dispatcher.page();
    let own_visible = page.container(ContainerId::OwnStories).is_visible();
    let (title, stories): (&str, &[Story]) = if own_visible {
        ("My stories", user.map(|u| u.own_stories.as_slice()).unwrap_or_default())
    } else if page.container(ContainerId::Favorites).is_visible() {
        ("Favorites", user.map(|u| u.favorites.as_slice()).unwrap_or_default())
    } else {
        ("All stories", state.stories.stories.as_slice())
    };

    let mut out = match user {
        Some(u) => {
            let who = if u.name.trim().is_empty() { &u.username } else { &u.name };
            format!("== {} == (logged in as {})\n", title, sanitize_for_terminal(who, 40))
        }
        None => format!("== {} ==\n", title),
    };
    if stories.is_empty() {
        out.push_str("  (nothing here yet)\n");
    }
    for s in stories.iter().take(15) {
        out.push_str("  - ");
        out.push_str(&story_label(s, user));
        out.push('\n');
    }
    if stories.len() > 15 {
        out.push_str(&format!("  ... and {} more in the page\n", stories.len() - 15));
    }
    match dispatcher.pending() {
        0 => {}
        n => out.push_str(&format!(
            "  {} change(s) queued; pick a view or open the page to send them\n",
            n
        )),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stories::fake::{FakeApi, story};

    #[test]
    fn labels_mark_favorites() {
        let s = story("1", "A");
        let mut user = FakeApi::user("alice");
        assert_eq!(story_label(&s, Some(&user)), "☆ A (a.com) by X");
        user.favorites.push(s.clone());
        assert_eq!(story_label(&s, Some(&user)), "★ A (a.com) by X");
        assert_eq!(story_label(&s, None), "A (a.com) by X");

        let mut dated = story("2", "B");
        dated.created_at = Some(time::macros::datetime!(2024-02-20 18:03 UTC));
        assert_eq!(story_label(&dated, None), "B (b.com) by X · 2024-02-20");
    }

    #[tokio::test]
    async fn summary_follows_visible_view() {
        let mut d = Dispatcher::new(
            FakeApi::with_stories(vec![story("1", "A")]),
            Some(FakeApi::user("alice")),
        );
        d.get_and_show_stories_on_start().await.unwrap();
        assert!(view_summary(&d).starts_with("== All stories == (logged in as alice)\n  - ☆ A"));

        d.dispatch(Command::ShowOwn).await.unwrap();
        assert!(view_summary(&d).contains("(nothing here yet)"));
    }

    #[test]
    fn only_story_picks_wait_in_the_queue() {
        let deferred: Vec<_> = MENU
            .iter()
            .map(|(_, action, _)| *action)
            .filter(|a| a.defers_batch())
            .collect();
        assert_eq!(deferred, vec![MenuAction::ToggleFavorites, MenuAction::DeleteOwn]);
    }

    #[tokio::test]
    async fn toggles_from_separate_picks_cancel_out() {
        let mut d = Dispatcher::new(
            FakeApi::with_stories(vec![story("1", "A"), story("2", "B")]),
            Some(FakeApi::user("alice")),
        );
        d.get_and_show_stories_on_start().await.unwrap();

        // first pick: stories 1 and 2; second pick: story 1 again
        d.enqueue(Command::ToggleFavorite { story_id: "1".into() });
        d.enqueue(Command::ToggleFavorite { story_id: "2".into() });
        d.enqueue(Command::ToggleFavorite { story_id: "1".into() });
        assert!(view_summary(&d).contains("3 change(s) queued"));

        assert!(d.run_pending().await.is_empty());
        assert_eq!(d.pending(), 0);
        let user = d.state().user.as_ref().unwrap();
        assert!(!user.is_favorite(&story("1", "A")));
        assert!(user.is_favorite(&story("2", "B")));
        assert!(!view_summary(&d).contains("queued"));
    }
}
