use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One user gesture, independent of where on the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowAll,
    ShowOwn,
    ShowFavorites,
    SubmitStory { title: String, author: String, url: String },
    ToggleFavorite { story_id: String },
    DeleteStory { story_id: String },
}

/// Drops commands a later command in the same batch makes pointless.
///
/// Per story id: an even number of toggles cancels out, an odd number
/// collapses to the last one, toggles on a story the batch deletes are
/// dropped, and only the first delete survives. Everything else passes
/// through in order.
pub fn coalesce(commands: Vec<Command>) -> Vec<Command> {
    let before = commands.len();
    let mut deleted: HashSet<String> = HashSet::new();
    let mut toggles: HashMap<String, (usize, usize)> = HashMap::new();
    for (i, cmd) in commands.iter().enumerate() {
        match cmd {
            Command::DeleteStory { story_id } => {
                deleted.insert(story_id.clone());
            }
            Command::ToggleFavorite { story_id } => {
                let entry = toggles.entry(story_id.clone()).or_insert((0, i));
                entry.0 += 1;
                entry.1 = i;
            }
            _ => {}
        }
    }

    let mut seen_delete: HashSet<String> = HashSet::new();
    let kept: Vec<Command> = commands
        .into_iter()
        .enumerate()
        .filter(|(i, cmd)| match cmd {
            Command::ToggleFavorite { story_id } => {
                let (count, last) = toggles[story_id];
                !deleted.contains(story_id) && count % 2 == 1 && last == *i
            }
            Command::DeleteStory { story_id } => seen_delete.insert(story_id.clone()),
            _ => true,
        })
        .map(|(_, cmd)| cmd)
        .collect();

    if kept.len() != before {
        debug!(dropped = before - kept.len(), "coalesced superseded commands");
    }
    kept
}
