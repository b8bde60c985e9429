mod api;
#[cfg(test)]
pub mod fake;
mod list;
mod model;

pub use api::{HttpApi, StoryApi};
pub use list::{CurrentUser, StoryList};
pub use model::{NewStory, Story};
