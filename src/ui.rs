use anyhow::{Result, anyhow};
use console::{Key, Term, style};
use dialoguer::{Input, MultiSelect};

#[derive(Debug, PartialEq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
}

/// Title, author and link typed into the submission form.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryForm {
    pub title: String,
    pub author: String,
    pub url: String,
}

pub fn prompt_menu(
    prompt: &str,
    items: &[String],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    print_menu(&term, prompt, items, header);
    println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.");

    // First key decides input mode: arrow-navigation vs text input
    match term.read_key()? {
        Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End => {
            arrow_select(&term, prompt, items, default, header)
        }
        Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
        Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
        Key::Enter => default
            .map(MenuChoice::Index)
            .ok_or_else(|| anyhow!("no selection")),
        Key::Char(c) if !c.is_control() => {
            let input: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .with_initial_text(c.to_string())
                .interact_text()?;
            parse_selection(&input, items.len(), default)
        }
        _ => {
            let input: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .interact_text()?;
            parse_selection(&input, items.len(), default)
        }
    }
}

/// Lets the user tick any number of stories; returns their indices.
pub fn pick_stories(prompt: &str, labels: &[String]) -> Result<Vec<usize>> {
    if labels.is_empty() {
        println!("{}", style("Nothing to choose from.").yellow());
        return Ok(Vec::new());
    }
    let picked = MultiSelect::new()
        .with_prompt(format!("{} (space = toggle, enter = confirm)", prompt))
        .items(labels)
        .interact()?;
    Ok(picked)
}

/// Reads the submission form. Fields are passed on as typed; the server
/// decides what it accepts. Returns `None` only when every field is blank.
pub fn read_story_form() -> Result<Option<StoryForm>> {
    let title = ask("Title")?;
    let author = ask("Author")?;
    let url = ask("URL")?;
    Ok(story_form(&title, &author, &url))
}

fn ask(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

fn story_form(title: &str, author: &str, url: &str) -> Option<StoryForm> {
    let (title, author, url) = (title.trim(), author.trim(), url.trim());
    if title.is_empty() && author.is_empty() && url.is_empty() {
        return None;
    }
    Some(StoryForm {
        title: title.to_string(),
        author: author.to_string(),
        url: url.to_string(),
    })
}

pub fn report_error(msg: &str) {
    eprintln!("{} {}", style("error:").red().bold(), msg);
}

pub fn pause() -> Result<()> {
    println!("Press any key to continue.");
    Term::stdout().read_key()?;
    Ok(())
}

fn print_menu(term: &Term, prompt: &str, items: &[String], header: Option<&str>) {
    let _ = term.clear_screen();
    if let Some(h) = header {
        println!("{}", h);
    }
    println!("{}", prompt);
    for (i, it) in items.iter().enumerate() {
        println!("{}: {}", i + 1, it);
    }
}

fn parse_selection(input: &str, len: usize, default: Option<usize>) -> Result<MenuChoice> {
    let s = input.trim();
    if s.is_empty() {
        return default
            .map(MenuChoice::Index)
            .ok_or_else(|| anyhow!("no selection"));
    }
    if s.eq_ignore_ascii_case("q") {
        return Ok(MenuChoice::Quit);
    }
    if s.eq_ignore_ascii_case("b") {
        return Ok(MenuChoice::Back);
    }
    let idx: usize = s.parse().map_err(|_| anyhow!("invalid selection"))?;
    if idx == 0 || idx > len {
        return Err(anyhow!("out of range"));
    }
    Ok(MenuChoice::Index(idx - 1))
}

fn arrow_select(
    term: &Term,
    prompt: &str,
    items: &[String],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let last = items.len().saturating_sub(1);
    let mut sel = default.unwrap_or(0).min(last);
    loop {
        term.clear_screen()?;
        if let Some(h) = header {
            println!("{}", h);
        }
        println!("{}", prompt);
        for (i, it) in items.iter().enumerate() {
            let marker = if i == sel { ">" } else { " " };
            println!("{} {}: {}", marker, i + 1, it);
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => sel = (sel + 1).min(last),
            Key::Home => sel = 0,
            Key::End => sel = last,
            Key::Enter if !items.is_empty() => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}
