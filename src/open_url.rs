use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Hands the rendered page to a browser. A configured command takes the
/// path as its last argument; otherwise the system default opener is used.
pub fn open_page(path: &Path, open_command: Option<&str>) -> Result<()> {
    match open_command.map(str::trim).filter(|c| !c.is_empty()) {
        Some(cmd) => {
            let mut parts = cmd.split_whitespace();
            let Some(program) = parts.next() else {
                bail!("empty open_command");
            };
            debug!(program, path = %path.display(), "opening page with configured command");
            Command::new(program)
                .args(parts)
                .arg(path)
                .spawn()
                .with_context(|| format!("failed to run open_command `{}`", cmd))?;
            Ok(())
        }
        None => open::that(path).with_context(|| format!("failed to open {}", path.display())),
    }
}
