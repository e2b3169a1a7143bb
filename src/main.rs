//! Gameplay entrypoint: load a level document, run the game loop, write
//! progress back to the same file.
//!
//! The render task owns the terminal; any error surfaces on stderr only
//! after raw mode is torn down.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use tui_dash::core::document::LevelDocument;
use tui_dash::core::ObjectCatalog;
use tui_dash::engine::{GameLoop, NoopSound, ProgressSink, Session};

/// Writes best-completion percentages back into the level document.
struct FileProgress {
    path: PathBuf,
    document: LevelDocument,
}

impl ProgressSink for FileProgress {
    fn persist(&mut self, normal_percent: f64, practice_percent: f64) -> Result<()> {
        self.document.metadata.normal_percent = normal_percent;
        self.document.metadata.practice_percent = practice_percent;
        let json = self.document.to_json()?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing progress to {}", self.path.display()))
    }
}

fn main() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: tui-dash <level.json>"))?;

    let json = fs::read_to_string(&path)
        .with_context(|| format!("reading level file {}", path.display()))?;
    let document = LevelDocument::from_json(&json)?;

    let catalog = ObjectCatalog::new();
    let (level, spawn) = document.build(&catalog)?;
    let session = Session::new(
        level,
        spawn,
        document.metadata.name.clone(),
        document.metadata.normal_percent,
        document.metadata.practice_percent,
    );

    let progress = FileProgress { path, document };
    let game = GameLoop::new(session);
    game.run(Box::new(NoopSound), Box::new(progress))
}
