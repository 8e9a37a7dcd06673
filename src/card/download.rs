use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;

use crate::compose::compositor::CardResult;
use crate::foundation::error::GreetcardResult;

/// `کارت-تبریک-<board>-<YYYY-MM-DD>.png`; path separators in the board id become `-`.
pub fn download_file_name(board_id: &str, date: NaiveDate) -> String {
    let board = board_id.replace(['/', '\\'], "-");
    format!("کارت-تبریک-{board}-{}.png", date.format("%Y-%m-%d"))
}

/// Write `result` into `dir` under its download name; returns the written path.
///
/// The name carries the date the card was generated, not the date of the download.
pub fn write_card(dir: &Path, result: &CardResult) -> GreetcardResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    let path = dir.join(download_file_name(&result.board_id, result.generated_on));
    std::fs::write(&path, &result.png)
        .with_context(|| format!("write card '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = result.png.len(), "card written");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/card/download.rs"]
mod tests;
