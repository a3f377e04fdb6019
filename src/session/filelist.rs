use std::path::{Path, PathBuf};

use crate::foundation::error::{EnvmapError, EnvmapResult};

/// Parse the text of a `--flist` file: the first token on each line names a source.
///
/// Lines starting with `#` are comments. Options and wildcards are rejected.
pub fn parse_file_list(text: &str) -> EnvmapResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for token in text.lines().filter_map(|l| l.split_whitespace().next()) {
        if token.starts_with('#') {
            continue;
        }
        if token.starts_with('-') {
            return Err(EnvmapError::input(
                "command-line arguments not supported in --flist file",
            ));
        }
        if token.contains(['?', '*']) {
            return Err(EnvmapError::input("wildcards not supported in --flist file"));
        }
        out.push(PathBuf::from(token));
    }
    Ok(out)
}

pub fn read_file_list(path: &Path) -> EnvmapResult<Vec<PathBuf>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        EnvmapError::input(format!("error opening --flist file '{}': {e}", path.display()))
    })?;
    parse_file_list(&text)
}

#[cfg(test)]
#[path = "../../tests/unit/session/filelist.rs"]
mod tests;
