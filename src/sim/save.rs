/// Save and load game progress.
///
/// ## File format:
///   A flat list of whitespace-separated integers:
///
///     health strawberries current_level level_count
///     { finished collected_count index... } × level_count
///
///   `finished` is 0 or 1; the indices are the strawberry tiles already
///   banked in that level (row-major over the widest row).
///
/// Written when a level is completed and when leaving a level with Esc.
/// Deleted at game over.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::SaveError;

// ══════════════════════════════════════════════════════════════
// Public types
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveData {
    pub health: u32,
    pub strawberries: u32,
    pub current_level: usize,
    pub levels: Vec<LevelProgress>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub finished: bool,
    pub collected: BTreeSet<usize>,
}

// ══════════════════════════════════════════════════════════════
// File operations
// ══════════════════════════════════════════════════════════════

pub fn save_game(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    std::fs::write(path, serialize(data))?;
    info!(path = %path.display(), level = data.current_level, "game saved");
    Ok(())
}

/// `Ok(None)` when there is no save file yet.
pub fn load_save(path: &Path) -> Result<Option<SaveData>, SaveError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let data = parse_save(&content)?;
    debug!(path = %path.display(), levels = data.levels.len(), "save loaded");
    Ok(Some(data))
}

pub fn has_save(path: &Path) -> bool {
    path.is_file()
}

pub fn delete_save(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "could not delete save file");
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

fn serialize(data: &SaveData) -> String {
    let mut out = String::with_capacity(64);
    out.push_str(&format!("{} {} {} {}\n",
        data.health, data.strawberries, data.current_level, data.levels.len()));

    for level in &data.levels {
        let mut fields = vec![
            if level.finished { "1".to_string() } else { "0".to_string() },
            level.collected.len().to_string(),
        ];
        fields.extend(level.collected.iter().map(|i| i.to_string()));
        out.push_str(&fields.join(" "));
        out.push('\n');
    }

    out
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, SaveError> {
        let tok = self.iter.next()
            .ok_or_else(|| SaveError::Parse(format!("missing {}", what)))?;
        tok.parse()
            .map_err(|_| SaveError::Parse(format!("bad {}: {:?}", what, tok)))
    }
}

fn parse_save(content: &str) -> Result<SaveData, SaveError> {
    let mut t = Tokens { iter: content.split_whitespace() };

    let health = t.next("health")?;
    let strawberries = t.next("strawberries")?;
    let current_level = t.next("current level")?;
    let count: usize = t.next("level count")?;

    let mut levels = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        let finished = match t.next::<u8>("finished flag")? {
            0 => false,
            1 => true,
            other => return Err(SaveError::Parse(format!("bad finished flag: {}", other))),
        };
        let n: usize = t.next("collected count")?;
        let mut collected = BTreeSet::new();
        for _ in 0..n {
            collected.insert(t.next("strawberry index")?);
        }
        levels.push(LevelProgress { finished, collected });
    }

    Ok(SaveData { health, strawberries, current_level, levels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SaveData {
        SaveData {
            health: 4,
            strawberries: 12,
            current_level: 1,
            levels: vec![
                LevelProgress { finished: true, collected: BTreeSet::from([3, 17, 40]) },
                LevelProgress::default(),
            ],
        }
    }

    #[test]
    fn layout_is_flat_integers() {
        assert_eq!(serialize(&sample()), "4 12 1 2\n1 3 3 17 40\n0 0\n");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.dat");
        assert!(!has_save(&path));
        assert_eq!(load_save(&path).unwrap(), None);

        save_game(&path, &sample()).unwrap();
        assert!(has_save(&path));
        assert_eq!(load_save(&path).unwrap(), Some(sample()));

        delete_save(&path);
        assert!(!has_save(&path));
        // Deleting twice is harmless.
        delete_save(&path);
    }

    #[test]
    fn newlines_are_not_significant() {
        let data = parse_save("3 0 0 1 0 2 5 6").unwrap();
        assert_eq!(data.levels[0].collected, BTreeSet::from([5, 6]));
    }

    #[test]
    fn truncated_save_is_rejected() {
        assert!(matches!(parse_save("3 0 0 2\n1 0\n"), Err(SaveError::Parse(_))));
        assert!(matches!(parse_save("3 0 0 1\n1 2 5\n"), Err(SaveError::Parse(_))));
        assert!(matches!(parse_save(""), Err(SaveError::Parse(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_save("three 0 0 0"), Err(SaveError::Parse(_))));
        assert!(matches!(parse_save("3 0 0 1\n2 0\n"), Err(SaveError::Parse(_))));
        assert!(matches!(parse_save("-1 0 0 0"), Err(SaveError::Parse(_))));
    }
}
