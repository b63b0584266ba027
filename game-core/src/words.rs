use anyhow::{Result, anyhow};
use game_types::Difficulty;
use rand::Rng;

const BUILTIN_EASY: &str = "cat\ndog\nsun\nstar\ntree\nfish\nhouse\nball\ncake\nbird\nshoe\nclock\napple\nchair\ncloud\nsnake\npizza\nboat\nmoon\nbook";
const BUILTIN_MEDIUM: &str = "guitar\nrocket\ncastle\ndragon\nisland\ncamera\nbridge\ngarden\npenguin\nvolcano\nice cream\nrainbow\ntractor\nwindmill\nanchor\ncompass\nlantern\ncactus";
const BUILTIN_HARD: &str = "lighthouse\nsubmarine\ntelescope\nwaterfall\nbutterfly\nskyscraper\nlabyrinth\nparachute\nhedgehog\nxylophone\nscarecrow\navalanche\nporcupine\ncathedral";

/// Per-difficulty word pools backing the lobby's difficulty selector.
///
/// Lists are newline-separated; blank lines and `#` comments are skipped,
/// entries are trimmed and lower-cased.
#[derive(Debug, Clone)]
pub struct WordBank {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl WordBank {
    pub fn from_lists(easy: &str, medium: &str, hard: &str) -> Self {
        Self {
            easy: parse_list(easy),
            medium: parse_list(medium),
            hard: parse_list(hard),
        }
    }

    /// The built-in pools used when no word files are configured.
    pub fn builtin() -> Self {
        Self::from_lists(BUILTIN_EASY, BUILTIN_MEDIUM, BUILTIN_HARD)
    }

    /// Pick a word uniformly at random from the difficulty's pool.
    pub fn pick(&self, difficulty: Difficulty) -> Result<String> {
        let pool = self.pool(difficulty);
        if pool.is_empty() {
            return Err(anyhow!("no words available for difficulty {:?}", difficulty));
        }
        let index = rand::rng().random_range(0..pool.len());
        Ok(pool[index].clone())
    }

    pub fn word_count(&self, difficulty: Difficulty) -> usize {
        self.pool(difficulty).len()
    }

    fn pool(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}

fn parse_list(list: &str) -> Vec<String> {
    list.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}
