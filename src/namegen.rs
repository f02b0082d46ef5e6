//! Random branch names for `wtt create` without an argument.

use rand::Rng;
use rand::seq::IndexedRandom;

const ADJECTIVES: &[&str] = &[
    "amber", "azure", "bright", "calm", "clear", "crisp", "dark", "deep", "dense", "eager", "early",
    "fair", "fast", "firm", "fleet", "fond", "free", "fresh", "glad", "gold", "good", "grand",
    "great", "green", "grey", "high", "keen", "kind", "large", "late", "lean", "light", "lofty",
    "long", "loud", "lunar", "mild", "mist", "neat", "noble", "north", "opal", "open", "pale",
    "plain", "prime", "proud", "pure", "quick", "quiet", "rapid", "rich", "rosy", "round", "royal",
    "rust", "sage", "sharp", "sheer", "silk", "slim", "smart", "soft", "solar", "solid", "stark",
    "still", "stone", "storm", "stout", "sure", "swift", "tall", "tame", "teal", "thin", "tidy",
    "true", "vast", "warm", "white", "wide", "wild", "wise", "bold", "brave", "cool",
];

const NOUNS: &[&str] = &[
    "arrow", "atlas", "bay", "beacon", "bear", "bird", "blade", "blaze", "bloom", "brook", "canyon",
    "cedar", "cloud", "coast", "coral", "crane", "creek", "delta", "drift", "dune", "eagle",
    "ember", "falcon", "fern", "field", "fjord", "flame", "flash", "fleet", "forest", "frost",
    "gale", "gate", "glade", "glen", "grove", "gust", "haven", "hawk", "heath", "hill", "hollow",
    "horizon", "island", "jade", "lake", "lark", "leaf", "ledge", "light", "marsh", "meadow",
    "mesa", "mist", "moon", "moss", "mountain", "oak", "ocean", "peak", "pine", "plain", "pond",
    "quartz", "rain", "rapid", "raven", "reef", "ridge", "river", "rock", "sage", "shore", "sierra",
    "sky", "slate", "snow", "sol", "spark", "spring", "star", "stone", "storm", "stream", "summit",
    "surf", "tide", "timber", "trail", "vale", "valley", "wave", "wind", "wolf", "wood",
];

/// `<repo>-<adjective>-<noun>`, e.g. `myrepo-bright-falcon`.
#[must_use]
pub fn generate(repo_name: &str) -> String {
    generate_with(repo_name, &mut rand::rng())
}

#[must_use]
pub fn generate_with<R: Rng + ?Sized>(repo_name: &str, rng: &mut R) -> String {
    let prefix = slug(repo_name);
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("quick");
    let noun = NOUNS.choose(rng).copied().unwrap_or("tree");
    format!("{prefix}-{adjective}-{noun}")
}

/// Reduces a directory name to characters git accepts in a branch name.
fn slug(repo_name: &str) -> String {
    let replaced: String = repo_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "wtt".to_string()
    } else {
        trimmed.replace("..", "-")
    }
}
