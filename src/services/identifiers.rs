//! CVU and alias generation.
//!
//! Both identifiers are drawn at random and re-drawn while the value is already
//! taken in `users`. The number of draws is bounded so a saturated space fails
//! loudly instead of looping.

use std::{fs, sync::Arc};

use anyhow::{Context, anyhow};
use rand::Rng;

use crate::{db::DbPool, error::AppError};

/// Number of decimal digits in a CVU.
pub const CVU_LENGTH: usize = 22;

/// Words per generated alias.
pub const ALIAS_WORDS: usize = 3;

const MAX_ATTEMPTS: usize = 32;

const BUILTIN_WORDS: &str = include_str!("../../assets/alias_words.txt");

/// Draw a 22-digit CVU.
pub fn random_cvu<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CVU_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Alias dictionary shared by all requests.
#[derive(Debug, Clone)]
pub struct AliasGenerator {
    words: Arc<[String]>,
}

impl AliasGenerator {
    /// Build a generator from a newline-separated word list.
    ///
    /// Words are trimmed and lowercased; blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the list holds no words.
    pub fn from_words(text: &str) -> anyhow::Result<Self> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();

        if words.is_empty() {
            return Err(anyhow!("alias dictionary is empty"));
        }

        Ok(Self {
            words: words.into(),
        })
    }

    /// The dictionary at `path`, or the built-in one when no path is given.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading alias dictionary {path}"))?;
                Self::from_words(&text).with_context(|| format!("alias dictionary {path}"))
            }
            None => Self::from_words(BUILTIN_WORDS),
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Three dictionary words joined with `.`.
    pub fn random_alias<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..ALIAS_WORDS)
            .map(|_| self.words[rng.random_range(0..self.words.len())].as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// A CVU not yet assigned to any user.
///
/// # Errors
///
/// - `Internal`: every draw collided
/// - `Database`: Database error occurred
pub async fn generate_unique_cvu(pool: &DbPool) -> Result<String, AppError> {
    draw_unique(pool, "SELECT EXISTS(SELECT 1 FROM users WHERE cvu = $1)", || {
        random_cvu(&mut rand::rng())
    })
    .await
}

/// An alias not yet assigned to any user.
pub async fn generate_unique_alias(
    pool: &DbPool,
    aliases: &AliasGenerator,
) -> Result<String, AppError> {
    draw_unique(pool, "SELECT EXISTS(SELECT 1 FROM users WHERE alias = $1)", || {
        aliases.random_alias(&mut rand::rng())
    })
    .await
}

async fn draw_unique<F>(
    pool: &DbPool,
    exists_sql: &'static str,
    mut draw: F,
) -> Result<String, AppError>
where
    F: FnMut() -> String,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = draw();
        let taken: bool = sqlx::query_scalar(exists_sql)
            .bind(&candidate)
            .fetch_one(pool)
            .await?;

        if !taken {
            return Ok(candidate);
        }
        tracing::debug!(candidate = %candidate, "identifier collision, drawing again");
    }

    Err(AppError::Internal(anyhow!(
        "no free identifier after {MAX_ATTEMPTS} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn cvu_has_22_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let cvu = random_cvu(&mut rng);
            assert_eq!(cvu.len(), CVU_LENGTH);
            assert!(cvu.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn alias_is_three_dictionary_words() {
        let generator = AliasGenerator::from_words("Sol\nluna\n\n  mar  \n").unwrap();
        assert_eq!(generator.word_count(), 3);

        let mut rng = StdRng::seed_from_u64(42);
        let alias = generator.random_alias(&mut rng);
        let parts: Vec<&str> = alias.split('.').collect();
        assert_eq!(parts.len(), ALIAS_WORDS);
        assert!(parts.iter().all(|p| ["sol", "luna", "mar"].contains(p)));
    }

    #[test]
    fn empty_dictionary_is_rejected() {
        assert!(AliasGenerator::from_words(" \n\n").is_err());
    }

    #[test]
    fn builtin_dictionary_loads() {
        let generator = AliasGenerator::load(None).unwrap();
        assert!(generator.word_count() > 50);
    }

    #[test]
    fn missing_dictionary_file_is_an_error() {
        assert!(AliasGenerator::load(Some("/nonexistent/alias_words.txt")).is_err());
    }
}
