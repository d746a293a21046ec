//! Sample data for a fresh database.

use tracing::{info, instrument};

use crate::db::{DbError, GameRepository, NewPlayer, Prompt};

/// (username, salt, hashed password) of the bundled sample accounts.
const SAMPLE_PLAYERS: [(&str, &str, &str); 3] = [
    ("sample1", "xrFphrATk/Y=", "CuwAbnd5OdRHyeRtxk1Ooz7sIAsWRJwSi8L3QRFE2rY="),
    ("sample2", "L3v4aiMlfL0=", "rzYK+QIX4dOlzeEeMCdBddmUeHCkZDvX0pGqwW3Vecc="),
    ("sample3", "sfHvpyVmxMM=", "MzDkScnVXE/4XKTbFIjehT8Ibd7WYQsd4GDRbUfGxNI="),
];

const SAMPLE_PROMPTS: [(&str, &str, f64); 3] = [
    ("sample1", "Number of windows in Empire State Building?", 6514.0),
    ("sample2", "Population of USA (2019)?", 328_200_000.0),
    ("sample3", "Number of Stanford undergrads (Fall 2019)?", 6994.0),
];

/// Inserts the sample players and prompts into empty tables.
///
/// Tables that already hold rows are left alone, so this is safe to run on
/// every start.
///
/// # Errors
///
/// Returns [`DbError`] if a database error occurs.
#[instrument(skip(repository))]
pub fn seed_samples(repository: &GameRepository) -> Result<(), DbError> {
    if repository.list_usernames()?.is_empty() {
        for (username, salt, hashed) in SAMPLE_PLAYERS {
            repository.create_player(NewPlayer::new(
                username.to_string(),
                salt.to_string(),
                hashed.to_string(),
            ))?;
        }
        info!(count = SAMPLE_PLAYERS.len(), "Seeded sample players");
    }

    if repository.count_prompts()? == 0 {
        let prompts: Vec<Prompt> = SAMPLE_PROMPTS
            .iter()
            .zip(0i64..)
            .map(|((contributor, question, answer), id)| {
                Prompt::new(id, contributor.to_string(), question.to_string(), *answer)
            })
            .collect();
        repository.insert_prompts(&prompts)?;
        info!(count = prompts.len(), "Seeded sample prompts");
    }

    Ok(())
}
