//! Database repository for players and prompts.

use compute_market::PlayerStats;
use diesel::connection::SimpleConnection;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, DbErrorKind, NewPlayer, Player, Prompt, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for a competing writer, in milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Database repository for player and prompt operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Every operation opens its own connection, so `":memory:"` does not
    /// persist between calls; tests use a temporary file instead.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path must not be empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    ///
    /// Writers from concurrent requests wait up to [`BUSY_TIMEOUT_MS`] for
    /// the write lock instead of failing with `database is locked`.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        // WAL is persistent in the file, so setting it once lets readers
        // run alongside the single writer.
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a new player account.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] with [`DbErrorKind::UniqueViolation`] if the
    /// username is taken, or another [`DbError`] on database failure.
    #[instrument(skip(self, new_player), fields(username = %new_player.username()))]
    pub fn create_player(&self, new_player: NewPlayer) -> Result<Player, DbError> {
        debug!("Creating player");
        let mut conn = self.connection()?;

        let player = diesel::insert_into(schema::players::table)
            .values(&new_player)
            .returning(Player::as_returning())
            .get_result(&mut conn)
            .map_err(|e| {
                let err = DbError::from(e);
                if err.kind == DbErrorKind::UniqueViolation {
                    warn!(username = %new_player.username(), "Username already taken");
                }
                err
            })?;

        info!(player_id = player.id(), username = %player.username(), "Player created");
        Ok(player)
    }

    /// Gets a player by username. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player(&self, username: &str) -> Result<Option<Player>, DbError> {
        debug!("Looking up player");
        let mut conn = self.connection()?;

        let player = schema::players::table
            .filter(schema::players::username.eq(username))
            .select(Player::as_select())
            .first(&mut conn)
            .optional()?;

        if player.is_none() {
            debug!("Player not found");
        }
        Ok(player)
    }

    /// Lists all usernames in sign-up order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_usernames(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.connection()?;

        let names = schema::players::table
            .order(schema::players::id.asc())
            .select(schema::players::username)
            .load::<String>(&mut conn)?;

        info!(count = names.len(), "Usernames loaded");
        Ok(names)
    }

    /// Replaces a player's statistics. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn update_stats(&self, username: &str, stats: &PlayerStats) -> Result<usize, DbError> {
        let mut conn = self.connection()?;

        let updated = diesel::update(
            schema::players::table.filter(schema::players::username.eq(username)),
        )
        .set((
            schema::players::points.eq(*stats.points()),
            schema::players::num_wins.eq(*stats.num_wins()),
            schema::players::num_played.eq(*stats.num_played()),
            schema::players::win_ratio.eq(*stats.win_ratio()),
        ))
        .execute(&mut conn)?;

        info!(updated, "Player stats replaced");
        Ok(updated)
    }

    /// Counts stored prompts.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_prompts(&self) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let total = schema::prompts::table.count().get_result::<i64>(&mut conn)?;
        debug!(total, "Prompts counted");
        Ok(total)
    }

    /// Stores a prompt under the next id: 0 for the first, then one past the
    /// largest id in use. The write lock is taken before the id is read, so
    /// concurrent contributors never pick the same id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, question))]
    pub fn insert_prompt(
        &self,
        contributor: String,
        question: String,
        answer: f64,
    ) -> Result<Prompt, DbError> {
        let mut conn = self.connection()?;

        let prompt = conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let last = schema::prompts::table
                .select(max(schema::prompts::id))
                .first::<Option<i64>>(conn)?;
            let next_id = last.map_or(0, |id| id + 1);

            diesel::insert_into(schema::prompts::table)
                .values(&Prompt::new(next_id, contributor, question, answer))
                .returning(Prompt::as_returning())
                .get_result(conn)
        })?;

        info!(prompt_id = prompt.id(), contributor = %prompt.contributor(), "Prompt stored");
        Ok(prompt)
    }

    /// Stores prompts with their ids as given.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs, including an id clash.
    #[instrument(skip(self, prompts), fields(count = prompts.len()))]
    pub fn insert_prompts(&self, prompts: &[Prompt]) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let inserted = diesel::insert_into(schema::prompts::table)
            .values(prompts)
            .execute(&mut conn)?;
        Ok(inserted)
    }

    /// Gets the prompt at a position in id order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn prompt_at(&self, offset: i64) -> Result<Option<Prompt>, DbError> {
        let mut conn = self.connection()?;
        let prompt = schema::prompts::table
            .order(schema::prompts::id.asc())
            .offset(offset)
            .select(Prompt::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(prompt)
    }

    /// Picks a prompt uniformly at random. Returns `None` if there are none.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, rng))]
    pub fn random_prompt<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<Prompt>, DbError> {
        let total = self.count_prompts()?;
        if total == 0 {
            warn!("No prompts stored");
            return Ok(None);
        }
        let offset = rng.random_range(0..total);
        debug!(offset, total, "Selected random prompt");
        self.prompt_at(offset)
    }

    /// Top `limit` players by points, ties broken by username.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn top_by_points(&self, limit: i64) -> Result<Vec<(String, i64)>, DbError> {
        let mut conn = self.connection()?;
        let leaders = schema::players::table
            .order((schema::players::points.desc(), schema::players::username.asc()))
            .limit(limit)
            .select((schema::players::username, schema::players::points))
            .load::<(String, i64)>(&mut conn)?;
        debug!(count = leaders.len(), "Points leaders loaded");
        Ok(leaders)
    }

    /// Top `limit` players by win ratio, ties broken by username.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn top_by_win_ratio(&self, limit: i64) -> Result<Vec<(String, f64)>, DbError> {
        let mut conn = self.connection()?;
        let leaders = schema::players::table
            .order((schema::players::win_ratio.desc(), schema::players::username.asc()))
            .limit(limit)
            .select((schema::players::username, schema::players::win_ratio))
            .load::<(String, f64)>(&mut conn)?;
        debug!(count = leaders.len(), "Win ratio leaders loaded");
        Ok(leaders)
    }
}
