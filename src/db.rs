use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::{LoaderError, Result};
use crate::models::{ChannelCount, NewTelegramMessage, RawMessage};
use crate::repository::LandingRepository;
use crate::schema::{
    telegram_messages, COUNT_BY_CHANNEL, CREATE_MESSAGES_TABLE, CREATE_RAW_SCHEMA,
    DROP_MESSAGES_TABLE,
};
use crate::validation::InputValidator;

/// Single PostgreSQL connection owned for the lifetime of one load
pub struct Database {
    conn: PgConnection,
}

impl Database {
    /// Connect using the environment-sourced settings
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connecting to PostgreSQL..."
        );
        let database = Self::establish(&config.conninfo())?;
        info!("Connected to PostgreSQL");
        Ok(database)
    }

    /// Connect with a libpq connection string or `postgres://` URL
    pub fn establish(database_url: &str) -> Result<Self> {
        let conn = PgConnection::establish(database_url)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying connection
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

impl LandingRepository for Database {
    fn prepare_schema(&mut self) -> Result<()> {
        info!("Creating raw schema and table...");

        self.conn.transaction::<_, LoaderError, _>(|conn| {
            conn.batch_execute(CREATE_RAW_SCHEMA)?;
            conn.batch_execute(DROP_MESSAGES_TABLE)?;
            conn.batch_execute(CREATE_MESSAGES_TABLE)?;
            Ok(())
        })?;

        info!("Schema and table created successfully");
        Ok(())
    }

    fn load_messages(&mut self, messages: &[RawMessage], batch_size: usize) -> Result<usize> {
        InputValidator::validate_batch_size(batch_size)?;
        info!("Loading {} messages into PostgreSQL...", messages.len());

        let rows: Vec<NewTelegramMessage<'_>> = messages.iter().map(NewTelegramMessage::from).collect();

        // Commit once; a failing page rolls back every earlier page too
        let inserted = self.conn.transaction::<_, LoaderError, _>(|conn| {
            let mut inserted = 0;
            for (page, chunk) in rows.chunks(batch_size).enumerate() {
                inserted += diesel::insert_into(telegram_messages::table)
                    .values(chunk)
                    .execute(conn)?;
                debug!(page = page + 1, rows = chunk.len(), "Inserted page");
            }
            Ok(inserted)
        })?;

        info!("Successfully loaded {} messages", inserted);
        Ok(inserted)
    }

    fn count_rows(&mut self) -> Result<i64> {
        let total: i64 = telegram_messages::table.count().get_result(&mut self.conn)?;
        Ok(total)
    }

    fn count_by_channel(&mut self) -> Result<Vec<ChannelCount>> {
        let counts = diesel::sql_query(COUNT_BY_CHANNEL).load::<ChannelCount>(&mut self.conn)?;
        Ok(counts)
    }
}
