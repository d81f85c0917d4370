//! Implements a struct that holds the state shared by the command line tools.

use rusqlite::Connection;
use time::Date;

use crate::{Error, db::initialize, timezone::today_in_timezone};

/// The timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// The database connection and settings for one run of the application.
#[derive(Debug)]
pub struct AppConfig {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Connection,
}

impl AppConfig {
    /// Create a new [AppConfig] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezoneError] if `local_timezone` is not a known
    /// timezone, or an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        // Fail on a bad timezone before touching the database.
        today_in_timezone(local_timezone)?;

        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection,
        })
    }

    /// Today's date in the configured local timezone.
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezoneError] if the timezone is not known.
    pub fn today(&self) -> Result<Date, Error> {
        today_in_timezone(&self.local_timezone)
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, user::count_users};

    use super::{AppConfig, DEFAULT_TIMEZONE};

    #[test]
    fn new_initializes_database() {
        let connection = Connection::open_in_memory().unwrap();

        let config = AppConfig::new(connection, DEFAULT_TIMEZONE).unwrap();

        assert_eq!(count_users(&config.db_connection), Ok(0));
    }

    #[test]
    fn new_fails_on_unknown_timezone() {
        let connection = Connection::open_in_memory().unwrap();

        let result = AppConfig::new(connection, "Middle/Earth");

        assert!(
            matches!(result, Err(Error::InvalidTimezoneError(ref name)) if name == "Middle/Earth"),
            "Want invalid timezone error, got {result:?}"
        );
    }

    #[test]
    fn today_uses_configured_timezone() {
        let connection = Connection::open_in_memory().unwrap();
        let config = AppConfig::new(connection, "Pacific/Auckland").unwrap();

        assert!(config.today().is_ok());
    }
}
