//! Config-file defaults for connection parameters.
//!
//! The file is an INI-style document with a `[default]` section. Every key is
//! optional, and a missing file is treated the same as an empty one: the
//! corresponding values simply have no config-level default.

use configparser::ini::Ini;
use std::path::Path;

/// Path consulted when the caller does not name a config file.
pub const DEFAULT_CONFIG_FILE: &str = "./resources/db.cfg";

const SECTION: &str = "default";

/// Defaults read from the `[default]` section. Keys are matched
/// case-insensitively.
///
/// ```text
/// [default]
/// alias=ci
/// driverName=psycopg2
/// databaseName=my_db
/// username=postgres
/// password=s3cr3t
/// host=tiger.foobar.com
/// port=5432
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigDefaults {
    pub alias: Option<String>,
    pub driver: Option<String>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl ConfigDefaults {
    /// Read defaults from `path`. An unreadable or absent file yields empty
    /// defaults rather than an error; resolution decides later whether any
    /// missing value is fatal.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let mut ini = Ini::new();
        if ini.load(path.as_ref()).is_err() {
            tracing::debug!(path = %path.as_ref().display(), "config file not readable, using no defaults");
            return Self::default();
        }
        Self {
            alias: ini.get(SECTION, "alias"),
            driver: ini.get(SECTION, "drivername"),
            database: ini.get(SECTION, "databasename"),
            username: ini.get(SECTION, "username"),
            password: ini.get(SECTION, "password"),
            host: ini.get(SECTION, "host"),
            port: ini.get(SECTION, "port"),
        }
    }
}
