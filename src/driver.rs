//! Driver boundary.
//!
//! Drivers are external capability providers: the registry only needs a
//! `connect` entry point producing a closable handle. Hosts register driver
//! implementations by module name; looking one up at connect time is the
//! synchronous analog of a dynamic module import.

use std::collections::HashMap;
use std::sync::Arc;

/// Errors crossing the driver boundary. Only their display text survives
/// into the registry's [`crate::DbError::Connection`] wrapper.
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// Arguments for a driver's connect entry point. The shape follows the
/// driver family's native call convention; see [`crate::DriverFamily`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectArgs {
    /// MySQL-family keyword call.
    MySql {
        db: String,
        user: String,
        passwd: String,
        host: String,
        port: u16,
        charset: Option<String>,
    },
    /// Generic DB-API call: postgres family, and the fallback for unknown
    /// driver names (where the port may be absent).
    Generic {
        database: String,
        user: String,
        password: String,
        host: String,
        port: Option<u16>,
    },
    /// Single DSN string. `autocommit` is set for the spreadsheet variants.
    Dsn { dsn: String, autocommit: bool },
    /// DB2 DSN; the driver supplies the two empty positional arguments its
    /// API expects after the string.
    Db2 { dsn: String },
    /// Oracle credentials plus a `host:port/service` descriptor.
    Oracle {
        user: String,
        password: String,
        descriptor: String,
    },
    /// Caller-supplied parameter string passed through verbatim, never
    /// interpreted by the registry. Trusted input only.
    Raw { params: String },
}

/// A driver module: anything that can open a connection from [`ConnectArgs`].
pub trait Driver: Send + Sync {
    fn connect(&self, args: &ConnectArgs) -> Result<Box<dyn ConnectionHandle>, DriverError>;
}

/// An open connection owned by a cache slot. Closing twice, or toggling
/// autocommit on a closed handle, is a caller error the driver reports.
pub trait ConnectionHandle: Send {
    fn close(&mut self) -> Result<(), DriverError>;
    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError>;
}

/// Module-name-keyed set of installed drivers.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a driver under `module`, replacing any previous one.
    pub fn register(&mut self, module: impl Into<String>, driver: Arc<dyn Driver>) {
        let module = module.into();
        tracing::debug!(module = %module, "driver registered");
        self.drivers.insert(module, driver);
    }

    /// Look up a driver by module name.
    pub fn load(&self, module: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(module).cloned()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("modules", &self.drivers.keys().collect::<Vec<_>>())
            .finish()
    }
}
