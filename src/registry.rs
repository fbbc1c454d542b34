//! Alias-keyed connection cache with a "current connection" pointer.
//!
//! Every operation takes an optional alias; `None` addresses the most
//! recently created or switched connection. The registry is synchronous and
//! not thread-safe: operations block on the driver and take `&mut self`.
//! Handles are owned by their cache slot and released only by an explicit
//! `disconnect` — overwriting an alias does NOT close the prior handle.

use std::collections::HashMap;

use crate::adapters::DriverFamily;
use crate::config::{ConfigDefaults, DEFAULT_CONFIG_FILE};
use crate::driver::{ConnectArgs, ConnectionHandle, DriverRegistry};
use crate::error::{DbError, Result};
use crate::params::{resolve, ConnectParams};

/// One cached connection: the open handle and the module that produced it.
pub struct CacheEntry {
    pub connection: Box<dyn ConnectionHandle>,
    pub module: String,
}

/// Connection registry: installed drivers plus the alias cache.
pub struct ConnectionRegistry {
    drivers: DriverRegistry,
    cache: HashMap<String, CacheEntry>,
    current: Option<String>,
    /// Counter for positional keys of alias-less registrations.
    unnamed: usize,
}

impl ConnectionRegistry {
    pub fn new(drivers: DriverRegistry) -> Self {
        Self {
            drivers,
            cache: HashMap::new(),
            current: None,
            unnamed: 0,
        }
    }

    /// Resolve parameters, open a connection through the named driver, and
    /// register it. Returns the cache key the connection was registered
    /// under. Nothing is registered on failure.
    ///
    /// # Errors
    ///
    /// [`DbError::Resolution`], [`DbError::InvalidUrl`], or
    /// [`DbError::InvalidPort`] when the parameter set cannot be completed;
    /// [`DbError::Connection`] when the driver is missing or its connect
    /// call fails.
    pub fn connect(&mut self, params: ConnectParams) -> Result<String> {
        let config_file = params
            .config_file
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned());
        let config = ConfigDefaults::load(&config_file);

        let (resolved, alias) = resolve(&params, &config)?;
        let family = DriverFamily::for_driver(&resolved.driver);
        let module = family.module_name(&resolved.driver).to_owned();
        let args = family.build_args(&resolved);

        tracing::info!(
            alias = alias.as_deref().unwrap_or("<current>"),
            driver = %resolved.driver,
            module = %module,
            database = %resolved.database,
            user = %resolved.username,
            host = %resolved.host,
            port = ?resolved.port,
            "connecting"
        );

        let handle = self.open(&alias, &module, &args)?;
        Ok(self.register(alias, CacheEntry { connection: handle, module }))
    }

    /// Open a connection with a caller-supplied parameter string handed to
    /// the driver verbatim, bypassing resolution entirely.
    ///
    /// The string is never interpreted by the registry; whatever syntax the
    /// driver expects is the caller's responsibility. Trusted input only.
    ///
    /// # Errors
    ///
    /// [`DbError::Connection`] when the driver is missing or rejects the
    /// parameter string.
    pub fn connect_with_custom_params(
        &mut self,
        driver: &str,
        raw_params: &str,
        alias: Option<&str>,
    ) -> Result<String> {
        let alias = alias.map(str::to_owned);
        tracing::info!(
            alias = alias.as_deref().unwrap_or("<current>"),
            driver = %driver,
            "connecting with custom params"
        );

        let args = ConnectArgs::Raw { params: raw_params.to_owned() };
        let handle = self.open(&alias, driver, &args)?;
        Ok(self.register(alias, CacheEntry { connection: handle, module: driver.to_owned() }))
    }

    /// Close the connection registered under `alias` (or the current one).
    ///
    /// The cache slot stays addressable afterwards; a second disconnect is a
    /// caller error surfaced by the driver's close result.
    ///
    /// # Errors
    ///
    /// [`DbError::UnknownAlias`] / [`DbError::NoConnection`] when nothing is
    /// registered; [`DbError::Connection`] when close fails.
    pub fn disconnect(&mut self, alias: Option<&str>) -> Result<()> {
        let key = self.switch(alias)?;
        tracing::info!(alias = %key, "disconnecting");
        let entry = self
            .cache
            .get_mut(&key)
            .ok_or_else(|| DbError::UnknownAlias(key.clone()))?;
        entry
            .connection
            .close()
            .map_err(|e| DbError::Connection { alias: key, cause: e.to_string() })
    }

    /// Toggle autocommit on the connection registered under `alias` (or the
    /// current one) and re-register the same handle/module pair. The
    /// re-registration is functionally a no-op, kept for symmetry with the
    /// cache-update pattern of every other mutation.
    ///
    /// # Errors
    ///
    /// Same lookup errors as [`Self::disconnect`]; [`DbError::Connection`]
    /// when the driver rejects the toggle.
    pub fn set_auto_commit(&mut self, autocommit: bool, alias: Option<&str>) -> Result<()> {
        let key = self.switch(alias)?;
        tracing::info!(alias = %key, autocommit, "setting autocommit");
        let entry = self
            .cache
            .get_mut(&key)
            .ok_or_else(|| DbError::UnknownAlias(key.clone()))?;
        entry
            .connection
            .set_autocommit(autocommit)
            .map_err(|e| DbError::Connection { alias: key.clone(), cause: e.to_string() })?;
        self.current = Some(key);
        Ok(())
    }

    /// Key of the current connection, if any.
    pub fn current_alias(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether a connection is registered under `alias`.
    pub fn is_registered(&self, alias: &str) -> bool {
        self.cache.contains_key(alias)
    }

    /// Module name recorded for `alias`, if registered.
    pub fn module_of(&self, alias: &str) -> Option<&str> {
        self.cache.get(alias).map(|e| e.module.as_str())
    }

    fn open(
        &self,
        alias: &Option<String>,
        module: &str,
        args: &ConnectArgs,
    ) -> Result<Box<dyn ConnectionHandle>> {
        let wrap = |cause: String| DbError::Connection {
            alias: alias.clone().unwrap_or_else(|| "<unnamed>".to_owned()),
            cause,
        };
        let driver = self
            .drivers
            .load(module)
            .ok_or_else(|| wrap(format!("driver module `{module}` is not registered")))?;
        driver.connect(args).map_err(|e| wrap(e.to_string()))
    }

    /// Register an entry and make it current. An existing entry under the
    /// same key is replaced; its handle is dropped unclosed, never closed
    /// implicitly.
    fn register(&mut self, alias: Option<String>, entry: CacheEntry) -> String {
        let key = alias.unwrap_or_else(|| {
            self.unnamed += 1;
            format!("conn-{}", self.unnamed)
        });
        tracing::info!(alias = %key, module = %entry.module, "connection registered");
        self.cache.insert(key.clone(), entry);
        self.current = Some(key.clone());
        key
    }

    /// Resolve `alias` to a cache key and make it current. `None` addresses
    /// the current connection.
    fn switch(&mut self, alias: Option<&str>) -> Result<String> {
        match alias {
            Some(name) => {
                if !self.cache.contains_key(name) {
                    return Err(DbError::UnknownAlias(name.to_owned()));
                }
                self.current = Some(name.to_owned());
                Ok(name.to_owned())
            }
            None => self.current.clone().ok_or(DbError::NoConnection),
        }
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("aliases", &self.cache.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}
