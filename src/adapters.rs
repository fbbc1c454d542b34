//! Per-driver connect-call adaptation.
//!
//! Each driver family has its own connect-call convention: keyword arguments
//! for mysql and postgres, a single DSN string for the ODBC-based drivers, a
//! service descriptor for Oracle. [`DriverFamily`] maps a driver name to its
//! family and builds the family's [`ConnectArgs`] from resolved parameters.
//! Unknown names fall through to the generic DB-API shape as a best-effort
//! default, not a validated contract.

use crate::driver::ConnectArgs;
use crate::params::ResolvedParams;

/// Driver families with distinct connect-call conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFamily {
    MySql,
    Postgres,
    SqlServerOdbc,
    ExcelRead,
    ExcelWrite,
    Db2,
    Oracle,
    Generic,
}

impl DriverFamily {
    /// Select the family for a driver name.
    pub fn for_driver(name: &str) -> Self {
        match name {
            "MySQLdb" | "pymysql" => Self::MySql,
            "psycopg2" => Self::Postgres,
            "pyodbc" | "pypyodbc" => Self::SqlServerOdbc,
            "excel" => Self::ExcelRead,
            "excelrw" => Self::ExcelWrite,
            "ibm_db" | "ibm_db_dbi" => Self::Db2,
            "cx_Oracle" => Self::Oracle,
            _ => Self::Generic,
        }
    }

    /// Module actually loaded and recorded in the cache. The spreadsheet
    /// variants ride on the ODBC module.
    pub fn module_name<'a>(&self, driver: &'a str) -> &'a str {
        match self {
            Self::ExcelRead | Self::ExcelWrite => "pyodbc",
            _ => driver,
        }
    }

    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::MySql => Some(3306),
            Self::Postgres => Some(5432),
            Self::SqlServerOdbc => Some(1433),
            Self::Db2 => Some(50000),
            Self::Oracle => Some(1521),
            Self::ExcelRead | Self::ExcelWrite | Self::Generic => None,
        }
    }

    /// Build the family's connect-call arguments, applying the default port
    /// where the resolved set left it open.
    pub fn build_args(&self, p: &ResolvedParams) -> ConnectArgs {
        match self {
            Self::MySql => ConnectArgs::MySql {
                db: p.database.clone(),
                user: p.username.clone(),
                passwd: p.password.clone(),
                host: p.host.clone(),
                port: p.port.unwrap_or(3306),
                charset: p.charset.clone(),
            },
            Self::Postgres | Self::Generic => ConnectArgs::Generic {
                database: p.database.clone(),
                user: p.username.clone(),
                password: p.password.clone(),
                host: p.host.clone(),
                port: p.port.or_else(|| self.default_port()),
            },
            Self::SqlServerOdbc => ConnectArgs::Dsn {
                dsn: format!(
                    "DRIVER={{SQL Server}};SERVER={},{};DATABASE={};UID={};PWD={}",
                    p.host,
                    p.port.unwrap_or(1433),
                    p.database,
                    p.username,
                    p.password
                ),
                autocommit: false,
            },
            Self::ExcelRead => ConnectArgs::Dsn {
                dsn: excel_dsn(&p.database, true),
                autocommit: true,
            },
            Self::ExcelWrite => ConnectArgs::Dsn {
                dsn: excel_dsn(&p.database, false),
                autocommit: true,
            },
            Self::Db2 => ConnectArgs::Db2 {
                dsn: format!(
                    "DATABASE={};HOSTNAME={};PORT={};PROTOCOL=TCPIP;UID={};PWD={};",
                    p.database,
                    p.host,
                    p.port.unwrap_or(50000),
                    p.username,
                    p.password
                ),
            },
            Self::Oracle => ConnectArgs::Oracle {
                user: p.username.clone(),
                password: p.password.clone(),
                descriptor: format!(
                    "{}:{}/{}",
                    p.host,
                    p.port.unwrap_or(1521),
                    p.database
                ),
            },
        }
    }
}

/// The spreadsheet "database" is the workbook path; read-only is part of the
/// DSN, not a separate argument.
fn excel_dsn(workbook: &str, read_only: bool) -> String {
    format!(
        "DRIVER={{Microsoft Excel Driver (*.xls, *.xlsx, *.xlsm, *.xlsb)}};DBQ={};ReadOnly={};Extended Properties=\"Excel 8.0;HDR=YES\";",
        workbook,
        if read_only { 1 } else { 0 }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(driver: &str, port: Option<u16>, charset: Option<&str>) -> ResolvedParams {
        ResolvedParams {
            driver: driver.into(),
            database: "my_db".into(),
            username: "user".into(),
            password: "pw".into(),
            host: "db.example.com".into(),
            port,
            charset: charset.map(Into::into),
        }
    }

    #[test]
    fn mysql_family_carries_charset_and_defaults_to_3306() {
        for name in ["MySQLdb", "pymysql"] {
            let family = DriverFamily::for_driver(name);
            assert_eq!(family, DriverFamily::MySql);
            let args = family.build_args(&params(name, None, Some("utf8mb4")));
            assert_eq!(
                args,
                ConnectArgs::MySql {
                    db: "my_db".into(),
                    user: "user".into(),
                    passwd: "pw".into(),
                    host: "db.example.com".into(),
                    port: 3306,
                    charset: Some("utf8mb4".into()),
                }
            );
        }
    }

    #[test]
    fn postgres_family_never_carries_charset() {
        let family = DriverFamily::for_driver("psycopg2");
        let args = family.build_args(&params("psycopg2", None, Some("utf8")));
        assert_eq!(
            args,
            ConnectArgs::Generic {
                database: "my_db".into(),
                user: "user".into(),
                password: "pw".into(),
                host: "db.example.com".into(),
                port: Some(5432),
            }
        );
    }

    #[test]
    fn sql_server_builds_a_single_dsn() {
        let family = DriverFamily::for_driver("pyodbc");
        let args = family.build_args(&params("pyodbc", None, None));
        assert_eq!(
            args,
            ConnectArgs::Dsn {
                dsn: "DRIVER={SQL Server};SERVER=db.example.com,1433;DATABASE=my_db;UID=user;PWD=pw"
                    .into(),
                autocommit: false,
            }
        );
    }

    #[test]
    fn excel_variants_differ_only_in_read_only_flag() {
        let read = DriverFamily::for_driver("excel").build_args(&params("excel", None, None));
        let write = DriverFamily::for_driver("excelrw").build_args(&params("excelrw", None, None));
        match (read, write) {
            (
                ConnectArgs::Dsn { dsn: r, autocommit: true },
                ConnectArgs::Dsn { dsn: w, autocommit: true },
            ) => {
                assert!(r.contains("ReadOnly=1"));
                assert!(w.contains("ReadOnly=0"));
                assert_eq!(r.replace("ReadOnly=1", ""), w.replace("ReadOnly=0", ""));
            }
            other => panic!("expected DSN args, got {other:?}"),
        }
    }

    #[test]
    fn excel_families_load_the_odbc_module() {
        assert_eq!(DriverFamily::for_driver("excel").module_name("excel"), "pyodbc");
        assert_eq!(DriverFamily::for_driver("excelrw").module_name("excelrw"), "pyodbc");
        assert_eq!(DriverFamily::for_driver("psycopg2").module_name("psycopg2"), "psycopg2");
    }

    #[test]
    fn db2_dsn_shape() {
        let family = DriverFamily::for_driver("ibm_db");
        let args = family.build_args(&params("ibm_db", None, None));
        assert_eq!(
            args,
            ConnectArgs::Db2 {
                dsn: "DATABASE=my_db;HOSTNAME=db.example.com;PORT=50000;PROTOCOL=TCPIP;UID=user;PWD=pw;"
                    .into(),
            }
        );
    }

    #[test]
    fn oracle_builds_an_easy_connect_descriptor() {
        let family = DriverFamily::for_driver("cx_Oracle");
        let args = family.build_args(&params("cx_Oracle", None, None));
        assert_eq!(
            args,
            ConnectArgs::Oracle {
                user: "user".into(),
                password: "pw".into(),
                descriptor: "db.example.com:1521/my_db".into(),
            }
        );
    }

    #[test]
    fn unknown_drivers_fall_back_to_the_generic_shape() {
        let family = DriverFamily::for_driver("weirddriver");
        assert_eq!(family, DriverFamily::Generic);
        assert_eq!(family.default_port(), None);
        let args = family.build_args(&params("weirddriver", None, None));
        assert_eq!(
            args,
            ConnectArgs::Generic {
                database: "my_db".into(),
                user: "user".into(),
                password: "pw".into(),
                host: "db.example.com".into(),
                port: None,
            }
        );
    }

    #[test]
    fn explicit_port_wins_over_family_default() {
        let family = DriverFamily::for_driver("psycopg2");
        let args = family.build_args(&params("psycopg2", Some(6543), None));
        match args {
            ConnectArgs::Generic { port, .. } => assert_eq!(port, Some(6543)),
            other => panic!("expected generic args, got {other:?}"),
        }
    }
}
