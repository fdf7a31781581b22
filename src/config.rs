//! Startup configuration.
//!
//! Read once in `main` from flags or the environment (a `.env` file is
//! loaded first when present), then handed to [`App`](crate::App). Handlers
//! never look at the process environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use clap::Parser;

pub const DEFAULT_BACKEND: &str = "http://localhost";
pub const DEFAULT_HOST_NAME: &str = "unknown";
pub const DEFAULT_PORT: u16 = 5000;

/// Command-line and environment options.
#[derive(Debug, Parser)]
#[command(name = "workprofile", version, about = "Person directory web tier")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// Host identifier shown on the list page
    #[arg(long, env = "HOSTNAME", default_value = DEFAULT_HOST_NAME)]
    pub host_name: String,

    /// Record store host shown on the list page
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Base URL the page script sends requests to
    #[arg(long, env = "BACKEND", default_value = DEFAULT_BACKEND)]
    pub backend: String,
}

/// Display metadata and bind address for one process.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub listen: SocketAddr,
    pub host_name: String,
    pub db_host: Option<String>,
    pub backend: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            host_name: DEFAULT_HOST_NAME.to_owned(),
            db_host: None,
            backend: DEFAULT_BACKEND.to_owned(),
        }
    }
}

impl From<Args> for Config {
    /// An empty `BACKEND` falls back to the default.
    fn from(args: Args) -> Self {
        let backend = if args.backend.is_empty() { DEFAULT_BACKEND.to_owned() } else { args.backend };
        Self {
            listen: args.listen,
            host_name: args.host_name,
            db_host: args.db_host.filter(|host| !host.is_empty()),
            backend,
        }
    }
}

/// Loads `path` into the process environment without overriding variables
/// already set. A missing file is not an error.
///
/// Call before anything reads the environment: the log filter and [`Args`].
pub fn load_env_file(path: &Path) -> Result<(), dotenvy::Error> {
    match dotenvy::from_path(path) {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "workprofile",
            "--listen", "127.0.0.1:8080",
            "--host-name", "web-2",
            "--db-host", "mysql",
            "--backend", "http://proxy",
        ])
        .expect("valid flags");
        let config = Config::from(args);

        assert_eq!(config.listen, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.host_name, "web-2");
        assert_eq!(config.db_host.as_deref(), Some("mysql"));
        assert_eq!(config.backend, "http://proxy");
    }

    #[test]
    fn empty_backend_and_db_host_fall_back() {
        let args = Args::try_parse_from([
            "workprofile", "--host-name", "web-2", "--backend", "", "--db-host", "",
        ])
        .expect("valid flags");
        let config = Config::from(args);

        assert_eq!(config.backend, DEFAULT_BACKEND);
        assert_eq!(config.db_host, None);
    }

    #[test]
    fn env_file_feeds_startup_options() {
        let path = std::env::temp_dir().join(format!("workprofile-{}.env", std::process::id()));
        std::fs::write(&path, "LISTEN_ADDR=127.0.0.1:6123\nWORKPROFILE_ENV_FILE_MARKER=loaded\n").unwrap();

        load_env_file(&path).expect("readable env file");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(std::env::var("WORKPROFILE_ENV_FILE_MARKER").as_deref(), Ok("loaded"));
        let args = Args::try_parse_from(["workprofile"]).expect("defaults parse");
        assert_eq!(args.listen, "127.0.0.1:6123".parse().unwrap());
    }

    #[test]
    fn missing_env_file_is_fine() {
        assert!(load_env_file(Path::new("/nonexistent/workprofile/.env")).is_ok());
    }

    #[test]
    fn rejects_bad_listen_address() {
        assert!(Args::try_parse_from(["workprofile", "--listen", "not-an-addr"]).is_err());
    }
}
