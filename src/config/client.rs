//! Process-wide Oracle client setup.
//!
//! The database still expects the old logon protocol, so the client has to be told which logon
//! versions it may negotiate before the first connection is made. The Oracle client only reads
//! that from `sqlnet.ora`, which we write into a directory we own and hand to the client's global
//! context.

use crate::error::{InitialiseClientSnafu, TeacherEmailResult, WriteClientConfigSnafu};
use oracle::InitParams;
use snafu::ResultExt;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const CONFIG_DIR_VAR: &str = "ORACLE_CLIENT_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = "get-teacher-email-list";
pub const ALLOWED_LOGON_VERSION_CLIENT: u8 = 8;

#[derive(Clone, Debug)]
pub struct ClientConfiguration {
    config_dir: PathBuf,
    allowed_logon_version: u8,
}

impl ClientConfiguration {
    pub fn from_env() -> Self {
        let config_dir = dotenvy::var(CONFIG_DIR_VAR).map_or_else(
            |_| env::temp_dir().join(DEFAULT_CONFIG_DIR_NAME),
            PathBuf::from,
        );
        Self::new(config_dir)
    }

    pub const fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            allowed_logon_version: ALLOWED_LOGON_VERSION_CLIENT,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn sqlnet_ora(&self) -> String {
        format!(
            "# written by get-teacher-email-list on startup, changes will be overwritten\nSQLNET.ALLOWED_LOGON_VERSION_CLIENT = {}\n",
            self.allowed_logon_version
        )
    }

    /// Writes `sqlnet.ora` into the config directory, creating it if needed.
    pub fn write_sqlnet_ora(&self) -> TeacherEmailResult<PathBuf> {
        fs::create_dir_all(&self.config_dir).context(WriteClientConfigSnafu {
            path: self.config_dir.clone(),
        })?;

        let path = self.config_dir.join("sqlnet.ora");
        fs::write(&path, self.sqlnet_ora()).context(WriteClientConfigSnafu { path: path.clone() })?;

        Ok(path)
    }
}

/// Writes `sqlnet.ora` and points the client's global context at it. Returns `false` if the
/// context had already been initialised by an earlier call.
pub fn initialise(config: &ClientConfiguration) -> TeacherEmailResult<bool> {
    let sqlnet_ora = config.write_sqlnet_ora()?;

    let initialised = InitParams::new()
        .oracle_client_config_dir(config.config_dir.clone())
        .context(InitialiseClientSnafu)?
        .init()
        .context(InitialiseClientSnafu)?;

    if initialised {
        info!(
            ?sqlnet_ora,
            allowed_logon_version = config.allowed_logon_version,
            "Oracle client initialised"
        );
    } else {
        debug!("Oracle client already initialised");
    }
    Ok(initialised)
}
