use crate::error::{
    BadEnvVarSnafu, MalformedConnectionStringSnafu, ParsePortSnafu, TeacherEmailResult,
};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::{OptionExt, ResultExt};

pub mod client;

use client::ClientConfiguration;

pub const CONNECTION_STRING_VAR: &str = "OracleConnectionString";
const CUSTOM_HANDLER_PORT_VAR: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
const SERVER_IP_VAR: &str = "TEACHER_EMAIL_SERVER_IP";
const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_addr: String,
    client: ClientConfiguration,
}

impl RuntimeConfiguration {
    pub fn new() -> TeacherEmailResult<Self> {
        Ok(Self {
            server_addr: listen_address(var(CUSTOM_HANDLER_PORT_VAR).ok(), var(SERVER_IP_VAR).ok())?,
            client: ClientConfiguration::from_env(),
        })
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub const fn client(&self) -> &ClientConfiguration {
        &self.client
    }
}

/// When running as a custom handler the host tells us which local port to listen on, and that always wins.
fn listen_address(
    custom_handler_port: Option<String>,
    server_ip: Option<String>,
) -> TeacherEmailResult<String> {
    if let Some(port) = custom_handler_port {
        let port: u16 = port
            .trim()
            .parse()
            .context(ParsePortSnafu { original: port.clone() })?;
        return Ok(format!("127.0.0.1:{port}"));
    }

    Ok(server_ip.unwrap_or_else(|| DEFAULT_SERVER_IP.to_string()))
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    data_source: String,
}

impl DbConfig {
    pub fn from_env() -> TeacherEmailResult<Self> {
        Self::from_var(CONNECTION_STRING_VAR)
    }

    pub fn from_var(name: &'static str) -> TeacherEmailResult<Self> {
        let connection_string = var(name).context(BadEnvVarSnafu { name })?;
        Self::parse(&connection_string)
    }

    /// Parses an ADO.NET style `User Id=...;Password=...;Data Source=...` connection string.
    pub fn parse(connection_string: &str) -> TeacherEmailResult<Self> {
        let mut user = None;
        let mut password = None;
        let mut data_source = None;

        for pair in connection_string.split(';') {
            if pair.trim().is_empty() {
                continue;
            }

            let (key, value) = pair.split_once('=').context(MalformedConnectionStringSnafu {
                reason: "found a setting without `=`",
            })?;
            let value = unquote(value.trim()).to_string();

            match normalise_key(key).as_str() {
                "userid" | "uid" | "user" => user = Some(value),
                "password" | "pwd" => password = Some(value),
                "datasource" | "server" => data_source = Some(value),
                _ => debug!(key = key.trim(), "Ignoring connection string setting"),
            }
        }

        Ok(Self {
            user: user.context(MalformedConnectionStringSnafu {
                reason: "no `User Id`",
            })?,
            password: SecretString::from(password.unwrap_or_default()),
            data_source: data_source.context(MalformedConnectionStringSnafu {
                reason: "no `Data Source`",
            })?,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }
}

fn normalise_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TeacherEmailError;

    #[test]
    fn parses_the_usual_connection_string() {
        let config = DbConfig::parse(
            "User Id=school_app;Password=hunter2;Data Source=db.example.org:1521/SCHOOLPDB",
        )
        .unwrap();

        assert_eq!(config.user(), "school_app");
        assert_eq!(config.password(), "hunter2");
        assert_eq!(config.data_source(), "db.example.org:1521/SCHOOLPDB");
    }

    #[test]
    fn keys_are_case_and_space_insensitive() {
        let config =
            DbConfig::parse(" USER ID = school_app ; pwd=hunter2; datasource = SCHOOL ;").unwrap();

        assert_eq!(config.user(), "school_app");
        assert_eq!(config.password(), "hunter2");
        assert_eq!(config.data_source(), "SCHOOL");
    }

    #[test]
    fn quoted_values_are_unwrapped() {
        let config = DbConfig::parse(
            "UID='school_app';Password=\"p@ss=word\";Server=\"(DESCRIPTION=(ADDRESS=(HOST=db)(PORT=1521)))\"",
        )
        .unwrap();

        assert_eq!(config.user(), "school_app");
        assert_eq!(config.password(), "p@ss=word");
        assert_eq!(
            config.data_source(),
            "(DESCRIPTION=(ADDRESS=(HOST=db)(PORT=1521)))"
        );
    }

    #[test]
    fn unknown_settings_are_ignored_and_password_is_optional() {
        let config =
            DbConfig::parse("User Id=/;Data Source=SCHOOL;Pooling=false;Connection Timeout=15")
                .unwrap();

        assert_eq!(config.user(), "/");
        assert_eq!(config.password(), "");
    }

    #[test]
    fn missing_fields_are_rejected() {
        for connection_string in ["Password=hunter2;Data Source=SCHOOL", "User Id=app", ""] {
            let error = DbConfig::parse(connection_string).unwrap_err();
            assert!(
                matches!(error, TeacherEmailError::MalformedConnectionString { .. }),
                "{connection_string:?} gave {error:?}"
            );
        }
    }

    #[test]
    fn settings_without_a_value_are_rejected() {
        let error = DbConfig::parse("User Id=app;Data Source").unwrap_err();
        assert!(matches!(
            error,
            TeacherEmailError::MalformedConnectionString { .. }
        ));
    }

    #[test]
    fn password_is_not_in_debug_output() {
        let config = DbConfig::parse("User Id=app;Password=hunter2;Data Source=SCHOOL").unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn custom_handler_port_wins() {
        assert_eq!(
            listen_address(Some("7071".into()), Some("0.0.0.0:9000".into())).unwrap(),
            "127.0.0.1:7071"
        );
        assert_eq!(
            listen_address(None, Some("0.0.0.0:9000".into())).unwrap(),
            "0.0.0.0:9000"
        );
        assert_eq!(listen_address(None, None).unwrap(), DEFAULT_SERVER_IP);
    }

    #[test]
    fn bad_custom_handler_port_is_an_error() {
        let error = listen_address(Some("seventy".into()), None).unwrap_err();
        assert!(matches!(error, TeacherEmailError::ParsePort { .. }));
    }
}
