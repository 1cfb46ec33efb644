use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::{num::ParseIntError, path::PathBuf};

pub type TeacherEmailResult<T> = Result<T, TeacherEmailError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TeacherEmailError {
    #[snafu(display("No `studentId` found on the query string"))]
    MissingStudentId,
    #[snafu(display("Error connecting to the database"))]
    Connect { source: oracle::Error },
    #[snafu(display("Error preparing call to {}", procedure))]
    PrepareCall {
        source: oracle::Error,
        procedure: &'static str,
    },
    #[snafu(display("Error executing {}", procedure))]
    ExecuteCall {
        source: oracle::Error,
        procedure: &'static str,
    },
    #[snafu(display("Error reading `out_param` from {}", procedure))]
    ReadOutput {
        source: oracle::Error,
        procedure: &'static str,
    },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Malformed connection string: {}", reason))]
    MalformedConnectionString { reason: String },
    #[snafu(display("Stored procedure task did not complete"))]
    JoinCall { source: tokio::task::JoinError },
    #[snafu(display("Unable to write client configuration to {}", path.display()))]
    WriteClientConfig {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Unable to initialise the Oracle client"))]
    InitialiseClient { source: oracle::Error },
    #[snafu(display("Unable to parse port {:?}", original))]
    ParsePort {
        source: ParseIntError,
        original: String,
    },
}

/// What the caller gets to see of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Database,
    Unexpected,
}

impl ErrorClass {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Database | Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn body(self) -> &'static str {
        match self {
            Self::Validation => "Please pass a studentId on the query string.",
            Self::Database => "Database error occurred.",
            Self::Unexpected => "An error occurred.",
        }
    }
}

impl TeacherEmailError {
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingStudentId => ErrorClass::Validation,
            Self::Connect { .. }
            | Self::PrepareCall { .. }
            | Self::ExecuteCall { .. }
            | Self::ReadOutput { .. } => ErrorClass::Database,
            Self::BadEnvVar { .. }
            | Self::MalformedConnectionString { .. }
            | Self::JoinCall { .. }
            | Self::WriteClientConfig { .. }
            | Self::InitialiseClient { .. }
            | Self::ParsePort { .. } => ErrorClass::Unexpected,
        }
    }
}

impl IntoResponse for TeacherEmailError {
    fn into_response(self) -> Response {
        let class = self.class();
        match class {
            ErrorClass::Validation => debug!(?self, "Rejecting request"),
            ErrorClass::Database => error!(?self, "Oracle DB error: {}", self),
            ErrorClass::Unexpected => error!(?self, "General error: {}", self),
        }

        // the detail stays in the logs, callers only ever see the fixed body
        (class.status(), class.body()).into_response()
    }
}
