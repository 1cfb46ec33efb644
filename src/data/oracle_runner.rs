use crate::{
    config::DbConfig,
    data::{OUT_PARAM_MAX_LEN, ProcedureCall, ProcedureRunner},
    error::{
        ConnectSnafu, ExecuteCallSnafu, PrepareCallSnafu, ReadOutputSnafu, TeacherEmailResult,
    },
};
use oracle::{Connector, sql_type::OracleType};
use snafu::ResultExt;

/// Runs the procedures against the database named by `OracleConnectionString`.
///
/// The connection string is read again for every call, so rotating credentials doesn't need a
/// restart.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleProcedures;

impl OracleProcedures {
    pub fn run_against(
        db_config: &DbConfig,
        call: &ProcedureCall,
    ) -> TeacherEmailResult<Option<String>> {
        let procedure = call.procedure.name();

        // both are closed on drop, statement first
        let connection = Connector::new(
            db_config.user(),
            db_config.password(),
            db_config.data_source(),
        )
        .connect()
        .context(ConnectSnafu)?;
        let mut statement = connection
            .statement(&call.sql())
            .build()
            .context(PrepareCallSnafu { procedure })?;

        statement
            .execute(&[
                &call.student_id,
                &OracleType::Varchar2(OUT_PARAM_MAX_LEN),
            ])
            .context(ExecuteCallSnafu { procedure })?;

        let output: Option<String> = statement
            .bind_value(2)
            .context(ReadOutputSnafu { procedure })?;

        debug!(procedure, is_null = output.is_none(), "Stored procedure returned");
        Ok(output)
    }
}

impl ProcedureRunner for OracleProcedures {
    fn run(&self, call: &ProcedureCall) -> TeacherEmailResult<Option<String>> {
        Self::run_against(&DbConfig::from_env()?, call)
    }
}
