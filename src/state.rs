use crate::{
    data::{ProcedureCall, ProcedureRunner},
    error::{JoinCallSnafu, TeacherEmailResult},
};
use snafu::ResultExt;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    procedures: Arc<dyn ProcedureRunner>,
}

impl AppState {
    pub fn new(procedures: Arc<dyn ProcedureRunner>) -> Self {
        Self { procedures }
    }

    /// Runs `call` on the blocking pool, since the database driver blocks.
    pub async fn run_procedure(&self, call: ProcedureCall) -> TeacherEmailResult<Option<String>> {
        let procedures = self.procedures.clone();

        tokio::task::spawn_blocking(move || procedures.run(&call))
            .await
            .context(JoinCallSnafu)?
    }
}
