use crate::{
    data::{ProcedureCall, StoredProcedure},
    error::{MissingStudentIdSnafu, TeacherEmailResult},
    state::AppState,
};
use axum::extract::{Query, RawQuery, State};
use snafu::OptionExt;

/// Query string pairs, looked up the way the old function host did it: names match without
/// regard to case and repeated values come back comma-joined.
struct QueryParameters(Vec<(String, String)>);

impl QueryParameters {
    /// A bare segment with no `=` is a value without a name there, so it never matches a
    /// parameter. `pairs` holds one entry per non-empty `&`-separated segment of `raw`, in order.
    fn new(raw: Option<&str>, pairs: Vec<(String, String)>) -> Self {
        let named = raw
            .unwrap_or_default()
            .split('&')
            .filter(|segment| !segment.is_empty())
            .zip(pairs)
            .filter(|(segment, _)| segment.contains('='))
            .map(|(_, pair)| pair)
            .collect();

        Self(named)
    }

    fn get(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .0
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }
}

pub async fn get_teacher_email_list(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Query(pairs): Query<Vec<(String, String)>>,
) -> TeacherEmailResult<String> {
    info!("GetTeacherEmailListFunction triggered.");

    let query = QueryParameters::new(raw.as_deref(), pairs);
    let student_id = query
        .get("studentId")
        .filter(|student_id| !student_id.is_empty())
        .context(MissingStudentIdSnafu)?;
    let email_teachers = query
        .get("emailteachers")
        .is_some_and(|flag| flag.eq_ignore_ascii_case("true"));

    let call = ProcedureCall {
        procedure: StoredProcedure::for_flag(email_teachers),
        student_id,
    };
    info!(procedure = call.procedure.name(), "Calling stored procedure");

    // a NULL `out_param` is sent back as an empty body
    Ok(state.run_procedure(call).await?.unwrap_or_default())
}
