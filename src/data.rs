use crate::error::TeacherEmailResult;

pub mod oracle_runner;

/// Maximum length of the `out_param` VARCHAR2 both procedures write to.
pub const OUT_PARAM_MAX_LEN: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredProcedure {
    SayHelloWorld,
    TeacherEmailList,
}

impl StoredProcedure {
    pub const fn for_flag(email_teachers: bool) -> Self {
        if email_teachers {
            Self::TeacherEmailList
        } else {
            Self::SayHelloWorld
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::SayHelloWorld => "SAY_HELLO_WORLD",
            Self::TeacherEmailList => "TEACHER_EMAIL_LIST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureCall {
    pub procedure: StoredProcedure,
    pub student_id: String,
}

impl ProcedureCall {
    /// Anonymous block calling the procedure with `studentId` then `out_param`, bound by position.
    pub fn sql(&self) -> String {
        format!("BEGIN {}(:studentId, :out_param); END;", self.procedure.name())
    }
}

/// Something that can run one of the stored procedures and hand back `out_param`.
///
/// Runners are blocking, the handler moves them onto the blocking pool.
pub trait ProcedureRunner: Send + Sync + 'static {
    fn run(&self, call: &ProcedureCall) -> TeacherEmailResult<Option<String>>;
}
