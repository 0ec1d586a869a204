#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    SourceNotFound = 3,
    PlanConflicts = 4,
    PartialFailure = 5,
    JournalError = 6,
    NoJournal = 7,
    EmptyJournal = 8,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}
