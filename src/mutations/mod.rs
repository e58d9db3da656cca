mod pipeline;

pub use pipeline::MutationPipeline;

/// One operator write, as issued from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddPerson,
    DeletePerson(i64),
    UploadImages,
    Recognize,
    AddStream,
    RemoveStream(String),
    UploadVideo,
    YouTube,
    CancelJob(String),
}

impl Action {
    /// The question asked before a destructive write. A blank id is rejected
    /// without asking.
    pub fn prompt(&self) -> Option<String> {
        match self {
            Action::DeletePerson(_) => {
                Some("Remove this person and all of their face samples?".to_string())
            }
            Action::RemoveStream(id) if !id.trim().is_empty() => {
                Some(format!("Stop stream '{id}'?"))
            }
            Action::CancelJob(id) if !id.trim().is_empty() => {
                Some("Cancel or remove this job?".to_string())
            }
            _ => None,
        }
    }
}

/// What happened to one operator action. Never fatal to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server accepted the write and the follow-up refresh ran.
    Completed,
    /// The operator declined the confirmation; nothing was sent.
    Declined,
    /// Required inputs were missing; nothing was sent.
    Invalid,
    /// The request failed; inputs and store are untouched.
    Failed,
}
