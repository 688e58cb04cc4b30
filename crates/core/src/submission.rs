//! Result of handing work to a vendor.

/// What a vendor adapter returns from a submission call.
///
/// Some vendors finish synchronously (Fish Audio clones, plain TTS), most
/// hand back a task id that has to be polled. Callers branch on the variant
/// instead of probing response fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    Immediate(T),
    Deferred { task_id: String },
}

impl<T> Submission<T> {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Submission::Deferred { task_id } => Some(task_id),
            Submission::Immediate(_) => None,
        }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self, Submission::Immediate(_))
    }
}
