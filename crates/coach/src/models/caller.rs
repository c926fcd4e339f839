/// The authenticated caller of an invocation.
///
/// Established by the transport before the coach runs. The coach only checks that one is
/// present; the uid is carried for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
}

impl CallerIdentity {
    pub fn new<S: Into<String>>(uid: S) -> Self {
        Self { uid: uid.into() }
    }
}
