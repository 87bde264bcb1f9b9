//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    SignIn {
        full_name: String,
        email: String,
        token: String,
    },
    SignOut,
    Generate {
        raw_experience: String,
    },
    CopyResult,
}
