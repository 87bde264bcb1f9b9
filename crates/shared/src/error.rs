use serde::{Deserialize, Serialize};

/// Wire shape of a non-2xx response from the generation service. The
/// service reports a single human-readable `detail` string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
