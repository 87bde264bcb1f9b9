use serde::{Deserialize, Serialize};

/// Body of `POST /generate`. Field names are the wire contract; do not
/// rename without coordinating with the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCvRequest {
    pub full_name: String,
    pub email: String,
    pub raw_experience: String,
}

/// Success body of `POST /generate`. The service includes bookkeeping
/// fields (`status`, profile ids) that clients ignore; only `cv` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCvResponse {
    pub cv: String,
}
