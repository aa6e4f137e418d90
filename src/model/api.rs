use serde::{Deserialize, Serialize};

/// JSON body returned alongside non-interaction error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
