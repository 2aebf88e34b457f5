use api_utils::{ApiError, Rule, Validate, Validator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refreshtoken: String,
}

impl Validate for RefreshRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("refreshtoken", &self.refreshtoken, &[Rule::Required])
            .finish()
    }
}
