use api_utils::{ApiError, Rule, Validate, Validator};
use serde::{Deserialize, Serialize};

/// `?id=a,b,c`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenresQuery {
    #[serde(default)]
    pub id: String,
}

impl GenresQuery {
    pub fn ids(&self) -> Vec<String> {
        self.id
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Validate for GenresQuery {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("id", &self.ids().join(","), &[Rule::Required])
            .each("id", &self.ids(), &[Rule::PrimitiveId])
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGenreRequest {
    #[serde(default)]
    pub name: String,
}

impl Validate for CreateGenreRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("name", &self.name, &[Rule::Required, Rule::Max(64)])
            .finish()
    }
}
