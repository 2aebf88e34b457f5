use crate::error::ApiError;
use serde::de::DeserializeOwned;

/// A single field constraint. Each rule renders a fixed English phrase when
/// it fails, prefixed with the field name (`login: field is required`).
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    OneOf(&'static [&'static str]),
    Min(usize),
    Max(usize),
    Email,
    Jwt,
    Lowercase,
    Uppercase,
    DigitRequired,
    SpecialSymbol,
    OnlyEnglish,
    PrimitiveId,
    /// Escape hatch for one-off checks: predicate plus failure phrase.
    Custom(fn(&str) -> bool, &'static str),
}

impl Rule {
    /// Returns the failure phrase when `value` violates the rule.
    pub fn check(&self, value: &str) -> Option<String> {
        let ok = match self {
            Rule::Required => !value.trim().is_empty(),
            Rule::OneOf(allowed) => allowed.contains(&value),
            Rule::Min(min) => value.chars().count() >= *min,
            Rule::Max(max) => value.chars().count() <= *max,
            Rule::Email => is_email(value),
            Rule::Jwt => is_jwt(value),
            Rule::Lowercase => value.chars().any(|c| c.is_lowercase()),
            Rule::Uppercase => value.chars().any(|c| c.is_uppercase()),
            Rule::DigitRequired => value.chars().any(|c| c.is_ascii_digit()),
            Rule::SpecialSymbol => value
                .chars()
                .any(|c| c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace())),
            Rule::OnlyEnglish => value.chars().all(|c| c.is_ascii_graphic()),
            Rule::PrimitiveId => bson::oid::ObjectId::parse_str(value).is_ok(),
            Rule::Custom(predicate, _) => predicate(value),
        };
        if ok {
            return None;
        }

        Some(match self {
            Rule::Required => "field is required".to_string(),
            Rule::OneOf(allowed) => format!("field must be one of: {}", allowed.join(", ")),
            Rule::Min(min) => format!("field must be at least {min} characters long"),
            Rule::Max(max) => format!("field must be at most {max} characters long"),
            Rule::Email => "field must be a valid email address".to_string(),
            Rule::Jwt => "field must be a valid jwt token".to_string(),
            Rule::Lowercase => "field must contain at least one lowercase letter".to_string(),
            Rule::Uppercase => "field must contain at least one uppercase letter".to_string(),
            Rule::DigitRequired => "field must contain at least one digit".to_string(),
            Rule::SpecialSymbol => "field must contain at least one special symbol".to_string(),
            Rule::OnlyEnglish => "field must contain only english letters, digits and symbols".to_string(),
            Rule::PrimitiveId => "field must be a valid object id".to_string(),
            Rule::Custom(_, phrase) => phrase.to_string(),
        })
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

fn is_jwt(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 3
        && parts[..2].iter().all(|part| !part.is_empty())
        && parts.iter().all(|part| {
            part.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        })
}

/// Collects field-level failures for a request value.
///
/// Rules for a field run in order and stop at the first failure. A field that
/// is empty and not `Required` is skipped entirely.
#[derive(Debug, Default)]
pub struct Validator {
    messages: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: &str, rules: &[Rule]) -> Self {
        let required = rules.iter().any(|rule| matches!(rule, Rule::Required));
        if value.is_empty() && !required {
            return self;
        }
        if let Some(phrase) = rules.iter().find_map(|rule| rule.check(value)) {
            self.messages.push(format!("{name}: {phrase}"));
        }
        self
    }

    pub fn optional(self, name: &str, value: Option<&str>, rules: &[Rule]) -> Self {
        match value {
            Some(value) => self.field(name, value, rules),
            None => self,
        }
    }

    /// Applies `rules` to every element, reporting failures as `name[i]`.
    pub fn each(mut self, name: &str, values: &[String], rules: &[Rule]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self = self.field(&format!("{name}[{i}]"), value, rules);
        }
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.messages))
        }
    }
}

/// Implemented by every request and event type that carries user input.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Decodes a JSON request body. An empty body decodes as `T::default()`, so
/// that validation rather than the JSON parser reports the missing fields.
pub fn parse_json_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        ApiError::bad_request("malformed json body").with_developer_message(err.to_string())
    })
}
