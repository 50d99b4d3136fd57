//! Directive argument validation.
//!
//! Raw `key=value` tokens are checked against a static [`ParameterSchema`].
//! Every problem found in one pass is returned together so the page author
//! sees all of them in a single error box.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::trace;

/// Services accepted by the `service` parameter.
///
/// `azubu`, `hitbox` and `mixer` are retired platforms; they validate but have
/// no adapter and resolve to [`ValidationError::ProviderUnavailable`].
pub const SERVICES: &[&str] = &["azubu", "hitbox", "mixer", "twitch", "youtube"];

pub const DEFAULT_TEMPLATE: &str = "block";

/// One recognized directive parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
    /// Closed set of accepted values, `None` for free-form parameters.
    pub values: Option<&'static [&'static str]>,
}

/// The fixed set of parameters a directive understands.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSchema {
    specs: &'static [ParameterSpec],
}

/// Schema shared by `#streamer` and `#streamerinfo`.
pub static STREAMER_SCHEMA: ParameterSchema = ParameterSchema::new(&[
    ParameterSpec {
        name: "service",
        required: true,
        default: None,
        values: Some(SERVICES),
    },
    ParameterSpec {
        name: "user",
        required: true,
        default: None,
        values: None,
    },
    // Built-in template names or a free-form override, resolved by the renderer.
    ParameterSpec {
        name: "template",
        required: false,
        default: Some(DEFAULT_TEMPLATE),
        values: None,
    },
    ParameterSpec {
        name: "link",
        required: false,
        default: None,
        values: None,
    },
]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The parameter \"{name}\" is required.")]
    MissingRequired { name: String },

    #[error("The parameter \"{name}\" is not a valid parameter.")]
    UnknownParameter { name: String },

    #[error("The option \"{value}\" is not valid for the parameter \"{name}\".")]
    InvalidValue { name: String, value: String },

    #[error("The user \"{user}\" is not valid for the service \"{service}\" or could not be found.")]
    InvalidUser { service: String, user: String },

    #[error("No provider is available for the service \"{service}\".")]
    ProviderUnavailable { service: String },
}

/// Parameter values that passed validation, defaults filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedParameters {
    values: BTreeMap<String, String>,
}

impl ValidatedParameters {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of the required `service` parameter.
    pub fn service(&self) -> &str {
        self.get("service").unwrap_or_default()
    }

    /// Value of the required `user` parameter.
    pub fn user(&self) -> &str {
        self.get("user").unwrap_or_default()
    }

    pub fn template(&self) -> &str {
        self.get("template").unwrap_or(DEFAULT_TEMPLATE)
    }

    pub fn link(&self) -> Option<&str> {
        self.get("link")
    }
}

/// Split a raw token into trimmed key and value.
///
/// Tokens without `=`, or with `=` as their first or last character, are
/// malformed and skipped without an error.
fn split_token(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.trim();
    let equals = raw.find('=')?;
    if equals == 0 || equals == raw.len() - 1 {
        return None;
    }
    let (key, value) = raw.split_at(equals);
    Some((key.trim(), value[1..].trim()))
}

impl ParameterSchema {
    pub const fn new(specs: &'static [ParameterSpec]) -> Self {
        Self { specs }
    }

    pub fn spec(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Validate raw `key=value` tokens.
    ///
    /// A repeated key keeps its last accepted value. A required key whose only
    /// values were rejected is also reported as missing.
    pub fn validate<I, S>(&self, raw: I) -> Result<ValidatedParameters, Vec<ValidationError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        let mut errors = Vec::new();
        let mut unknown = BTreeSet::new();

        for token in raw {
            let Some((key, value)) = split_token(token.as_ref()) else {
                trace!(token = token.as_ref(), "skipping malformed parameter");
                continue;
            };

            let Some(spec) = self.spec(key) else {
                if unknown.insert(key.to_owned()) {
                    errors.push(ValidationError::UnknownParameter {
                        name: key.to_owned(),
                    });
                }
                continue;
            };

            if let Some(allowed) = spec.values
                && !allowed.contains(&value)
            {
                errors.push(ValidationError::InvalidValue {
                    name: spec.name.to_owned(),
                    value: value.to_owned(),
                });
                continue;
            }

            values.insert(spec.name.to_owned(), value.to_owned());
        }

        for spec in self.specs {
            if values.contains_key(spec.name) {
                continue;
            }
            if spec.required {
                errors.push(ValidationError::MissingRequired {
                    name: spec.name.to_owned(),
                });
            } else if let Some(default) = spec.default {
                values.insert(spec.name.to_owned(), default.to_owned());
            }
        }

        if errors.is_empty() {
            Ok(ValidatedParameters { values })
        } else {
            Err(errors)
        }
    }
}
