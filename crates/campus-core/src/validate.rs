//! Field-rule validation for incoming payloads.
//!
//! Each resource kind declares a static table of [`FieldRule`]s. A payload is
//! checked against the table before it is decoded into a typed value, and
//! every failing field is reported, not just the first. Fields not named in
//! the table are ignored.

use std::fmt;

use chrono::DateTime;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

// ─── Rules ───────────────────────────────────────────────────────────────────

/// The shape a field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Integer,
  Boolean,
  /// An RFC 3339 timestamp string.
  Timestamp,
  /// A string drawn from a fixed set.
  OneOf(&'static [&'static str]),
}

impl fmt::Display for FieldKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text => f.write_str("text"),
      Self::Integer => f.write_str("an integer"),
      Self::Boolean => f.write_str("a boolean"),
      Self::Timestamp => f.write_str("an RFC 3339 timestamp"),
      Self::OneOf(options) => write!(f, "one of {}", options.join(", ")),
    }
  }
}

/// A single named field and its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
  pub name:     &'static str,
  pub kind:     FieldKind,
  /// Must be present on create. Required text must also be non-blank.
  pub required: bool,
  /// `null` is an accepted value (it clears the field on update).
  pub nullable: bool,
}

impl FieldRule {
  pub const fn required(name: &'static str, kind: FieldKind) -> Self {
    Self { name, kind, required: true, nullable: false }
  }

  pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
    Self { name, kind, required: false, nullable: false }
  }

  pub const fn nullable(self) -> Self { Self { nullable: true, ..self } }
}

/// Whether a payload creates a record or partially updates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Create,
  /// Every field is optional; present fields are still type-checked.
  Update,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// Every field that failed validation, in rule-table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
  errors: Vec<FieldError>,
}

impl ValidationErrors {
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      errors: vec![FieldError {
        field:   field.into(),
        message: message.into(),
      }],
    }
  }

  pub fn errors(&self) -> &[FieldError] { &self.errors }

  pub fn into_errors(self) -> Vec<FieldError> { self.errors }

  /// Whether `field` is among the failures.
  pub fn contains(&self, field: &str) -> bool {
    self.errors.iter().any(|e| e.field == field)
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("invalid payload")?;
    for (i, e) in self.errors.iter().enumerate() {
      let sep = if i == 0 { ": " } else { "; " };
      write!(f, "{sep}{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Checking ────────────────────────────────────────────────────────────────

/// Name reported when the payload as a whole is malformed.
pub const BODY_FIELD: &str = "body";

/// Check `payload` against `rules`, collecting every failure.
pub fn validate(
  rules: &[FieldRule],
  payload: &Value,
  mode: Mode,
) -> Result<(), ValidationErrors> {
  let Some(object) = payload.as_object() else {
    return Err(ValidationErrors::single(BODY_FIELD, "expected a JSON object"));
  };

  let errors: Vec<FieldError> = rules
    .iter()
    .filter_map(|rule| {
      check_field(rule, object.get(rule.name), mode).map(|message| FieldError {
        field: rule.name.to_owned(),
        message,
      })
    })
    .collect();

  if errors.is_empty() {
    Ok(())
  } else {
    Err(ValidationErrors { errors })
  }
}

fn check_field(rule: &FieldRule, value: Option<&Value>, mode: Mode) -> Option<String> {
  let value = match value {
    None if rule.required && mode == Mode::Create => return Some("required".to_owned()),
    None => return None,
    Some(v) => v,
  };

  if value.is_null() {
    return if rule.nullable {
      None
    } else if rule.required && mode == Mode::Create {
      Some("required".to_owned())
    } else {
      Some(format!("expected {}, received null", rule.kind))
    };
  }

  match rule.kind {
    FieldKind::Text => match value.as_str() {
      Some(s) if rule.required && s.trim().is_empty() => Some("must not be empty".to_owned()),
      Some(_) => None,
      None => Some(mismatch(rule.kind, value)),
    },
    FieldKind::Integer => value.as_i64().is_none().then(|| mismatch(rule.kind, value)),
    FieldKind::Boolean => (!value.is_boolean()).then(|| mismatch(rule.kind, value)),
    FieldKind::Timestamp => match value.as_str() {
      Some(s) if DateTime::parse_from_rfc3339(s).is_ok() => None,
      _ => Some(mismatch(rule.kind, value)),
    },
    FieldKind::OneOf(options) => match value.as_str() {
      Some(s) if options.contains(&s) => None,
      _ => Some(mismatch(rule.kind, value)),
    },
  }
}

fn mismatch(kind: FieldKind, value: &Value) -> String {
  format!("expected {kind}, received {value}")
}

/// Decode an already-validated payload into its typed form.
pub fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ValidationErrors> {
  serde_json::from_value(payload)
    .map_err(|e| ValidationErrors::single(BODY_FIELD, e.to_string()))
}

/// Convert text form values (as sent by `multipart/form-data`) into the JSON
/// types their rules expect. Blank values of optional fields are dropped.
///
/// Values that do not parse are left as text so validation reports them.
pub fn coerce_form_values(rules: &[FieldRule], fields: &mut Map<String, Value>) {
  for rule in rules {
    let Some(Value::String(text)) = fields.get(rule.name) else {
      continue;
    };
    let text = text.trim();

    if text.is_empty() && !rule.required {
      fields.remove(rule.name);
      continue;
    }

    let coerced = match rule.kind {
      FieldKind::Integer => text.parse::<i64>().ok().map(Value::from),
      FieldKind::Boolean => match text {
        "true" | "on" | "1" => Some(Value::Bool(true)),
        "false" | "off" | "0" => Some(Value::Bool(false)),
        _ => None,
      },
      FieldKind::Text | FieldKind::Timestamp | FieldKind::OneOf(_) => None,
    };

    if let Some(v) = coerced {
      fields.insert(rule.name.to_owned(), v);
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  const RULES: &[FieldRule] = &[
    FieldRule::required("title", FieldKind::Text),
    FieldRule::required("priority", FieldKind::Integer),
    FieldRule::optional("isActive", FieldKind::Boolean),
    FieldRule::required("importance", FieldKind::OneOf(&["high", "medium", "low"])),
    FieldRule::optional("link", FieldKind::Text).nullable(),
    FieldRule::optional("publishDate", FieldKind::Timestamp),
  ];

  fn valid() -> Value {
    json!({
      "title": "Welcome",
      "priority": 2,
      "importance": "high",
    })
  }

  #[test]
  fn accepts_valid_payload() {
    assert!(validate(RULES, &valid(), Mode::Create).is_ok());
  }

  #[test]
  fn reports_every_missing_required_field() {
    let err = validate(RULES, &json!({}), Mode::Create).unwrap_err();
    let fields: Vec<_> = err.errors().iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["title", "priority", "importance"]);
    assert!(err.errors().iter().all(|e| e.message == "required"));
  }

  #[test]
  fn update_mode_makes_everything_optional() {
    assert!(validate(RULES, &json!({}), Mode::Update).is_ok());
    assert!(validate(RULES, &json!({ "link": null }), Mode::Update).is_ok());
  }

  #[test]
  fn update_mode_still_checks_types() {
    let err = validate(RULES, &json!({ "priority": "high" }), Mode::Update).unwrap_err();
    assert!(err.contains("priority"));
    assert_eq!(err.errors().len(), 1);
  }

  #[test]
  fn rejects_value_outside_enum() {
    let mut payload = valid();
    payload["importance"] = json!("urgent");
    let err = validate(RULES, &payload, Mode::Create).unwrap_err();
    assert!(err.contains("importance"));
    assert!(err.errors()[0].message.contains("high, medium, low"));
  }

  #[test]
  fn rejects_blank_required_text() {
    let mut payload = valid();
    payload["title"] = json!("   ");
    let err = validate(RULES, &payload, Mode::Create).unwrap_err();
    assert_eq!(err.errors()[0].message, "must not be empty");
  }

  #[test]
  fn null_only_allowed_on_nullable_fields() {
    let mut payload = valid();
    payload["isActive"] = Value::Null;
    let err = validate(RULES, &payload, Mode::Create).unwrap_err();
    assert!(err.contains("isActive"));

    let mut payload = valid();
    payload["link"] = Value::Null;
    assert!(validate(RULES, &payload, Mode::Create).is_ok());
  }

  #[test]
  fn rejects_malformed_timestamp() {
    let mut payload = valid();
    payload["publishDate"] = json!("yesterday");
    assert!(validate(RULES, &payload, Mode::Create).unwrap_err().contains("publishDate"));

    payload["publishDate"] = json!("2024-06-01T09:30:00Z");
    assert!(validate(RULES, &payload, Mode::Create).is_ok());
  }

  #[test]
  fn rejects_non_object_body() {
    let err = validate(RULES, &json!([1, 2]), Mode::Create).unwrap_err();
    assert!(err.contains(BODY_FIELD));
  }

  #[test]
  fn display_lists_fields() {
    let err = validate(RULES, &json!({ "priority": 1, "importance": "low" }), Mode::Create)
      .unwrap_err();
    assert_eq!(err.to_string(), "invalid payload: title: required");
  }

  #[test]
  fn coerces_form_text() {
    let mut fields = Map::new();
    fields.insert("title".into(), json!("Welcome"));
    fields.insert("priority".into(), json!("3"));
    fields.insert("isActive".into(), json!("false"));
    fields.insert("link".into(), json!(""));

    coerce_form_values(RULES, &mut fields);

    assert_eq!(fields["title"], json!("Welcome"));
    assert_eq!(fields["priority"], json!(3));
    assert_eq!(fields["isActive"], json!(false));
    assert!(!fields.contains_key("link"));
  }

  #[test]
  fn leaves_unparseable_form_text_for_validation() {
    let mut fields = Map::new();
    fields.insert("priority".into(), json!("two"));
    coerce_form_values(RULES, &mut fields);
    assert_eq!(fields["priority"], json!("two"));
  }
}
