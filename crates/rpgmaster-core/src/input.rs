//! Validation of master-client input for the turn tracker.
//!
//! The browser clients are loose about types: hit points arrive as JSON
//! numbers or as the text of an `<input>`, and older clients send the
//! long field names (`health_points`, `type_character`, `monster_slug`).
//! The request types here accept all of that, and the `validate` step
//! turns them into strict values or a [`ValidationError`] before anything
//! touches storage.

use rpgmaster_types::Category;
use serde::Deserialize;

/// Input rejected before any state was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent (or blank).
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field could not be read as an integer.
    #[error("field `{field}` is not an integer: {value}")]
    NotAnInteger {
        /// The offending field.
        field: &'static str,
        /// The value as received.
        value: String,
    },

    /// A content slug that could escape the content directory.
    #[error("invalid content slug: {0}")]
    InvalidSlug(String),
}

/// A numeric field as sent by a client: a JSON number or its text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// A JSON number.
    Number(serde_json::Number),
    /// A string holding the number.
    Text(String),
}

impl NumericInput {
    /// Read the value as an `i64`.
    ///
    /// Blank text reads as 0. Fractions and non-numeric text are rejected.
    pub fn to_i64(&self, field: &'static str) -> Result<i64, ValidationError> {
        let parsed = match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(text) if text.trim().is_empty() => Some(0),
            Self::Text(text) => text.trim().parse().ok(),
        };

        parsed.ok_or_else(|| ValidationError::NotAnInteger {
            field,
            value: match self {
                Self::Number(n) => n.to_string(),
                Self::Text(text) => text.clone(),
            },
        })
    }
}

/// Read an optional numeric field, treating absence and `null` as 0.
fn optional_int(
    value: Option<&NumericInput>,
    field: &'static str,
) -> Result<i64, ValidationError> {
    value.map_or(Ok(0), |v| v.to_i64(field))
}

/// Trim a free-text field and drop it when nothing is left.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Add combatant
// ---------------------------------------------------------------------------

/// Raw body of an add-combatant request.
///
/// Short and long field names are both accepted; when a client sends both
/// the short one wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddCombatantRequest {
    /// Display name (required).
    #[serde(default)]
    pub name: Option<String>,
    /// Initiative score.
    #[serde(default)]
    pub initiative: Option<NumericInput>,
    /// Current hit points.
    #[serde(default)]
    pub hp: Option<NumericInput>,
    /// Long form of `hp`.
    #[serde(default)]
    pub health_points: Option<NumericInput>,
    /// Maximum hit points.
    #[serde(default)]
    pub max_hp: Option<NumericInput>,
    /// Long form of `max_hp`.
    #[serde(default)]
    pub max_health_points: Option<NumericInput>,
    /// Category tag.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Long form of `type`.
    #[serde(default)]
    pub type_character: Option<String>,
    /// Alternative name for `type`.
    #[serde(default)]
    pub category: Option<String>,
    /// Content-library slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Long form of `slug`.
    #[serde(default)]
    pub monster_slug: Option<String>,
}

/// A validated combatant ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCombatant {
    /// Display name as sent, non-empty.
    pub name: String,
    /// Initiative score.
    pub initiative: i64,
    /// Current hit points.
    pub hp: i64,
    /// Maximum hit points.
    pub max_hp: i64,
    /// Category tag (defaults to player).
    pub category: Category,
    /// Content-library slug, if any.
    pub content_ref: Option<String>,
}

impl NewCombatant {
    /// A combatant with only a name; every other field takes its default.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            initiative: 0,
            hp: 0,
            max_hp: 0,
            category: Category::Player,
            content_ref: None,
        }
    }

    /// Set the initiative score.
    #[must_use]
    pub const fn with_initiative(mut self, initiative: i64) -> Self {
        self.initiative = initiative;
        self
    }

    /// Set current and maximum hit points.
    #[must_use]
    pub const fn with_hp(mut self, hp: i64, max_hp: i64) -> Self {
        self.hp = hp;
        self.max_hp = max_hp;
        self
    }

    /// Set the category tag.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the content-library slug.
    #[must_use]
    pub fn with_content_ref(mut self, slug: &str) -> Self {
        self.content_ref = Some(slug.to_owned());
        self
    }
}

impl AddCombatantRequest {
    /// Validate the request into a [`NewCombatant`].
    pub fn validate(&self) -> Result<NewCombatant, ValidationError> {
        let name = self
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingField("name"))?;

        let initiative = optional_int(self.initiative.as_ref(), "initiative")?;
        let hp = optional_int(self.hp.as_ref().or(self.health_points.as_ref()), "hp")?;
        let max_hp = optional_int(
            self.max_hp.as_ref().or(self.max_health_points.as_ref()),
            "max_hp",
        )?;

        let category = non_blank(
            self.kind
                .as_deref()
                .or(self.type_character.as_deref())
                .or(self.category.as_deref()),
        )
        .map_or(Category::Player, Category::from);

        let content_ref = non_blank(self.slug.as_deref().or(self.monster_slug.as_deref()));

        Ok(NewCombatant {
            name,
            initiative,
            hp,
            max_hp,
            category,
            content_ref,
        })
    }
}

// ---------------------------------------------------------------------------
// Set hit points
// ---------------------------------------------------------------------------

/// Raw body of a set-hit-points request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetHpRequest {
    /// New current hit points (required).
    #[serde(default)]
    pub hp: Option<NumericInput>,
}

impl SetHpRequest {
    /// Validate the request into the new hit point value.
    pub fn validate(&self) -> Result<i64, ValidationError> {
        self.hp
            .as_ref()
            .ok_or(ValidationError::MissingField("hp"))?
            .to_i64("hp")
    }
}

// ---------------------------------------------------------------------------
// Whiteboard
// ---------------------------------------------------------------------------

/// Whether a JSON value counts as set.
///
/// `null`, `false`, `0`, the empty string, and empty arrays and objects
/// are falsy; everything else is truthy.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Bool(true) => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() >= f64::EPSILON),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Accept a whiteboard state unless it is falsy (see [`is_truthy`]).
pub fn validate_whiteboard_state(
    state: Option<serde_json::Value>,
) -> Result<serde_json::Value, ValidationError> {
    state
        .filter(is_truthy)
        .ok_or(ValidationError::MissingField("state"))
}

// ---------------------------------------------------------------------------
// Content slugs
// ---------------------------------------------------------------------------

/// Check that a content slug names a file directly inside its directory.
pub fn validate_slug(slug: &str) -> Result<&str, ValidationError> {
    let escapes = slug.is_empty()
        || slug.contains(['/', '\\'])
        || slug.contains("..")
        || slug.starts_with('.');

    if escapes {
        Err(ValidationError::InvalidSlug(slug.to_owned()))
    } else {
        Ok(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_add(json: &str) -> AddCombatantRequest {
        serde_json::from_str(json).unwrap_or_default()
    }

    #[test]
    fn minimal_request_uses_defaults() {
        let new = parse_add(r#"{"name": "Aragorn"}"#).validate();
        assert_eq!(new, Ok(NewCombatant::named("Aragorn")));
    }

    #[test]
    fn missing_or_empty_name_is_rejected() {
        assert_eq!(
            parse_add("{}").validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            parse_add(r#"{"name": ""}"#).validate(),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn name_is_stored_as_sent() {
        let padded = parse_add(r#"{"name": "  Boromir "}"#).validate();
        assert_eq!(padded.map(|n| n.name), Ok("  Boromir ".to_owned()));

        let spaces = parse_add(r#"{"name": "   "}"#).validate();
        assert_eq!(spaces.map(|n| n.name), Ok("   ".to_owned()));
    }

    #[test]
    fn numeric_text_is_accepted() {
        let new = parse_add(r#"{"name": "Gimli", "initiative": "7", "hp": " 30 ", "max_hp": 42}"#)
            .validate();
        let expected = NewCombatant::named("Gimli").with_initiative(7).with_hp(30, 42);
        assert_eq!(new, Ok(expected));
    }

    #[test]
    fn blank_and_null_numbers_read_as_zero() {
        let new = parse_add(r#"{"name": "Sam", "hp": "", "max_hp": null}"#).validate();
        assert_eq!(new.map(|n| (n.hp, n.max_hp)), Ok((0, 0)));
    }

    #[test]
    fn non_integer_values_are_rejected() {
        let err = parse_add(r#"{"name": "Pip", "initiative": "fast"}"#).validate();
        assert!(matches!(
            err,
            Err(ValidationError::NotAnInteger { field: "initiative", .. })
        ));

        let err = parse_add(r#"{"name": "Pip", "hp": 2.5}"#).validate();
        assert!(matches!(err, Err(ValidationError::NotAnInteger { field: "hp", .. })));
    }

    #[test]
    fn long_field_names_are_accepted() {
        let new = parse_add(
            r#"{"name": "Goblin", "health_points": 7, "max_health_points": 9,
                "type_character": "monster", "monster_slug": "goblin"}"#,
        )
        .validate();
        let expected = NewCombatant::named("Goblin")
            .with_hp(7, 9)
            .with_category(Category::Monster)
            .with_content_ref("goblin");
        assert_eq!(new, Ok(expected));
    }

    #[test]
    fn short_field_names_win_over_long_ones() {
        let new = parse_add(r#"{"name": "X", "hp": 1, "health_points": 99, "type": "monster", "type_character": "player"}"#)
            .validate();
        assert_eq!(new.map(|n| (n.hp, n.category)), Ok((1, Category::Monster)));
    }

    #[test]
    fn set_hp_requires_the_field() {
        let missing: SetHpRequest = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(missing.validate(), Err(ValidationError::MissingField("hp")));

        let negative: SetHpRequest = serde_json::from_str(r#"{"hp": -4}"#).unwrap_or_default();
        assert_eq!(negative.validate(), Ok(-4));
    }

    #[test]
    fn truthiness_follows_json_emptiness() {
        use serde_json::json;

        let falsy = [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})];
        for falsy in falsy {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        let truthy = [json!(true), json!(1), json!(-2.5), json!("no"), json!([0]), json!({"a": null})];
        for truthy in truthy {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn blank_whiteboard_states_are_rejected() {
        use serde_json::json;

        for blank in [json!(null), json!(""), json!({}), json!([]), json!(false), json!(0)] {
            assert_eq!(
                validate_whiteboard_state(Some(blank)),
                Err(ValidationError::MissingField("state"))
            );
        }
        assert!(validate_whiteboard_state(None).is_err());

        let drawing = json!({"objects": [{"type": "path"}]});
        assert_eq!(validate_whiteboard_state(Some(drawing.clone())), Ok(drawing));
        assert_eq!(validate_whiteboard_state(Some(json!("x"))), Ok(json!("x")));
    }

    #[test]
    fn slugs_cannot_escape_their_directory() {
        assert!(validate_slug("goblin").is_ok());
        assert!(validate_slug("ancient-red-dragon").is_ok());
        assert!(validate_slug("../secrets").is_err());
        assert!(validate_slug("a/b").is_err());
        assert!(validate_slug(".hidden").is_err());
        assert!(validate_slug("").is_err());
    }
}
