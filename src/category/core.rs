use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use crate::UserID;

/// The database ID of a category.
pub type CategoryId = i64;

/// A user-owned spending bucket with a running balance, e.g., 'Groceries', 'Eating Out'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The id for the category.
    pub id: CategoryId,
    /// The display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// An identifier for the icon to display next to the category, e.g. an emoji.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// The display color, e.g. "#ff0000".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// The running balance.
    pub amount: f64,
    /// The user that created the category.
    pub owner: UserID,
}

/// The details needed to insert a category.
///
/// New categories always start with an amount of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The display name.
    pub name: Option<String>,
    /// The display icon.
    pub icon: Option<String>,
    /// The display color.
    pub color: Option<String>,
    /// The user creating the category.
    pub owner: UserID,
}

/// A partial update to a category.
///
/// Fields that are missing or `null` are left unchanged. Any field may be
/// overwritten, including `amount` and `owner`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryPatch {
    /// The new display name.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    /// The new display icon.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub icon: Option<String>,
    /// The new display color.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub color: Option<String>,
    /// The new running balance.
    pub amount: Option<f64>,
    /// The new owner.
    pub owner: Option<UserID>,
}

/// Deserialize an optional text field, storing numbers and booleans as their
/// JSON text, e.g. `5` becomes `"5"`.
///
/// Objects and arrays are rejected.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected text, a number or a boolean, got {other}"
        ))),
    }
}

impl Category {
    /// Merge `patch` into the category.
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(icon) = patch.icon {
            self.icon = Some(icon);
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
    }
}
