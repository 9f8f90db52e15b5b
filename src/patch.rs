use serde::{Deserialize, Deserializer};

/// One field of a partial update payload.
///
/// Use with `#[serde(default)]` so that an absent key deserializes to
/// [`Patch::Missing`] while an explicit `null` becomes [`Patch::Null`].
#[derive(Clone, Debug, PartialEq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|v| v.map_or(Patch::Null, Patch::Value))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("field `{0}` cannot be null")]
pub struct NullFieldError(pub &'static str);

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// For non-nullable columns: `Some(v)` when the field should be written.
    pub fn required(self, field: &'static str) -> Result<Option<T>, NullFieldError> {
        match self {
            Patch::Missing => Ok(None),
            Patch::Null => Err(NullFieldError(field)),
            Patch::Value(v) => Ok(Some(v)),
        }
    }

    /// For nullable columns: `Some(new_value)` when the field should be written.
    pub fn nullable(self) -> Option<Option<T>> {
        match self {
            Patch::Missing => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}
