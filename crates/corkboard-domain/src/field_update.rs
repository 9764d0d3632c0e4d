use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Three-state partial update for an optional field: leave it alone, set it,
/// or clear it. On the wire an absent field is `NoChange` and an explicit
/// `null` is `Clear`, which plain `Option` cannot distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    NoChange,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::NoChange
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Self::NoChange => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        }
    }
}

/// Deserializes from the field's wire value; combined with `#[serde(default)]`
/// an absent field stays `NoChange` while `null` becomes `Clear`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::NoChange | Self::Clear => serializer.serialize_none(),
        }
    }
}
