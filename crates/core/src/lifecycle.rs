use chrono::{DateTime, Utc};

/// Whether a record is live or sitting in the trash.
///
/// The store encodes this as a nullable `deletedAt` timestamp; in the model
/// the two states are explicit so trash/restore/purge transitions are
/// exhaustive instead of riding on field presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Trashed {
        at: DateTime<Utc>,
    },
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    pub fn is_trashed(self) -> bool {
        matches!(self, Lifecycle::Trashed { .. })
    }

    pub fn trashed_at(self) -> Option<DateTime<Utc>> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Trashed { at } => Some(at),
        }
    }
}

/// Serde adapter mapping `Lifecycle` onto the store's nullable `deletedAt`
/// field. Use with `#[serde(rename = "deletedAt", default, with = ...)]`.
pub mod as_deleted_at {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Lifecycle;

    pub fn serialize<S>(lifecycle: &Lifecycle, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match lifecycle {
            Lifecycle::Active => serializer.serialize_none(),
            Lifecycle::Trashed { at } => serializer.serialize_some(at),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Lifecycle, D::Error>
    where
        D: Deserializer<'de>,
    {
        let at: Option<DateTime<Utc>> = Option::deserialize(deserializer)?;
        Ok(match at {
            None => Lifecycle::Active,
            Some(at) => Lifecycle::Trashed { at },
        })
    }
}
