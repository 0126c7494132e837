use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{
        Gift, Id, Person, Priority,
        validation::{self, Field, RequiredText, ValidationError},
    },
    storage::PersistenceError,
};

/// Everything written to a data or backup file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppData {
    /// Every person and their gifts.
    pub people: Vec<Person>,
    /// The dark-mode preference at the time of writing.
    pub dark_mode: bool,
}

impl AppData {
    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let record = AppDataRecord {
            people: self.people.iter().map(PersonRecord::from).collect(),
            dark_mode: self.dark_mode,
        };
        serde_json::to_string_pretty(&record)
    }

    /// Decode a data file.
    ///
    /// Fields added in later versions of the format may be missing and take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, its shape is wrong, or
    /// a record in it is invalid.
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let record: AppDataRecord = serde_json::from_str(text)?;
        Ok(Self {
            people: people_from_records(record.people)?,
            dark_mode: record.dark_mode,
        })
    }
}

/// A backup file could not be imported.
///
/// The store is not changed when this happens.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),
    /// The file is not JSON, or a person or gift in it is malformed.
    #[error("invalid data format: {0}")]
    Json(#[from] serde_json::Error),
    /// The file has no `people` list.
    #[error("invalid data format: missing 'people' list")]
    MissingPeople,
    /// A person or gift breaks a field rule, such as a malformed link.
    #[error("invalid record {id}: {source}")]
    Invalid {
        /// The offending record.
        id: Id,
        /// The rule it breaks.
        source: ValidationError,
    },
    /// Two people, or two gifts of one person, share an id.
    #[error("duplicate id '{0}'")]
    DuplicateId(Id),
}

/// File name of a backup taken on `date`: `giftwise-backup-YYYY-MM-DD.json`.
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("giftwise-backup-{date}.json")
}

/// Write a backup of `data` into `dir`, named for `date`.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export(data: &AppData, dir: &Path, date: NaiveDate) -> Result<PathBuf, PersistenceError> {
    let path = dir.join(backup_file_name(date));
    fs::create_dir_all(dir)?;
    fs::write(&path, data.to_json()?)?;
    tracing::info!("Exported {} people to {}", data.people.len(), path.display());
    Ok(path)
}

/// Read the people from a backup file.
///
/// # Errors
///
/// Returns an error if the file can't be read, isn't JSON, or has no valid
/// `people` list.
pub fn import(path: &Path) -> Result<Vec<Person>, ImportError> {
    let text = fs::read_to_string(path)?;
    import_str(&text)
}

/// Read the people from the text of a backup file.
///
/// # Errors
///
/// Returns an error if the text isn't JSON or has no valid `people` list.
pub fn import_str(text: &str) -> Result<Vec<Person>, ImportError> {
    let mut value: Value = serde_json::from_str(text)?;
    let people = match value.get_mut("people") {
        Some(people) if people.is_array() => people.take(),
        _ => return Err(ImportError::MissingPeople),
    };
    let records: Vec<PersonRecord> = serde_json::from_value(people)?;
    people_from_records(records)
}

/// Convert records, rejecting ids that are not unique.
///
/// Person ids must be unique across the file; gift ids within their owner.
fn people_from_records(records: Vec<PersonRecord>) -> Result<Vec<Person>, ImportError> {
    let mut person_ids = HashSet::new();
    let people = records
        .into_iter()
        .map(Person::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    for person in &people {
        if !person_ids.insert(&person.id) {
            return Err(ImportError::DuplicateId(person.id.clone()));
        }
        let mut gift_ids = HashSet::new();
        if let Some(gift) = person.gifts.iter().find(|gift| !gift_ids.insert(&gift.id)) {
            return Err(ImportError::DuplicateId(gift.id.clone()));
        }
    }
    Ok(people)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppDataRecord {
    #[serde(default)]
    people: Vec<PersonRecord>,
    #[serde(default)]
    dark_mode: bool,
}

/// A person as written to disk.
///
/// Everything except the identity and name is optional so that files from
/// older versions still load.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonRecord {
    id: Id,
    name: RequiredText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gifts: Option<Vec<GiftRecord>>,
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.clone(),
            name: person.name.clone(),
            notes: Some(person.notes.clone()),
            budget: Some(person.budget),
            gifts: Some(person.gifts.iter().map(GiftRecord::from).collect()),
        }
    }
}

impl TryFrom<PersonRecord> for Person {
    type Error = ImportError;

    fn try_from(record: PersonRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            budget: non_negative(record.budget, "budget", &record.id),
            gifts: record
                .gifts
                .unwrap_or_default()
                .into_iter()
                .map(Gift::try_from)
                .collect::<Result<_, _>>()?,
            id: record.id,
            name: record.name,
            notes: record.notes.unwrap_or_default(),
        })
    }
}

/// A gift as written to disk.
///
/// `priority`, `tags`, `imageUrl` and `dueDate` were added after the first
/// release and default when absent.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftRecord {
    id: Id,
    title: RequiredText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purchased: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<PriorityRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
}

impl From<&Gift> for GiftRecord {
    fn from(gift: &Gift) -> Self {
        Self {
            id: gift.id.clone(),
            title: gift.title.clone(),
            price: Some(gift.price),
            purchased: Some(gift.purchased),
            url: Some(gift.url.clone()),
            priority: Some(gift.priority.into()),
            tags: Some(gift.tags.clone()),
            image_url: Some(gift.image_url.clone()),
            due_date: gift.due_date.map(|date| date.to_string()),
        }
    }
}

impl TryFrom<GiftRecord> for Gift {
    type Error = ImportError;

    fn try_from(record: GiftRecord) -> Result<Self, Self::Error> {
        let invalid = |source| ImportError::Invalid {
            id: record.id.clone(),
            source,
        };
        let url = validation::optional_url(Field::Url, &record.url.unwrap_or_default())
            .map_err(invalid)?;
        let image_url =
            validation::optional_url(Field::ImageUrl, &record.image_url.unwrap_or_default())
                .map_err(invalid)?;

        Ok(Self {
            price: non_negative(record.price, "price", &record.id),
            due_date: record
                .due_date
                .as_deref()
                .and_then(|text| parse_due_date(text, &record.id)),
            id: record.id,
            title: record.title,
            purchased: record.purchased.unwrap_or_default(),
            url,
            priority: record.priority.map_or_else(Priority::default, Priority::from),
            tags: record.tags.unwrap_or_default(),
            image_url,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PriorityRecord {
    Low,
    Medium,
    High,
}

impl From<Priority> for PriorityRecord {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => Self::Low,
            Priority::Medium => Self::Medium,
            Priority::High => Self::High,
        }
    }
}

impl From<PriorityRecord> for Priority {
    fn from(record: PriorityRecord) -> Self {
        match record {
            PriorityRecord::Low => Self::Low,
            PriorityRecord::Medium => Self::Medium,
            PriorityRecord::High => Self::High,
        }
    }
}

/// Amounts on disk should never be negative; treat bad values as zero.
fn non_negative(amount: Option<f64>, field: &str, id: &Id) -> f64 {
    match amount {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        None => 0.0,
        Some(value) => {
            tracing::warn!("Ignoring invalid {field} {value} on {id}");
            0.0
        }
    }
}

/// Accepts `YYYY-MM-DD`, or a full timestamp whose date part is used.
/// An empty string means no due date.
fn parse_due_date(text: &str, id: &Id) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|datetime| datetime.date())
        });

    if parsed.is_none() {
        tracing::warn!("Ignoring unreadable due date '{text}' on gift {id}");
    }
    parsed
}
