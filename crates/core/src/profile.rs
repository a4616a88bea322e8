//! User profiles and vaccination history.
//!
//! [`FileProfileStore`] keeps one directory per user under a sharded layout:
//! `<data_dir>/profiles/<s1>/<s2>/<32hex-id>/` holding `profile.json` and `vaccinations.json`,
//! where `s1`/`s2` are the first four hex characters of the user id.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use aarogya_types::Language;
use aarogya_uuid::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{PROFILE_JSON_FILENAME, VACCINATIONS_JSON_FILENAME};
use crate::{CoreError, CoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(CoreError::InvalidInput(format!("unknown gender '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub is_diabetic: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// A fresh profile with only the account details filled in.
    pub fn new(id: UserId, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            phone: None,
            blood_group: None,
            is_diabetic: false,
            address: None,
            gender: None,
            age: None,
            emergency_contact: None,
            allergies: Vec::new(),
            chronic_conditions: Vec::new(),
            preferred_language: Language::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaccineStatus {
    Completed,
    Upcoming,
    Overdue,
}

impl FromStr for VaccineStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "upcoming" => Ok(Self::Upcoming),
            "overdue" => Ok(Self::Overdue),
            other => Err(CoreError::InvalidInput(format!(
                "unknown vaccination status '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaccineRecord {
    pub id: Uuid,
    pub vaccine_name: String,
    pub date_administered: NaiveDate,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    pub status: VaccineStatus,
}

/// Input for [`ProfileStore::add_vaccination_record`]; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewVaccineRecord {
    pub vaccine_name: String,
    pub date_administered: NaiveDate,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    pub status: VaccineStatus,
}

/// Persistence for profiles and vaccination history.
pub trait ProfileStore: Send + Sync {
    /// Insert or replace a profile. `created_at` of an existing profile is kept and
    /// `updated_at` is set to now.
    fn upsert_profile(&self, profile: UserProfile) -> CoreResult<UserProfile>;
    fn fetch_profile(&self, id: &UserId) -> CoreResult<Option<UserProfile>>;
    /// Records for `id`, most recently administered first.
    fn list_vaccination_records(&self, id: &UserId) -> CoreResult<Vec<VaccineRecord>>;
    fn add_vaccination_record(
        &self,
        id: &UserId,
        record: NewVaccineRecord,
    ) -> CoreResult<VaccineRecord>;
}

/// JSON files in a sharded directory tree.
///
/// Files are replaced by renaming a freshly written sibling, so readers never see a
/// partial file. Read-modify-write sequences run under `write_lock`, shared by clones.
#[derive(Clone, Debug)]
pub struct FileProfileStore {
    profiles_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileProfileStore {
    pub fn new(profiles_dir: impl Into<PathBuf>) -> Self {
        Self {
            profiles_dir: profiles_dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    fn user_dir(&self, id: &UserId) -> PathBuf {
        id.sharded_dir(&self.profiles_dir)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<Option<T>> {
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(CoreError::FileRead)?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(CoreError::Deserialization)
    }

    fn write_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> CoreResult<()> {
        fs::create_dir_all(dir).map_err(CoreError::StorageDirCreation)?;
        let json = serde_json::to_string_pretty(value).map_err(CoreError::Serialization)?;
        let tmp = dir.join(format!(".{filename}.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, json).map_err(CoreError::FileWrite)?;
        fs::rename(&tmp, dir.join(filename)).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CoreError::FileWrite(e)
        })
    }
}

impl ProfileStore for FileProfileStore {
    fn upsert_profile(&self, mut profile: UserProfile) -> CoreResult<UserProfile> {
        if profile.full_name.trim().is_empty() {
            return Err(CoreError::InvalidInput("full_name is required".into()));
        }

        let _guard = self.write_lock.lock();
        let dir = self.user_dir(&profile.id);
        if let Some(existing) =
            Self::read_json::<UserProfile>(&dir.join(PROFILE_JSON_FILENAME))?
        {
            profile.created_at = existing.created_at;
        }
        profile.updated_at = Utc::now();

        Self::write_json(&dir, PROFILE_JSON_FILENAME, &profile)?;
        tracing::debug!(user_id = %profile.id, "profile saved");
        Ok(profile)
    }

    fn fetch_profile(&self, id: &UserId) -> CoreResult<Option<UserProfile>> {
        Self::read_json(&self.user_dir(id).join(PROFILE_JSON_FILENAME))
    }

    fn list_vaccination_records(&self, id: &UserId) -> CoreResult<Vec<VaccineRecord>> {
        let mut records: Vec<VaccineRecord> =
            Self::read_json(&self.user_dir(id).join(VACCINATIONS_JSON_FILENAME))?
                .unwrap_or_default();
        records.sort_by(|a, b| b.date_administered.cmp(&a.date_administered));
        Ok(records)
    }

    fn add_vaccination_record(
        &self,
        id: &UserId,
        record: NewVaccineRecord,
    ) -> CoreResult<VaccineRecord> {
        if record.vaccine_name.trim().is_empty() {
            return Err(CoreError::InvalidInput("vaccine_name is required".into()));
        }
        let _guard = self.write_lock.lock();
        let dir = self.user_dir(id);
        if !dir.join(PROFILE_JSON_FILENAME).is_file() {
            return Err(CoreError::ProfileNotFound(id.to_string()));
        }

        let mut records = self.list_vaccination_records(id)?;
        let record = VaccineRecord {
            id: Uuid::new_v4(),
            vaccine_name: record.vaccine_name.trim().to_string(),
            date_administered: record.date_administered,
            next_due_date: record.next_due_date,
            status: record.status,
        };
        records.push(record.clone());

        Self::write_json(&dir, VACCINATIONS_JSON_FILENAME, &records)?;
        Ok(record)
    }
}
