//! The baby profile store.
//!
//! [`BabyStore`] owns the in-memory list of profiles and the current-baby
//! selection. It is created by the caller and handed a [`BabyRepository`];
//! every mutation is written back through the repository as a full
//! replacement of the stored set.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::baby::BabyProfile;
use crate::error::{Error, Result};

/// Persistence for baby profiles.
pub trait BabyRepository {
    /// Load every stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Vec<BabyProfile>>;

    /// Replace the stored profiles with `babies`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, babies: &[BabyProfile]) -> Result<()>;
}

/// In-memory view of all baby profiles plus the current selection.
#[derive(Debug)]
pub struct BabyStore<R> {
    repository: R,
    babies: Vec<BabyProfile>,
    current: Option<i64>,
}

impl<R: BabyRepository> BabyStore<R> {
    /// Load profiles from `repository`. The first profile becomes current.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    pub fn load(repository: R) -> Result<Self> {
        let babies = repository.load()?;
        let current = babies.first().map(|b| b.id);
        debug!("Loaded {} baby profiles", babies.len());
        Ok(Self {
            repository,
            babies,
            current,
        })
    }

    /// The underlying repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// All profiles, in insertion order.
    #[must_use]
    pub fn babies(&self) -> &[BabyProfile] {
        &self.babies
    }

    /// Whether there are no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.babies.is_empty()
    }

    /// Look up a profile by id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&BabyProfile> {
        self.babies.iter().find(|b| b.id == id)
    }

    /// Look up a profile by numeric id or case-insensitive nickname.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BabyNotFound`] if nothing matches.
    pub fn find(&self, key: &str) -> Result<&BabyProfile> {
        let by_id = key.parse::<i64>().ok().and_then(|id| self.get(id));
        by_id
            .or_else(|| {
                self.babies
                    .iter()
                    .find(|b| b.nickname.eq_ignore_ascii_case(key) || b.nickname == key)
            })
            .ok_or_else(|| Error::baby_not_found(key))
    }

    /// The currently selected profile.
    #[must_use]
    pub fn current(&self) -> Option<&BabyProfile> {
        self.current.and_then(|id| self.get(id))
    }

    /// Select the profile with `id` as current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BabyNotFound`] if no profile has that id.
    pub fn select(&mut self, id: i64) -> Result<&BabyProfile> {
        if self.get(id).is_none() {
            return Err(Error::baby_not_found(id.to_string()));
        }
        self.current = Some(id);
        debug!("Selected baby {}", id);
        self.get(id).ok_or_else(|| Error::baby_not_found(id.to_string()))
    }

    /// Validate and add a new profile, returning its assigned id.
    ///
    /// The new profile becomes current if nothing was selected.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the repository write fails.
    pub fn add(&mut self, mut baby: BabyProfile, today: NaiveDate) -> Result<i64> {
        baby.validate(today)?;

        let id = self.babies.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        baby.id = id;
        let now = Utc::now();
        baby.created_at = now;
        baby.updated_at = now;

        let nickname = baby.nickname.clone();
        let mut babies = self.babies.clone();
        babies.push(baby);
        self.commit(babies, self.current.or(Some(id)))?;
        info!("Added baby '{}' with id {}", nickname, id);
        Ok(id)
    }

    /// Replace the profile that has the same id as `baby`.
    ///
    /// `created_at` is kept from the stored profile and `updated_at` is
    /// refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist, fails validation, or
    /// the repository write fails.
    pub fn update(&mut self, mut baby: BabyProfile, today: NaiveDate) -> Result<()> {
        baby.validate(today)?;

        let index = self
            .babies
            .iter()
            .position(|b| b.id == baby.id)
            .ok_or_else(|| Error::baby_not_found(baby.id.to_string()))?;

        baby.created_at = self.babies[index].created_at;
        baby.updated_at = Utc::now();
        info!("Updating baby '{}' ({})", baby.nickname, baby.id);

        let mut babies = self.babies.clone();
        babies[index] = baby;
        self.commit(babies, self.current)
    }

    /// Remove a profile and return it.
    ///
    /// If it was current, the first remaining profile becomes current.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist or the repository write
    /// fails.
    pub fn remove(&mut self, id: i64) -> Result<BabyProfile> {
        let index = self
            .babies
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::baby_not_found(id.to_string()))?;

        let mut babies = self.babies.clone();
        let removed = babies.remove(index);
        let current = if self.current == Some(id) {
            babies.first().map(|b| b.id)
        } else {
            self.current
        };

        self.commit(babies, current)?;
        info!("Removed baby '{}' ({})", removed.nickname, id);
        Ok(removed)
    }

    /// Save `babies` and adopt them only once the repository accepted them.
    fn commit(&mut self, babies: Vec<BabyProfile>, current: Option<i64>) -> Result<()> {
        self.repository.save(&babies)?;
        self.babies = babies;
        self.current = current;
        Ok(())
    }
}
