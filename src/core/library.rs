use crate::domain::model::AngleVector;
use crate::domain::ports::PostureRepository;
use crate::utils::error::Result;
use crate::utils::validation::validate_posture_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registered postures by name. Iterates in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostureStore {
    postures: BTreeMap<String, AngleVector>,
}

impl PostureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vector previously stored under `name`, if any.
    pub fn insert(&mut self, name: String, angles: AngleVector) -> Option<AngleVector> {
        self.postures.insert(name, angles)
    }

    pub fn get(&self, name: &str) -> Option<&AngleVector> {
        self.postures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.postures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.postures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postures.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.postures.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AngleVector)> {
        self.postures.iter().map(|(name, angles)| (name.as_str(), angles))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Inserted,
    Replaced,
}

/// The posture store together with the repository that persists it.
///
/// Every registration writes the whole store before the in-memory copy is
/// updated, so a failed save leaves the library as it was.
pub struct PostureLibrary<R: PostureRepository> {
    store: PostureStore,
    repository: R,
}

impl<R: PostureRepository> PostureLibrary<R> {
    /// Load the store from `repository`; nothing saved yet means an empty library.
    pub async fn open(repository: R) -> Result<Self> {
        let store = match repository.load().await? {
            Some(store) => {
                tracing::info!(
                    "📂 Loaded {} postures from {}",
                    store.len(),
                    repository.location()
                );
                store
            }
            None => {
                tracing::warn!(
                    "⚠️ No saved postures found at {}; register some first",
                    repository.location()
                );
                PostureStore::new()
            }
        };

        Ok(Self { store, repository })
    }

    pub fn with_store(store: PostureStore, repository: R) -> Self {
        Self { store, repository }
    }

    pub fn store(&self) -> &PostureStore {
        &self.store
    }

    /// Store `angles` under `name` (trimmed) and persist the full store.
    pub async fn register(&mut self, name: &str, angles: AngleVector) -> Result<RegisterOutcome> {
        let name = validate_posture_name(name)?;

        let mut next = self.store.clone();
        let outcome = match next.insert(name.to_string(), angles) {
            Some(_) => RegisterOutcome::Replaced,
            None => RegisterOutcome::Inserted,
        };

        self.repository.save(&next).await?;
        self.store = next;

        tracing::info!(
            "✅ Registered posture '{}' ({:?}); {} postures saved to {}",
            name,
            outcome,
            self.store.len(),
            self.repository.location()
        );
        Ok(outcome)
    }
}
