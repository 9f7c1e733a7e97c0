use std::collections::BTreeMap;

use futures_util::future::join_all;
use log::warn;

use crate::{CatalogError, ExerciseDetails, ExerciseID, MuscleID, Role};

/// Read-only source of exercise reference data.
#[allow(async_fn_in_trait)]
pub trait ExerciseCatalog {
    async fn exercise(&self, id: ExerciseID) -> Result<ExerciseDetails, CatalogError>;
    async fn find_by_key(&self, key: &str) -> Result<ExerciseDetails, CatalogError>;

    /// Role of each involved muscle per exercise. Exercises whose lookup fails are
    /// left out.
    async fn muscle_roles(
        &self,
        ids: &[ExerciseID],
    ) -> BTreeMap<ExerciseID, BTreeMap<MuscleID, Role>> {
        let results = join_all(ids.iter().map(|id| self.exercise(*id))).await;
        ids.iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(details) => Some((*id, details.muscle_roles())),
                Err(err) => {
                    warn!("failed to get muscles of exercise {id}: {err}");
                    None
                }
            })
            .collect()
    }
}

/// Catalog held entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    exercises: BTreeMap<ExerciseID, ExerciseDetails>,
    keys: BTreeMap<String, ExerciseID>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(exercises: impl IntoIterator<Item = ExerciseDetails>) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id, e)).collect(),
            keys: BTreeMap::new(),
        }
    }

    /// Makes the exercise findable by a template key.
    #[must_use]
    pub fn with_key(mut self, key: &str, id: ExerciseID) -> Self {
        self.keys.insert(key.to_string(), id);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl ExerciseCatalog for StaticCatalog {
    async fn exercise(&self, id: ExerciseID) -> Result<ExerciseDetails, CatalogError> {
        self.exercises
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn find_by_key(&self, key: &str) -> Result<ExerciseDetails, CatalogError> {
        let id = self
            .keys
            .get(key)
            .ok_or_else(|| CatalogError::UnknownKey(key.to_string()))?;
        self.exercise(*id).await
    }
}
