use std::collections::BTreeMap;

use futures_util::future::join_all;
use log::warn;
use uuid::Uuid;

use crate::{
    ExerciseCatalog, ExerciseDetails, ExerciseRef, ExerciseType, Routine, RoutineExercise,
    RoutineSet,
};

/// Definition used for template keys the catalog cannot resolve.
pub struct FallbackExercise {
    pub name: &'static str,
    pub exercise_type: ExerciseType,
    pub equipment: &'static [&'static str],
}

pub const FALLBACK_EXERCISE: FallbackExercise = FallbackExercise {
    name: "Exercise",
    exercise_type: ExerciseType::WeightReps,
    equipment: &[],
};

impl FallbackExercise {
    /// The id is derived from the key, so that resolving the same key always yields the
    /// same exercise.
    #[must_use]
    pub fn details(&self, key: &str) -> ExerciseDetails {
        ExerciseDetails {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).into(),
            name: self.name.to_string(),
            exercise_type: self.exercise_type,
            muscles: vec![],
            equipment: self.equipment.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Outcome of resolving one template key.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Catalog(ExerciseDetails),
    Fallback(ExerciseDetails),
}

impl Resolved {
    #[must_use]
    pub fn details(&self) -> &ExerciseDetails {
        match self {
            Resolved::Catalog(details) | Resolved::Fallback(details) => details,
        }
    }
}

/// Maps template keys of public routines to catalog exercises.
///
/// Every key is looked up once. Keys that fail to resolve are cached with
/// [`FALLBACK_EXERCISE`].
pub struct TemplateResolver<C> {
    catalog: C,
    cache: BTreeMap<String, Resolved>,
}

impl<C: ExerciseCatalog> TemplateResolver<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            cache: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn cached(&self, key: &str) -> Option<&Resolved> {
        self.cache.get(key)
    }

    pub async fn resolve(&mut self, keys: &[&str]) -> BTreeMap<String, Resolved> {
        let missing = keys
            .iter()
            .filter(|k| !self.cache.contains_key(**k))
            .copied()
            .collect::<Vec<_>>();
        let results = join_all(missing.iter().map(|k| self.catalog.find_by_key(k))).await;

        for (key, result) in missing.into_iter().zip(results) {
            let resolved = match result {
                Ok(details) => Resolved::Catalog(details),
                Err(err) => {
                    warn!("using fallback exercise for \"{key}\": {err}");
                    Resolved::Fallback(FALLBACK_EXERCISE.details(key))
                }
            };
            self.cache.insert(key.to_string(), resolved);
        }
        keys.iter()
            .filter_map(|key| {
                self.cache
                    .get(*key)
                    .map(|resolved| ((*key).to_string(), resolved.clone()))
            })
            .collect()
    }

    /// Replaces all template references of the routine by catalog references.
    pub async fn resolve_routine(&mut self, routine: &Routine) -> Routine {
        let keys = routine.template_keys().into_iter().collect::<Vec<_>>();
        let resolved = self.resolve(&keys).await;
        Routine {
            exercises: routine
                .exercises
                .iter()
                .map(|e| match &e.exercise {
                    ExerciseRef::Template(key) => match resolved.get(key) {
                        Some(r) => resolve_exercise(e, r),
                        None => e.clone(),
                    },
                    ExerciseRef::Catalog(_) => e.clone(),
                })
                .collect(),
            ..routine.clone()
        }
    }
}

/// A fallback keeps the name and type stored in the routine, if there are any.
fn resolve_exercise(exercise: &RoutineExercise, resolved: &Resolved) -> RoutineExercise {
    let details = resolved.details();
    let (name, exercise_type) = match resolved {
        Resolved::Fallback(_) if !exercise.name.is_empty() => {
            (exercise.name.clone(), exercise.exercise_type)
        }
        Resolved::Catalog(_) | Resolved::Fallback(_) => {
            (details.name.clone(), details.exercise_type)
        }
    };
    RoutineExercise {
        exercise: ExerciseRef::Catalog(details.id),
        name,
        exercise_type,
        sets: exercise
            .sets
            .iter()
            .map(|s| RoutineSet {
                performance: s.performance.masked(exercise_type),
            })
            .collect(),
        notes: exercise.notes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use crate::{
        CatalogError, ExerciseID, Performance, Reps, RoutineSource, StaticCatalog, Title, Weight,
    };

    use super::*;

    struct CountingCatalog {
        inner: StaticCatalog,
        lookups: Cell<usize>,
    }

    impl ExerciseCatalog for CountingCatalog {
        async fn exercise(&self, id: ExerciseID) -> Result<ExerciseDetails, CatalogError> {
            self.inner.exercise(id).await
        }

        async fn find_by_key(&self, key: &str) -> Result<ExerciseDetails, CatalogError> {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.find_by_key(key).await
        }
    }

    fn resolver() -> TemplateResolver<CountingCatalog> {
        TemplateResolver::new(CountingCatalog {
            inner: StaticCatalog::new([ExerciseDetails {
                id: 7.into(),
                name: String::from("Push Up"),
                exercise_type: ExerciseType::Reps,
                muscles: vec![],
                equipment: vec![],
            }])
            .with_key("push_up", 7.into()),
            lookups: Cell::new(0),
        })
    }

    fn routine() -> Routine {
        let set = RoutineSet {
            performance: Performance {
                reps: Some(Reps::new(12).unwrap()),
                weight: Some(Weight::new(10.0).unwrap()),
                ..Performance::default()
            },
        };
        Routine {
            id: 1.into(),
            title: Title::new("Starter").unwrap(),
            source: RoutineSource::Public,
            notes: String::new(),
            exercises: vec![
                RoutineExercise {
                    exercise: ExerciseRef::Template(String::from("push_up")),
                    name: String::new(),
                    exercise_type: ExerciseType::WeightReps,
                    sets: vec![set; 2],
                    notes: String::new(),
                },
                RoutineExercise {
                    exercise: ExerciseRef::Template(String::from("goblet_squat")),
                    name: String::from("Goblet Squat"),
                    exercise_type: ExerciseType::WeightReps,
                    sets: vec![set],
                    notes: String::new(),
                },
                RoutineExercise {
                    exercise: ExerciseRef::Catalog(3.into()),
                    name: String::from("Plank"),
                    exercise_type: ExerciseType::Duration,
                    sets: vec![],
                    notes: String::new(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_resolve_routine() {
        let mut resolver = resolver();
        let resolved = resolver.resolve_routine(&routine()).await;

        assert!(resolved.is_resolved());
        let push_up = &resolved.exercises[0];
        assert_eq!(push_up.exercise, ExerciseRef::Catalog(7.into()));
        assert_eq!(push_up.name, "Push Up");
        assert_eq!(push_up.exercise_type, ExerciseType::Reps);
        assert_eq!(push_up.sets[0].performance.weight, None);

        let squat = &resolved.exercises[1];
        assert_eq!(
            squat.exercise,
            ExerciseRef::Catalog(FALLBACK_EXERCISE.details("goblet_squat").id)
        );
        assert_eq!(squat.name, "Goblet Squat");
        assert_eq!(squat.exercise_type, ExerciseType::WeightReps);

        assert_eq!(resolved.exercises[2], routine().exercises[2]);
    }

    #[tokio::test]
    async fn test_resolve() {
        let mut resolver = resolver();
        let resolved = resolver.resolve(&["push_up", "row"]).await;
        assert!(matches!(resolved["push_up"], Resolved::Catalog(_)));
        assert_eq!(
            resolved["row"],
            Resolved::Fallback(FALLBACK_EXERCISE.details("row"))
        );
    }

    #[tokio::test]
    async fn test_resolve_uses_cache() {
        let mut resolver = resolver();
        resolver.resolve(&["push_up", "goblet_squat"]).await;
        resolver.resolve(&["push_up", "goblet_squat"]).await;
        assert_eq!(resolver.catalog.lookups.get(), 2);
        assert_eq!(resolver.cached("push_up").unwrap().details().id, 7.into());
        assert_eq!(
            resolver.cached("goblet_squat"),
            Some(&Resolved::Fallback(FALLBACK_EXERCISE.details("goblet_squat")))
        );
    }

    #[test]
    fn test_fallback_details() {
        let details = FALLBACK_EXERCISE.details("row");
        assert_eq!(details, FALLBACK_EXERCISE.details("row"));
        assert_ne!(details.id, FALLBACK_EXERCISE.details("press").id);
        assert_eq!(details.name, "Exercise");
        assert!(details.equipment.is_empty());
    }
}
