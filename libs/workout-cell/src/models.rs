use serde::Deserialize;

use shared_models::validation::NumberInput;

/// Body of both create and update; on update absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub frequency: Option<String>,
    pub category: Option<String>,
    pub exercises: Option<Vec<ExerciseInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseInput {
    pub name: Option<String>,
    pub sets: Option<NumberInput>,
    pub reps: Option<String>,
    pub rest: Option<String>,
}
