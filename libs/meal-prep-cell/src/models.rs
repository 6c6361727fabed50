use serde::Deserialize;

/// Body of both create and update; on update absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPrepRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub total_time: Option<String>,
    pub scheduled_date: Option<String>,
    pub steps: Option<Vec<PrepStepInput>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrepStepInput {
    pub step: Option<String>,
    pub duration: Option<String>,
    pub tasks: Option<Vec<String>>,
    pub tips: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPrepQuery {
    pub status: Option<String>,
}
