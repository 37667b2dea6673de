use tracing::warn;

use portview_core::domain::project::Project;

use crate::llm::LlmClient;

/// Returned when the external service fails in any way.
pub const FALLBACK_INSIGHT: &str = "Insight generation currently unavailable.";

/// Returned when the service answers but produces no text.
pub const EMPTY_INSIGHT: &str = "Unable to generate insight at this time.";

/// Render the fixed instruction template around a project snapshot.
pub fn build_insight_prompt(project: &Project) -> String {
    let milestones =
        serde_json::to_string(&project.milestones).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Analyze the following project status and provide a concise (2-sentence) \
         professional executive summary on its health.\n\n\
         Project: {name}\n\
         Category: {category}\n\
         Budget: {budget}\n\
         Expenditure: {expenditure}\n\
         Status: {status}\n\
         Remarks: {remarks}\n\
         Milestones: {milestones}",
        name = project.name,
        category = project.category.label(),
        budget = project.total_budget,
        expenditure = project.expenditure,
        status = project.status.label(),
        remarks = project.delay_remarks.as_deref().unwrap_or("None"),
    )
}

pub struct InsightGenerator {
    client: Box<dyn LlmClient>,
}

impl InsightGenerator {
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Produce an advisory health summary for a project. This never fails:
    /// every error path collapses into a static fallback string.
    pub async fn project_health_insight(&self, project: &Project) -> String {
        let prompt = build_insight_prompt(project);

        match self.client.generate(&prompt).await {
            Ok(text) if text.is_empty() => EMPTY_INSIGHT.to_string(),
            Ok(text) => text,
            Err(error) => {
                warn!(
                    event_name = "insight.generation_failed",
                    project_id = %project.id.0,
                    error = %error,
                    "insight generation failed, returning fallback text"
                );
                FALLBACK_INSIGHT.to_string()
            }
        }
    }
}
