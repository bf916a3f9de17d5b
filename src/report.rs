use serde::Serialize;

use crate::locale::Language;
use crate::puzzle::calculator::CrossingPlan;
use crate::puzzle::model::CrossingInput;

/// A computed plan together with its localized summary, as printed by the CLI
/// and returned by the HTTP API.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationReport {
    #[serde(flatten)]
    pub plan: CrossingPlan,
    pub total_trips: u64,
    pub boarding_completed_at: Option<u64>,
    pub language: Language,
    pub summary: String,
    pub breakdown: Vec<String>,
}

impl CalculationReport {
    pub fn new(input: &CrossingInput, language: Language) -> Self {
        let plan = CrossingPlan::compute(input);
        let summary = language.total_time_line(plan.total_time);
        let breakdown = plan
            .groups
            .iter()
            .map(|group| language.trips_line(group.color, group.trips))
            .collect();
        Self {
            total_trips: plan.total_trips(),
            boarding_completed_at: plan.boarding_completion(),
            plan,
            language,
            summary,
            breakdown,
        }
    }

    pub fn render_text(&self, with_breakdown: bool) -> String {
        let mut out = self.summary.clone();
        out.push('\n');
        if with_breakdown {
            out.push_str(self.language.process_details());
            out.push('\n');
            for line in &self.breakdown {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}
