//! Model display formatting

use crate::models::{CostPer1k, LlmModel};

fn cost_column(cost: Option<CostPer1k>) -> String {
    cost.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format a provider's models as a table
pub fn format_model_list(models: &[LlmModel]) -> String {
    if models.is_empty() {
        return "No models found.\n".to_string();
    }

    let model_width = models
        .iter()
        .map(|m| m.model_id.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let display_width = models
        .iter()
        .map(|m| m.display_name.chars().count())
        .max()
        .unwrap_or(12)
        .max(12);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<model_width$}  {:<display_width$}  {:>10}  {:>10}  {:<6}  {}\n",
        "Model ID", "Display Name", "Input/1k", "Output/1k", "Active", "ID",
    ));
    output.push_str(&format!(
        "{:-<model_width$}  {:-<display_width$}  {:->10}  {:->10}  {:-<6}  {:-<12}\n",
        "", "", "", "", "", "",
    ));

    for model in models {
        output.push_str(&format!(
            "{:<model_width$}  {:<display_width$}  {:>10}  {:>10}  {:<6}  {}\n",
            model.model_id,
            model.display_name,
            cost_column(model.input_cost_per_1k),
            cost_column(model.output_cost_per_1k),
            if model.is_active { "yes" } else { "no" },
            model.id.short(),
        ));
    }

    output
}
