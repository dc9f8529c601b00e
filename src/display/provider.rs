//! Provider display formatting
//!
//! Formats providers for terminal output in table and detail views.

use crate::models::Page;
use crate::services::ProviderView;

use super::format_page_footer;
use super::model::format_model_list;

fn key_column(view: &ProviderView) -> &str {
    view.masked_api_key.as_deref().unwrap_or("(none)")
}

fn active_model_column(view: &ProviderView) -> &str {
    view.active_model().map(|m| m.model_id.as_str()).unwrap_or("-")
}

/// Format a page of providers as a table
pub fn format_provider_list(page: &Page<ProviderView>) -> String {
    if page.items.is_empty() {
        return "No providers found.\n".to_string();
    }

    // Calculate column widths
    let name_width = page
        .items
        .iter()
        .map(|v| v.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let display_width = page
        .items
        .iter()
        .map(|v| v.display_name.chars().count())
        .max()
        .unwrap_or(12)
        .max(12);

    let key_width = page
        .items
        .iter()
        .map(|v| key_column(v).chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let active_width = page
        .items
        .iter()
        .map(|v| active_model_column(v).chars().count())
        .max()
        .unwrap_or(12)
        .max(12);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<display_width$}  {:<key_width$}  {:<active_width$}  {:>6}  {:<10}  {}\n",
        "Name", "Display Name", "API Key", "Active Model", "Models", "Updated", "ID",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<display_width$}  {:-<key_width$}  {:-<active_width$}  {:->6}  {:-<10}  {:-<12}\n",
        "", "", "", "", "", "", "",
    ));

    for view in &page.items {
        output.push_str(&format!(
            "{:<name_width$}  {:<display_width$}  {:<key_width$}  {:<active_width$}  {:>6}  {:<10}  {}\n",
            view.name,
            view.display_name,
            key_column(view),
            active_model_column(view),
            view.models.len(),
            view.updated_at.format("%Y-%m-%d").to_string(),
            view.id.short(),
        ));
    }

    output.push('\n');
    output.push_str(&format_page_footer(page));
    output
}

/// Format a single provider with its masked key
pub fn format_provider_details(view: &ProviderView) -> String {
    let mut output = String::new();

    output.push_str(&format!("Provider: {}\n", view.display_name));
    output.push_str(&format!("{}\n", "=".repeat(10 + view.display_name.chars().count())));
    output.push_str(&format!("Name:     {}\n", view.name));
    output.push_str(&format!("ID:       {}\n", view.id));
    if let Some(logo) = &view.logo_url {
        output.push_str(&format!("Logo:     {}\n", logo));
    }
    output.push_str(&format!(
        "API key:  {}\n",
        if view.has_api_key {
            key_column(view)
        } else {
            "not configured"
        }
    ));
    output.push_str(&format!(
        "Created:  {}\n",
        view.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "Updated:  {}\n",
        view.updated_at.format("%Y-%m-%d %H:%M")
    ));

    output.push_str(&format!("\nModels ({})\n", view.models.len()));
    output.push_str(&format_model_list(&view.models));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListQuery, LlmModel, ProviderId};
    use chrono::Utc;

    fn view(name: &str, masked: Option<&str>) -> ProviderView {
        ProviderView {
            id: ProviderId::new(),
            name: name.into(),
            display_name: name.to_uppercase(),
            logo_url: None,
            has_api_key: masked.is_some(),
            masked_api_key: masked.map(str::to_string),
            models: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_list() {
        let page = ListQuery::page(1).paginate(Vec::<ProviderView>::new());
        assert_eq!(format_provider_list(&page), "No providers found.\n");
    }

    #[test]
    fn test_list_shows_masked_keys_only() {
        let page = ListQuery::page(1).paginate(vec![
            view("openai", Some("sk-t********EFGH")),
            view("google", None),
        ]);
        let output = format_provider_list(&page);

        assert!(output.contains("sk-t********EFGH"));
        assert!(output.contains("(none)"));
        assert!(output.contains("Page 1 of 1 (2 total, 10 per page)"));
    }

    #[test]
    fn test_details() {
        let mut v = view("openai", Some("sk-t********EFGH"));
        v.logo_url = Some("https://example.com/openai.png".into());
        let output = format_provider_details(&v);

        assert!(output.starts_with("Provider: OPENAI\n"));
        assert!(output.contains("API key:  sk-t********EFGH"));
        assert!(output.contains("Logo:     https://example.com/openai.png"));

        let output = format_provider_details(&view("google", None));
        assert!(output.contains("API key:  not configured"));
        assert!(output.contains("Models (0)\nNo models found.\n"));
    }

    #[test]
    fn test_list_shows_active_model() {
        let mut openai = view("openai", None);
        let mut active = LlmModel::new(openai.id, "gpt-4o", "GPT-4o");
        active.is_active = true;
        openai.models = vec![active, LlmModel::new(openai.id, "gpt-4", "GPT-4")];

        let page = ListQuery::page(1).paginate(vec![openai, view("google", None)]);
        let output = format_provider_list(&page);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].contains("Active Model"));
        assert!(lines[2].contains("gpt-4o"));
        assert!(lines[2].contains("     2  "));
        assert!(lines[3].contains("  -  "));
    }
}
