//! Admin user display formatting

use crate::models::{AdminUser, Page};

use super::format_page_footer;

/// Format a page of admin users as a table
pub fn format_admin_user_list(page: &Page<AdminUser>) -> String {
    if page.items.is_empty() {
        return "No admin users found.\n".to_string();
    }

    let name_width = page
        .items
        .iter()
        .map(|u| u.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let email_width = page
        .items
        .iter()
        .map(|u| u.email.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<email_width$}  {:<11}  {:<10}  {}\n",
        "Name", "Email", "Role", "Created", "ID",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<email_width$}  {:-<11}  {:-<10}  {:-<12}\n",
        "", "", "", "", "",
    ));

    for user in &page.items {
        output.push_str(&format!(
            "{:<name_width$}  {:<email_width$}  {:<11}  {:<10}  {}\n",
            user.name,
            user.email,
            user.role,
            user.created_at.format("%Y-%m-%d").to_string(),
            user.id.short(),
        ));
    }

    output.push('\n');
    output.push_str(&format_page_footer(page));
    output
}
