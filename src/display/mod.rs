//! Display formatting for terminal output
//!
//! Formats providers, their models and admin users as tables and detail views. API keys
//! only ever appear here in masked form.

pub mod admin_user;
pub mod model;
pub mod provider;

pub use admin_user::format_admin_user_list;
pub use model::format_model_list;
pub use provider::{format_provider_details, format_provider_list};

use crate::models::Page;

/// Footer line summarizing a page of results
pub(crate) fn format_page_footer<T>(page: &Page<T>) -> String {
    format!(
        "Page {} of {} ({} total, {} per page)\n",
        page.page,
        page.total_pages.max(1),
        page.total,
        page.page_size
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListQuery;

    #[test]
    fn test_page_footer() {
        let page = ListQuery::page(2).paginate((0..12).collect::<Vec<_>>());
        assert_eq!(format_page_footer(&page), "Page 2 of 2 (12 total, 10 per page)\n");

        let empty = ListQuery::page(1).paginate(Vec::<u8>::new());
        assert_eq!(format_page_footer(&empty), "Page 1 of 1 (0 total, 10 per page)\n");
    }
}
