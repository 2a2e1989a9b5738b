pub const DEFAULT_SITE_BASE: &str = "https://bluepages.com.sa";
pub const DEFAULT_DASHBOARD_BASE: &str = "https://bluepages-dashboard.vercel.app";

/// Builds the public detail page and the admin dashboard page of a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTemplates {
    site_base: String,
    dashboard_base: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_BASE, DEFAULT_DASHBOARD_BASE)
    }
}

impl LinkTemplates {
    pub fn new(site_base: &str, dashboard_base: &str) -> Self {
        Self {
            site_base: site_base.trim().trim_end_matches('/').to_string(),
            dashboard_base: dashboard_base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn company_url(&self, id: u64) -> String {
        format!("{}/companies/{id}", self.site_base)
    }

    pub fn dashboard_url(&self, id: u64) -> String {
        format!(
            "{}/companies/{id}/edit-info?referrer=/companies-admins",
            self.dashboard_base
        )
    }
}
