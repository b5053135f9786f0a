//! Reference-data lookups (timezones, job titles, countries).

use crate::model::LabelValue;
use lexdesk_http::{HttpClient, QueryParams, Result, normalize_list};

/// Which lookup list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReferenceKind {
    /// IANA timezones
    Timezones,
    /// Staff job titles
    JobTitles,
    /// Countries
    Countries,
}

impl ReferenceKind {
    /// Every kind, in display order
    pub const ALL: [Self; 3] = [Self::Timezones, Self::JobTitles, Self::Countries];

    /// Backend path
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Timezones => "/reference/timezones",
            Self::JobTitles => "/reference/job-titles",
            Self::Countries => "/reference/countries",
        }
    }
}

/// Fetch one lookup list as select options.
///
/// Records that cannot be turned into an option are skipped.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
#[tracing::instrument(skip(client))]
pub async fn get_reference(client: &HttpClient, kind: ReferenceKind) -> Result<Vec<LabelValue>> {
    let body = client.get(kind.path(), &QueryParams::new()).await?;
    let page = normalize_list(body);
    Ok(page.list.iter().filter_map(LabelValue::from_record).collect())
}

/// Timezones as select options.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
pub async fn get_timezones(client: &HttpClient) -> Result<Vec<LabelValue>> {
    get_reference(client, ReferenceKind::Timezones).await
}

/// Job titles as select options.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
pub async fn get_job_titles(client: &HttpClient) -> Result<Vec<LabelValue>> {
    get_reference(client, ReferenceKind::JobTitles).await
}

/// Countries as select options.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
pub async fn get_countries(client: &HttpClient) -> Result<Vec<LabelValue>> {
    get_reference(client, ReferenceKind::Countries).await
}
