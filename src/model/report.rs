use crate::core::{EntityId, EntityKind};
use crate::preview::Locator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Generated impact report. The rendered PDF lives behind `fileUrl`, with a
/// pre-signed `signedUrl` as the alternate address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(alias = "_id")]
    pub id: EntityId,
    pub projectid: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(rename = "signedUrl", default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
}

impl Report {
    /// Primary and fallback document locators, in the order they are tried.
    ///
    /// When only the signed address exists it becomes the primary.
    pub fn preview_locators(&self) -> Option<(Locator, Option<Locator>)> {
        let file = self.file_url.as_deref().filter(|url| !url.is_empty());
        let signed = self.signed_url.as_deref().filter(|url| !url.is_empty());
        match (file, signed) {
            (Some(primary), fallback) => Some((Locator::from(primary), fallback.map(Locator::from))),
            (None, Some(primary)) => Some((Locator::from(primary), None)),
            (None, None) => None,
        }
    }

    pub fn preview_file_name(&self) -> String {
        format!("Report_{}.pdf", self.id.tail(6))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub projectid: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub format: String,
}

impl NewReport {
    /// PDF report request for a project, stamped with the current time.
    pub fn pdf(projectid: EntityId, summary: impl Into<String>) -> Self {
        Self {
            projectid,
            generated_by: None,
            created_at: Some(Utc::now()),
            summary: Some(summary.into()),
            format: "pdf".to_string(),
        }
    }

    pub fn generated_by(mut self, who: impl Into<String>) -> Self {
        self.generated_by = Some(who.into());
        self
    }
}

impl Entity for Report {
    const KIND: EntityKind = EntityKind::Report;
    type Draft = NewReport;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parent_id(&self) -> Option<&EntityId> {
        Some(&self.projectid)
    }

    fn from_draft(id: EntityId, draft: NewReport) -> Self {
        Self {
            id,
            projectid: draft.projectid,
            generated_by: draft.generated_by,
            created_at: draft.created_at,
            summary: draft.summary,
            conclusions: None,
            recommendations: None,
            format: Some(draft.format),
            file_url: None,
            signed_url: None,
        }
    }
}
