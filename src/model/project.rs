use crate::core::{EntityId, EntityKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Entity, dates};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: EntityId,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<EntityId>,
}

/// Creation payload for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<EntityId>,
}

impl NewProject {
    pub fn named(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    pub fn owned_by(mut self, userid: EntityId) -> Self {
        self.userid = Some(userid);
        self
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    type Draft = NewProject;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parent_id(&self) -> Option<&EntityId> {
        self.userid.as_ref()
    }

    fn from_draft(id: EntityId, draft: NewProject) -> Self {
        Self {
            id,
            project_name: draft.project_name,
            description: draft.description,
            sector: draft.sector,
            start_date: draft.start_date,
            end_date: draft.end_date,
            userid: draft.userid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_server_shape_with_mongo_id_and_timestamps() {
        let project: Project = serde_json::from_value(json!({
            "_id": "65f1",
            "project_name": "Clean Water",
            "sector": "WASH",
            "start_date": "2024-01-15T00:00:00.000Z",
            "end_date": "2024-12-31",
            "userid": "u-9",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(project.id.as_str(), "65f1");
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(project.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(project.parent_id().map(EntityId::as_str), Some("u-9"));
    }

    #[test]
    fn draft_omits_unset_fields() {
        let body = serde_json::to_value(NewProject::named("Clean Water")).unwrap();
        assert_eq!(body, json!({ "project_name": "Clean Water" }));
    }
}
