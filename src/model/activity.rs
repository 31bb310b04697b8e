use crate::core::{EntityId, EntityKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Entity, dates};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(alias = "_id")]
    pub id: EntityId,
    pub projectid: EntityId,
    pub activity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub projectid: EntityId,
    pub activity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewActivity {
    pub fn new(projectid: EntityId, activity_name: impl Into<String>) -> Self {
        Self {
            projectid,
            activity_name: activity_name.into(),
            activity_type: None,
            date: None,
            location: None,
            notes: None,
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn activity_type(mut self, activity_type: impl Into<String>) -> Self {
        self.activity_type = Some(activity_type.into());
        self
    }
}

impl Entity for Activity {
    const KIND: EntityKind = EntityKind::Activity;
    type Draft = NewActivity;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parent_id(&self) -> Option<&EntityId> {
        Some(&self.projectid)
    }

    fn from_draft(id: EntityId, draft: NewActivity) -> Self {
        Self {
            id,
            projectid: draft.projectid,
            activity_name: draft.activity_name,
            activity_type: draft.activity_type,
            date: draft.date,
            location: draft.location,
            notes: draft.notes,
        }
    }
}
