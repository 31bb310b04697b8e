//! Route table of the dashboard API, per entity kind.

use crate::core::{EntityId, EntityKind};

/// Path listing every entity of `kind`.
pub fn list_all(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "/projects/all",
        EntityKind::Activity => "/activities/all",
        EntityKind::Metric => "/metrics/all",
        EntityKind::Report => "/reports/all",
        EntityKind::User => "/user/all",
    }
}

/// Path listing the children of `parent_id`, or `None` when the kind has no
/// parent listing.
pub fn list_by_parent(kind: EntityKind, parent_id: &EntityId) -> Option<String> {
    let parent = urlencoding::encode(parent_id.as_str());
    match kind {
        EntityKind::Project => Some(format!("/projects/user/{}", parent)),
        EntityKind::Activity => Some(format!("/activities/all/{}", parent)),
        EntityKind::Metric => Some(format!("/metrics/all?activityId={}", parent)),
        EntityKind::Report => Some(format!("/reports/all?projectId={}", parent)),
        EntityKind::User => None,
    }
}

/// Path addressing one entity, used by get, update and delete.
pub fn item(kind: EntityKind, id: &EntityId) -> String {
    let id = urlencoding::encode(id.as_str());
    match kind {
        EntityKind::Project => format!("/projects/{}", id),
        EntityKind::Activity => format!("/activities/{}", id),
        EntityKind::Metric => format!("/metrics/{}", id),
        EntityKind::Report => format!("/reports/{}", id),
        EntityKind::User => format!("/user/{}", id),
    }
}

pub fn create(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "/projects/create",
        EntityKind::Activity => "/activities/create",
        EntityKind::Metric => "/metrics/create",
        EntityKind::Report => "/reports/create",
        EntityKind::User => "/user/register",
    }
}

pub const LOGIN: &str = "/auth/login";
