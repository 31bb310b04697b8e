use crate::core::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Measured impact value recorded against an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(alias = "_id")]
    pub id: EntityId,
    pub activityid: EntityId,
    pub metric_name: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

impl Metric {
    /// Share of the target reached, when a positive target is set.
    pub fn progress(&self) -> Option<f64> {
        match self.target {
            Some(target) if target > 0.0 => Some(self.value / target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMetric {
    pub activityid: EntityId,
    pub metric_name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

impl NewMetric {
    pub fn new(activityid: EntityId, metric_name: impl Into<String>, value: f64) -> Self {
        Self {
            activityid,
            metric_name: metric_name.into(),
            value,
            unit: None,
            target: None,
        }
    }
}

impl Entity for Metric {
    const KIND: EntityKind = EntityKind::Metric;
    type Draft = NewMetric;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parent_id(&self) -> Option<&EntityId> {
        Some(&self.activityid)
    }

    fn from_draft(id: EntityId, draft: NewMetric) -> Self {
        Self {
            id,
            activityid: draft.activityid,
            metric_name: draft.metric_name,
            value: draft.value,
            unit: draft.unit,
            target: draft.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_requires_positive_target() {
        let mut metric = Metric::from_draft(
            EntityId::from("m-1"),
            NewMetric::new(EntityId::from("a-1"), "households served", 30.0),
        );
        assert_eq!(metric.progress(), None);

        metric.target = Some(120.0);
        assert_eq!(metric.progress(), Some(0.25));

        metric.target = Some(0.0);
        assert_eq!(metric.progress(), None);
    }
}
