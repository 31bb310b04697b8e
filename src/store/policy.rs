/// How results of overlapping requests on one collection are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Every result is applied in completion order; the last to arrive wins.
    #[default]
    LastCompleted,
    /// Results older than the last applied request are dropped.
    LatestIssued,
}

impl OrderingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::LastCompleted => "last_completed",
            OrderingPolicy::LatestIssued => "latest_issued",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_completed" => Some(OrderingPolicy::LastCompleted),
            "latest_issued" => Some(OrderingPolicy::LatestIssued),
            _ => None,
        }
    }
}

/// Store-wide settings.
#[derive(Debug, Clone, Default)]
pub struct StorePolicy {
    /// Reconciliation rule applied by every collection.
    pub ordering: OrderingPolicy,
}

impl StorePolicy {
    pub fn ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }
}
