impl<T: Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityCollection<T> {
    /// Empty collection in the `idle` state.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            lifecycle: RequestLifecycle::Idle,
            error: None,
            last_issued: RequestSeq(0),
            last_applied: None,
            in_flight: 0,
        }
    }

    /// Returns the mirrored entities in server order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The focused entity, which need not appear in `items`.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn lifecycle(&self) -> RequestLifecycle {
        self.lifecycle
    }

    /// Shorthand for a pending lifecycle, the "loading" flag of a view.
    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_pending()
    }

    /// Cause of the last rejection, cleared when a new request starts.
    pub fn error(&self) -> Option<&RequestFailure> {
        self.error.as_ref()
    }

    /// Requests issued against this collection that have not settled yet.
    ///
    /// Informational only: the lifecycle flag follows the last settlement.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Sequence number of the most recently applied result.
    pub fn last_applied(&self) -> Option<RequestSeq> {
        self.last_applied
    }

    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn find(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Looks in `items` first, then falls back to `current` when its id matches.
    pub fn resolve(&self, id: &EntityId) -> Option<&T> {
        self.find(id)
            .or_else(|| self.current.as_ref().filter(|current| current.id() == id))
    }

    /// Items whose parent reference equals `parent_id`.
    pub fn children_of<'a>(&'a self, parent_id: &'a EntityId) -> impl Iterator<Item = &'a T> + 'a {
        self.items
            .iter()
            .filter(move |item| item.parent_id() == Some(parent_id))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    /// Drops all state, returning to a fresh `idle` collection.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
