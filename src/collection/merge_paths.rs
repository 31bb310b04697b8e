impl<T: Entity> EntityCollection<T> {
    /// Unconditionally overwrites `items` with `list`.
    ///
    /// Duplicate ids in `list` collapse onto the first occurrence, carrying the
    /// fields of the last one.
    pub fn replace_all(&mut self, list: Vec<T>) {
        let mut items: Vec<T> = Vec::with_capacity(list.len());
        for entity in list {
            match items.iter().position(|item| item.id() == entity.id()) {
                Some(index) => items[index] = entity,
                None => items.push(entity),
            }
        }
        self.items = items;
    }

    /// Inserts or replaces by id. Existing entries keep their position; new ones
    /// are appended. Returns `true` when the entity was inserted.
    pub fn upsert(&mut self, entity: T) -> bool {
        match self.position(entity.id()) {
            Some(index) => {
                self.items[index] = entity;
                false
            }
            None => {
                self.items.push(entity);
                true
            }
        }
    }

    /// Places `entity` at the end of `items`, dropping any earlier entry with
    /// the same id so it is present exactly once.
    pub fn append(&mut self, entity: T) {
        self.items.retain(|item| item.id() != entity.id());
        self.items.push(entity);
    }

    /// Shallow-merges `patch` into the item with `id` and into `current` when its
    /// id matches.
    ///
    /// An absent id is a silent no-op reported as `MergeOutcome::NotFound`. A
    /// patch that does not fit the entity shape leaves everything untouched.
    pub fn merge_patch(&mut self, id: &EntityId, patch: &EntityPatch) -> Result<MergeOutcome> {
        let index = self.position(id);
        let merged_item = match index {
            Some(index) => Some(patch.apply_to(&self.items[index])?),
            None => None,
        };
        let merged_current = match self.current.as_ref() {
            Some(current) if current.id() == id => Some(patch.apply_to(current)?),
            _ => None,
        };

        if merged_item.is_none() && merged_current.is_none() {
            return Ok(MergeOutcome::NotFound);
        }
        if let (Some(index), Some(item)) = (index, merged_item) {
            self.items[index] = item;
        }
        if let Some(current) = merged_current {
            self.current = Some(current);
        }
        Ok(MergeOutcome::Applied)
    }

    /// Removes the item with `id` if present. Absence is not an error.
    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    pub fn set_current(&mut self, entity: Option<T>) {
        self.current = entity;
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    fn clear_current_if(&mut self, id: &EntityId) {
        if self.current.as_ref().is_some_and(|current| current.id() == id) {
            self.current = None;
        }
    }

    fn apply_output(&mut self, output: OperationOutput<T>) -> Result<()> {
        match output {
            OperationOutput::Listed(list) => self.replace_all(list),
            OperationOutput::Fetched(entity) => {
                self.upsert(entity.clone());
                self.current = Some(entity);
            }
            OperationOutput::Created(entity) => self.append(entity),
            OperationOutput::Updated { id, patch } => {
                if self.merge_patch(&id, &patch)? == MergeOutcome::NotFound {
                    debug!(kind = %T::KIND, id = %id, "update result has no local counterpart");
                }
            }
            OperationOutput::Deleted(id) => {
                self.remove(&id);
                self.clear_current_if(&id);
            }
        }
        Ok(())
    }
}
