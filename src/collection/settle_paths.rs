impl<T: Entity> EntityCollection<T> {
    /// Starts an operation: the lifecycle becomes `pending` and the previous
    /// error is cleared before any request leaves the process.
    pub fn begin(&mut self, op: OperationKind) -> RequestTicket {
        self.last_issued = self.last_issued.next();
        self.lifecycle.begin();
        self.error = None;
        self.in_flight += 1;

        let ticket = RequestTicket {
            seq: self.last_issued,
            op,
        };
        debug!(
            kind = %T::KIND,
            op = %op,
            seq = %ticket.seq,
            in_flight = self.in_flight,
            "operation started"
        );
        ticket
    }

    /// Applies the result of the request identified by `ticket`.
    ///
    /// Under `OrderingPolicy::LastCompleted` every result is applied in
    /// completion order. Under `OrderingPolicy::LatestIssued` a result older
    /// than the last applied one is discarded without touching the collection.
    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<OperationOutput<T>, RequestFailure>,
        ordering: OrderingPolicy,
    ) -> SettleOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if ordering == OrderingPolicy::LatestIssued
            && self.last_applied.is_some_and(|last| ticket.seq < last)
        {
            debug!(
                kind = %T::KIND,
                op = %ticket.op,
                seq = %ticket.seq,
                "stale result discarded"
            );
            return SettleOutcome::Discarded;
        }
        self.last_applied = Some(ticket.seq);

        let failure = match result {
            Ok(output) => match self.apply_output(output) {
                Ok(()) => {
                    self.lifecycle.fulfill();
                    self.error = None;
                    debug!(
                        kind = %T::KIND,
                        op = %ticket.op,
                        seq = %ticket.seq,
                        items = self.items.len(),
                        "operation fulfilled"
                    );
                    return SettleOutcome::Fulfilled;
                }
                Err(err) => RequestFailure::from(err),
            },
            Err(failure) => failure,
        };

        warn!(
            kind = %T::KIND,
            op = %ticket.op,
            seq = %ticket.seq,
            error = %failure,
            "operation rejected"
        );
        self.lifecycle.reject();
        self.error = Some(failure.clone());
        SettleOutcome::Rejected(failure)
    }
}
