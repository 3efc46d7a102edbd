// ── Customer edit state machine ──
//
// Holds `{original, draft}` for one customer and performs the
// field-by-field save. The draft is compared against the last
// committed record, not the live directory. Saving dispatches one
// directory call per changed field, concurrently, and waits for every
// one to settle before partitioning the outcome -- a failure in one
// field must not prevent independent fields from completing.

use std::fmt;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tracing::debug;

use crate::directory::CustomerDirectory;
use crate::model::{Customer, Plan};
use crate::store::CustomerStore;

/// Working copy of the editable fields.
///
/// `top_up` is a pending additive amount, not a credit total; it is
/// zeroed after every save and on every reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub plan: Plan,
    pub per_user_limit: Option<u32>,
    pub top_up: u32,
}

impl Draft {
    fn seeded_from(customer: &Customer) -> Self {
        Self {
            plan: customer.plan,
            per_user_limit: customer.per_user_limit,
            top_up: 0,
        }
    }
}

/// Edit state transitions.
#[derive(Debug, Clone)]
pub enum EditAction {
    SetPlan(Plan),
    SetLimit(Option<u32>),
    SetTopUp(u32),
    /// Re-seed both `original` and the draft from `customer`.
    Reset(Customer),
}

/// One of the three editable fields, named as save outcomes report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditedField {
    Plan,
    PerUserLimit,
    TopUpCredits,
}

impl EditedField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Plan => "Plan",
            Self::PerUserLimit => "Per-user limit",
            Self::TopUpCredits => "Top-up credits",
        }
    }
}

impl fmt::Display for EditedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partition of the attempted field operations by outcome. Field order
/// (plan, limit, top-up) is preserved within each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub successes: Vec<EditedField>,
    pub failures: Vec<EditedField>,
}

impl SaveOutcome {
    /// Whether anything was attempted at all.
    pub fn attempted(&self) -> bool {
        !self.successes.is_empty() || !self.failures.is_empty()
    }
}

struct EditorState {
    original: Customer,
    draft: Draft,
}

impl EditorState {
    fn is_dirty(&self) -> bool {
        self.draft.plan != self.original.plan
            || self.draft.per_user_limit != self.original.per_user_limit
            || self.draft.top_up > 0
    }
}

/// The per-field operation a save dispatches.
enum PlannedOp {
    Plan(Plan),
    Limit(Option<u32>),
    TopUp(u32),
}

impl PlannedOp {
    fn field(&self) -> EditedField {
        match self {
            Self::Plan(_) => EditedField::Plan,
            Self::Limit(_) => EditedField::PerUserLimit,
            Self::TopUp(_) => EditedField::TopUpCredits,
        }
    }
}

struct EditorInner {
    directory: Arc<dyn CustomerDirectory>,
    store: CustomerStore,
    state: Mutex<EditorState>,
}

/// Edit state machine for one customer.
///
/// Cheaply cloneable; all clones share the same state, so the UI can
/// hand a clone to a spawned save task while it keeps rendering the
/// draft. `save` itself carries no re-entrancy guard -- keeping the
/// save affordance disabled while a save is in flight is the caller's
/// job.
#[derive(Clone)]
pub struct CustomerEditor {
    inner: Arc<EditorInner>,
}

impl CustomerEditor {
    pub fn new(
        customer: Customer,
        directory: Arc<dyn CustomerDirectory>,
        store: CustomerStore,
    ) -> Self {
        let draft = Draft::seeded_from(&customer);
        Self {
            inner: Arc::new(EditorInner {
                directory,
                store,
                state: Mutex::new(EditorState {
                    original: customer,
                    draft,
                }),
            }),
        }
    }

    /// Apply a state transition.
    pub fn dispatch(&self, action: EditAction) {
        let mut state = self.inner.state.lock().expect("editor state lock poisoned");
        match action {
            EditAction::SetPlan(plan) => state.draft.plan = plan,
            EditAction::SetLimit(limit) => state.draft.per_user_limit = limit,
            EditAction::SetTopUp(amount) => state.draft.top_up = amount,
            EditAction::Reset(customer) => {
                state.draft = Draft::seeded_from(&customer);
                state.original = customer;
            }
        }
    }

    /// The last committed record the draft is compared against.
    pub fn original(&self) -> Customer {
        self.inner
            .state
            .lock()
            .expect("editor state lock poisoned")
            .original
            .clone()
    }

    /// The current draft.
    pub fn draft(&self) -> Draft {
        self.inner
            .state
            .lock()
            .expect("editor state lock poisoned")
            .draft
            .clone()
    }

    /// True iff the draft differs from the committed record in at
    /// least one tracked field.
    pub fn is_dirty(&self) -> bool {
        self.inner
            .state
            .lock()
            .expect("editor state lock poisoned")
            .is_dirty()
    }

    /// Persist the changed fields.
    ///
    /// A clean draft resolves immediately with an empty outcome and no
    /// directory or refresh activity. Otherwise one operation per
    /// changed field is dispatched concurrently, every operation is
    /// awaited to settlement, and the outcome partitions the attempted
    /// field names. Afterwards -- regardless of how many operations
    /// failed -- the collection store is refreshed exactly once and the
    /// top-up draft is zeroed. Plan and limit drafts are left as
    /// attempted until the next reset.
    pub async fn save(&self) -> SaveOutcome {
        let (id, ops) = {
            let state = self.inner.state.lock().expect("editor state lock poisoned");
            if !state.is_dirty() {
                return SaveOutcome::default();
            }

            // Fixed field order: plan, then limit, then top-up.
            let mut ops = Vec::new();
            if state.draft.plan != state.original.plan {
                ops.push(PlannedOp::Plan(state.draft.plan));
            }
            if state.draft.per_user_limit != state.original.per_user_limit {
                ops.push(PlannedOp::Limit(state.draft.per_user_limit));
            }
            if state.draft.top_up > 0 {
                ops.push(PlannedOp::TopUp(state.draft.top_up));
            }
            (state.original.id.clone(), ops)
        };

        // Fire all operations, then wait for every one to settle. Each
        // branch captures its own error, so nothing short-circuits.
        let settled = join_all(ops.into_iter().map(|op| {
            let directory = Arc::clone(&self.inner.directory);
            let id = id.clone();
            async move {
                let field = op.field();
                let result = match op {
                    PlannedOp::Plan(plan) => directory.set_plan(&id, plan).await,
                    PlannedOp::Limit(limit) => directory.set_per_user_limit(&id, limit).await,
                    PlannedOp::TopUp(amount) => directory.top_up(&id, amount).await,
                };
                (field, result)
            }
        }))
        .await;

        let mut outcome = SaveOutcome::default();
        for (field, result) in settled {
            match result {
                Ok(_) => outcome.successes.push(field),
                Err(e) => {
                    debug!(field = %field, error = %e, "field update failed");
                    outcome.failures.push(field);
                }
            }
        }

        self.inner.store.refresh().await;
        self.dispatch(EditAction::SetTopUp(0));

        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture::{DirectoryOp, InMemoryDirectory, seed_customers};

    fn globex() -> Customer {
        seed_customers().remove(1)
    }

    fn harness(directory: Arc<InMemoryDirectory>, customer: Customer) -> CustomerEditor {
        let store = CustomerStore::new(directory.clone());
        CustomerEditor::new(customer, directory, store)
    }

    #[tokio::test(start_paused = true)]
    async fn dirty_tracks_each_field_and_reset_clears() {
        let directory = Arc::new(InMemoryDirectory::seeded());
        let editor = harness(directory, globex());
        assert!(!editor.is_dirty());

        editor.dispatch(EditAction::SetPlan(Plan::Ultimate));
        assert!(editor.is_dirty());
        editor.dispatch(EditAction::SetPlan(Plan::Basic));
        assert!(!editor.is_dirty());

        editor.dispatch(EditAction::SetLimit(Some(7)));
        assert!(editor.is_dirty());
        editor.dispatch(EditAction::SetLimit(None));
        assert!(!editor.is_dirty());

        editor.dispatch(EditAction::SetTopUp(5));
        assert!(editor.is_dirty());

        editor.dispatch(EditAction::Reset(globex()));
        assert!(!editor.is_dirty());
        assert_eq!(editor.draft().top_up, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn saving_a_clean_draft_touches_nothing() {
        let directory = Arc::new(InMemoryDirectory::seeded());
        let editor = harness(directory.clone(), globex());

        let outcome = editor.save().await;

        assert_eq!(outcome, SaveOutcome::default());
        assert!(!outcome.attempted());
        assert_eq!(directory.calls(DirectoryOp::List), 0);
        assert_eq!(directory.calls(DirectoryOp::SetPlan), 0);
        assert_eq!(directory.calls(DirectoryOp::SetLimit), 0);
        assert_eq!(directory.calls(DirectoryOp::TopUp), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn saving_only_a_plan_change_dispatches_only_the_plan_update() {
        let directory = Arc::new(InMemoryDirectory::seeded());
        let editor = harness(directory.clone(), globex());

        editor.dispatch(EditAction::SetPlan(Plan::Ultimate));
        let outcome = editor.save().await;

        assert_eq!(outcome.successes, vec![EditedField::Plan]);
        assert_eq!(outcome.failures, vec![]);
        assert_eq!(directory.calls(DirectoryOp::SetPlan), 1);
        assert_eq!(directory.calls(DirectoryOp::SetLimit), 0);
        assert_eq!(directory.calls(DirectoryOp::TopUp), 0);
        // Exactly one refresh, and the top-up draft is zeroed.
        assert_eq!(directory.calls(DirectoryOp::List), 1);
        assert_eq!(editor.draft().top_up, 0);

        // Once the refreshed record is re-seeded, saving again is a no-op.
        let refreshed = editor.inner.store.snapshot().customers[1].clone();
        assert_eq!(refreshed.plan, Plan::Ultimate);
        editor.dispatch(EditAction::Reset(refreshed));
        assert!(!editor.is_dirty());
        let second = editor.save().await;
        assert!(!second.attempted());
        assert_eq!(directory.calls(DirectoryOp::SetPlan), 1);
        assert_eq!(directory.calls(DirectoryOp::List), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn partial_failure_partitions_by_field_and_still_refreshes() {
        let directory = Arc::new(InMemoryDirectory::seeded());
        let editor = harness(directory.clone(), globex());
        directory.fail_on(DirectoryOp::SetLimit);

        editor.dispatch(EditAction::SetPlan(Plan::Enterprise));
        editor.dispatch(EditAction::SetLimit(Some(9)));
        let outcome = editor.save().await;

        assert_eq!(outcome.successes, vec![EditedField::Plan]);
        assert_eq!(outcome.failures, vec![EditedField::PerUserLimit]);
        assert_eq!(directory.calls(DirectoryOp::List), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn total_failure_still_refreshes_and_zeroes_top_up() {
        let directory = Arc::new(InMemoryDirectory::seeded());
        let editor = harness(directory.clone(), globex());
        directory.fail_on(DirectoryOp::SetPlan);
        directory.fail_on(DirectoryOp::SetLimit);
        directory.fail_on(DirectoryOp::TopUp);

        editor.dispatch(EditAction::SetPlan(Plan::Trial));
        editor.dispatch(EditAction::SetLimit(Some(3)));
        editor.dispatch(EditAction::SetTopUp(12));
        let outcome = editor.save().await;

        // Field order is preserved within the partition.
        assert_eq!(
            outcome.failures,
            vec![
                EditedField::Plan,
                EditedField::PerUserLimit,
                EditedField::TopUpCredits
            ]
        );
        assert_eq!(outcome.successes, vec![]);
        assert_eq!(directory.calls(DirectoryOp::List), 1);
        assert_eq!(editor.draft().top_up, 0);
        // Plan and limit drafts reflect what was attempted.
        assert_eq!(editor.draft().plan, Plan::Trial);
        assert_eq!(editor.draft().per_user_limit, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn plan_change_and_top_up_end_to_end() {
        let customer = Customer {
            id: "1".into(),
            name: "Acme Corp".into(),
            plan: Plan::Basic,
            monthly_credits: 100,
            per_user_limit: Some(10),
            used_credits: 20,
            users: 4,
        };
        let directory = Arc::new(InMemoryDirectory::new(vec![customer.clone()]));
        let store = CustomerStore::new(directory.clone());
        store.refresh().await;
        store.select("1");
        let calls_before = directory.calls(DirectoryOp::List);

        let editor = CustomerEditor::new(
            store.selected().unwrap(),
            directory.clone(),
            store.clone(),
        );
        editor.dispatch(EditAction::SetPlan(Plan::Enterprise));
        editor.dispatch(EditAction::SetTopUp(15));
        let outcome = editor.save().await;

        assert_eq!(directory.calls(DirectoryOp::SetPlan), 1);
        assert_eq!(directory.calls(DirectoryOp::SetLimit), 0);
        assert_eq!(directory.calls(DirectoryOp::TopUp), 1);
        assert_eq!(directory.calls(DirectoryOp::List), calls_before + 1);
        assert_eq!(editor.draft().top_up, 0);
        assert_eq!(
            outcome.successes,
            vec![EditedField::Plan, EditedField::TopUpCredits]
        );

        // The refreshed selection reflects the committed plan change.
        // (Completion order across the two fields is not guaranteed, so
        // the exact credit total is not asserted.)
        let updated = store.selected().unwrap();
        assert_eq!(updated.plan, Plan::Enterprise);
    }
}
