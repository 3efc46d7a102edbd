// ── In-memory directory fixture ──
//
// A self-contained `CustomerDirectory` backed by a mutable in-memory
// collection. Serves two jobs: the zero-configuration demo data set,
// and a controllable collaborator for store/editor tests (call
// counters, per-operation failure injection, simulated latency).

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::directory::CustomerDirectory;
use crate::error::CoreError;
use crate::model::{Customer, Plan};

/// Simulated service latency applied to every operation.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(200);

/// One of the four directory operations, for failure injection and
/// call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryOp {
    List,
    SetPlan,
    SetLimit,
    TopUp,
}

#[derive(Default)]
struct OpCounters {
    list: AtomicU32,
    set_plan: AtomicU32,
    set_limit: AtomicU32,
    top_up: AtomicU32,
}

impl OpCounters {
    fn counter(&self, op: DirectoryOp) -> &AtomicU32 {
        match op {
            DirectoryOp::List => &self.list,
            DirectoryOp::SetPlan => &self.set_plan,
            DirectoryOp::SetLimit => &self.set_limit,
            DirectoryOp::TopUp => &self.top_up,
        }
    }
}

/// In-memory customer directory with configurable latency and failure
/// injection.
pub struct InMemoryDirectory {
    customers: Mutex<Vec<Customer>>,
    latency: Duration,
    failing: Mutex<HashSet<DirectoryOp>>,
    calls: OpCounters,
}

impl InMemoryDirectory {
    /// Create a directory over the given collection, with the default
    /// simulated latency.
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            customers: Mutex::new(customers),
            latency: DEFAULT_LATENCY,
            failing: Mutex::new(HashSet::new()),
            calls: OpCounters::default(),
        }
    }

    /// Override the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// A directory seeded with the demo customer set.
    pub fn seeded() -> Self {
        Self::new(seed_customers())
    }

    /// Make `op` fail with a directory error until cleared.
    pub fn fail_on(&self, op: DirectoryOp) {
        self.failing
            .lock()
            .expect("failure set lock poisoned")
            .insert(op);
    }

    /// Stop injecting failures for `op`.
    pub fn clear_failure(&self, op: DirectoryOp) {
        self.failing
            .lock()
            .expect("failure set lock poisoned")
            .remove(&op);
    }

    /// How many times `op` has been invoked (attempts, including
    /// injected failures).
    pub fn calls(&self, op: DirectoryOp) -> u32 {
        self.calls.counter(op).load(Ordering::Relaxed)
    }

    /// A snapshot of the backing collection, for test assertions.
    pub fn customers(&self) -> Vec<Customer> {
        self.customers
            .lock()
            .expect("customer collection lock poisoned")
            .clone()
    }

    /// Count the call, wait out the latency, then fail if injection is
    /// armed for this operation.
    async fn begin(&self, op: DirectoryOp) -> Result<(), CoreError> {
        self.calls.counter(op).fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.latency).await;
        let failing = self
            .failing
            .lock()
            .expect("failure set lock poisoned")
            .contains(&op);
        if failing {
            return Err(CoreError::Directory {
                message: format!("injected failure for {op:?}"),
                status: Some(500),
            });
        }
        Ok(())
    }

    fn mutate(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Customer),
    ) -> Result<Customer, CoreError> {
        let mut customers = self
            .customers
            .lock()
            .expect("customer collection lock poisoned");
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound { id: id.to_string() })?;
        apply(customer);
        Ok(customer.clone())
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn list_customers(&self) -> Result<Vec<Customer>, CoreError> {
        self.begin(DirectoryOp::List).await?;
        Ok(self.customers())
    }

    async fn set_plan(&self, id: &str, plan: Plan) -> Result<Customer, CoreError> {
        self.begin(DirectoryOp::SetPlan).await?;
        self.mutate(id, |c| {
            c.plan = plan;
            c.monthly_credits = plan.monthly_credits();
        })
    }

    async fn set_per_user_limit(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<Customer, CoreError> {
        self.begin(DirectoryOp::SetLimit).await?;
        self.mutate(id, |c| c.per_user_limit = limit)
    }

    async fn top_up(&self, id: &str, amount: u32) -> Result<Customer, CoreError> {
        self.begin(DirectoryOp::TopUp).await?;
        self.mutate(id, |c| c.monthly_credits += i64::from(amount))
    }
}

/// The demo customer collection.
pub fn seed_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "1".into(),
            name: "Acme Corp".into(),
            plan: Plan::Enterprise,
            monthly_credits: 500,
            per_user_limit: Some(50),
            used_credits: 120,
            users: 10,
        },
        Customer {
            id: "2".into(),
            name: "Globex".into(),
            plan: Plan::Basic,
            monthly_credits: 100,
            per_user_limit: None,
            used_credits: 20,
            users: 5,
        },
        Customer {
            id: "3".into(),
            name: "Microsoft".into(),
            plan: Plan::Ultimate,
            monthly_credits: 1000,
            per_user_limit: None,
            used_credits: 20,
            users: 50,
        },
        Customer {
            id: "4".into(),
            name: "CompanyL".into(),
            plan: Plan::Lite,
            monthly_credits: 20,
            per_user_limit: None,
            used_credits: 20,
            users: 1,
        },
        Customer {
            id: "5".into(),
            name: "CompanyT".into(),
            plan: Plan::Trial,
            monthly_credits: 10,
            per_user_limit: None,
            used_credits: 0,
            users: 5,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn set_plan_applies_canonical_credits_regardless_of_prior_value() {
        let directory = InMemoryDirectory::seeded();

        for plan in Plan::ALL {
            let updated = directory.set_plan("1", plan).await.unwrap();
            assert_eq!(updated.plan, plan);
            assert_eq!(updated.monthly_credits, plan.monthly_credits());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn top_up_adds_to_monthly_credits() {
        let directory = InMemoryDirectory::seeded();

        let updated = directory.top_up("2", 40).await.unwrap();
        assert_eq!(updated.monthly_credits, 140);

        let again = directory.top_up("2", 40).await.unwrap();
        assert_eq!(again.monthly_credits, 180);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_customer_is_not_found() {
        let directory = InMemoryDirectory::seeded();

        let err = directory.set_plan("nope", Plan::Basic).await.unwrap_err();
        assert!(matches!(err, CoreError::CustomerNotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn injected_failures_are_per_operation_and_still_counted() {
        let directory = InMemoryDirectory::seeded();
        directory.fail_on(DirectoryOp::TopUp);

        assert!(directory.top_up("1", 5).await.is_err());
        // Other operations are unaffected
        assert!(directory.set_plan("1", Plan::Lite).await.is_ok());
        assert_eq!(directory.calls(DirectoryOp::TopUp), 1);
        assert_eq!(directory.calls(DirectoryOp::SetPlan), 1);

        directory.clear_failure(DirectoryOp::TopUp);
        assert!(directory.top_up("1", 5).await.is_ok());
        assert_eq!(directory.calls(DirectoryOp::TopUp), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn list_returns_a_snapshot() {
        let directory = InMemoryDirectory::seeded();

        let customers = directory.list_customers().await.unwrap();
        assert_eq!(customers.len(), 5);
        assert_eq!(customers[0].name, "Acme Corp");
        assert_eq!(directory.calls(DirectoryOp::List), 1);
    }
}
