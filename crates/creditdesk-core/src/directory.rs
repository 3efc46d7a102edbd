// ── Directory service contract ──
//
// The store and editor only ever talk to this trait. Production wires
// in the HTTP client from `creditdesk-api`; tests and the
// zero-configuration demo mode use `fixture::InMemoryDirectory`.

use std::str::FromStr;

use async_trait::async_trait;

use creditdesk_api::{CustomerRecord, DirectoryClient};

use crate::error::CoreError;
use crate::model::{Customer, Plan};

/// Async contract for the customer directory service.
///
/// Every operation is independently invocable and may fail on its own;
/// there is no batch endpoint. Mutations return the full updated record.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Fetch the full customer collection.
    async fn list_customers(&self) -> Result<Vec<Customer>, CoreError>;

    /// Change a customer's plan. The directory recomputes the monthly
    /// credit allotment from the canonical plan table.
    async fn set_plan(&self, id: &str, plan: Plan) -> Result<Customer, CoreError>;

    /// Set (`Some`) or clear (`None`) a customer's per-user limit.
    async fn set_per_user_limit(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<Customer, CoreError>;

    /// Add `amount` to a customer's monthly credits.
    async fn top_up(&self, id: &str, amount: u32) -> Result<Customer, CoreError>;
}

// ── HTTP implementation ──────────────────────────────────────────────

/// Convert a wire record into the domain type.
///
/// The wire format carries the plan as a string; a tier this build
/// doesn't know is a contract break, not user error.
fn into_domain(record: CustomerRecord) -> Result<Customer, CoreError> {
    let plan = Plan::from_str(&record.plan)
        .map_err(|_| CoreError::Internal(format!("unknown plan in response: {}", record.plan)))?;
    Ok(Customer {
        id: record.id,
        name: record.name,
        plan,
        monthly_credits: record.monthly_credits,
        per_user_limit: record.per_user_limit,
        used_credits: record.used_credits,
        users: record.users,
    })
}

#[async_trait]
impl CustomerDirectory for DirectoryClient {
    async fn list_customers(&self) -> Result<Vec<Customer>, CoreError> {
        let records = DirectoryClient::list_customers(self).await?;
        records.into_iter().map(into_domain).collect()
    }

    async fn set_plan(&self, id: &str, plan: Plan) -> Result<Customer, CoreError> {
        let record = DirectoryClient::set_plan(self, id, &plan.to_string()).await?;
        into_domain(record)
    }

    async fn set_per_user_limit(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<Customer, CoreError> {
        let record = DirectoryClient::set_per_user_limit(self, id, limit).await?;
        into_domain(record)
    }

    async fn top_up(&self, id: &str, amount: u32) -> Result<Customer, CoreError> {
        let record = DirectoryClient::top_up(self, id, amount).await?;
        into_domain(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(plan: &str) -> CustomerRecord {
        CustomerRecord {
            id: "1".into(),
            name: "Acme Corp".into(),
            plan: plan.into(),
            monthly_credits: 500,
            per_user_limit: Some(50),
            used_credits: 120,
            users: 10,
        }
    }

    #[test]
    fn wire_record_converts_to_domain() {
        let customer = into_domain(record("Enterprise")).unwrap();
        assert_eq!(customer.plan, Plan::Enterprise);
        assert_eq!(customer.per_user_limit, Some(50));
        assert_eq!(customer.remaining_credits(), 380);
    }

    #[test]
    fn unknown_plan_is_rejected() {
        let err = into_domain(record("Platinum")).unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
