// ── Customer domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Billing tier. Closed set; each tier implies a canonical monthly
/// credit allotment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum Plan {
    #[default]
    Trial,
    Basic,
    Lite,
    Enterprise,
    Ultimate,
}

impl Plan {
    /// All plans, in the order the edit pane cycles through them.
    pub const ALL: [Plan; 5] = [
        Self::Trial,
        Self::Lite,
        Self::Basic,
        Self::Enterprise,
        Self::Ultimate,
    ];

    /// Canonical monthly credit allotment for this plan.
    ///
    /// A plan change always overwrites the customer's monthly credits
    /// with this value; it never adds to or preserves the prior one.
    pub fn monthly_credits(self) -> i64 {
        match self {
            Self::Trial => 10,
            Self::Lite => 20,
            Self::Basic => 100,
            Self::Enterprise => 500,
            Self::Ultimate => 1000,
        }
    }

    /// Next plan in cycle order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous plan in cycle order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The canonical customer account type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Opaque identity, stable and unique within the collection.
    pub id: String,
    pub name: String,
    pub plan: Plan,
    pub monthly_credits: i64,
    /// Per-user credit cap; `None` means no cap is set.
    pub per_user_limit: Option<u32>,
    /// Consumed this billing period. Never mutated by this system.
    pub used_credits: i64,
    /// Seat count. Never mutated by this system.
    pub users: u32,
}

impl Customer {
    /// Credits left this period. May legitimately go negative; nothing
    /// clamps it.
    pub fn remaining_credits(&self) -> i64 {
        self.monthly_credits - self.used_credits
    }

    /// Stand-in record used when no customer is selected, so the edit
    /// state machine never sees an absent target.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            plan: Plan::Trial,
            monthly_credits: 0,
            per_user_limit: None,
            used_credits: 0,
            users: 0,
        }
    }

    /// Whether this is the [`placeholder`](Self::placeholder) record.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn canonical_monthly_credits_per_plan() {
        assert_eq!(Plan::Trial.monthly_credits(), 10);
        assert_eq!(Plan::Lite.monthly_credits(), 20);
        assert_eq!(Plan::Basic.monthly_credits(), 100);
        assert_eq!(Plan::Enterprise.monthly_credits(), 500);
        assert_eq!(Plan::Ultimate.monthly_credits(), 1000);
    }

    #[test]
    fn plan_name_round_trips() {
        for plan in Plan::ALL {
            assert_eq!(Plan::from_str(&plan.to_string()).unwrap(), plan);
        }
    }

    #[test]
    fn plan_cycling_wraps() {
        assert_eq!(Plan::Ultimate.next(), Plan::Trial);
        assert_eq!(Plan::Trial.prev(), Plan::Ultimate);
        for plan in Plan::ALL {
            assert_eq!(plan.next().prev(), plan);
        }
    }

    #[test]
    fn remaining_credits_may_go_negative() {
        let customer = Customer {
            id: "1".into(),
            name: "Acme Corp".into(),
            plan: Plan::Trial,
            monthly_credits: 10,
            per_user_limit: None,
            used_credits: 25,
            users: 3,
        };
        assert_eq!(customer.remaining_credits(), -15);
    }

    #[test]
    fn placeholder_has_empty_identity() {
        let placeholder = Customer::placeholder();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.plan, Plan::Trial);
        assert_eq!(placeholder.remaining_credits(), 0);
    }
}
