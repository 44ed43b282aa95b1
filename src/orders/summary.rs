use super::types::FilteredOrders;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Status that counts towards the shipped metric (exact, case-sensitive).
pub const SHIPPED_STATUS: &str = "Shipped";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Headline numbers shown above the order table and in the console report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total: usize,
    /// Most frequent first; ties keep first-appearance order.
    pub status_counts: Vec<StatusCount>,
    pub shipped: usize,
}

impl OrderSummary {
    pub fn from_statuses(statuses: &[Option<String>]) -> Self {
        let mut status_counts: Vec<StatusCount> = Vec::new();
        for status in statuses.iter().flatten() {
            match status_counts.iter_mut().find(|c| &c.status == status) {
                Some(entry) => entry.count += 1,
                None => status_counts.push(StatusCount {
                    status: status.clone(),
                    count: 1,
                }),
            }
        }
        // stable sort keeps first-seen order among equal counts
        status_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let shipped = statuses
            .iter()
            .filter(|s| s.as_deref() == Some(SHIPPED_STATUS))
            .count();

        Self {
            total: statuses.len(),
            status_counts,
            shipped,
        }
    }

    pub fn most_common_status(&self) -> Option<&str> {
        self.status_counts.first().map(|c| c.status.as_str())
    }
}

impl FilteredOrders {
    pub fn summary(&self) -> Result<OrderSummary> {
        Ok(OrderSummary::from_statuses(&self.statuses()?))
    }
}
