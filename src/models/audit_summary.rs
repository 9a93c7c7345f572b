use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub total_assets: u64,
    pub hardware_count: u64,
    pub software_count: u64,
    pub assigned_assets: u64,
    pub in_stock_assets: u64,
    pub retired_assets: u64,
    pub software_seats_total: u64,
    pub software_seats_used: u64,
    pub software_seats_available: u64,
    pub user_events_today: u64,
    pub user_events_week: u64,
    pub asset_events_today: u64,
    pub asset_events_week: u64,
}

impl AuditSummary {
    /// Share of software seats in use, rounded down. Zero when no seats exist.
    pub fn seat_utilization_percent(&self) -> u64 {
        if self.software_seats_total == 0 {
            return 0;
        }
        self.software_seats_used.saturating_mul(100) / self.software_seats_total
    }
}
