use chrono::NaiveDate;
use serde::Deserialize;

use rn_core::domain::entities::AnalyticsPeriod;

#[derive(Debug, Clone, Deserialize)]
pub struct CollectSnapshotRequest {
    pub date: NaiveDate,
    pub period: AnalyticsPeriod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub period: AnalyticsPeriod,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestQuery {
    pub period: AnalyticsPeriod,
}
