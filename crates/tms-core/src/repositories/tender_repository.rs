//! Tender repository trait (port)

use async_trait::async_trait;
use serde::Serialize;

use tms_shared::types::Pagination;

use crate::dashboard::{FieldCondition, TenderBucket};
use crate::domain::{Tender, TenderRow};
use crate::error::DomainError;

/// Resolved dashboard tab query, ready for SQL assembly.
#[derive(Debug, Clone)]
pub struct TabQuery {
    pub status_ids: Vec<i32>,
    pub field_conditions: Vec<FieldCondition>,
    pub team_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: String,
    pub sort_desc: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketCount {
    pub bucket: TenderBucket,
    pub count: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenderRepository: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<Tender>, DomainError>;
    async fn list_tab(
        &self,
        query: &TabQuery,
        pagination: &Pagination,
    ) -> Result<(Vec<TenderRow>, i64), DomainError>;
    async fn bucket_counts(&self, team_id: Option<i64>) -> Result<Vec<BucketCount>, DomainError>;
}
