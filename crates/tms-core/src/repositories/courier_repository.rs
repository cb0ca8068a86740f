//! Courier repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;

use tms_shared::types::Pagination;

use crate::domain::{Courier, CourierDoc};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct NewCourier {
    pub user_id: i64,
    pub to_org: String,
    pub to_name: String,
    pub to_addr: String,
    pub to_pin: String,
    pub to_mobile: String,
    pub emp_from: String,
    pub urgency: String,
    pub expected_delivery_date: NaiveDate,
    pub docs: Vec<CourierDoc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourierRepository: Send + Sync {
    async fn create(&self, courier: &NewCourier) -> Result<Courier, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<Courier>, DomainError>;
    async fn update(&self, courier: &Courier) -> Result<Courier, DomainError>;
    async fn list(
        &self,
        user_id: Option<i64>,
        pagination: &Pagination,
    ) -> Result<(Vec<Courier>, i64), DomainError>;
}
