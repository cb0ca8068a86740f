//! Courier lifecycle

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use tms_shared::types::{Paginated, Pagination};

use crate::domain::{Courier, CourierStatus, CurrentUser};
use crate::error::DomainError;
use crate::repositories::{CourierRepository, NewCourier};

#[derive(Debug, Clone)]
pub struct DispatchInput {
    pub courier_provider: String,
    pub docket_no: String,
    pub pickup_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct DeliveryInput {
    pub delivery_date: NaiveDate,
    pub delivery_pod: Option<String>,
    pub delivered: bool,
}

pub struct CourierService<R: CourierRepository> {
    repo: Arc<R>,
}

impl<R: CourierRepository> CourierService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: NewCourier) -> Result<Courier, DomainError> {
        if input.to_org.trim().is_empty() || input.to_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "recipient organisation and name are required".into(),
            ));
        }
        let created = self.repo.create(&input).await?;
        info!(courier_id = created.id, to_org = %created.to_org, "courier created");
        Ok(created)
    }

    pub async fn find(&self, id: i64) -> Result<Courier, DomainError> {
        self.repo.find(id).await?.ok_or(DomainError::CourierNotFound(id))
    }

    pub async fn list(
        &self,
        current_user: &CurrentUser,
        pagination: Pagination,
    ) -> Result<Paginated<Courier>, DomainError> {
        let user_filter = if current_user.is_admin() { None } else { Some(current_user.id) };
        let (data, total) = self.repo.list(user_filter, &pagination).await?;
        Ok(Paginated::new(data, total, &pagination))
    }

    /// Pending -> Dispatched, with carrier details captured.
    pub async fn dispatch(&self, id: i64, input: DispatchInput) -> Result<Courier, DomainError> {
        if input.courier_provider.trim().is_empty() {
            return Err(DomainError::ValidationError("courier provider is required".into()));
        }
        if input.docket_no.trim().is_empty() {
            return Err(DomainError::ValidationError("docket number is required".into()));
        }

        let mut courier = self.find(id).await?;
        if courier.status != CourierStatus::Pending {
            return Err(DomainError::ValidationError(format!(
                "courier {} is not pending dispatch",
                id
            )));
        }

        courier.status = CourierStatus::Dispatched;
        courier.courier_provider = Some(input.courier_provider);
        courier.docket_no = Some(input.docket_no);
        courier.pickup_date = Some(input.pickup_date);
        courier.updated_at = Utc::now();

        self.repo.update(&courier).await
    }

    /// Dispatched -> Delivered / NotDelivered. `within_time` compares the
    /// delivery date to the expected date at day granularity.
    pub async fn record_delivery(
        &self,
        id: i64,
        input: DeliveryInput,
    ) -> Result<Courier, DomainError> {
        let mut courier = self.find(id).await?;
        if courier.status != CourierStatus::Dispatched {
            return Err(DomainError::ValidationError(format!(
                "courier {} has not been dispatched",
                id
            )));
        }

        courier.status = if input.delivered {
            CourierStatus::Delivered
        } else {
            CourierStatus::NotDelivered
        };
        courier.delivery_date = Some(input.delivery_date);
        courier.delivery_pod = input.delivery_pod;
        courier.within_time = Some(input.delivery_date <= courier.expected_delivery_date);
        courier.updated_at = Utc::now();

        self.repo.update(&courier).await
    }

    pub async fn reject(&self, id: i64) -> Result<Courier, DomainError> {
        let mut courier = self.find(id).await?;
        if courier.status != CourierStatus::Pending {
            return Err(DomainError::ValidationError(format!(
                "only pending couriers can be rejected, {} is not",
                id
            )));
        }
        courier.status = CourierStatus::Rejected;
        courier.updated_at = Utc::now();
        self.repo.update(&courier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::courier_repository::MockCourierRepository;
    use chrono::NaiveDate;

    fn courier(status: CourierStatus) -> Courier {
        Courier {
            id: 4,
            user_id: 7,
            to_org: "District Collectorate".into(),
            to_name: "Tender Cell".into(),
            to_addr: "Civil Lines".into(),
            to_pin: "440001".into(),
            to_mobile: "9876500000".into(),
            emp_from: "Head Office".into(),
            urgency: "normal".into(),
            expected_delivery_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            status,
            docs: vec![],
            courier_provider: None,
            docket_no: None,
            pickup_date: None,
            delivery_date: None,
            delivery_pod: None,
            within_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dispatch_input() -> DispatchInput {
        DispatchInput {
            courier_provider: "BlueDart".into(),
            docket_no: "BD-7781".into(),
            pickup_date: NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
        }
    }

    #[tokio::test]
    async fn dispatch_requires_pending_status() {
        let mut repo = MockCourierRepository::new();
        repo.expect_find()
            .returning(|_| Ok(Some(courier(CourierStatus::Delivered))));

        let svc = CourierService::new(Arc::new(repo));
        let err = svc.dispatch(4, dispatch_input()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn dispatch_validates_provider_and_docket() {
        let repo = MockCourierRepository::new();
        let svc = CourierService::new(Arc::new(repo));
        let err = svc
            .dispatch(4, DispatchInput { courier_provider: "  ".into(), ..dispatch_input() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn on_time_delivery_sets_within_time() {
        let mut repo = MockCourierRepository::new();
        repo.expect_find()
            .returning(|_| Ok(Some(courier(CourierStatus::Dispatched))));
        repo.expect_update()
            .withf(|c| c.status == CourierStatus::Delivered && c.within_time == Some(true))
            .returning(|c| Ok(c.clone()));

        let svc = CourierService::new(Arc::new(repo));
        svc.record_delivery(
            4,
            DeliveryInput {
                delivery_date: NaiveDate::from_ymd_opt(2025, 4, 9).unwrap(),
                delivery_pod: Some("pod/4.jpg".into()),
                delivered: true,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn late_delivery_is_flagged() {
        let mut repo = MockCourierRepository::new();
        repo.expect_find()
            .returning(|_| Ok(Some(courier(CourierStatus::Dispatched))));
        repo.expect_update()
            .withf(|c| c.within_time == Some(false))
            .returning(|c| Ok(c.clone()));

        let svc = CourierService::new(Arc::new(repo));
        svc.record_delivery(
            4,
            DeliveryInput {
                delivery_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
                delivery_pod: None,
                delivered: true,
            },
        )
        .await
        .unwrap();
    }
}
