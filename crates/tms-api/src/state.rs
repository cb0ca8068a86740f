use std::sync::Arc;

use sqlx::PgPool;

use tms_core::services::{
    AuthService, BusinessCalendarService, CostingService, CourierService, DashboardService,
    FollowUpService, ImprestService, InstrumentStatusService, TimerService, WorkflowService,
};
use tms_infrastructure::database::postgres::{
    PgCalendarRepository, PgCostingRepository, PgCourierRepository, PgFollowUpRepository,
    PgImprestRepository, PgInstrumentRepository, PgTenderRepository, PgTimerRepository,
    PgUserRepository,
};
use tms_security::jwt::JwtService;
use tms_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: AppConfig,
    pub jwt: Arc<JwtService>,
    pub users: Arc<PgUserRepository>,
    pub auth: Arc<AuthService<PgUserRepository>>,
    pub instruments: Arc<PgInstrumentRepository>,
    pub instrument_status: Arc<InstrumentStatusService<PgInstrumentRepository>>,
    pub timers: Arc<TimerService<PgTimerRepository>>,
    pub workflows: Arc<WorkflowService<PgTimerRepository, PgCalendarRepository>>,
    pub calendar: Arc<BusinessCalendarService<PgCalendarRepository>>,
    pub follow_ups: Arc<FollowUpService<PgFollowUpRepository>>,
    pub couriers: Arc<CourierService<PgCourierRepository>>,
    pub imprest: Arc<ImprestService<PgImprestRepository>>,
    pub costing: Arc<CostingService<PgCostingRepository>>,
    pub dashboards: Arc<DashboardService<PgTenderRepository>>,
}

impl AppState {
    pub fn build(db: PgPool, config: AppConfig) -> Self {
        let jwt = Arc::new(JwtService::new(
            config.jwt.secret.clone(),
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
        ));

        let users = Arc::new(PgUserRepository::new(db.clone()));
        let instruments = Arc::new(PgInstrumentRepository::new(db.clone()));
        let timer_repo = Arc::new(PgTimerRepository::new(db.clone()));
        let calendar_repo = Arc::new(PgCalendarRepository::new(db.clone()));

        let auth = Arc::new(AuthService::new(
            users.clone(),
            JwtService::new(
                config.jwt.secret.clone(),
                config.jwt.access_token_expiry,
                config.jwt.refresh_token_expiry,
            ),
        ));
        let instrument_status = Arc::new(InstrumentStatusService::new(instruments.clone()));
        let timers = Arc::new(TimerService::new(timer_repo));
        let calendar = Arc::new(BusinessCalendarService::new(calendar_repo));
        let workflows = Arc::new(WorkflowService::new(timers.clone(), calendar.clone()));
        let follow_ups = Arc::new(FollowUpService::new(Arc::new(PgFollowUpRepository::new(
            db.clone(),
        ))));
        let couriers = Arc::new(CourierService::new(Arc::new(PgCourierRepository::new(
            db.clone(),
        ))));
        let imprest = Arc::new(ImprestService::new(Arc::new(PgImprestRepository::new(
            db.clone(),
        ))));
        let costing = Arc::new(CostingService::new(Arc::new(PgCostingRepository::new(
            db.clone(),
        ))));
        let dashboards = Arc::new(DashboardService::new(Arc::new(PgTenderRepository::new(
            db.clone(),
        ))));

        Self {
            db,
            config,
            jwt,
            users,
            auth,
            instruments,
            instrument_status,
            timers,
            workflows,
            calendar,
            follow_ups,
            couriers,
            imprest,
            costing,
            dashboards,
        }
    }
}
