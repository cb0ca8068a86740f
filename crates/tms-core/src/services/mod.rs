pub mod auth_service;
pub mod business_calendar;
pub mod costing_service;
pub mod courier_service;
pub mod dashboard_service;
pub mod follow_up_service;
pub mod imprest_service;
pub mod instrument_status;
pub mod mail_dispatch;
pub mod timer_service;
pub mod workflow_runner;

pub use auth_service::{AuthService, AuthTokens, LoginResult, UserInfo};
pub use business_calendar::BusinessCalendarService;
pub use costing_service::CostingService;
pub use courier_service::{CourierService, DeliveryInput, DispatchInput};
pub use dashboard_service::{DashboardService, TabRequest};
pub use follow_up_service::{
    ContactInput, CreateFollowUpInput, FollowUpService, StatusUpdateInput, UpdateFollowUpInput,
};
pub use imprest_service::ImprestService;
pub use instrument_status::InstrumentStatusService;
pub use mail_dispatch::FollowUpMailDispatcher;
pub use timer_service::{StartTimerInput, TimerActionInput, TimerService};
pub use workflow_runner::{WorkflowContext, WorkflowService};
