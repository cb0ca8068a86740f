//! Repository traits (ports)

pub mod calendar_repository;
pub mod costing_repository;
pub mod courier_repository;
pub mod email_repository;
pub mod follow_up_repository;
pub mod imprest_repository;
pub mod instrument_repository;
pub mod tender_repository;
pub mod timer_repository;
pub mod user_repository;

pub use calendar_repository::CalendarRepository;
pub use costing_repository::CostingRepository;
pub use courier_repository::{CourierRepository, NewCourier};
pub use email_repository::{EmailLogRepository, MailQueue, NewEmailLog, OutboundEmail};
pub use follow_up_repository::{
    FollowUpAmountSummary, FollowUpListFilter, FollowUpRepository, NewFollowUp,
};
pub use imprest_repository::ImprestRepository;
pub use instrument_repository::{
    InstrumentRepository, NewInstrument, NewPaymentRequest, NewStatusHistory,
};
pub use tender_repository::{BucketCount, TabQuery, TenderRepository};
pub use timer_repository::{NewTimerEvent, TimerRepository};
pub use user_repository::{NewUser, UserRepository};
