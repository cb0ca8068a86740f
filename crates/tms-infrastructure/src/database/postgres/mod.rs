pub mod calendar_repo_impl;
pub mod costing_repo_impl;
pub mod courier_repo_impl;
pub mod email_log_repo_impl;
pub mod follow_up_repo_impl;
pub mod imprest_repo_impl;
pub mod instrument_repo_impl;
pub mod tender_repo_impl;
pub mod timer_repo_impl;
pub mod user_repo_impl;

pub use calendar_repo_impl::PgCalendarRepository;
pub use costing_repo_impl::PgCostingRepository;
pub use courier_repo_impl::PgCourierRepository;
pub use email_log_repo_impl::PgEmailLogRepository;
pub use follow_up_repo_impl::PgFollowUpRepository;
pub use imprest_repo_impl::PgImprestRepository;
pub use instrument_repo_impl::PgInstrumentRepository;
pub use tender_repo_impl::PgTenderRepository;
pub use timer_repo_impl::PgTimerRepository;
pub use user_repo_impl::PgUserRepository;
