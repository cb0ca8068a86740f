pub mod costing;
pub mod courier;
pub mod follow_up;
pub mod imprest;
pub mod instrument;
pub mod instrument_stages;
pub mod tender;
pub mod timer;
pub mod user;

pub use costing::{CostingApprovalRow, CostingSheet, CostingStatus};
pub use courier::{Courier, CourierDoc, CourierStatus};
pub use follow_up::{FollowUp, FollowUpContact, FollowUpTab, Frequency, StopReason};
pub use imprest::{EmployeeImprestSummary, ImprestEntry, ImprestTransaction, ImprestVoucher};
pub use instrument::{
    AvailableActions, InstrumentKind, InstrumentStatusHistory, PaymentInstrument, PaymentPurpose,
    PaymentRequest, StageSummary, StatusChangeContext,
};
pub use tender::{Tender, TenderRow};
pub use timer::{
    TimerConfig, TimerEvent, TimerEventType, TimerSnapshot, TimerStatus, TimerTracker, TimerType,
};
pub use user::{CurrentUser, Role, User};
