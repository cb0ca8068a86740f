//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("User not active")]
    UserNotActive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Tender {0} not found")]
    TenderNotFound(i64),

    #[error("Payment request {0} not found")]
    PaymentRequestNotFound(i64),

    #[error("Instrument {0} not found")]
    InstrumentNotFound(i64),

    #[error("Invalid status {status} for {kind}")]
    UnknownInstrumentStatus { kind: &'static str, status: String },

    #[error("Cannot transition from rejected status, resubmit instead")]
    TransitionFromRejected,

    #[error("Cannot transition from terminal status {0}")]
    TransitionFromTerminal(String),

    #[error("Cannot transition from stage {from} to stage {to}")]
    StageNotReachable { from: u8, to: u8 },

    #[error("Instrument {0} is not in rejected status")]
    NotRejected(i64),

    #[error("Timer not found for {entity_type}:{entity_id}:{stage}")]
    TimerNotFound { entity_type: String, entity_id: i64, stage: String },

    #[error("Timer already running")]
    TimerAlreadyRunning,

    #[error("Timer is paused, resume it instead")]
    TimerPaused,

    #[error("Cannot {action} timer with status {status}")]
    TimerStateConflict { action: &'static str, status: String },

    #[error("Allocated time must be greater than 0")]
    NonPositiveDuration,

    #[error("Workflow {0} not found")]
    WorkflowNotFound(String),

    #[error("Follow-up {0} not found")]
    FollowUpNotFound(i64),

    #[error("Courier {0} not found")]
    CourierNotFound(i64),

    #[error("Imprest entry {0} not found")]
    ImprestEntryNotFound(i64),

    #[error("Costing sheet {0} not found")]
    CostingSheetNotFound(i64),

    #[error("Costing sheet {id} is not pending (status: {status})")]
    CostingNotPending { id: i64, status: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Password too weak")]
    PasswordTooWeak,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Queue error: {0}")]
    QueueError(String),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
