//! Built-in workflow catalogue

use crate::domain::timer::TimerConfig;

use super::{
    CondOperator, CondValue, Conditional, WorkflowDefinition, WorkflowEntity, WorkflowStep,
};

pub static TENDERING_WORKFLOW: WorkflowDefinition = WorkflowDefinition {
    code: "TENDERING_WF",
    name: "Tendering Workflow",
    entity_type: WorkflowEntity::Tender,
    description: "Complete workflow for tender management",
    steps: &[
        WorkflowStep {
            step_key: "tender_info",
            step_name: "Tender Info",
            step_order: 1,
            assigned_role: "TE",
            timer_config: TimerConfig::fixed(72, true),
            depends_on: &[],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "tender_approval",
            step_name: "Tender Approval",
            step_order: 2,
            assigned_role: "TL",
            timer_config: TimerConfig::fixed(24, true),
            depends_on: &["tender_info"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "rfq_sent",
            step_name: "RFQ Sent",
            step_order: 3,
            assigned_role: "TE",
            timer_config: TimerConfig::fixed(24, true),
            depends_on: &["tender_approval"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "rfq_dashboard",
            step_name: "RFQ Dashboard",
            step_order: 4,
            assigned_role: "TE",
            timer_config: TimerConfig::no_timer(),
            depends_on: &["rfq_sent"],
            can_run_in_parallel: true,
            is_optional: true,
            conditional: None,
        },
        WorkflowStep {
            step_key: "emd_requested",
            step_name: "EMD Requested",
            step_order: 5,
            assigned_role: "TE",
            timer_config: TimerConfig::fixed(24, true),
            depends_on: &["tender_approval"],
            can_run_in_parallel: true,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_required",
                operator: CondOperator::Equals,
                value: CondValue::Bool(true),
            }),
        },
        WorkflowStep {
            step_key: "physical_docs",
            step_name: "Physical Docs",
            step_order: 6,
            assigned_role: "TE",
            timer_config: TimerConfig::fixed(48, true),
            depends_on: &["tender_approval"],
            can_run_in_parallel: true,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "document_checklist",
            step_name: "Document Checklist",
            step_order: 7,
            assigned_role: "TE",
            timer_config: TimerConfig::before_deadline(-72),
            depends_on: &["tender_approval"],
            can_run_in_parallel: true,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "costing_sheets",
            step_name: "Costing Sheets",
            step_order: 8,
            assigned_role: "TE",
            timer_config: TimerConfig::before_deadline(-72),
            depends_on: &["tender_approval"],
            can_run_in_parallel: true,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "costing_approval",
            step_name: "Costing Approval",
            step_order: 9,
            assigned_role: "TL",
            timer_config: TimerConfig::before_deadline(-48),
            depends_on: &["costing_sheets"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "bid_submission",
            step_name: "Bid Submission",
            step_order: 10,
            assigned_role: "TE",
            timer_config: TimerConfig::before_deadline(-24),
            depends_on: &["costing_approval"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "tq_replied",
            step_name: "TQ Replied",
            step_order: 11,
            assigned_role: "TE",
            timer_config: TimerConfig::deadline_based(),
            depends_on: &[],
            can_run_in_parallel: true,
            is_optional: true,
            conditional: None,
        },
        WorkflowStep {
            step_key: "ra_approved",
            step_name: "RA Approved",
            step_order: 12,
            assigned_role: "TL",
            timer_config: TimerConfig::no_timer(),
            depends_on: &[],
            can_run_in_parallel: true,
            is_optional: true,
            conditional: None,
        },
        WorkflowStep {
            step_key: "tender_result",
            step_name: "Tender Result",
            step_order: 13,
            assigned_role: "TE",
            timer_config: TimerConfig::no_timer(),
            depends_on: &[],
            can_run_in_parallel: true,
            is_optional: true,
            conditional: None,
        },
    ],
};

pub static COURIER_WORKFLOW: WorkflowDefinition = WorkflowDefinition {
    code: "COURIER_WF",
    name: "Courier Workflow",
    entity_type: WorkflowEntity::Courier,
    description: "Track courier from creation to delivery",
    steps: &[
        WorkflowStep {
            step_key: "courier_created",
            step_name: "Courier Created",
            step_order: 1,
            assigned_role: "TE",
            timer_config: TimerConfig::no_timer(),
            depends_on: &[],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "courier_dispatched",
            step_name: "Courier Dispatched",
            step_order: 2,
            assigned_role: "TE",
            timer_config: TimerConfig::fixed(2, true),
            depends_on: &["courier_created"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
    ],
};

pub static EMD_WORKFLOW: WorkflowDefinition = WorkflowDefinition {
    code: "EMD_WF",
    name: "EMD Processing Workflow",
    entity_type: WorkflowEntity::Emd,
    description: "EMD request to payment completion",
    steps: &[
        WorkflowStep {
            step_key: "pop_acc_form",
            step_name: "Pay on Portal - Accounts Form",
            step_order: 1,
            assigned_role: "AC",
            timer_config: TimerConfig::deadline_based(),
            depends_on: &["emd_requested"],
            can_run_in_parallel: false,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_type",
                operator: CondOperator::Equals,
                value: CondValue::Str("POP"),
            }),
        },
        WorkflowStep {
            step_key: "bt_acc_form",
            step_name: "Bank Transfer - Accounts Form",
            step_order: 2,
            assigned_role: "AC",
            timer_config: TimerConfig::deadline_based(),
            depends_on: &["emd_requested"],
            can_run_in_parallel: false,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_type",
                operator: CondOperator::Equals,
                value: CondValue::Str("BT"),
            }),
        },
        WorkflowStep {
            step_key: "cheque_acc_form",
            step_name: "Cheque - Accounts Form",
            step_order: 3,
            assigned_role: "AC",
            timer_config: TimerConfig::dynamic(true),
            depends_on: &["emd_requested"],
            can_run_in_parallel: false,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_type",
                operator: CondOperator::Equals,
                value: CondValue::Str("CHEQUE"),
            }),
        },
        WorkflowStep {
            step_key: "dd_acc_form",
            step_name: "Demand Draft - Accounts Form",
            step_order: 4,
            assigned_role: "AC",
            timer_config: TimerConfig::fixed(3, true),
            depends_on: &["emd_requested"],
            can_run_in_parallel: false,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_type",
                operator: CondOperator::Equals,
                value: CondValue::Str("DD"),
            }),
        },
        WorkflowStep {
            step_key: "fdr_acc_form",
            step_name: "FDR - Accounts Form",
            step_order: 5,
            assigned_role: "AC",
            timer_config: TimerConfig::fixed(3, true),
            depends_on: &["emd_requested"],
            can_run_in_parallel: false,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_type",
                operator: CondOperator::Equals,
                value: CondValue::Str("FDR"),
            }),
        },
        WorkflowStep {
            step_key: "bg_acc_form",
            step_name: "Bank Guarantee - Accounts Form",
            step_order: 6,
            assigned_role: "AC",
            timer_config: TimerConfig::deadline_based(),
            depends_on: &["emd_requested"],
            can_run_in_parallel: false,
            is_optional: true,
            conditional: Some(Conditional {
                field: "emd_type",
                operator: CondOperator::Equals,
                value: CondValue::Str("BG"),
            }),
        },
    ],
};

pub static OPERATION_WORKFLOW: WorkflowDefinition = WorkflowDefinition {
    code: "OPERATION_WF",
    name: "Operation Workflow",
    entity_type: WorkflowEntity::Operation,
    description: "Operation workflow for operation management",
    steps: &[
        WorkflowStep {
            step_key: "wo_details",
            step_name: "WO Details",
            step_order: 1,
            assigned_role: "TE",
            timer_config: TimerConfig::no_timer(),
            depends_on: &[],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "wo_acceptance",
            step_name: "WO Acceptance",
            step_order: 2,
            assigned_role: "TE",
            timer_config: TimerConfig::no_timer(),
            depends_on: &["wo_details"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
        WorkflowStep {
            step_key: "kickoff_meeting",
            step_name: "Kickoff Meeting",
            step_order: 3,
            assigned_role: "TE",
            timer_config: TimerConfig::no_timer(),
            depends_on: &["wo_acceptance"],
            can_run_in_parallel: false,
            is_optional: false,
            conditional: None,
        },
    ],
};

pub static WORKFLOWS: &[&WorkflowDefinition] = &[
    &TENDERING_WORKFLOW,
    &COURIER_WORKFLOW,
    &EMD_WORKFLOW,
    &OPERATION_WORKFLOW,
];
