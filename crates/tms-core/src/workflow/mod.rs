//! Workflow definitions
//!
//! Workflows are static data: an ordered list of steps, each with a timer
//! profile, dependencies and an optional entry condition evaluated against a
//! JSON view of the owning entity.

mod definitions;

use serde::Serialize;
use serde_json::Value;

use crate::domain::timer::TimerConfig;

pub use definitions::{
    COURIER_WORKFLOW, EMD_WORKFLOW, OPERATION_WORKFLOW, TENDERING_WORKFLOW, WORKFLOWS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowEntity {
    Tender,
    Courier,
    Emd,
    Operation,
}

impl WorkflowEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowEntity::Tender => "TENDER",
            WorkflowEntity::Courier => "COURIER",
            WorkflowEntity::Emd => "EMD",
            WorkflowEntity::Operation => "OPERATION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CondValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

/// Entry condition on a step, checked against the entity context.
#[derive(Debug, Clone, Copy)]
pub struct Conditional {
    pub field: &'static str,
    pub operator: CondOperator,
    pub value: CondValue,
}

impl Conditional {
    /// Missing fields never satisfy the condition.
    pub fn evaluate(&self, ctx: &Value) -> bool {
        let Some(actual) = ctx.get(self.field) else {
            return false;
        };

        match self.operator {
            CondOperator::Equals => self.matches_eq(actual),
            CondOperator::NotEquals => !self.matches_eq(actual),
            CondOperator::GreaterThan => match (actual.as_i64(), self.value) {
                (Some(a), CondValue::Int(b)) => a > b,
                _ => false,
            },
            CondOperator::LessThan => match (actual.as_i64(), self.value) {
                (Some(a), CondValue::Int(b)) => a < b,
                _ => false,
            },
            CondOperator::Contains => match (actual.as_str(), self.value) {
                (Some(a), CondValue::Str(b)) => a.contains(b),
                _ => false,
            },
        }
    }

    fn matches_eq(&self, actual: &Value) -> bool {
        match self.value {
            CondValue::Bool(b) => actual.as_bool() == Some(b),
            CondValue::Int(i) => actual.as_i64() == Some(i),
            CondValue::Str(s) => actual.as_str() == Some(s),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkflowStep {
    pub step_key: &'static str,
    pub step_name: &'static str,
    pub step_order: u32,
    pub assigned_role: &'static str,
    pub timer_config: TimerConfig,
    pub depends_on: &'static [&'static str],
    pub can_run_in_parallel: bool,
    pub is_optional: bool,
    pub conditional: Option<Conditional>,
}

impl WorkflowStep {
    /// Whether the step applies to this entity at all.
    pub fn applies_to(&self, ctx: &Value) -> bool {
        self.conditional.map_or(true, |cond| cond.evaluate(ctx))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkflowDefinition {
    pub code: &'static str,
    pub name: &'static str,
    pub entity_type: WorkflowEntity,
    pub description: &'static str,
    pub steps: &'static [WorkflowStep],
}

impl WorkflowDefinition {
    pub fn step(&self, step_key: &str) -> Option<&'static WorkflowStep> {
        self.steps.iter().find(|s| s.step_key == step_key)
    }
}

pub fn workflow(code: &str) -> Option<&'static WorkflowDefinition> {
    WORKFLOWS.iter().find(|w| w.code == code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_codes_resolve() {
        assert!(workflow("TENDERING_WF").is_some());
        assert!(workflow("COURIER_WF").is_some());
        assert!(workflow("EMD_WF").is_some());
        assert!(workflow("OPERATION_WF").is_some());
        assert!(workflow("NOPE_WF").is_none());
    }

    #[test]
    fn conditional_equals_on_bool_field() {
        let step = workflow("TENDERING_WF").unwrap().step("emd_requested").unwrap();
        assert!(step.applies_to(&json!({ "emd_required": true })));
        assert!(!step.applies_to(&json!({ "emd_required": false })));
        assert!(!step.applies_to(&json!({})));
    }

    #[test]
    fn emd_steps_select_by_instrument_kind() {
        let wf = workflow("EMD_WF").unwrap();
        let dd_step = wf.step("dd_acc_form").unwrap();
        assert!(dd_step.applies_to(&json!({ "emd_type": "DD" })));
        assert!(!dd_step.applies_to(&json!({ "emd_type": "BG" })));
    }

    #[test]
    fn unconditional_steps_always_apply() {
        let step = workflow("TENDERING_WF").unwrap().step("tender_info").unwrap();
        assert!(step.applies_to(&json!({})));
    }

    #[test]
    fn dependencies_reference_existing_steps() {
        for wf in WORKFLOWS {
            for step in wf.steps {
                for dep in step.depends_on {
                    // EMD accounts-form steps hang off the tendering step that
                    // raised the request, so cross-workflow keys are allowed
                    // only for that known seam.
                    if *dep == "emd_requested" && wf.code == "EMD_WF" {
                        continue;
                    }
                    assert!(
                        wf.step(dep).is_some(),
                        "{} step {} depends on unknown {}",
                        wf.code,
                        step.step_key,
                        dep
                    );
                }
            }
        }
    }
}
