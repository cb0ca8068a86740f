//! Follow-up domain entity and recurrence rules

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Alternate,
    Weekly,
    Biweekly,
    Monthly,
    Stopped,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Alternate => "alternate",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Stopped => "stopped",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Frequency::Daily),
            "alternate" => Some(Frequency::Alternate),
            "weekly" => Some(Frequency::Weekly),
            "biweekly" => Some(Frequency::Biweekly),
            "monthly" => Some(Frequency::Monthly),
            "stopped" => Some(Frequency::Stopped),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Alternate => "Alternate Days",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Bi-Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Stopped => "Stopped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    PartyAngry,
    ObjectiveAchieved,
    NotReachable,
    Other,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::PartyAngry => "party_angry",
            StopReason::ObjectiveAchieved => "objective_achieved",
            StopReason::NotReachable => "not_reachable",
            StopReason::Other => "other",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "party_angry" => Some(StopReason::PartyAngry),
            "objective_achieved" => Some(StopReason::ObjectiveAchieved),
            "not_reachable" => Some(StopReason::NotReachable),
            "other" => Some(StopReason::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StopReason::PartyAngry => "Party Angry / Not Interested",
            StopReason::ObjectiveAchieved => "Objective Achieved",
            StopReason::NotReachable => "Not Reachable",
            StopReason::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub org: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUp {
    pub id: i64,
    pub area: String,
    pub party_name: String,
    pub amount: Decimal,
    pub assigned_to_id: i64,
    pub created_by_id: i64,
    pub assignment_status: String,
    pub details: Option<String>,
    pub latest_comment: Option<String>,
    pub frequency: Frequency,
    pub start_from: NaiveDate,
    pub reminder_count: i32,
    pub stop_reason: Option<StopReason>,
    pub proof_text: Option<String>,
    pub proof_image_path: Option<String>,
    pub stop_remarks: Option<String>,
    pub contacts: Vec<FollowUpContact>,
    pub attachments: Vec<String>,
    pub instrument_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FollowUp {
    /// Whether a reminder is owed on `date` given the recurrence rule.
    ///
    /// Monthly recurrence fires on the same day-of-month as `start_from`,
    /// clamped to the last day of shorter months.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        if self.frequency == Frequency::Stopped || date < self.start_from {
            return false;
        }

        let elapsed_days = (date - self.start_from).num_days();
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Alternate => elapsed_days % 2 == 0,
            Frequency::Weekly => elapsed_days % 7 == 0,
            Frequency::Biweekly => elapsed_days % 14 == 0,
            Frequency::Monthly => {
                let wanted = self.start_from.day();
                let last_of_month = last_day_of_month(date);
                date.day() == wanted.min(last_of_month)
            }
            Frequency::Stopped => false,
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    let first_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    first_next
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Listing tabs: which slice of follow-ups a dashboard view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpTab {
    Ongoing,
    Achieved,
    Angry,
    Future,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn follow_up(frequency: Frequency, start_from: NaiveDate) -> FollowUp {
        FollowUp {
            id: 1,
            area: "North".into(),
            party_name: "Acme Infra".into(),
            amount: Decimal::ZERO,
            assigned_to_id: 7,
            created_by_id: 1,
            assignment_status: "assigned".into(),
            details: None,
            latest_comment: None,
            frequency,
            start_from,
            reminder_count: 0,
            stop_reason: None,
            proof_text: None,
            proof_image_path: None,
            stop_remarks: None,
            contacts: vec![],
            attachments: vec![],
            instrument_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_due_every_day_from_start() {
        let fu = follow_up(Frequency::Daily, date(2025, 3, 10));
        assert!(!fu.is_due_on(date(2025, 3, 9)));
        assert!(fu.is_due_on(date(2025, 3, 10)));
        assert!(fu.is_due_on(date(2025, 3, 11)));
    }

    #[test]
    fn alternate_skips_odd_offsets() {
        let fu = follow_up(Frequency::Alternate, date(2025, 3, 10));
        assert!(fu.is_due_on(date(2025, 3, 10)));
        assert!(!fu.is_due_on(date(2025, 3, 11)));
        assert!(fu.is_due_on(date(2025, 3, 12)));
    }

    #[test]
    fn weekly_and_biweekly_align_to_start() {
        let weekly = follow_up(Frequency::Weekly, date(2025, 3, 10));
        assert!(weekly.is_due_on(date(2025, 3, 17)));
        assert!(!weekly.is_due_on(date(2025, 3, 18)));

        let biweekly = follow_up(Frequency::Biweekly, date(2025, 3, 10));
        assert!(!biweekly.is_due_on(date(2025, 3, 17)));
        assert!(biweekly.is_due_on(date(2025, 3, 24)));
    }

    #[test]
    fn monthly_clamps_to_short_months() {
        let fu = follow_up(Frequency::Monthly, date(2025, 1, 31));
        assert!(fu.is_due_on(date(2025, 2, 28)));
        assert!(!fu.is_due_on(date(2025, 2, 27)));
        assert!(fu.is_due_on(date(2025, 3, 31)));
    }

    #[test]
    fn stopped_is_never_due() {
        let fu = follow_up(Frequency::Stopped, date(2025, 3, 10));
        assert!(!fu.is_due_on(date(2025, 3, 10)));
    }
}
