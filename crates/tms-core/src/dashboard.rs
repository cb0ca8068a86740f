//! Dashboard tab configuration
//!
//! Tender statuses are grouped into buckets; each dashboard tab names the
//! bucket and/or explicit status ids it shows plus extra field conditions.
//! The data layer turns the resolved config into SQL.

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct TenderStatusDef {
    pub id: i32,
    pub key: &'static str,
    pub name: &'static str,
}

/// Master status catalogue, seeded into the `statuses` table.
pub const TENDER_STATUSES: &[TenderStatusDef] = &[
    TenderStatusDef { id: 1, key: "new", name: "New" },
    TenderStatusDef { id: 2, key: "info_submitted", name: "Info Submitted" },
    TenderStatusDef { id: 3, key: "approved", name: "Approved" },
    TenderStatusDef { id: 4, key: "rfq_sent", name: "RFQ Sent" },
    TenderStatusDef { id: 5, key: "costing_pending", name: "Costing Pending" },
    TenderStatusDef { id: 6, key: "costing_approved", name: "Costing Approved" },
    TenderStatusDef { id: 7, key: "bid_submitted", name: "Bid Submitted" },
    TenderStatusDef { id: 8, key: "tq_received", name: "TQ Received" },
    TenderStatusDef { id: 9, key: "ra_scheduled", name: "RA Scheduled" },
    TenderStatusDef { id: 10, key: "awarded", name: "Awarded" },
    TenderStatusDef { id: 11, key: "lost", name: "Lost" },
    TenderStatusDef { id: 12, key: "dnb", name: "Did Not Bid" },
    TenderStatusDef { id: 13, key: "cancelled", name: "Cancelled" },
    TenderStatusDef { id: 14, key: "archived", name: "Archived" },
];

pub fn status_by_key(key: &str) -> Option<&'static TenderStatusDef> {
    TENDER_STATUSES.iter().find(|s| s.key == key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderBucket {
    /// In preparation: anything before the bid goes out.
    Live,
    /// Bid out the door, outcome unknown.
    Submitted,
    /// Decided either way.
    Results,
    /// Never bid or taken off the board.
    Closed,
}

impl TenderBucket {
    pub const ALL: &'static [TenderBucket] = &[
        TenderBucket::Live,
        TenderBucket::Submitted,
        TenderBucket::Results,
        TenderBucket::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenderBucket::Live => "live",
            TenderBucket::Submitted => "submitted",
            TenderBucket::Results => "results",
            TenderBucket::Closed => "closed",
        }
    }

    pub fn status_ids(&self) -> &'static [i32] {
        match self {
            TenderBucket::Live => &[1, 2, 3, 4, 5, 6],
            TenderBucket::Submitted => &[7, 8, 9],
            TenderBucket::Results => &[10, 11],
            TenderBucket::Closed => &[12, 13, 14],
        }
    }
}

/// Reverse lookup from a status id to its display bucket.
pub fn bucket_for_status(status_id: i32) -> Option<TenderBucket> {
    TenderBucket::ALL
        .iter()
        .find(|bucket| bucket.status_ids().contains(&status_id))
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenderField {
    DueDate,
    EmdAmount,
    TeamMember,
}

impl TenderField {
    pub fn column(&self) -> &'static str {
        match self {
            TenderField::DueDate => "t.due_date",
            TenderField::EmdAmount => "t.emd_amount",
            TenderField::TeamMember => "t.team_member",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldCondition {
    IsNull(TenderField),
    IsNotNull(TenderField),
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardTab {
    pub key: &'static str,
    pub title: &'static str,
    pub bucket: Option<TenderBucket>,
    pub status_ids: &'static [i32],
    pub exclude_status_ids: &'static [i32],
    pub field_conditions: &'static [FieldCondition],
    pub sort_by: &'static str,
    pub sort_desc: bool,
}

impl DashboardTab {
    /// Union of explicit ids and the bucket's ids, minus exclusions.
    pub fn effective_status_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.status_ids.to_vec();
        if let Some(bucket) = self.bucket {
            for id in bucket.status_ids() {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids.retain(|id| !self.exclude_status_ids.contains(id));
        ids
    }
}

pub const TENDERING_DASHBOARD_TABS: &[DashboardTab] = &[
    DashboardTab {
        key: "live",
        title: "Live Tenders",
        bucket: Some(TenderBucket::Live),
        status_ids: &[],
        exclude_status_ids: &[],
        field_conditions: &[FieldCondition::IsNotNull(TenderField::DueDate)],
        sort_by: "due_date",
        sort_desc: false,
    },
    DashboardTab {
        key: "missing_due_date",
        title: "Missing Due Date",
        bucket: Some(TenderBucket::Live),
        status_ids: &[],
        exclude_status_ids: &[],
        field_conditions: &[FieldCondition::IsNull(TenderField::DueDate)],
        sort_by: "updated_at",
        sort_desc: true,
    },
    DashboardTab {
        key: "unassigned",
        title: "Unassigned",
        bucket: Some(TenderBucket::Live),
        status_ids: &[],
        exclude_status_ids: &[],
        field_conditions: &[FieldCondition::IsNull(TenderField::TeamMember)],
        sort_by: "due_date",
        sort_desc: false,
    },
    DashboardTab {
        key: "submitted",
        title: "Submitted",
        bucket: Some(TenderBucket::Submitted),
        status_ids: &[],
        exclude_status_ids: &[],
        field_conditions: &[],
        sort_by: "due_date",
        sort_desc: false,
    },
    DashboardTab {
        key: "results",
        title: "Results",
        bucket: Some(TenderBucket::Results),
        status_ids: &[],
        exclude_status_ids: &[],
        field_conditions: &[],
        sort_by: "updated_at",
        sort_desc: true,
    },
    DashboardTab {
        key: "emd_pending",
        title: "EMD Pending",
        bucket: Some(TenderBucket::Live),
        status_ids: &[7],
        exclude_status_ids: &[12],
        field_conditions: &[FieldCondition::IsNotNull(TenderField::EmdAmount)],
        sort_by: "due_date",
        sort_desc: false,
    },
    DashboardTab {
        key: "closed",
        title: "Closed",
        bucket: Some(TenderBucket::Closed),
        status_ids: &[],
        exclude_status_ids: &[],
        field_conditions: &[],
        sort_by: "updated_at",
        sort_desc: true,
    },
];

pub fn tab_config(tab_key: &str) -> Option<&'static DashboardTab> {
    TENDERING_DASHBOARD_TABS.iter().find(|tab| tab.key == tab_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_belongs_to_exactly_one_bucket() {
        for status in TENDER_STATUSES {
            let owners: Vec<_> = TenderBucket::ALL
                .iter()
                .filter(|b| b.status_ids().contains(&status.id))
                .collect();
            assert_eq!(owners.len(), 1, "status {} owned by {:?}", status.key, owners);
        }
    }

    #[test]
    fn bucket_lookup_round_trips() {
        assert_eq!(bucket_for_status(1), Some(TenderBucket::Live));
        assert_eq!(bucket_for_status(11), Some(TenderBucket::Results));
        assert_eq!(bucket_for_status(99), None);
    }

    #[test]
    fn tab_union_applies_exclusions() {
        let tab = tab_config("emd_pending").unwrap();
        let ids = tab.effective_status_ids();
        assert!(ids.contains(&7));
        assert!(ids.contains(&1));
        assert!(!ids.contains(&12));
    }

    #[test]
    fn unknown_tab_is_none() {
        assert!(tab_config("nope").is_none());
    }
}
