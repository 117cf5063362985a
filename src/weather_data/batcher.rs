//! Partitions records into groups sharing one event date, so a single API call
//! serves every record of that date.

use crate::types::stranding_record::StrandingRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Records sharing one event date, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup<'a> {
    /// The shared event date, `None` for records whose date could not be parsed.
    pub date: Option<NaiveDate>,
    /// `(position in the input slice, record)` pairs in first-seen order.
    pub members: Vec<(usize, &'a StrandingRecord)>,
}

impl<'a> DateGroup<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a StrandingRecord> + '_ {
        self.members.iter().map(|(_, record)| *record)
    }
}

/// Groups records by exact event date.
///
/// Groups are ordered by ascending date, followed by the group of records without
/// a date (if any). Within a group records keep their input order. Every record
/// lands in exactly one group.
pub fn group_by_date(records: &[StrandingRecord]) -> Vec<DateGroup<'_>> {
    let mut dated: BTreeMap<NaiveDate, Vec<(usize, &StrandingRecord)>> = BTreeMap::new();
    let mut undated = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match record.event_date {
            Some(date) => dated.entry(date).or_default().push((position, record)),
            None => undated.push((position, record)),
        }
    }

    let mut groups: Vec<DateGroup> = dated
        .into_iter()
        .map(|(date, members)| DateGroup {
            date: Some(date),
            members,
        })
        .collect();

    if !undated.is_empty() {
        groups.push(DateGroup {
            date: None,
            members: undated,
        });
    }
    groups
}
