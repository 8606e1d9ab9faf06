use std::collections::BTreeMap;

use crate::models::PeerRecord;

/// Leave categories tracked by the comparison charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LeaveType {
    HalfDay,
    FullDay,
}

impl LeaveType {
    pub const ALL: [LeaveType; 2] = [LeaveType::HalfDay, LeaveType::FullDay];

    pub fn label(self) -> &'static str {
        match self {
            LeaveType::HalfDay => "Half-Day",
            LeaveType::FullDay => "Full-Day",
        }
    }

    fn value(self, record: &PeerRecord) -> f64 {
        match self {
            LeaveType::HalfDay => record.half_day_leaves.unwrap_or(0.0),
            LeaveType::FullDay => record.full_day_leaves.unwrap_or(0.0),
        }
    }
}

/// Mean of each requested leave field across the records, rounded to the
/// nearest whole number. An empty input yields 0 for every field rather
/// than an error: "no peers" is a legal comparison baseline.
pub fn compute_averages<'a, I>(records: I, fields: &[LeaveType]) -> BTreeMap<LeaveType, i64>
where
    I: IntoIterator<Item = &'a PeerRecord>,
{
    let mut count = 0usize;
    let mut sums = vec![0.0; fields.len()];

    for record in records {
        count += 1;
        for (sum, field) in sums.iter_mut().zip(fields) {
            *sum += field.value(record);
        }
    }

    fields
        .iter()
        .zip(sums)
        .map(|(&field, sum)| {
            let average = if count == 0 {
                0
            } else {
                (sum / count as f64).round() as i64
            };
            (field, average)
        })
        .collect()
}

/// Peers billed against the same account, compared after trimming and
/// lowercasing both sides.
pub fn account_group<'a>(
    records: &'a [PeerRecord],
    account_code: &str,
) -> impl Iterator<Item = &'a PeerRecord> {
    let needle = normalize_account(account_code);
    records
        .iter()
        .filter(move |record| normalize_account(&record.account_code) == needle)
}

fn normalize_account(code: &str) -> String {
    code.trim().to_lowercase()
}
