use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{Months, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;

use crate::model::plan::{Milestone, Workstream};

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"))
}

/// Strict `YYYY-MM-DD` shape check. Anything else is opaque to this layer.
pub fn is_iso_date(s: &str) -> bool {
    iso_date_re().is_match(s)
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    if !is_iso_date(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Canonicalize milestone date ranges in place.
///
/// Only milestones where both dates are strict, valid ISO dates are touched:
/// while `end < start`, a year is added to `end`. That conservatively repairs
/// day/month swaps and year-only typos without ever rejecting input. Missing,
/// non-ISO, or non-calendar dates pass through untouched.
pub fn normalize_milestone_dates(milestones: &mut [Milestone]) {
    for ms in milestones.iter_mut() {
        let (Some(start_str), Some(end_str)) = (&ms.start_date, &ms.end_date) else {
            continue;
        };
        let (Some(start), Some(mut end)) = (parse_iso(start_str), parse_iso(end_str)) else {
            continue;
        };
        while end < start {
            let Some(bumped) = end.checked_add_months(Months::new(12)) else {
                break;
            };
            end = bumped;
        }
        ms.start_date = Some(start.format("%Y-%m-%d").to_string());
        ms.end_date = Some(end.format("%Y-%m-%d").to_string());
    }
}

/// Stable comparator: valid ISO end dates ascending (lexical compare is
/// chronological for this shape), valid before missing/invalid, ties and
/// invalid pairs keep input order.
fn by_end_date(a: &Milestone, b: &Milestone) -> Ordering {
    let a_end = a.end_date.as_deref().filter(|d| is_iso_date(d));
    let b_end = b.end_date.as_deref().filter(|d| is_iso_date(d));
    match (a_end, b_end) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Global milestone reorder: one bucket per workstream in the workstreams'
/// own declared order, each bucket sorted by end date; buckets whose
/// workstream no longer exists go last, in first-encounter order.
pub fn sort_milestones_by_end_date(
    milestones: Vec<Milestone>,
    workstreams: &[Workstream],
) -> Vec<Milestone> {
    let mut by_ws: IndexMap<u32, Vec<Milestone>> = IndexMap::new();
    for ms in milestones {
        by_ws.entry(ms.workstream_id).or_default().push(ms);
    }

    let mut sorted = Vec::new();
    for ws in workstreams {
        if let Some(mut bucket) = by_ws.shift_remove(&ws.id) {
            bucket.sort_by(by_end_date);
            sorted.extend(bucket);
        }
    }
    for (_, mut bucket) in by_ws {
        bucket.sort_by(by_end_date);
        sorted.extend(bucket);
    }
    sorted
}
