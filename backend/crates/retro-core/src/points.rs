//! Point arithmetic shared by the estimate rebalancer and the point allocator.
//!
//! Everything here works on in-memory rows grouped by sprint; loading and
//! writing back is the caller's job. Values are kept at two decimals.

use uuid::Uuid;

/// Two values closer than this are treated as equal.
pub const POINTS_EPSILON: f64 = 1e-6;

const CENT: f64 = 0.01;

/// A member-task as seen by the point math.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsRow {
    pub member_task_id: Uuid,
    pub sprint_id: Uuid,
    pub time_spent_minutes: i64,
    pub points_earned: f64,
    pub points_assigned: Option<f64>,
    /// Frozen rows count against the estimate but are never rewritten.
    pub frozen: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebalanceReport {
    pub shrunk: usize,
    pub redistributed: usize,
    /// Frozen points alone already exceed the new estimate.
    pub negative_remaining: bool,
}

impl RebalanceReport {
    pub fn changed(&self) -> bool {
        self.shrunk > 0 || self.redistributed > 0
    }
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn points_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < POINTS_EPSILON
}

pub fn total_earned(rows: &[PointsRow]) -> f64 {
    rows.iter().map(|r| r.points_earned).sum()
}

fn frozen_total(rows: &[PointsRow]) -> f64 {
    rows.iter()
        .filter(|r| r.frozen)
        .map(|r| r.points_earned)
        .sum()
}

/// Sprint ids of the rewritable rows, in first-seen order.
fn mutable_sprints(rows: &[PointsRow]) -> Vec<Uuid> {
    let mut seen = Vec::new();
    for row in rows.iter().filter(|r| !r.frozen) {
        if !seen.contains(&row.sprint_id) {
            seen.push(row.sprint_id);
        }
    }
    seen
}

/// Scales every rewritable row by `new_estimate / total` when the existing
/// total no longer fits. Relative shares between rows are preserved.
pub fn shrink_pass(rows: &mut [PointsRow], new_estimate: f64) -> usize {
    let mutable_total: f64 = rows
        .iter()
        .filter(|r| !r.frozen)
        .map(|r| r.points_earned)
        .sum();
    if mutable_total <= POINTS_EPSILON {
        return 0;
    }

    let budget = (new_estimate - frozen_total(rows)).max(0.0);
    let ratio = budget / mutable_total;
    if ratio >= 1.0 {
        return 0;
    }

    let mut changed = 0;
    for row in rows.iter_mut().filter(|r| !r.frozen) {
        let scaled = round2(row.points_earned * ratio);
        if !points_equal(scaled, row.points_earned) {
            row.points_earned = scaled;
            changed += 1;
        }
    }
    changed
}

/// For each sprint, caps its total at whatever the other sprints leave of the
/// estimate, splitting the cap in proportion to each member's current points.
pub fn redistribute_pass(rows: &mut [PointsRow], new_estimate: f64) -> (usize, bool) {
    let before = snapshot(rows);
    let mut negative_remaining = false;

    for sprint_id in mutable_sprints(rows) {
        let others: f64 = rows
            .iter()
            .filter(|r| r.sprint_id != sprint_id)
            .map(|r| r.points_earned)
            .sum();
        let mut remaining = new_estimate - others;
        if remaining < 0.0 {
            negative_remaining = true;
            remaining = 0.0;
        }

        let current_total: f64 = rows
            .iter()
            .filter(|r| r.sprint_id == sprint_id && !r.frozen)
            .map(|r| r.points_earned)
            .sum();
        if current_total <= remaining + POINTS_EPSILON {
            continue;
        }

        let mut indices = Vec::new();
        for (index, row) in rows.iter_mut().enumerate() {
            if row.sprint_id != sprint_id || row.frozen {
                continue;
            }
            row.points_earned = round2(remaining * row.points_earned / current_total);
            indices.push(index);
        }
        trim_overflow(rows, &indices, remaining);
    }

    (count_changed(&before, rows), negative_remaining)
}

/// Both rebalance passes in order.
pub fn rebalance(rows: &mut [PointsRow], new_estimate: f64) -> RebalanceReport {
    let shrunk = shrink_pass(rows, new_estimate);
    let (redistributed, negative_remaining) = redistribute_pass(rows, new_estimate);
    RebalanceReport {
        shrunk,
        redistributed,
        negative_remaining,
    }
}

/// A task needs allocation when some rewritable row was never allocated or
/// its earned points drifted from the assigned ones.
pub fn needs_allocation(rows: &[PointsRow]) -> bool {
    rows.iter().filter(|r| !r.frozen).any(|r| match r.points_assigned {
        None => true,
        Some(assigned) => !points_equal(assigned, r.points_earned),
    })
}

/// Splits what the task's other sprints leave of `estimate` across the
/// rewritable rows of `sprint_id`, by time spent. Rows of other sprints keep
/// their points and only count against the estimate. Returns the rows changed.
pub fn allocate(rows: &mut [PointsRow], sprint_id: Uuid, estimate: f64) -> usize {
    let before = snapshot(rows);
    let settled: f64 = rows
        .iter()
        .filter(|r| r.sprint_id != sprint_id || r.frozen)
        .map(|r| r.points_earned)
        .sum();
    let remaining = (estimate - settled).max(0.0);

    let sprint_minutes: i64 = rows
        .iter()
        .filter(|r| r.sprint_id == sprint_id && !r.frozen)
        .map(|r| r.time_spent_minutes.max(0))
        .sum();

    let mut indices = Vec::new();
    for (index, row) in rows.iter_mut().enumerate() {
        if row.sprint_id != sprint_id || row.frozen {
            continue;
        }
        row.points_earned = if sprint_minutes == 0 {
            0.0
        } else {
            round2(remaining * row.time_spent_minutes.max(0) as f64 / sprint_minutes as f64)
        };
        indices.push(index);
    }

    trim_overflow(rows, &indices, remaining);
    for &index in &indices {
        rows[index].points_assigned = Some(rows[index].points_earned);
    }

    count_changed(&before, rows)
}

fn snapshot(rows: &[PointsRow]) -> Vec<(f64, Option<f64>)> {
    rows.iter()
        .map(|r| (r.points_earned, r.points_assigned))
        .collect()
}

fn count_changed(before: &[(f64, Option<f64>)], rows: &[PointsRow]) -> usize {
    before
        .iter()
        .zip(rows)
        .filter(|((earned, assigned), row)| {
            let assigned_same = match (assigned, row.points_assigned) {
                (Some(a), Some(b)) => points_equal(*a, b),
                (None, None) => true,
                _ => false,
            };
            !points_equal(*earned, row.points_earned) || !assigned_same
        })
        .count()
}

/// Rounding can push a group a few cents over its cap; take them back from
/// the largest rows.
fn trim_overflow(rows: &mut [PointsRow], indices: &[usize], cap: f64) {
    let total: f64 = indices.iter().map(|&i| rows[i].points_earned).sum();
    let mut excess_cents = ((total - cap) / CENT).round() as i64;
    if excess_cents <= 0 {
        return;
    }

    let mut ordered = indices.to_vec();
    ordered.sort_by(|&a, &b| rows[b].points_earned.total_cmp(&rows[a].points_earned));

    for &index in ordered.iter().cycle().take(ordered.len() * excess_cents as usize) {
        if excess_cents == 0 {
            break;
        }
        if rows[index].points_earned >= CENT {
            rows[index].points_earned = round2(rows[index].points_earned - CENT);
            excess_cents -= 1;
        }
    }
}
