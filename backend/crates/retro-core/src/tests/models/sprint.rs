use crate::{Sprint, SprintStatus};

use chrono::NaiveDate;
use googletest::prelude::*;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn given_sprint_without_end_date_when_date_range_then_none() {
    let mut sprint = Sprint::new(Uuid::new_v4(), "S1".to_string(), SprintStatus::Active);
    sprint.start_date = Some(date(2026, 3, 2));

    assert_that!(sprint.date_range(), none());
}

#[test]
fn given_sprint_with_both_dates_when_date_range_then_some() {
    let mut sprint = Sprint::new(Uuid::new_v4(), "S1".to_string(), SprintStatus::Active);
    sprint.start_date = Some(date(2026, 3, 2));
    sprint.end_date = Some(date(2026, 3, 15));

    let range = sprint.date_range().unwrap();
    assert_that!(range.start, eq(date(2026, 3, 2)));
    assert_that!(range.end, eq(date(2026, 3, 15)));
}

#[test]
fn given_completed_sprint_when_next_start_computed_then_day_after_end() {
    let mut previous = Sprint::new(Uuid::new_v4(), "S1".to_string(), SprintStatus::Completed);
    previous.end_date = Some(date(2026, 2, 28));

    assert_that!(Sprint::start_date_after(&previous), some(eq(date(2026, 3, 1))));
}
