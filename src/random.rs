// Random todo generation for demos and testing

use crate::models::{TodoDraft, TodoStatus};
use chrono::{DateTime, Duration, Local, TimeZone};
use rand::Rng;
use std::ops::RangeInclusive;

const TITLES: &[&str] = &[
    "Finish project documentation",
    "Learn a new technology",
    "Tidy up desktop files",
    "Reply to emails",
    "Prepare meeting materials",
    "Update resume",
    "Clean up code repository",
    "Read technical articles",
    "Optimize website performance",
    "Fix bug",
    "Write unit tests",
    "Code review",
    "Design new feature",
    "User research",
    "Data analysis",
    "Make a plan",
    "Team sync",
    "Product planning",
    "Market research",
    "Competitor analysis",
];

const SUBTITLES: &[&str] = &[
    "Priority: high",
    "Urgent",
    "Due this week",
    "Key project",
    "Personal growth",
    "Work",
    "Learning goal",
    "Household",
    "Health",
    "Finances",
];

const DESCRIPTIONS: &[&str] = &[
    "An important task that needs careful handling",
    "Make sure it is done before the deadline",
    "Needs coordination with teammates",
    "Best tackled in small steps",
    "Write down lessons learned afterwards",
    "Raise questions early",
    "Earlier cases can serve as a reference",
    "Collect the relevant material first",
    "Do some research before starting",
    "Needs sign-off when finished",
];

const START_DAYS: RangeInclusive<i64> = -15..=15;
const START_HOURS: RangeInclusive<u32> = 8..=19;
const END_DAYS: RangeInclusive<i64> = 1..=30;
const END_HOURS: RangeInclusive<u32> = 14..=22;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Generate a random todo payload relative to the current local time
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> TodoDraft {
    generate_at(rng, &Local::now())
}

/// Generate `count` random todo payloads
pub fn generate_batch<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<TodoDraft> {
    (0..count).map(|_| generate(rng)).collect()
}

/// Generate a random todo payload relative to `now`
pub fn generate_at<R, Tz>(rng: &mut R, now: &DateTime<Tz>) -> TodoDraft
where
    R: Rng + ?Sized,
    Tz: TimeZone,
{
    let title = pick(rng, TITLES);
    let subtitle = rng.random_bool(0.5).then(|| pick(rng, SUBTITLES));
    let description = rng.random_bool(0.4).then(|| pick(rng, DESCRIPTIONS));
    let status = TodoStatus::ALL[rng.random_range(0..TodoStatus::ALL.len())];

    let start_time = rng
        .random_bool(0.3)
        .then(|| random_time(rng, now, START_DAYS, START_HOURS));
    let mut end_time = rng
        .random_bool(0.2)
        .then(|| random_time(rng, now, END_DAYS, END_HOURS));

    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end <= start {
            end_time = Some(start + MS_PER_DAY);
        }
    }

    TodoDraft {
        title,
        subtitle,
        description,
        start_time,
        end_time,
        status,
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, words: &[&str]) -> String {
    words[rng.random_range(0..words.len())].to_string()
}

/// A timestamp `days` away from `now`, at a random hour and a quarter-hour minute
fn random_time<R, Tz>(
    rng: &mut R,
    now: &DateTime<Tz>,
    days: RangeInclusive<i64>,
    hours: RangeInclusive<u32>,
) -> i64
where
    R: Rng + ?Sized,
    Tz: TimeZone,
{
    let day = now.clone() + Duration::days(rng.random_range(days));
    let hour = rng.random_range(hours);
    let minute = rng.random_range(0..4u32) * 15;

    let naive = day.date_naive().and_hms_opt(hour, minute, 0).unwrap_or_else(|| day.naive_local());

    // Wall-clock times skipped by a DST jump have no local instant; read them as UTC.
    naive
        .and_local_timezone(now.timezone())
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}
