use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};

use crate::models::{DateCategory, DisplayMessage, MessageGroup, Timestamp};

/// Group messages into display sections relative to the local current time
pub fn group_by_date(messages: Vec<DisplayMessage>) -> Vec<MessageGroup> {
    group_by_date_at(messages, &Local::now())
}

/// Group messages into display sections relative to `now`
///
/// Calendar days are taken in `now`'s time zone. Groups come back ordered by
/// [`DateCategory::sort_key`]; within a group messages keep their input order, so
/// callers should sort newest first beforehand.
pub fn group_by_date_at<Tz: TimeZone>(
    messages: Vec<DisplayMessage>,
    now: &DateTime<Tz>,
) -> Vec<MessageGroup> {
    let calendar = Calendar::new(now.date_naive());
    let tz = now.timezone();

    let mut groups: BTreeMap<i64, MessageGroup> = BTreeMap::new();
    for message in messages {
        let category = calendar.categorize(&message.timestamp(), &tz);
        groups
            .entry(category.sort_key())
            .or_insert_with(|| MessageGroup::new(category))
            .messages
            .push(message);
    }

    groups.into_values().collect()
}

/// Section for a single timestamp relative to `now`
pub fn categorize<Tz: TimeZone>(timestamp: &Timestamp, now: &DateTime<Tz>) -> DateCategory {
    Calendar::new(now.date_naive()).categorize(timestamp, &now.timezone())
}

/// Day boundaries of the current period, computed once per grouping pass
struct Calendar {
    today: NaiveDate,
    yesterday: Option<NaiveDate>,
    week_start: NaiveDate,
    month_start: NaiveDate,
    year_start: NaiveDate,
}

impl Calendar {
    fn new(today: NaiveDate) -> Self {
        let days_since_monday = u64::from(today.weekday().num_days_from_monday());
        Self {
            today,
            yesterday: today.pred_opt(),
            week_start: today.checked_sub_days(Days::new(days_since_monday)).unwrap_or(today),
            month_start: today.with_day(1).unwrap_or(today),
            year_start: today.with_ordinal(1).unwrap_or(today),
        }
    }

    fn categorize<Tz: TimeZone>(&self, timestamp: &Timestamp, tz: &Tz) -> DateCategory {
        let Some(instant) = timestamp.as_datetime() else {
            return DateCategory::Unknown;
        };
        let day = instant.with_timezone(tz).date_naive();

        // Clock skew can produce future dates; show them with today's messages
        if day >= self.today {
            DateCategory::Today
        } else if Some(day) == self.yesterday {
            DateCategory::Yesterday
        } else if day >= self.week_start {
            DateCategory::ThisWeek
        } else if day >= self.month_start {
            DateCategory::ThisMonth
        } else if day >= self.year_start {
            DateCategory::ThisYear
        } else {
            DateCategory::Year(day.year())
        }
    }
}
