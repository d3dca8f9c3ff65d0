use crate::domain::model::{BusinessHours, Locale, TimeSlot};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Enumerate the bookable slots of `date` for a service of `duration` minutes.
///
/// Starts run from the opening hour up to (not including) the closing hour in
/// `interval_minutes` steps. A slot is dropped when it starts at or before
/// `now`, or when it would end after closing time.
pub fn generate_slots<Tz: TimeZone>(
    date: NaiveDate,
    duration: u32,
    now: &DateTime<Tz>,
    hours: &BusinessHours,
) -> Vec<TimeSlot> {
    let offset = hours.offset();
    let now = now.with_timezone(&offset);

    let Some(close) = date
        .and_hms_opt(hours.close_hour, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
    else {
        tracing::error!("Invalid closing hour {} for {}", hours.close_hour, date);
        return Vec::new();
    };

    if hours.interval_minutes == 0 {
        tracing::error!("Slot interval must be positive");
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut minute_of_day = hours.open_hour * 60;

    while minute_of_day < hours.close_hour * 60 {
        let (hour, minute) = (minute_of_day / 60, minute_of_day % 60);
        minute_of_day += hours.interval_minutes;

        let Some(start) = date
            .and_hms_opt(hour, minute, 0)
            .and_then(|naive| offset.from_local_datetime(&naive).single())
        else {
            continue;
        };
        let end = start + Duration::minutes(i64::from(duration));

        if start <= now || end > close {
            continue;
        }

        slots.push(TimeSlot {
            time: format!("{:02}:{:02}", hour, minute),
            display: format_time(hour, minute),
            start,
            end,
        });
    }

    tracing::debug!(
        "Generated {} slots for {} ({} min service)",
        slots.len(),
        date,
        duration
    );
    slots
}

/// 12-hour clock, e.g. `9:05 AM`, `12:30 PM`.
pub fn format_time(hour: u32, minute: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

/// Long-form date for confirmations. Works on the calendar date only, so no
/// timezone can shift the day.
pub fn format_date_display(date: NaiveDate, locale: Locale) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::Es => format!("{} de {} de {}", date.day(), MONTHS_ES[month], date.year()),
        Locale::En => format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year()),
    }
}

/// Today's calendar date at the shop.
pub fn today(hours: &BusinessHours) -> NaiveDate {
    Utc::now().with_timezone(&hours.offset()).date_naive()
}
