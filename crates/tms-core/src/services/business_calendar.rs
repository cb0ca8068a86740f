//! Working-hours arithmetic
//!
//! Durations on business-day timers only accrue inside configured working
//! windows, skipping Sundays and holidays. The walking math is pure; the
//! service wraps it with the settings row and a holiday cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::DomainError;
use crate::repositories::CalendarRepository;

const CONFIG_CACHE_TTL: StdDuration = StdDuration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub is_working: bool,
}

impl DayWindow {
    fn closed() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            is_working: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkingHoursConfig {
    days: [DayWindow; 7],
}

impl WorkingHoursConfig {
    pub fn window_for(&self, weekday: Weekday) -> DayWindow {
        self.days[weekday.num_days_from_monday() as usize]
    }
}

impl Default for WorkingHoursConfig {
    /// Mon-Fri 10:00-18:30, Saturday a half day, Sunday off.
    fn default() -> Self {
        let full = DayWindow {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 30, 0).unwrap_or(NaiveTime::MIN),
            is_working: true,
        };
        let saturday = DayWindow {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 30, 0).unwrap_or(NaiveTime::MIN),
            is_working: true,
        };
        Self {
            days: [full, full, full, full, full, saturday, DayWindow::closed()],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    start: String,
    end: String,
    is_working: bool,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    monday: RawWindow,
    tuesday: RawWindow,
    wednesday: RawWindow,
    thursday: RawWindow,
    friday: RawWindow,
    saturday: RawWindow,
    sunday: RawWindow,
}

fn parse_window(raw: &RawWindow) -> DayWindow {
    let parse = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").ok();
    match (parse(&raw.start), parse(&raw.end)) {
        (Some(start), Some(end)) => DayWindow { start, end, is_working: raw.is_working },
        _ => DayWindow::closed(),
    }
}

/// Overlap between `[start, end]` and the working windows of each day.
pub fn business_ms_between(
    config: &WorkingHoursConfig,
    holidays: &HashSet<NaiveDate>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> i64 {
    if end <= start {
        return 0;
    }

    let mut total_ms = 0i64;
    let mut day = start.date_naive();
    let last_day = end.date_naive();

    while day <= last_day {
        if is_working_day(config, holidays, day) {
            let window = config.window_for(day.weekday());
            if window.is_working {
                let work_start = at(day, window.start);
                let work_end = at(day, window.end);
                let effective_start = start.max(work_start);
                let effective_end = end.min(work_end);
                if effective_start < effective_end {
                    total_ms += (effective_end - effective_start).num_milliseconds();
                }
            }
        }
        let Some(next) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        day = next;
    }

    total_ms
}

/// Walk forward from `start` until `duration_ms` of working time has passed.
pub fn add_business_ms(
    config: &WorkingHoursConfig,
    holidays: &HashSet<NaiveDate>,
    start: DateTime<Utc>,
    duration_ms: i64,
) -> DateTime<Utc> {
    let mut remaining_ms = duration_ms;
    let mut cursor = start;

    while remaining_ms > 0 {
        let day = cursor.date_naive();
        let window = config.window_for(day.weekday());

        if !is_working_day(config, holidays, day) || !window.is_working {
            cursor = next_morning(day);
            continue;
        }

        let work_start = at(day, window.start);
        let work_end = at(day, window.end);

        if cursor < work_start {
            cursor = work_start;
        }

        let available_ms = (work_end - cursor).num_milliseconds();
        if available_ms <= 0 {
            cursor = next_morning(day);
            continue;
        }

        if remaining_ms <= available_ms {
            cursor += chrono::Duration::milliseconds(remaining_ms);
            remaining_ms = 0;
        } else {
            remaining_ms -= available_ms;
            cursor = next_morning(day);
        }
    }

    cursor
}

pub fn is_working_day(
    config: &WorkingHoursConfig,
    holidays: &HashSet<NaiveDate>,
    day: NaiveDate,
) -> bool {
    // Sunday is the only hard weekend day; Saturday runs a short window.
    if day.weekday() == Weekday::Sun {
        return false;
    }
    if holidays.contains(&day) {
        return false;
    }
    config.window_for(day.weekday()).is_working
}

fn at(day: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(time))
}

fn next_morning(day: NaiveDate) -> DateTime<Utc> {
    let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
    at(next, NaiveTime::MIN)
}

struct ConfigCache {
    config: WorkingHoursConfig,
    loaded_at: Instant,
}

pub struct BusinessCalendarService<R: CalendarRepository> {
    repo: Arc<R>,
    config_cache: RwLock<Option<ConfigCache>>,
    holiday_cache: RwLock<HashMap<NaiveDate, bool>>,
}

impl<R: CalendarRepository> BusinessCalendarService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            config_cache: RwLock::new(None),
            holiday_cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn working_hours(&self) -> Result<WorkingHoursConfig, DomainError> {
        if let Some(cache) = self.config_cache.read().await.as_ref() {
            if cache.loaded_at.elapsed() < CONFIG_CACHE_TTL {
                return Ok(cache.config.clone());
            }
        }

        let config = match self.repo.working_hours_value().await? {
            Some(value) => match serde_json::from_value::<RawConfig>(value) {
                Ok(raw) => WorkingHoursConfig {
                    days: [
                        parse_window(&raw.monday),
                        parse_window(&raw.tuesday),
                        parse_window(&raw.wednesday),
                        parse_window(&raw.thursday),
                        parse_window(&raw.friday),
                        parse_window(&raw.saturday),
                        parse_window(&raw.sunday),
                    ],
                },
                Err(e) => {
                    debug!("working_hours setting unreadable, using defaults: {}", e);
                    WorkingHoursConfig::default()
                }
            },
            None => WorkingHoursConfig::default(),
        };

        *self.config_cache.write().await = Some(ConfigCache {
            config: config.clone(),
            loaded_at: Instant::now(),
        });

        Ok(config)
    }

    pub async fn business_ms_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let config = self.working_hours().await?;
        let holidays = self.holidays_for(start.date_naive(), end.date_naive()).await?;
        Ok(business_ms_between(&config, &holidays, start, end))
    }

    pub async fn add_business_ms(
        &self,
        start: DateTime<Utc>,
        duration_ms: i64,
    ) -> Result<DateTime<Utc>, DomainError> {
        let config = self.working_hours().await?;
        // Worst case a day contributes nothing, so over-fetch the range.
        let horizon_days = (duration_ms / (24 * 60 * 60 * 1000) + 1) * 4 + 14;
        let to = start
            .date_naive()
            .checked_add_days(Days::new(horizon_days as u64))
            .unwrap_or(start.date_naive());
        let holidays = self.holidays_for(start.date_naive(), to).await?;
        Ok(add_business_ms(&config, &holidays, start, duration_ms))
    }

    pub async fn is_working_day(&self, day: NaiveDate) -> Result<bool, DomainError> {
        let config = self.working_hours().await?;
        let holidays = self.holidays_for(day, day).await?;
        Ok(is_working_day(&config, &holidays, day))
    }

    async fn holidays_for(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashSet<NaiveDate>, DomainError> {
        {
            let cache = self.holiday_cache.read().await;
            let mut day = from;
            let mut all_cached = true;
            while day <= to {
                if !cache.contains_key(&day) {
                    all_cached = false;
                    break;
                }
                let Some(next) = day.checked_add_days(Days::new(1)) else { break };
                day = next;
            }
            if all_cached {
                return Ok(cache
                    .iter()
                    .filter(|(d, is_holiday)| **is_holiday && **d >= from && **d <= to)
                    .map(|(d, _)| *d)
                    .collect());
            }
        }

        let holidays: HashSet<NaiveDate> =
            self.repo.holidays_between(from, to).await?.into_iter().collect();

        let mut cache = self.holiday_cache.write().await;
        let mut day = from;
        while day <= to {
            cache.insert(day, holidays.contains(&day));
            let Some(next) = day.checked_add_days(Days::new(1)) else { break };
            day = next;
        }

        Ok(holidays)
    }

    pub async fn clear_cache(&self) {
        *self.config_cache.write().await = None;
        self.holiday_cache.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorkingHoursConfig {
        WorkingHoursConfig::default()
    }

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-03-10 is a Monday.

    #[test]
    fn single_day_overlap_clips_to_window() {
        let ms = business_ms_between(
            &config(),
            &HashSet::new(),
            dt(2025, 3, 10, 8, 0),
            dt(2025, 3, 10, 12, 0),
        );
        // 10:00 to 12:00 only.
        assert_eq!(ms, 2 * 60 * 60 * 1000);
    }

    #[test]
    fn sunday_contributes_nothing() {
        let ms = business_ms_between(
            &config(),
            &HashSet::new(),
            dt(2025, 3, 16, 0, 0),
            dt(2025, 3, 16, 23, 59),
        );
        assert_eq!(ms, 0);
    }

    #[test]
    fn saturday_is_a_short_day() {
        let ms = business_ms_between(
            &config(),
            &HashSet::new(),
            dt(2025, 3, 15, 0, 0),
            dt(2025, 3, 15, 23, 59),
        );
        // 10:00 to 17:30.
        assert_eq!(ms, 7 * 60 * 60 * 1000 + 30 * 60 * 1000);
    }

    #[test]
    fn holidays_are_skipped() {
        let holidays: HashSet<_> = [date(2025, 3, 11)].into();
        let ms = business_ms_between(
            &config(),
            &holidays,
            dt(2025, 3, 10, 10, 0),
            dt(2025, 3, 12, 10, 0),
        );
        // Full Monday window only, Tuesday is the holiday.
        assert_eq!(ms, 8 * 60 * 60 * 1000 + 30 * 60 * 1000);
    }

    #[test]
    fn add_within_same_day() {
        let end = add_business_ms(
            &config(),
            &HashSet::new(),
            dt(2025, 3, 10, 10, 0),
            4 * 60 * 60 * 1000,
        );
        assert_eq!(end, dt(2025, 3, 10, 14, 0));
    }

    #[test]
    fn add_rolls_over_to_next_working_day() {
        // Monday 16:00 + 4h: 2.5h today, 1.5h Tuesday from 10:00.
        let end = add_business_ms(
            &config(),
            &HashSet::new(),
            dt(2025, 3, 10, 16, 0),
            4 * 60 * 60 * 1000,
        );
        assert_eq!(end, dt(2025, 3, 11, 11, 30));
    }

    #[test]
    fn add_skips_sunday_and_holiday() {
        // Saturday 17:00 + 1h: 0.5h Saturday, Sunday skipped, Monday holiday,
        // remainder lands Tuesday 10:30.
        let holidays: HashSet<_> = [date(2025, 3, 17)].into();
        let end = add_business_ms(&config(), &holidays, dt(2025, 3, 15, 17, 0), 60 * 60 * 1000);
        assert_eq!(end, dt(2025, 3, 18, 10, 30));
    }

    #[test]
    fn add_before_opening_jumps_to_window_start() {
        let end =
            add_business_ms(&config(), &HashSet::new(), dt(2025, 3, 10, 6, 0), 60 * 60 * 1000);
        assert_eq!(end, dt(2025, 3, 10, 11, 0));
    }
}
