//! Turns a sequence of foreground samples into attributed durations.
//!
//! The interval between two samples is credited to the app that was focused at the start of it.
//! This is exact only if focus does not change between samples, so shorter sampling intervals
//! mean less misattribution.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, trace};

use crate::daemon::storage::usage_event::UsageEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionState {
    /// No sample seen yet, or the last interval was dropped.
    Idle,
    /// `app` has been in focus since `since`. The interval is flushed by the next transition.
    Tracking {
        app: Arc<str>,
        since: DateTime<Local>,
    },
}

pub struct Attribution {
    state: AttributionState,
    self_name: Arc<str>,
}

impl Attribution {
    pub fn new(self_name: Arc<str>) -> Self {
        Self {
            state: AttributionState::Idle,
            self_name,
        }
    }

    pub fn state(&self) -> &AttributionState {
        &self.state
    }

    /// Records a successful sample. Returns the closed interval of the previous app, if any.
    pub fn observe(&mut self, app: Arc<str>, now: DateTime<Local>) -> Option<UsageEvent> {
        trace!("Observed {app} at {now}");
        let previous = std::mem::replace(&mut self.state, AttributionState::Tracking { app, since: now });
        self.close(previous, now)
    }

    /// Drops the open interval without attributing it.
    pub fn reset(&mut self) {
        if let AttributionState::Tracking { app, since } = &self.state {
            debug!("Dropping interval of {app} open since {since}");
        }
        self.state = AttributionState::Idle;
    }

    /// Closes the open interval at `now` and goes idle. Used on graceful shutdown.
    pub fn finish(&mut self, now: DateTime<Local>) -> Option<UsageEvent> {
        let previous = std::mem::replace(&mut self.state, AttributionState::Idle);
        self.close(previous, now)
    }

    fn close(&self, previous: AttributionState, now: DateTime<Local>) -> Option<UsageEvent> {
        let AttributionState::Tracking { app, since } = previous else {
            return None;
        };

        let elapsed = now - since;
        if elapsed <= chrono::Duration::zero() {
            trace!("No time elapsed for {app}");
            return None;
        }
        if app == self.self_name {
            debug!("Skipping {elapsed} spent in the tracker itself");
            return None;
        }

        let duration_seconds = (elapsed.num_milliseconds() as f64 / 1000.).round() as i64;
        Some(UsageEvent {
            app_name: app,
            duration_seconds,
            date: now.date_naive(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

    use crate::daemon::storage::usage_event::UsageEvent;

    use super::{Attribution, AttributionState};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();
    const TEST_START: NaiveDateTime =
        NaiveDateTime::new(TEST_DATE, NaiveTime::from_hms_opt(12, 0, 0).unwrap());

    fn at(seconds: i64) -> DateTime<Local> {
        Local.from_local_datetime(&TEST_START).unwrap() + Duration::seconds(seconds)
    }

    fn event(app: &str, duration_seconds: i64) -> UsageEvent {
        UsageEvent {
            app_name: app.into(),
            duration_seconds,
            date: TEST_DATE,
        }
    }

    fn attribution() -> Attribution {
        Attribution::new("studytrack".into())
    }

    #[test]
    fn first_sample_only_starts_tracking() {
        let mut attribution = attribution();

        assert_eq!(attribution.observe("a".into(), at(0)), None);
        assert_eq!(
            attribution.state(),
            &AttributionState::Tracking {
                app: "a".into(),
                since: at(0)
            }
        );
    }

    #[test]
    fn interval_goes_to_app_focused_at_its_start() {
        let mut attribution = attribution();
        let mut observe = |t, app: &str| attribution.observe(app.into(), at(t));

        assert_eq!(observe(0, "a"), None);
        assert_eq!(observe(5, "a"), Some(event("a", 5)));
        // The switch to b closes the last interval of a.
        assert_eq!(observe(10, "b"), Some(event("a", 5)));
        assert_eq!(observe(15, "b"), Some(event("b", 5)));
        assert_eq!(
            attribution.state(),
            &AttributionState::Tracking {
                app: "b".into(),
                since: at(15)
            }
        );
    }

    #[test]
    fn own_process_is_not_logged_but_state_advances() {
        let mut attribution = attribution();
        attribution.observe("studytrack".into(), at(0));

        assert_eq!(attribution.observe("studytrack".into(), at(5)), None);
        assert_eq!(attribution.observe("a".into(), at(10)), None);
        assert_eq!(
            attribution.state(),
            &AttributionState::Tracking {
                app: "a".into(),
                since: at(10)
            }
        );
        assert_eq!(attribution.observe("a".into(), at(15)), Some(event("a", 5)));
    }

    #[test]
    fn elapsed_time_is_rounded_to_seconds() {
        let mut attribution = attribution();
        attribution.observe("a".into(), at(0));

        let event = attribution.observe("a".into(), at(4) + Duration::milliseconds(600));

        assert_eq!(event.map(|v| v.duration_seconds), Some(5));
    }

    #[test]
    fn clock_going_backwards_writes_nothing() {
        let mut attribution = attribution();
        attribution.observe("a".into(), at(10));

        assert_eq!(attribution.observe("a".into(), at(10)), None);
        assert_eq!(attribution.observe("a".into(), at(5)), None);
        assert_eq!(attribution.observe("a".into(), at(7)), Some(event("a", 2)));
    }

    #[test]
    fn reset_drops_open_interval() {
        let mut attribution = attribution();
        attribution.observe("a".into(), at(0));

        attribution.reset();

        assert_eq!(attribution.state(), &AttributionState::Idle);
        assert_eq!(attribution.observe("b".into(), at(30)), None);
    }

    #[test]
    fn finish_flushes_open_interval_and_goes_idle() {
        let mut attribution = attribution();
        attribution.observe("a".into(), at(0));

        assert_eq!(attribution.finish(at(3)), Some(event("a", 3)));
        assert_eq!(attribution.state(), &AttributionState::Idle);
        assert_eq!(attribution.finish(at(6)), None);
    }

    #[test]
    fn finish_respects_self_exclusion() {
        let mut attribution = attribution();
        attribution.observe("studytrack".into(), at(0));

        assert_eq!(attribution.finish(at(3)), None);
    }

    #[test]
    fn entry_is_dated_by_the_closing_tick() {
        let mut attribution = attribution();
        let before_midnight = Local
            .from_local_datetime(&TEST_DATE.and_hms_opt(23, 59, 58).unwrap())
            .unwrap();
        attribution.observe("a".into(), before_midnight);

        let event = attribution.observe("a".into(), before_midnight + Duration::seconds(5));

        assert_eq!(event.map(|v| v.date), TEST_DATE.succ_opt());
    }
}
