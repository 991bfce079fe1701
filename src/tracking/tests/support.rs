//! Shared fixtures for tracking unit tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::tracking::domain::UserId;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.advance_by(TimeDelta::seconds(seconds));
    }

    pub fn advance_by(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

#[fixture]
pub fn clock() -> ManualClock {
    ManualClock::starting_at(epoch())
}

pub fn new_user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}
