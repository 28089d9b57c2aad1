use chrono::{Days, Local, NaiveDate};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("Day count must be at least 1")]
    EmptyWindow,
    #[error("Day count {0} reaches before the earliest representable date")]
    OutOfRange(u32),
}

/// Where a publish date falls relative to a [`DateWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    Before,
    Within,
    After,
}

/// Inclusive, day-precision range `[today - (days - 1), today]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn ending_on(today: NaiveDate, days: u32) -> Result<Self, WindowError> {
        if days == 0 {
            return Err(WindowError::EmptyWindow);
        }
        let start = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or(WindowError::OutOfRange(days))?;
        Ok(Self { start, end: today })
    }

    /// The last `days` days, today included, by the local clock.
    pub fn last_days(days: u32) -> Result<Self, WindowError> {
        Self::ending_on(Local::now().date_naive(), days)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn position(&self, date: NaiveDate) -> WindowPosition {
        if date < self.start {
            WindowPosition::Before
        } else if date > self.end {
            WindowPosition::After
        } else {
            WindowPosition::Within
        }
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}
