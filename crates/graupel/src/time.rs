use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Default epoch: Wednesday, September 8, 2021 06:33:56 UTC.
///
/// Fixed reference timestamp from which all ID timestamps are measured.
/// Constant for the lifetime of a deployment: changing it after IDs have
/// been produced breaks ordering and comparability of previously issued
/// IDs.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_631_082_836_000);

/// A trait for time sources that report milliseconds elapsed since a
/// configured epoch.
///
/// This abstraction allows you to plug in a wall clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use graupel::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured
    /// epoch.
    fn current_millis(&self) -> u64;
}

/// A time source that never moves backward.
///
/// The offset between the wall clock and the epoch is captured once at
/// construction; from then on the clock advances with [`Instant`], so
/// external adjustments of the system clock (NTP steps, daylight-saving
/// shifts) cannot make reported time regress.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    offset_millis: u64,
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using a custom epoch as the origin
    /// (t = 0), specified as a [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Panics
    ///
    /// Panics if the current system time is earlier than the given epoch.
    pub fn with_epoch(epoch: Duration) -> Self {
        let start = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH");
        let offset_millis = system_now
            .checked_sub(epoch)
            .expect("System clock before custom epoch")
            .as_millis() as u64;

        Self {
            start,
            offset_millis,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.offset_millis + self.start.elapsed().as_millis() as u64
    }
}

/// A time source that reads the system wall clock on every call,
/// truncated to milliseconds.
///
/// Unlike [`MonotonicClock`], this source follows external clock
/// adjustments and therefore *can* move backward; the generators respond
/// to a regression by withholding IDs until the clock catches up.
/// Readings earlier than the epoch saturate to zero.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    epoch_millis: u64,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using a custom epoch as the origin.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        now.saturating_sub(self.epoch_millis)
    }
}
