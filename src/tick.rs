//! Fixed period tick scheduling.
//!
//! A [TickSource] is the only thing that advances time. The [TickScheduler] starts it
//! once and then hands every tick, exactly once and strictly in order, to a [TickTask].
//! Tasks with a longer effective period gate themselves with a [Cadence].
//!
//! On the board the source is an [embassy_time::Ticker] (see [EmbassyTicks]); on the host
//! [SimulatedTicks] steps a virtual clock so that task sets can be exercised against
//! simulated time.

use embassy_futures::yield_now;
use embassy_time::{Duration, Instant};

use crate::error::InitError;

/// Periodic timer capability
#[allow(async_fn_in_trait)]
pub trait TickSource {
    type Error;

    /// Arms the timer. Called exactly once, before the first [TickSource::next].
    fn start(&mut self, period: Duration) -> Result<(), Self::Error>;

    /// Completes once per period and yields the instant of the tick
    async fn next(&mut self) -> Instant;

    /// Current time, used to notice tasks that ran past the next tick
    fn now(&self) -> Instant;
}

/// The work done on every tick
pub trait TickTask {
    fn on_tick(&mut self, now: Instant);
}

pub struct TickScheduler<S> {
    source: S,
    period: Duration,
    ticks: u32,
    overruns: u32,
}

impl<S: TickSource> TickScheduler<S> {
    /// Starts `source` with the given period.
    ///
    /// A source that cannot be started is an [InitError::Timer]; the caller is
    /// expected to halt on it.
    pub fn start(mut source: S, period: Duration) -> Result<Self, InitError> {
        if source.start(period).is_err() {
            error!("tick source could not be started");
            return Err(InitError::Timer);
        }
        info!("tick source started, period {}us", period.as_micros());

        Ok(Self {
            source,
            period,
            ticks: 0,
            overruns: 0,
        })
    }

    /// Dispatches ticks to `task` forever
    pub async fn run<T: TickTask>(&mut self, task: &mut T) {
        loop {
            self.dispatch(task).await;
        }
    }

    /// Dispatches exactly `ticks` ticks to `task`
    pub async fn run_for<T: TickTask>(&mut self, task: &mut T, ticks: u32) {
        for _ in 0..ticks {
            self.dispatch(task).await;
        }
    }

    async fn dispatch<T: TickTask>(&mut self, task: &mut T) {
        let now = self.source.next().await;
        task.on_tick(now);
        self.ticks = self.ticks.wrapping_add(1);

        let busy = self.source.now().saturating_duration_since(now);
        if busy >= self.period {
            self.overruns = self.overruns.wrapping_add(1);
            warn!(
                "tick {} ran {}us, longer than the {}us period",
                self.ticks,
                busy.as_micros(),
                self.period.as_micros()
            );
        }

        // a late Ticker is ready without ever suspending, button tasks would starve
        yield_now().await;
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Number of ticks whose task returned after the following tick was due
    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}

/// Runs a task once it has not run for at least `period`.
///
/// This is coarse, tick granular gating: the check only happens when the owner is
/// ticked, so a 500ms cadence on a 200ms tick fires every 600ms.
#[derive(Clone, Copy, Debug)]
pub struct Cadence {
    period: Duration,
    last: Instant,
}

impl Cadence {
    /// The reference point is `start`, the first run is due one period later
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            last: start,
        }
    }

    /// True if the task should run now. Resets the reference point when it does.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Tick source stepping a virtual clock by one period per tick
pub struct SimulatedTicks {
    now: Instant,
    period: Option<Duration>,
    busy: Duration,
    refuse_start: bool,
}

impl SimulatedTicks {
    pub fn new(start: Instant) -> Self {
        Self {
            now: start,
            period: None,
            busy: Duration::from_ticks(0),
            refuse_start: false,
        }
    }

    /// A source whose timer can never be started
    pub fn broken() -> Self {
        Self {
            refuse_start: true,
            ..Self::new(Instant::from_ticks(0))
        }
    }

    /// Pretends every task invocation takes `busy` of wall time
    pub fn with_task_time(mut self, busy: Duration) -> Self {
        self.busy = busy;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerUnavailable;

impl TickSource for SimulatedTicks {
    type Error = TimerUnavailable;

    fn start(&mut self, period: Duration) -> Result<(), Self::Error> {
        if self.refuse_start {
            return Err(TimerUnavailable);
        }
        self.period = Some(period);
        Ok(())
    }

    async fn next(&mut self) -> Instant {
        match self.period {
            Some(period) => {
                self.now += period;
                self.now
            }
            None => core::future::pending().await,
        }
    }

    fn now(&self) -> Instant {
        self.now + self.busy
    }
}

/// The board's tick source, an [embassy_time::Ticker]
#[cfg(feature = "firmware")]
pub struct EmbassyTicks {
    ticker: Option<embassy_time::Ticker>,
}

#[cfg(feature = "firmware")]
impl EmbassyTicks {
    pub const fn new() -> Self {
        Self { ticker: None }
    }
}

#[cfg(feature = "firmware")]
impl Default for EmbassyTicks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "firmware")]
impl TickSource for EmbassyTicks {
    type Error = core::convert::Infallible;

    fn start(&mut self, period: Duration) -> Result<(), Self::Error> {
        self.ticker = Some(embassy_time::Ticker::every(period));
        Ok(())
    }

    async fn next(&mut self) -> Instant {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.next().await;
                Instant::now()
            }
            None => core::future::pending().await,
        }
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<F: FnMut(Instant)> TickTask for F {
    fn on_tick(&mut self, now: Instant) {
        self(now)
    }
}
