use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use super::clock::FrameClock;
use super::flag::{LowPerformanceFlag, Trigger};
use super::frame_rate::{FrameRateCounter, FrameWindow};
use super::render_time::{self, RenderSample};
use crate::config::MonitorCfg;
use crate::environment::detector::{self, Detection};
use crate::environment::signals::{BatteryQuery, SignalSource};
use crate::environment::snapshot::PerformanceSnapshot;
use crate::i18n::Locale;
use crate::optimization::settings::OptimizationSettings;
use crate::optimization::warnings::{self, Warning};
use crate::report::PerformanceReport;

/// A state mutation. Every trigger is applied through [`MonitorState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Fresh synchronous detection pass.
    Detected(Detection),
    /// Battery query issued by detection pass `detection` resolved with
    /// this charge ratio. Readings from an older pass are discarded.
    Battery { detection: u64, level: f64 },
    RenderSample(RenderSample),
    FrameWindow(FrameWindow),
    /// Manual override of the low performance flag.
    Override(bool),
    Unmount,
}

/// Everything the monitor knows about the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    pub snapshot: PerformanceSnapshot,
    pub low_mode: LowPerformanceFlag,
    /// Frames in the last completed window.
    pub frame_rate: u32,
    pub mounted: bool,
    /// Detection passes applied so far.
    pub detection: u64,
}

impl MonitorState {
    pub fn new(cfg: &MonitorCfg) -> Self {
        Self {
            snapshot: PerformanceSnapshot::default(),
            low_mode: LowPerformanceFlag::new(),
            frame_rate: cfg.initial_frame_rate,
            mounted: true,
            detection: 0,
        }
    }

    pub fn is_low_performance_mode(&self) -> bool {
        self.low_mode.is_raised()
    }

    pub fn optimization_settings(&self) -> OptimizationSettings {
        OptimizationSettings::derive(&self.snapshot, self.low_mode.is_raised())
    }

    pub fn warnings(&self, cfg: &MonitorCfg) -> Vec<Warning> {
        warnings::report(self.frame_rate, cfg.frame_rate_low, &self.snapshot)
    }

    /// Apply one update. Returns true if the state changed.
    /// After unmount every update is discarded.
    pub fn apply(&mut self, update: Update, cfg: &MonitorCfg) -> bool {
        if !self.mounted {
            return false;
        }
        match update {
            Update::Detected(detection) => {
                let render_time_ms = self.snapshot.render_time_ms;
                self.snapshot = detection.snapshot;
                self.snapshot.render_time_ms = render_time_ms;
                self.detection += 1;
                if detection.prefers_reduced_motion {
                    self.low_mode.raise(Trigger::ReducedMotion);
                }
                true
            }
            Update::Battery { detection, level } => {
                if detection != self.detection {
                    return false;
                }
                let low = detector::apply_battery_level(&mut self.snapshot, level, cfg);
                if low {
                    self.low_mode.raise(Trigger::LowBattery);
                }
                low
            }
            Update::RenderSample(sample) => {
                self.snapshot.render_time_ms = sample.millis();
                if sample.is_slow(cfg.frame_budget_ms) {
                    self.low_mode.raise(Trigger::SlowRender);
                }
                true
            }
            Update::FrameWindow(window) => {
                self.frame_rate = window.frames;
                if window.low {
                    self.low_mode.raise(Trigger::LowFrameRate);
                }
                true
            }
            Update::Override(true) => self.low_mode.raise(Trigger::Manual),
            Update::Override(false) => self.low_mode.reset(),
            Update::Unmount => {
                self.mounted = false;
                true
            }
        }
    }
}

/// Handle shared by the monitor and its sampling tasks.
#[derive(Clone)]
struct Shared {
    session: Uuid,
    cfg: Arc<MonitorCfg>,
    state: Arc<watch::Sender<MonitorState>>,
}

impl Shared {
    fn apply(&self, update: Update) -> bool {
        let mut raised = None;
        let changed = self.state.send_if_modified(|state| {
            let was_raised = state.low_mode.is_raised();
            let changed = state.apply(update, &self.cfg);
            if !was_raised {
                raised = state.low_mode.raised_by();
            }
            changed
        });
        if let Some(trigger) = raised {
            tracing::info!(session = %self.session, ?trigger, "low performance mode raised");
        }
        changed
    }
}

/// Performance monitor for one mounted UI session.
///
/// Mounting runs detection, starts the battery query, a one-shot render
/// measurement and the recurring frame-rate sampler. Unmounting (or dropping)
/// stops the sampler and freezes the state.
pub struct PerformanceMonitor {
    shared: Shared,
    signals: Arc<dyn SignalSource>,
    clock: Arc<dyn FrameClock>,
    token: CancellationToken,
    tasks: TaskTracker,
}

impl PerformanceMonitor {
    /// Mount a new session. Must be called from within a tokio runtime.
    pub fn mount(
        cfg: Arc<MonitorCfg>,
        signals: Arc<dyn SignalSource>,
        clock: Arc<dyn FrameClock>,
    ) -> Self {
        let session = Uuid::new_v4();
        let (state, _) = watch::channel(MonitorState::new(&cfg));
        let monitor = Self {
            shared: Shared {
                session,
                cfg,
                state: Arc::new(state),
            },
            signals,
            clock,
            token: CancellationToken::new(),
            tasks: TaskTracker::new(),
        };
        tracing::info!(session = %session, "performance monitor mounted");

        monitor.redetect();
        monitor.spawn_render_probe();
        monitor.spawn_frame_rate_sampler();
        monitor
    }

    /// Re-run capability detection and issue a fresh battery query.
    /// A query still pending from an earlier pass no longer applies.
    pub fn redetect(&self) {
        let detection = detector::detect(self.signals.as_ref(), &self.shared.cfg);
        tracing::debug!(
            session = %self.shared.session,
            snapshot = ?detection.snapshot,
            reduced_motion = detection.prefers_reduced_motion,
            "capabilities detected"
        );
        self.shared.apply(Update::Detected(detection));
        let pass = self.shared.state.borrow().detection;

        if let Some(query) = self.signals.battery_level() {
            self.spawn_battery_query(pass, query);
        }
    }

    /// Measure one frame's render latency now and apply it.
    /// `None` once the session is unmounted or the clock stopped.
    pub async fn measure_render_time(&self) -> Option<RenderSample> {
        probe_render(&self.shared, self.clock.as_ref()).await
    }

    /// Manual override: `true` raises the flag, `false` resets it.
    pub fn set_low_performance_mode(&self, enabled: bool) {
        if self.shared.apply(Update::Override(enabled)) && !enabled {
            tracing::info!(session = %self.shared.session, "low performance mode reset");
        }
    }

    /// Stop sampling. Synchronous: no state mutation happens after this returns.
    pub fn unmount(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.shared.apply(Update::Unmount);
        self.tasks.close();
        tracing::info!(session = %self.shared.session, "performance monitor unmounted");
    }

    /// Unmount and wait for every sampling task to finish.
    pub async fn shutdown(self) {
        self.unmount();
        self.tasks.wait().await;
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.session
    }

    pub fn config(&self) -> &MonitorCfg {
        &self.shared.cfg
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.state.borrow().mounted
    }

    pub fn state(&self) -> MonitorState {
        self.shared.state.borrow().clone()
    }

    /// Receiver woken on every state change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        self.shared.state.borrow().snapshot.clone()
    }

    pub fn is_low_performance_mode(&self) -> bool {
        self.shared.state.borrow().is_low_performance_mode()
    }

    pub fn frame_rate(&self) -> u32 {
        self.shared.state.borrow().frame_rate
    }

    pub fn optimization_settings(&self) -> OptimizationSettings {
        self.shared.state.borrow().optimization_settings()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.shared.state.borrow().warnings(&self.shared.cfg)
    }

    pub fn report(&self, locale: Locale) -> PerformanceReport {
        PerformanceReport::build(self.shared.session, &self.state(), &self.shared.cfg, locale)
    }

    fn spawn_battery_query(&self, detection: u64, query: BatteryQuery) {
        let shared = self.shared.clone();
        let token = self.token.clone();
        self.tasks.spawn(async move {
            let level = tokio::select! {
                _ = token.cancelled() => return,
                level = query => level,
            };
            match level {
                Some(level) => {
                    tracing::debug!(session = %shared.session, level, detection, "battery level resolved");
                    shared.apply(Update::Battery { detection, level });
                }
                None => tracing::debug!(session = %shared.session, "battery level unavailable"),
            }
        });
    }

    fn spawn_render_probe(&self) {
        let shared = self.shared.clone();
        let clock = self.clock.clone();
        self.tasks.spawn(async move {
            probe_render(&shared, clock.as_ref()).await;
        });
    }

    fn spawn_frame_rate_sampler(&self) {
        let shared = self.shared.clone();
        let clock = self.clock.clone();
        let token = self.token.clone();
        self.tasks.spawn(run_frame_rate_sampler(shared, clock, token));
    }
}

impl Drop for PerformanceMonitor {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn probe_render(shared: &Shared, clock: &dyn FrameClock) -> Option<RenderSample> {
    let sample = render_time::measure(clock).await?;
    tracing::debug!(session = %shared.session, render_ms = sample.millis(), "render time measured");
    shared.apply(Update::RenderSample(sample)).then_some(sample)
}

async fn run_frame_rate_sampler(
    shared: Shared,
    clock: Arc<dyn FrameClock>,
    token: CancellationToken,
) {
    let cfg = shared.cfg.clone();
    let mut counter = FrameRateCounter::new(
        clock.now(),
        cfg.frame_window(),
        cfg.frame_rate_low,
        cfg.frame_rate_trigger,
    );

    loop {
        let frame = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            frame = clock.next_frame() => frame,
        };
        let Some(now) = frame else {
            tracing::debug!(session = %shared.session, "frame clock stopped");
            break;
        };
        if let Some(window) = counter.on_frame(now) {
            tracing::debug!(
                session = %shared.session,
                frames = window.frames,
                low = window.low,
                "frame window closed"
            );
            shared.apply(Update::FrameWindow(window));
        }
    }
    tracing::debug!(session = %shared.session, "frame rate sampler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::signals::StaticSignals;
    use crate::environment::snapshot::{BatteryLevel, DeviceClass, Hint};
    use crate::optimization::settings::AnimationIntensity;
    use crate::runtime::clock::TickerFrameClock;
    use crate::types::FrameRateTrigger;
    use std::time::Duration;

    fn mount_with(cfg: MonitorCfg, signals: StaticSignals) -> PerformanceMonitor {
        let clock = TickerFrameClock::new(cfg.frame_period());
        PerformanceMonitor::mount(Arc::new(cfg), Arc::new(signals), Arc::new(clock))
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn state_apply_after_unmount_is_discarded() {
        let cfg = MonitorCfg::default();
        let mut state = MonitorState::new(&cfg);
        assert!(state.apply(Update::Unmount, &cfg));
        let frozen = state.clone();
        assert!(!state.apply(Update::Battery { detection: 0, level: 0.01 }, &cfg));
        assert!(!state.apply(Update::FrameWindow(FrameWindow { frames: 3, low: true }), &cfg));
        assert!(!state.apply(Update::Override(true), &cfg));
        assert_eq!(state, frozen);
    }

    #[test]
    fn state_detected_keeps_render_time() {
        let cfg = MonitorCfg::default();
        let mut state = MonitorState::new(&cfg);
        state.apply(
            Update::RenderSample(RenderSample { elapsed: Duration::from_millis(8) }),
            &cfg,
        );
        let detection = detector::detect(&StaticSignals::unavailable().with_memory_gb(1.0), &cfg);
        state.apply(Update::Detected(detection), &cfg);
        assert_eq!(state.snapshot.device_class, DeviceClass::Low);
        assert!((state.snapshot.render_time_ms - 8.0).abs() < 1e-9);
    }

    #[test]
    fn state_high_battery_changes_nothing() {
        let cfg = MonitorCfg::default();
        let mut state = MonitorState::new(&cfg);
        assert!(!state.apply(Update::Battery { detection: 0, level: 0.8 }, &cfg));
        assert!(!state.is_low_performance_mode());
    }

    #[test]
    fn state_drops_battery_from_earlier_pass() {
        let cfg = MonitorCfg::default();
        let mut state = MonitorState::new(&cfg);
        let detection = detector::detect(&StaticSignals::unavailable(), &cfg);
        state.apply(Update::Detected(detection.clone()), &cfg);
        assert_eq!(state.detection, 1);

        // charged battery seen by the second pass, low one still in flight
        state.apply(Update::Detected(detection), &cfg);
        assert!(!state.apply(Update::Battery { detection: 1, level: 0.05 }, &cfg));
        assert!(!state.apply(Update::Battery { detection: 2, level: 0.95 }, &cfg));
        assert_eq!(state.snapshot.battery_level, BatteryLevel::Good);
        assert!(state.snapshot.recommendations.is_empty());
        assert!(!state.is_low_performance_mode());
    }

    #[tokio::test(start_paused = true)]
    async fn mount_publishes_detection_immediately() {
        let monitor = mount_with(MonitorCfg::default(), StaticSignals::unavailable());
        let state = monitor.state();
        assert!(state.mounted);
        assert_eq!(state.snapshot.device_class, DeviceClass::High);
        assert_eq!(state.frame_rate, 60);
        assert_eq!(monitor.optimization_settings(), OptimizationSettings::default());
        assert!(monitor.warnings().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reduced_motion_raises_at_mount() {
        let monitor = mount_with(
            MonitorCfg::default(),
            StaticSignals::unavailable().with_reduced_motion(true),
        );
        assert!(monitor.is_low_performance_mode());
        assert_eq!(monitor.state().low_mode.raised_by(), Some(Trigger::ReducedMotion));
    }

    #[tokio::test(start_paused = true)]
    async fn render_probe_records_latency() {
        let monitor = mount_with(MonitorCfg::default(), StaticSignals::unavailable());
        wait(20).await;
        let snap = monitor.snapshot();
        assert!(snap.render_time_ms > 16.0 && snap.render_time_ms < 16.67);
        assert!(!monitor.is_low_performance_mode());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_render_raises() {
        let cfg = MonitorCfg { refresh_hz: 30, ..MonitorCfg::default() };
        let monitor = mount_with(cfg, StaticSignals::unavailable());
        wait(40).await;
        assert_eq!(monitor.state().low_mode.raised_by(), Some(Trigger::SlowRender));
    }

    #[tokio::test(start_paused = true)]
    async fn on_demand_render_measurement() {
        let monitor = mount_with(MonitorCfg::default(), StaticSignals::unavailable());
        let sample = monitor.measure_render_time().await.unwrap();
        assert!(!sample.is_slow(16.67));
        assert!((monitor.snapshot().render_time_ms - sample.millis()).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_rate_published_each_window() {
        let cfg = MonitorCfg {
            refresh_hz: 45,
            frame_budget_ms: 100.0,
            ..MonitorCfg::default()
        };
        let monitor = mount_with(cfg, StaticSignals::unavailable());
        let rx = monitor.subscribe();
        wait(1100).await;
        assert!(rx.has_changed().unwrap());
        let rate = monitor.frame_rate();
        assert!((44..=46).contains(&rate), "rate {rate}");
        assert!(!monitor.is_low_performance_mode());
    }

    #[tokio::test(start_paused = true)]
    async fn sustained_low_frame_rate_raises() {
        let cfg = MonitorCfg {
            refresh_hz: 20,
            frame_budget_ms: 100.0,
            ..MonitorCfg::default()
        };
        let monitor = mount_with(cfg, StaticSignals::unavailable());
        wait(900).await;
        assert!(!monitor.is_low_performance_mode());
        wait(200).await;
        assert_eq!(monitor.frame_rate(), 20);
        assert_eq!(monitor.state().low_mode.raised_by(), Some(Trigger::LowFrameRate));
        assert_eq!(monitor.warnings(), vec![Warning::LowFrameRate]);
    }

    #[tokio::test(start_paused = true)]
    async fn post_reset_trigger_fires_on_fast_device() {
        let cfg = MonitorCfg {
            frame_rate_trigger: FrameRateTrigger::PostReset,
            ..MonitorCfg::default()
        };
        let monitor = mount_with(cfg, StaticSignals::unavailable());
        wait(1100).await;
        assert!(monitor.frame_rate() >= 60);
        assert_eq!(monitor.state().low_mode.raised_by(), Some(Trigger::LowFrameRate));
        // the published rate is healthy, so no warning
        assert!(monitor.warnings().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn low_battery_applies_later() {
        let monitor = mount_with(
            MonitorCfg::default(),
            StaticSignals::unavailable().with_deferred_battery(0.15, Duration::from_secs(3)),
        );
        assert_eq!(monitor.snapshot().battery_level, BatteryLevel::Good);
        assert!(!monitor.is_low_performance_mode());

        wait(3100).await;
        let snap = monitor.snapshot();
        assert_eq!(snap.battery_level, BatteryLevel::Low);
        assert_eq!(snap.recommendations, vec![Hint::SaveBattery]);
        assert_eq!(monitor.state().low_mode.raised_by(), Some(Trigger::LowBattery));

        let settings = monitor.optimization_settings();
        assert!(settings.particle_count <= 5);
        assert_eq!(settings.animation_intensity, AnimationIntensity::Minimal);
        assert!(!settings.enable_shapes);
    }

    #[tokio::test(start_paused = true)]
    async fn redetect_supersedes_pending_battery_query() {
        let monitor = mount_with(
            MonitorCfg::default(),
            StaticSignals::unavailable().with_deferred_battery(0.1, Duration::from_secs(2)),
        );
        wait(1000).await;
        monitor.redetect();
        wait(1500).await;
        // first query resolved at 2s against the second pass
        assert_eq!(monitor.snapshot().battery_level, BatteryLevel::Good);

        wait(1500).await;
        let snap = monitor.snapshot();
        assert_eq!(snap.battery_level, BatteryLevel::Low);
        assert_eq!(snap.recommendations, vec![Hint::SaveBattery]);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_refresh_rate_runs_at_sixty_hz() {
        let cfg = MonitorCfg { refresh_hz: 0, ..MonitorCfg::default() };
        let monitor = mount_with(cfg, StaticSignals::unavailable());
        wait(1100).await;
        assert!(monitor.snapshot().render_time_ms < 16.67);
        assert!(monitor.frame_rate() >= 59);
        assert!(!monitor.is_low_performance_mode());
        assert!(monitor.warnings().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn render_measurement_after_unmount_is_none() {
        let monitor = mount_with(MonitorCfg::default(), StaticSignals::unavailable());
        wait(20).await;
        monitor.unmount();
        let before = monitor.snapshot().render_time_ms;
        assert!(monitor.measure_render_time().await.is_none());
        assert_eq!(monitor.snapshot().render_time_ms, before);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_override_and_reset() {
        let monitor = mount_with(MonitorCfg::default(), StaticSignals::unavailable());
        monitor.set_low_performance_mode(true);
        assert_eq!(monitor.state().low_mode.raised_by(), Some(Trigger::Manual));
        assert_eq!(monitor.optimization_settings().particle_count, 10);

        monitor.set_low_performance_mode(false);
        assert!(!monitor.is_low_performance_mode());
        assert_eq!(monitor.optimization_settings(), OptimizationSettings::default());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_stops_sampling() {
        let monitor = mount_with(
            MonitorCfg { refresh_hz: 20, frame_budget_ms: 100.0, ..MonitorCfg::default() },
            StaticSignals::unavailable().with_deferred_battery(0.05, Duration::from_secs(5)),
        );
        wait(500).await;
        monitor.unmount();
        let frozen = monitor.state();
        assert!(!frozen.mounted);
        assert_eq!(frozen.frame_rate, 60);

        // frames keep ticking and the battery would resolve; nothing lands
        wait(6000).await;
        assert_eq!(monitor.state(), frozen);
        monitor.set_low_performance_mode(true);
        assert_eq!(monitor.state(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_tasks() {
        let monitor = mount_with(
            MonitorCfg::default(),
            StaticSignals::unavailable().with_deferred_battery(0.5, Duration::from_secs(3600)),
        );
        wait(50).await;
        tokio::time::timeout(Duration::from_secs(1), monitor.shutdown())
            .await
            .expect("tasks finish promptly after unmount");
    }
}
