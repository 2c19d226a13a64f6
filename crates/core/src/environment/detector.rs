use crate::config::MonitorCfg;
use crate::environment::signals::SignalSource;
use crate::environment::snapshot::{
    BatteryLevel, ConnectionSpeed, DeviceClass, Hint, MemoryStatus, PerformanceSnapshot,
};
use crate::types::EffectiveConnectionType;

/// Result of one synchronous detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub snapshot: PerformanceSnapshot,
    pub prefers_reduced_motion: bool,
}

/// Classify the synchronously available signals.
///
/// Battery is not read here: its query resolves later and is merged through
/// [`apply_battery_level`].
pub fn detect(signals: &dyn SignalSource, cfg: &MonitorCfg) -> Detection {
    let mut snap = PerformanceSnapshot::baseline();

    if let Some(memory) = signals.device_memory_gb().filter(|m| m.is_finite() && *m > 0.0) {
        if memory <= cfg.memory_low_gb {
            snap.device_class = DeviceClass::Low;
            snap.memory_status = MemoryStatus::Limited;
            snap.recommendations.push(Hint::ReduceAnimations);
        } else if memory <= cfg.memory_medium_gb {
            snap.device_class = DeviceClass::Medium;
            snap.memory_status = MemoryStatus::Moderate;
            snap.recommendations.push(Hint::ModerateOptimization);
        }
    }

    // Core count overrides whatever the memory rule decided.
    if let Some(cores) = signals.logical_cores().filter(|c| *c > 0) {
        if cores <= cfg.cores_low {
            snap.device_class = DeviceClass::Low;
            snap.recommendations.push(Hint::ReduceProcessing);
        }
    }

    match signals.effective_connection_type() {
        Some(EffectiveConnectionType::TwoG | EffectiveConnectionType::Slow2g) => {
            snap.connection_speed = ConnectionSpeed::Slow;
            snap.recommendations.push(Hint::ReduceData);
        }
        Some(EffectiveConnectionType::ThreeG) => {
            snap.connection_speed = ConnectionSpeed::Medium;
        }
        Some(EffectiveConnectionType::FourG) | None => {}
    }

    if let Some(width) = signals.viewport_width() {
        if width <= cfg.mobile_viewport_px {
            snap.recommendations.push(Hint::OptimizeMobile);
        }
    }

    Detection {
        snapshot: snap,
        prefers_reduced_motion: signals.prefers_reduced_motion().unwrap_or(false),
    }
}

/// Merge a resolved battery level into `snap`.
/// Returns true when the level counts as low; the caller raises the flag.
pub fn apply_battery_level(snap: &mut PerformanceSnapshot, level: f64, cfg: &MonitorCfg) -> bool {
    if !level.is_finite() || level >= cfg.battery_low_ratio {
        return false;
    }
    snap.battery_level = BatteryLevel::Low;
    snap.recommendations.push(Hint::SaveBattery);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::signals::StaticSignals;

    fn run(signals: StaticSignals) -> PerformanceSnapshot {
        detect(&signals, &MonitorCfg::default()).snapshot
    }

    fn count(snap: &PerformanceSnapshot, hint: Hint) -> usize {
        snap.recommendations.iter().filter(|h| **h == hint).count()
    }

    #[test]
    fn nothing_available_is_baseline() {
        let det = detect(&StaticSignals::unavailable(), &MonitorCfg::default());
        assert_eq!(det.snapshot, PerformanceSnapshot::baseline());
        assert!(!det.prefers_reduced_motion);
    }

    #[test]
    fn low_memory() {
        for gb in [0.25, 0.5, 1.0, 2.0] {
            let snap = run(StaticSignals::unavailable().with_memory_gb(gb));
            assert_eq!(snap.device_class, DeviceClass::Low, "memory {gb}");
            assert_eq!(snap.memory_status, MemoryStatus::Limited);
            assert_eq!(count(&snap, Hint::ReduceAnimations), 1);
        }
    }

    #[test]
    fn medium_memory() {
        for gb in [2.5, 3.0, 4.0] {
            let snap = run(StaticSignals::unavailable().with_memory_gb(gb));
            assert_eq!(snap.device_class, DeviceClass::Medium, "memory {gb}");
            assert_eq!(snap.memory_status, MemoryStatus::Moderate);
            assert_eq!(snap.recommendations, vec![Hint::ModerateOptimization]);
        }
    }

    #[test]
    fn large_memory_untouched() {
        let snap = run(StaticSignals::unavailable().with_memory_gb(8.0));
        assert_eq!(snap.device_class, DeviceClass::High);
        assert_eq!(snap.memory_status, MemoryStatus::Good);
        assert!(snap.recommendations.is_empty());
    }

    #[test]
    fn zero_and_nan_memory_are_unavailable() {
        assert_eq!(
            run(StaticSignals::unavailable().with_memory_gb(0.0)),
            PerformanceSnapshot::baseline()
        );
        assert_eq!(
            run(StaticSignals::unavailable().with_memory_gb(f64::NAN)),
            PerformanceSnapshot::baseline()
        );
    }

    #[test]
    fn few_cores_override_memory() {
        let snap = run(StaticSignals::unavailable().with_memory_gb(4.0).with_cores(2));
        assert_eq!(snap.device_class, DeviceClass::Low);
        // memory status still reflects the memory rule
        assert_eq!(snap.memory_status, MemoryStatus::Moderate);
        assert_eq!(
            snap.recommendations,
            vec![Hint::ModerateOptimization, Hint::ReduceProcessing]
        );

        let snap = run(StaticSignals::unavailable().with_memory_gb(16.0).with_cores(1));
        assert_eq!(snap.device_class, DeviceClass::Low);
    }

    #[test]
    fn zero_cores_unavailable() {
        let snap = run(StaticSignals::unavailable().with_cores(0));
        assert_eq!(snap.device_class, DeviceClass::High);
    }

    #[test]
    fn connection_types() {
        let slow = run(StaticSignals::unavailable().with_connection(EffectiveConnectionType::Slow2g));
        assert_eq!(slow.connection_speed, ConnectionSpeed::Slow);
        assert_eq!(slow.recommendations, vec![Hint::ReduceData]);

        let two = run(StaticSignals::unavailable().with_connection(EffectiveConnectionType::TwoG));
        assert_eq!(two.connection_speed, ConnectionSpeed::Slow);

        let three = run(StaticSignals::unavailable().with_connection(EffectiveConnectionType::ThreeG));
        assert_eq!(three.connection_speed, ConnectionSpeed::Medium);
        assert!(three.recommendations.is_empty());

        let four = run(StaticSignals::unavailable().with_connection(EffectiveConnectionType::FourG));
        assert_eq!(four.connection_speed, ConnectionSpeed::Fast);
    }

    #[test]
    fn narrow_viewport_only_hints() {
        let snap = run(StaticSignals::unavailable().with_viewport_width(480));
        assert_eq!(snap.device_class, DeviceClass::High);
        assert_eq!(snap.recommendations, vec![Hint::OptimizeMobile]);

        let wide = run(StaticSignals::unavailable().with_viewport_width(481));
        assert!(wide.recommendations.is_empty());
    }

    #[test]
    fn hints_in_detection_order() {
        let snap = run(
            StaticSignals::unavailable()
                .with_viewport_width(360)
                .with_connection(EffectiveConnectionType::TwoG)
                .with_cores(2)
                .with_memory_gb(1.0),
        );
        assert_eq!(
            snap.recommendations,
            vec![
                Hint::ReduceAnimations,
                Hint::ReduceProcessing,
                Hint::ReduceData,
                Hint::OptimizeMobile,
            ]
        );
    }

    #[test]
    fn reduced_motion_reported() {
        let det = detect(
            &StaticSignals::unavailable().with_reduced_motion(true),
            &MonitorCfg::default(),
        );
        assert!(det.prefers_reduced_motion);
        assert_eq!(det.snapshot, PerformanceSnapshot::baseline());
    }

    #[test]
    fn battery_merge() {
        let cfg = MonitorCfg::default();
        let mut snap = PerformanceSnapshot::baseline();
        assert!(!apply_battery_level(&mut snap, 0.20, &cfg));
        assert!(!apply_battery_level(&mut snap, f64::NAN, &cfg));
        assert_eq!(snap.battery_level, BatteryLevel::Good);

        assert!(apply_battery_level(&mut snap, 0.19, &cfg));
        assert_eq!(snap.battery_level, BatteryLevel::Low);
        assert_eq!(snap.recommendations, vec![Hint::SaveBattery]);
    }
}
