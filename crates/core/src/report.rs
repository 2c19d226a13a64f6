use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MonitorCfg;
use crate::environment::snapshot::PerformanceSnapshot;
use crate::i18n::Locale;
use crate::optimization::settings::OptimizationSettings;
use crate::runtime::flag::Trigger;
use crate::runtime::monitor::MonitorState;

/// Serializable view of a session for the rendering layer, with messages
/// rendered in one locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub locale: Locale,
    pub snapshot: PerformanceSnapshot,
    pub is_low_performance_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_performance_trigger: Option<Trigger>,
    pub frame_rate: u32,
    pub optimization_settings: OptimizationSettings,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PerformanceReport {
    pub fn build(session_id: Uuid, state: &MonitorState, cfg: &MonitorCfg, locale: Locale) -> Self {
        Self {
            session_id,
            generated_at: Utc::now(),
            locale,
            snapshot: state.snapshot.clone(),
            is_low_performance_mode: state.is_low_performance_mode(),
            low_performance_trigger: state.low_mode.raised_by(),
            frame_rate: state.frame_rate,
            optimization_settings: state.optimization_settings(),
            warnings: state
                .warnings(cfg)
                .into_iter()
                .map(|w| w.message(locale).to_owned())
                .collect(),
            recommendations: state
                .snapshot
                .recommendation_messages(locale)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}
