use serde::{Deserialize, Serialize};

use crate::i18n::{self, Locale};
use crate::runtime::monitor::MonitorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStyle {
    #[default]
    Spinner,
    Dots,
    Progress,
}

impl LoadingStyle {
    /// Style actually rendered. Low performance mode degrades everything but
    /// progress bars to dots.
    pub fn effective(self, low_performance_mode: bool) -> Self {
        if low_performance_mode && self != Self::Progress {
            Self::Dots
        } else {
            self
        }
    }
}

/// What a loading placeholder should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingView {
    pub style: LoadingStyle,
    /// Plain spinner instead of the animated variant.
    pub simple_spinner: bool,
    pub notice: Option<&'static str>,
}

impl LoadingView {
    pub fn resolve(requested: LoadingStyle, show_notice: bool, state: &MonitorState, locale: Locale) -> Self {
        let low = state.is_low_performance_mode();
        Self {
            style: requested.effective(low),
            simple_spinner: low,
            notice: (show_notice && low).then(|| i18n::performance_notice(locale)),
        }
    }
}
