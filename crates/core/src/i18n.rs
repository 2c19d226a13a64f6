//! Message catalog for the monitor's user-facing strings.
//!
//! The product ships in Arabic (default), English and French. Arabic copy is
//! the reference wording; the other locales translate it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::environment::snapshot::Hint;
use crate::optimization::warnings::Warning;
use crate::types::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Ar, Locale::En, Locale::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
            Self::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseError;

    /// Accepts a bare language code or a region-qualified tag (`fr-FR`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            _ => Err(ParseError::Locale(s.trim().to_owned())),
        }
    }
}

pub fn hint(locale: Locale, hint: Hint) -> &'static str {
    match (hint, locale) {
        (Hint::ReduceAnimations, Locale::Ar) => "تقليل الانيميشنز",
        (Hint::ReduceAnimations, Locale::En) => "Reduce animations",
        (Hint::ReduceAnimations, Locale::Fr) => "Réduire les animations",
        (Hint::ModerateOptimization, Locale::Ar) => "تحسين معتدل",
        (Hint::ModerateOptimization, Locale::En) => "Moderate optimization",
        (Hint::ModerateOptimization, Locale::Fr) => "Optimisation modérée",
        (Hint::ReduceProcessing, Locale::Ar) => "تقليل المعالجة",
        (Hint::ReduceProcessing, Locale::En) => "Reduce processing",
        (Hint::ReduceProcessing, Locale::Fr) => "Réduire le traitement",
        (Hint::ReduceData, Locale::Ar) => "تقليل البيانات",
        (Hint::ReduceData, Locale::En) => "Reduce data usage",
        (Hint::ReduceData, Locale::Fr) => "Réduire les données",
        (Hint::SaveBattery, Locale::Ar) => "توفير البطارية",
        (Hint::SaveBattery, Locale::En) => "Save battery",
        (Hint::SaveBattery, Locale::Fr) => "Économiser la batterie",
        (Hint::OptimizeMobile, Locale::Ar) => "تحسين الجوال",
        (Hint::OptimizeMobile, Locale::En) => "Optimize for mobile",
        (Hint::OptimizeMobile, Locale::Fr) => "Optimiser pour mobile",
    }
}

pub fn warning(locale: Locale, warning: Warning) -> &'static str {
    match (warning, locale) {
        (Warning::LowFrameRate, Locale::Ar) => "معدل الإطارات منخفض - سيتم تقليل التأثيرات",
        (Warning::LowFrameRate, Locale::En) => "Low frame rate - effects will be reduced",
        (Warning::LowFrameRate, Locale::Fr) => {
            "Fréquence d'images faible - les effets seront réduits"
        }
        (Warning::LimitedMemory, Locale::Ar) => "ذاكرة الجهاز محدودة - تم تفعيل الوضع المحسن",
        (Warning::LimitedMemory, Locale::En) => "Limited device memory - optimized mode enabled",
        (Warning::LimitedMemory, Locale::Fr) => {
            "Mémoire de l'appareil limitée - mode optimisé activé"
        }
        (Warning::LowBattery, Locale::Ar) => "مستوى البطارية منخفض - تم تفعيل وضع توفير الطاقة",
        (Warning::LowBattery, Locale::En) => "Low battery level - power saving mode enabled",
        (Warning::LowBattery, Locale::Fr) => {
            "Niveau de batterie faible - mode économie d'énergie activé"
        }
    }
}

/// Banner shown next to loading indicators while low performance mode is on.
pub fn performance_notice(locale: Locale) -> &'static str {
    match locale {
        Locale::Ar => "🔋 وضع توفير الأداء مفعل",
        Locale::En => "🔋 Performance saving mode enabled",
        Locale::Fr => "🔋 Mode économie de performance activé",
    }
}
