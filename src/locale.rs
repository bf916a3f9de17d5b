use serde::{Deserialize, Serialize};

use crate::puzzle::model::GroupColor;

pub const BRAND_LINE: &str = "FORALL - From Saudi Arabia to the World";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "ar" | "arabic" => Some(Language::Arabic),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Arabic,
            Language::Arabic => Language::English,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Language::English => "Climbing the mountain. by Abdulmalek Akel",
            Language::Arabic => "الصعود الى الجبل تطوير. عبدالملك العاقل",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Language::English => {
                "Calculate the minimum time needed for all students to reach the mountain top"
            }
            Language::Arabic => "حساب الحد الأدنى من الوقت اللازم لوصول جميع الطلاب إلى قمة الجبل",
        }
    }

    pub fn calculate_button(self) -> &'static str {
        match self {
            Language::English => "Calculate Time",
            Language::Arabic => "حساب الوقت",
        }
    }

    pub fn process_details(self) -> &'static str {
        match self {
            Language::English => "Process Details",
            Language::Arabic => "تفاصيل العملية",
        }
    }

    pub fn team_label(self, color: GroupColor) -> &'static str {
        match (self, color) {
            (Language::English, GroupColor::Red) => "Red Team",
            (Language::English, GroupColor::Green) => "Green Team",
            (Language::English, GroupColor::Blue) => "Blue Team",
            (Language::Arabic, GroupColor::Red) => "الفريق الأحمر",
            (Language::Arabic, GroupColor::Green) => "الفريق الأخضر",
            (Language::Arabic, GroupColor::Blue) => "الفريق الأزرق",
        }
    }

    pub fn total_time_line(self, minutes: u64) -> String {
        match self {
            Language::English => format!("Total Time: {minutes} minutes"),
            Language::Arabic => format!("الوقت الإجمالي: {minutes} دقيقة"),
        }
    }

    pub fn trips_line(self, color: GroupColor, trips: u32) -> String {
        let label = self.team_label(color);
        match self {
            Language::English => format!("{label}: {trips} trips"),
            Language::Arabic => format!("{label}: {trips} رحلات"),
        }
    }

    pub fn theme_toggle(self, dark: bool) -> &'static str {
        match (self, dark) {
            (Language::English, true) => "Light mode",
            (Language::English, false) => "Dark mode",
            (Language::Arabic, true) => "الوضع الفاتح",
            (Language::Arabic, false) => "الوضع الداكن",
        }
    }

    /// Label of the button that switches to the other language, written in that language.
    pub fn language_toggle(self) -> &'static str {
        match self {
            Language::English => "العربية",
            Language::Arabic => "English",
        }
    }
}
