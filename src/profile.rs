use std::fmt::Display;

use chrono::{NaiveTime, Timelike};
use serde::Deserialize;

// Which of a connection's weights a query reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WeightProfile {
    #[default]
    Weight,
    OffPeak,
    AmPeak,
    InterPeak,
}

impl WeightProfile {
    /// Time-of-day band: AM peak 07:00-09:59, inter-peak 10:00-15:59, off-peak otherwise.
    pub fn for_time(time: NaiveTime) -> Self {
        match time.hour() {
            7..=9 => WeightProfile::AmPeak,
            10..=15 => WeightProfile::InterPeak,
            _ => WeightProfile::OffPeak,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeightProfile::Weight => "weight",
            WeightProfile::OffPeak => "off-peak",
            WeightProfile::AmPeak => "am-peak",
            WeightProfile::InterPeak => "inter-peak",
        }
    }
}

impl Display for WeightProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
