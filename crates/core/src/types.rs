use serde::{Deserialize, Serialize};

/// All backend primary keys are 64-bit integers.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Unit an area figure is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    Hectare,
    Acre,
    SquareMeter,
}

impl AreaUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaUnit::Hectare => "hectare",
            AreaUnit::Acre => "acre",
            AreaUnit::SquareMeter => "square_meter",
        }
    }
}
