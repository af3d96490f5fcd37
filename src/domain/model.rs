use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 原始 CSV 列：保留全部欄位，另外抽出座標與名稱欄位
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based data row number (header excluded)
    pub row_number: usize,
    pub name: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Every original field, in header order, byte for byte
    pub fields: csv::ByteRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub property: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    /// Latitude or Longitude empty or not a number
    MissingCoordinate,
    OutOfRange,
    SuspiciousEquality,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DropReason::MissingCoordinate => "missing or non-numeric coordinate",
            DropReason::OutOfRange => "coordinate out of range",
            DropReason::SuspiciousEquality => "latitude equals longitude",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    pub row: RawRow,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub description: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            description: "Description".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn required(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }
}

/// Closed interval `[min, max]`. NaN is never contained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRange {
    pub min: f64,
    pub max: f64,
}

impl CoordinateRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for CoordinateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

pub const LATITUDE_RANGE: CoordinateRange = CoordinateRange::new(-90.0, 90.0);
pub const LONGITUDE_RANGE: CoordinateRange = CoordinateRange::new(-180.0, 180.0);

/// 可疑座標判斷的區域設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerRules {
    /// Decimal places compared when testing latitude == longitude
    pub equality_decimals: u32,
    pub suspicious_lat: CoordinateRange,
    pub suspicious_lng: CoordinateRange,
    /// Equal coordinates inside this box are kept
    pub region_lat: CoordinateRange,
    pub region_lng: CoordinateRange,
}

impl Default for SanitizerRules {
    fn default() -> Self {
        Self {
            equality_decimals: 6,
            suspicious_lat: CoordinateRange::new(0.0, 30.0),
            suspicious_lng: CoordinateRange::new(-90.0, 90.0),
            region_lat: CoordinateRange::new(0.0, 30.0),
            region_lng: CoordinateRange::new(100.0, 140.0),
        }
    }
}

pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.01;

/// Serialized as `{"cell_size_deg": .., "index": {"<lat_i>_<lng_i>": [..]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridIndex {
    pub cell_size_deg: f64,
    pub index: BTreeMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    pub valid: usize,
    pub swapped: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl SanitizeStats {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub headers: Vec<String>,
    pub facilities: Vec<Facility>,
    pub index: GridIndex,
    pub dropped: Vec<DroppedRow>,
    pub stats: SanitizeStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub facilities: usize,
    pub cells: usize,
    pub dropped: usize,
    pub dropped_path: String,
    pub written: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Facilities: {}", self.facilities)?;
        writeln!(f, "Index cells: {}", self.cells)?;
        if self.written {
            write!(
                f,
                "Dropped rows: {} (see {})",
                self.dropped, self.dropped_path
            )
        } else {
            write!(f, "Dropped rows: {} (dry run, nothing written)", self.dropped)
        }
    }
}
