use crate::domain::model::{Facility, GridIndex};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Separator between the two cell indices; never part of a formatted integer.
pub const CELL_KEY_SEPARATOR: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub lat_i: i64,
    pub lng_i: i64,
}

impl CellKey {
    /// Floor division, so `-0.001 / 0.01` lands in cell `-1`, not `0`.
    pub fn for_point(lat: f64, lng: f64, cell_size_deg: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some(Self {
            lat_i: (lat / cell_size_deg).floor() as i64,
            lng_i: (lng / cell_size_deg).floor() as i64,
        })
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.lat_i, CELL_KEY_SEPARATOR, self.lng_i)
    }
}

impl FromStr for CellKey {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EtlError::ProcessingError {
            message: format!("Invalid cell key: '{}'", s),
        };

        let (lat, lng) = s.split_once(CELL_KEY_SEPARATOR).ok_or_else(invalid)?;
        Ok(Self {
            lat_i: lat.parse().map_err(|_| invalid())?,
            lng_i: lng.parse().map_err(|_| invalid())?,
        })
    }
}

/// Buckets facilities into fixed-size lat/lng cells.
#[derive(Debug, Clone, Copy)]
pub struct GridIndexer {
    cell_size_deg: f64,
}

impl GridIndexer {
    pub fn new(cell_size_deg: f64) -> Result<Self> {
        if !cell_size_deg.is_finite() || cell_size_deg <= 0.0 {
            return Err(EtlError::InvalidConfigValueError {
                field: "cell_size_deg".to_string(),
                value: cell_size_deg.to_string(),
                reason: "Cell size must be a finite number greater than 0".to_string(),
            });
        }
        Ok(Self { cell_size_deg })
    }

    pub fn build(&self, facilities: &[Facility]) -> Result<GridIndex> {
        let mut index: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (i, facility) in facilities.iter().enumerate() {
            let key = CellKey::for_point(facility.lat, facility.lng, self.cell_size_deg)
                .ok_or_else(|| EtlError::ProcessingError {
                    message: format!(
                        "Facility {} ('{}') has non-finite coordinates",
                        i, facility.id
                    ),
                })?;

            index.entry(key.to_string()).or_default().push(i);
        }

        tracing::debug!(
            "Indexed {} facilities into {} cells of {}°",
            facilities.len(),
            index.len(),
            self.cell_size_deg
        );

        Ok(GridIndex {
            cell_size_deg: self.cell_size_deg,
            index,
        })
    }
}

impl GridIndex {
    pub fn cell_count(&self) -> usize {
        self.index.len()
    }

    pub fn facility_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    /// Cell containing an arbitrary query point, using this index's cell size.
    pub fn cell_of(&self, lat: f64, lng: f64) -> Option<CellKey> {
        CellKey::for_point(lat, lng, self.cell_size_deg)
    }

    pub fn bucket(&self, key: &CellKey) -> &[usize] {
        self.index
            .get(&key.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(id: &str, lat: f64, lng: f64) -> Facility {
        Facility {
            id: id.to_string(),
            property: String::new(),
            lat,
            lng,
        }
    }

    #[test]
    fn test_floor_across_zero() {
        let zero = CellKey::for_point(0.0, 0.0, 0.01).unwrap();
        let below = CellKey::for_point(-0.001, 0.0, 0.01).unwrap();

        assert_eq!(zero, CellKey { lat_i: 0, lng_i: 0 });
        assert_eq!(below, CellKey { lat_i: -1, lng_i: 0 });
        assert_ne!(zero.to_string(), below.to_string());
    }

    #[test]
    fn test_cell_key_format_and_parse() {
        let key = CellKey::for_point(14.5995, -120.9842, 0.01).unwrap();

        assert_eq!(key.to_string(), "1459_-12099");
        assert_eq!("1459_-12099".parse::<CellKey>().unwrap(), key);
        assert_eq!(
            "-1_-1".parse::<CellKey>().unwrap(),
            CellKey { lat_i: -1, lng_i: -1 }
        );
        assert!("12-34".parse::<CellKey>().is_err());
        assert!("a_1".parse::<CellKey>().is_err());
    }

    #[test]
    fn test_non_finite_point_has_no_cell() {
        assert!(CellKey::for_point(f64::NAN, 0.0, 0.01).is_none());
        assert!(CellKey::for_point(0.0, f64::INFINITY, 0.01).is_none());
    }

    #[test]
    fn test_nearby_facilities_share_a_cell() {
        let indexer = GridIndexer::new(0.01).unwrap();
        let facilities = vec![
            facility("a", 14.5511, 121.0211),
            facility("b", 14.5555, 121.0244),
            facility("c", 14.5611, 121.0211),
            facility("d", 14.5599, 121.0299),
        ];

        let grid = indexer.build(&facilities).unwrap();

        assert_eq!(grid.cell_count(), 2);
        assert_eq!(grid.index["1455_12102"], vec![0, 1, 3]);
        assert_eq!(grid.index["1456_12102"], vec![2]);
        assert_eq!(grid.facility_count(), 4);
    }

    #[test]
    fn test_every_facility_in_exactly_one_bucket() {
        let indexer = GridIndexer::new(0.5).unwrap();
        let facilities: Vec<Facility> = (0..50)
            .map(|i| facility(&i.to_string(), -10.0 + i as f64 * 0.37, 100.0 - i as f64 * 0.91))
            .collect();

        let grid = indexer.build(&facilities).unwrap();

        let mut seen: Vec<usize> = grid.index.values().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());

        for (i, f) in facilities.iter().enumerate() {
            let key = grid.cell_of(f.lat, f.lng).unwrap();
            assert!(grid.bucket(&key).contains(&i));
        }
    }

    #[test]
    fn test_empty_input_gives_empty_index() {
        let grid = GridIndexer::new(0.01).unwrap().build(&[]).unwrap();

        assert_eq!(grid.cell_count(), 0);
        assert_eq!(
            serde_json::to_string(&grid).unwrap(),
            r#"{"cell_size_deg":0.01,"index":{}}"#
        );
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        assert!(GridIndexer::new(0.0).is_err());
        assert!(GridIndexer::new(-0.01).is_err());
        assert!(GridIndexer::new(f64::NAN).is_err());
    }

    #[test]
    fn test_index_json_shape() {
        let indexer = GridIndexer::new(0.01).unwrap();
        let grid = indexer
            .build(&[facility("a", 0.005, 0.005), facility("b", -0.005, 0.005)])
            .unwrap();

        assert_eq!(
            serde_json::to_string(&grid).unwrap(),
            r#"{"cell_size_deg":0.01,"index":{"-1_0":[1],"0_0":[0]}}"#
        );
    }
}
