use crate::domain::model::{
    DropReason, DroppedRow, Facility, RawRow, SanitizeStats, SanitizerRules, LATITUDE_RANGE,
    LONGITUDE_RANGE,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Valid { lat: f64, lng: f64, swapped: bool },
    Dropped(DropReason),
}

#[derive(Debug, Clone, Default)]
pub struct SanitizeOutcome {
    pub facilities: Vec<Facility>,
    pub dropped: Vec<DroppedRow>,
    pub stats: SanitizeStats,
}

/// Repairs swapped coordinates and partitions rows into facilities and drops.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    rules: SanitizerRules,
}

impl Sanitizer {
    pub fn new(rules: SanitizerRules) -> Self {
        Self { rules }
    }

    pub fn classify(&self, latitude: Option<f64>, longitude: Option<f64>) -> Verdict {
        let (Some(mut lat), Some(mut lng)) = (latitude, longitude) else {
            return Verdict::Dropped(DropReason::MissingCoordinate);
        };

        // 經緯度填反：先交換再檢查範圍
        let swapped = lat.abs() > 90.0 && lng.abs() <= 90.0;
        if swapped {
            std::mem::swap(&mut lat, &mut lng);
        }

        // NaN 比較一律為 false，因此也會在這裡被丟棄
        if !LATITUDE_RANGE.contains(lat) || !LONGITUDE_RANGE.contains(lng) {
            return Verdict::Dropped(DropReason::OutOfRange);
        }

        if self.is_suspicious(lat, lng) && !self.in_region(lat, lng) {
            return Verdict::Dropped(DropReason::SuspiciousEquality);
        }

        Verdict::Valid { lat, lng, swapped }
    }

    /// Same value copied into both columns within the plausible-latitude band.
    pub fn is_suspicious(&self, lat: f64, lng: f64) -> bool {
        let scale = 10f64.powi(self.rules.equality_decimals as i32);
        // 與 pandas round() 相同：.5 取偶數
        (lat * scale).round_ties_even() == (lng * scale).round_ties_even()
            && self.rules.suspicious_lat.contains(lat)
            && self.rules.suspicious_lng.contains(lng)
    }

    pub fn in_region(&self, lat: f64, lng: f64) -> bool {
        self.rules.region_lat.contains(lat) && self.rules.region_lng.contains(lng)
    }

    pub fn sanitize(&self, rows: Vec<RawRow>) -> SanitizeOutcome {
        let mut outcome = SanitizeOutcome::default();

        for row in rows {
            match self.classify(row.latitude, row.longitude) {
                Verdict::Valid { lat, lng, swapped } => {
                    if swapped {
                        tracing::debug!(
                            "Row {} ({}): swapped latitude/longitude",
                            row.row_number,
                            row.name.trim()
                        );
                        outcome.stats.swapped += 1;
                    }
                    outcome.stats.valid += 1;
                    outcome.facilities.push(Facility {
                        id: row.name.trim().to_string(),
                        property: row.description.trim().to_string(),
                        lat,
                        lng,
                    });
                }
                Verdict::Dropped(reason) => {
                    tracing::debug!(
                        "Row {} ({}): dropped, {}",
                        row.row_number,
                        row.name.trim(),
                        reason
                    );
                    *outcome.stats.dropped.entry(reason).or_insert(0) += 1;
                    outcome.dropped.push(DroppedRow { row, reason });
                }
            }
        }

        outcome
    }
}
