//! The input row type consumed by the enrichment pipeline.

use chrono::NaiveDate;

/// One stranding event, reduced to the attributes the weather enrichment needs.
///
/// Records are owned by the caller and only read during enrichment. The `id`
/// is carried through to the resulting [`crate::FeatureRow`] so results can be
/// matched back to the originating row; when records are read from a
/// `DataFrame` it is the row position.
#[derive(Debug, Clone, PartialEq)]
pub struct StrandingRecord {
    /// Opaque row identifier.
    pub id: usize,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Calendar date of the event, `None` when the source value could not be parsed.
    pub event_date: Option<NaiveDate>,
}

impl StrandingRecord {
    pub fn new(id: usize, latitude: f64, longitude: f64, event_date: Option<NaiveDate>) -> Self {
        Self {
            id,
            latitude,
            longitude,
            event_date,
        }
    }
}
