use crate::models::DistanceUnit;

/// Kilometers per mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Converts a distance between units, rounding to the nearest whole unit.
///
/// Each call rounds on its own, so converting back and forth can drift by one
/// unit. Callers toggling a vehicle's unit accept that drift.
pub fn convert(value: u64, from: DistanceUnit, to: DistanceUnit) -> u64 {
    let v = value as f64;
    let converted = match (from, to) {
        (DistanceUnit::Miles, DistanceUnit::Km) => v * KM_PER_MILE,
        (DistanceUnit::Km, DistanceUnit::Miles) => v / KM_PER_MILE,
        _ => return value,
    };
    converted.round() as u64
}

/// Same as [`convert`] for stored readings, which may be negative (invalid) and
/// are then left untouched.
pub fn convert_reading(value: i64, from: DistanceUnit, to: DistanceUnit) -> i64 {
    match u64::try_from(value) {
        Ok(v) => convert(v, from, to) as i64,
        Err(_) => value,
    }
}
