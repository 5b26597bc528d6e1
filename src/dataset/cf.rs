//! CF packing conventions for data variables read from disk.

use tracing::debug;

use super::Field;

const FILL_VALUE: &str = "_FillValue";
const MISSING_VALUE: &str = "missing_value";
const SCALE_FACTOR: &str = "scale_factor";
const ADD_OFFSET: &str = "add_offset";
const UNSIGNED: &str = "_Unsigned";

/// Mask fill/missing sentinels to NaN and unpack `scale_factor`/`add_offset` in place.
/// The encoding attributes are removed once applied.
///
/// `integer_bits` is the width of the on-disk integer type, if any. With `_Unsigned = "true"`
/// negative raw values (and sentinels) are read back as `raw + 2^bits` before masking and
/// unpacking.
pub fn decode_cf(field: &mut Field, integer_bits: Option<u32>) {
    let unsigned_bits = match field.attrs.remove(UNSIGNED) {
        Some(flag) if flag.as_str().is_some_and(|v| v.eq_ignore_ascii_case("true")) => {
            if integer_bits.is_none() {
                debug!("_Unsigned set on a non-integer variable; ignored");
            }
            integer_bits
        }
        _ => None,
    };
    let as_unsigned = |raw: f64| match unsigned_bits {
        Some(bits) if raw < 0.0 => raw + 2f64.powi(bits as i32),
        _ => raw,
    };

    let mut sentinels: Vec<f64> = Vec::new();
    for name in [FILL_VALUE, MISSING_VALUE] {
        if let Some(value) = field.attrs.remove(name) {
            sentinels.extend(value.as_f64_vec().into_iter().map(as_unsigned));
        }
    }
    let scale = field
        .attrs
        .remove(SCALE_FACTOR)
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let offset = field
        .attrs
        .remove(ADD_OFFSET)
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    if unsigned_bits.is_none() && sentinels.is_empty() && scale == 1.0 && offset == 0.0 {
        return;
    }

    field.data.mapv_inplace(|raw| {
        let raw = as_unsigned(raw);
        if sentinels.iter().any(|s| *s == raw || (s.is_nan() && raw.is_nan())) {
            f64::NAN
        } else {
            raw * scale + offset
        }
    });
}
