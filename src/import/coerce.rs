//! Field-level coercion of raw CSV text.
//!
//! The `try_*` functions report why a value was rejected; the plain versions
//! are what the mapper uses and collapse every failure to `None`.

use tracing::trace;

use crate::config::BooleanMode;
use crate::error::ImportError;

/// Spellings the dataset uses for "no value".
const MISSING_SENTINELS: &[&str] = &[
    "", "nan", "NaN", "-nan", "-NaN", "NA", "N/A", "n/a", "<NA>", "#N/A", "#NA", "#N/A N/A",
    "NULL", "null", "None", "none",
];

/// `None` for absent or sentinel values, otherwise the trimmed text.
pub fn present(raw: Option<&str>) -> Option<&str> {
    let value = raw?.trim();
    if MISSING_SENTINELS.contains(&value) {
        None
    } else {
        Some(value)
    }
}

pub fn try_float(column: &'static str, raw: Option<&str>) -> Result<Option<f64>, ImportError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(ImportError::FieldCoercion {
            column,
            raw: value.to_string(),
        }),
    }
}

/// Integers may arrive as integral floats ("75001.0"); fractions truncate toward zero.
pub fn try_int(column: &'static str, raw: Option<&str>) -> Result<Option<i32>, ImportError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    if let Ok(number) = value.parse::<i32>() {
        return Ok(Some(number));
    }
    match value.parse::<f64>() {
        Ok(number) if (i32::MIN as f64..=i32::MAX as f64).contains(&number.trunc()) => {
            Ok(Some(number.trunc() as i32))
        }
        _ => Err(ImportError::FieldCoercion {
            column,
            raw: value.to_string(),
        }),
    }
}

/// Accepts `"[45.0, 50.2]"` or a bare scalar. An empty list is rejected so that
/// absence is always `None`, never `[]`.
pub fn try_surface(column: &'static str, raw: Option<&str>) -> Result<Option<Vec<f64>>, ImportError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    let reject = || ImportError::FieldCoercion {
        column,
        raw: value.to_string(),
    };

    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let values = inner
            .split(',')
            .map(|item| match item.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(number),
                _ => Err(reject()),
            })
            .collect::<Result<Vec<f64>, _>>()?;
        return if values.is_empty() { Err(reject()) } else { Ok(Some(values)) };
    }

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(vec![number])),
        _ => Err(reject()),
    }
}

pub fn try_bool(
    column: &'static str,
    raw: Option<&str>,
    mode: BooleanMode,
) -> Result<Option<bool>, ImportError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    match mode {
        BooleanMode::Legacy => Ok(Some(true)),
        BooleanMode::Strict => match value.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "1.0" => Ok(Some(true)),
            "false" | "f" | "no" | "n" | "0" | "0.0" => Ok(Some(false)),
            _ => Err(ImportError::FieldCoercion {
                column,
                raw: value.to_string(),
            }),
        },
    }
}

pub fn float(column: &'static str, raw: Option<&str>) -> Option<f64> {
    recover(try_float(column, raw))
}

pub fn int(column: &'static str, raw: Option<&str>) -> Option<i32> {
    recover(try_int(column, raw))
}

pub fn surface(column: &'static str, raw: Option<&str>) -> Option<Vec<f64>> {
    recover(try_surface(column, raw))
}

pub fn boolean(column: &'static str, raw: Option<&str>, mode: BooleanMode) -> Option<bool> {
    recover(try_bool(column, raw, mode))
}

/// Free text, empty when absent. Only the empty string counts as missing here:
/// a description reading "None" is kept verbatim.
pub fn text(raw: Option<&str>) -> String {
    raw.map(str::to_string).unwrap_or_default()
}

fn recover<T>(result: Result<Option<T>, ImportError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        trace!("{}", e);
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_parse_or_null() {
        assert_eq!(float("PRICE", Some("250000")), Some(250000.0));
        assert_eq!(float("PRICE", Some(" 1.5e3 ")), Some(1500.0));
        assert_eq!(float("PRICE", Some("not_a_number")), None);
        assert_eq!(float("PRICE", Some("nan")), None);
        assert_eq!(float("PRICE", Some("inf")), None);
        assert_eq!(float("PRICE", None), None);
    }

    #[test]
    fn try_float_reports_the_column() {
        match try_float("PRICE", Some("abc")) {
            Err(ImportError::FieldCoercion { column, raw }) => {
                assert_eq!(column, "PRICE");
                assert_eq!(raw, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn ints_accept_integral_floats() {
        assert_eq!(int("ZIP_CODE", Some("75001")), Some(75001));
        assert_eq!(int("ZIP_CODE", Some("75001.0")), Some(75001));
        assert_eq!(int("FLOOR", Some("-1")), Some(-1));
        assert_eq!(int("FLOOR", Some("2.7")), Some(2));
        assert_eq!(int("DEPT_CODE", Some("2A")), None);
        assert_eq!(int("DEPT_CODE", Some("1e12")), None);
        assert_eq!(int("DEPT_CODE", Some("NaN")), None);
    }

    #[test]
    fn ints_keep_the_full_i32_range() {
        assert_eq!(int("FLOOR", Some("-2147483648.0")), Some(i32::MIN));
        assert_eq!(int("FLOOR", Some("2147483647.0")), Some(i32::MAX));
        assert_eq!(int("FLOOR", Some("-2147483648.9")), Some(i32::MIN));
        assert_eq!(int("FLOOR", Some("-2147483649.0")), None);
        assert_eq!(int("FLOOR", Some("2147483648.0")), None);
    }

    #[test]
    fn surface_lists_scalars_and_garbage() {
        assert_eq!(surface("SURFACE", Some("[45.0, 50.2]")), Some(vec![45.0, 50.2]));
        assert_eq!(surface("SURFACE", Some("[12]")), Some(vec![12.0]));
        assert_eq!(surface("SURFACE", Some("45.5")), Some(vec![45.5]));
        assert_eq!(surface("SURFACE", Some("[]")), None);
        assert_eq!(surface("SURFACE", Some("[45.0, big]")), None);
        assert_eq!(surface("SURFACE", Some("forty")), None);
        assert_eq!(surface("SURFACE", Some("nan")), None);
        assert_eq!(surface("SURFACE", None), None);
    }

    #[test]
    fn legacy_booleans_treat_any_value_as_true() {
        let mode = BooleanMode::Legacy;
        assert_eq!(boolean("ELEVATOR", Some("True"), mode), Some(true));
        assert_eq!(boolean("ELEVATOR", Some("False"), mode), Some(true));
        assert_eq!(boolean("ELEVATOR", Some("0"), mode), Some(true));
        assert_eq!(boolean("ELEVATOR", Some("nan"), mode), None);
        assert_eq!(boolean("ELEVATOR", None, mode), None);
    }

    #[test]
    fn strict_booleans_parse_spellings() {
        let mode = BooleanMode::Strict;
        assert_eq!(boolean("GARDEN", Some("True"), mode), Some(true));
        assert_eq!(boolean("GARDEN", Some("False"), mode), Some(false));
        assert_eq!(boolean("GARDEN", Some("0.0"), mode), Some(false));
        assert_eq!(boolean("GARDEN", Some("maybe"), mode), None);
        assert_eq!(boolean("GARDEN", None, mode), None);
    }

    #[test]
    fn text_defaults_to_empty() {
        assert_eq!(text(None), "");
        assert_eq!(text(Some("Paris")), "Paris");
    }
}
