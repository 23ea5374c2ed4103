use serde_json::Value;

use crate::score::Score;

/// Why a submitted score was rejected. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreInputError {
    /// The payload carried no `score` field.
    Missing,
    /// The value is not a number, or not a whole one.
    InvalidFormat,
    /// The value is a whole number below zero.
    Negative,
}

impl std::fmt::Display for ScoreInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::Missing => "Score is required",
            Self::InvalidFormat => "Invalid score format",
            Self::Negative => "Score must be non-negative",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ScoreInputError {}

/// Validate the raw `score` field of a submission.
///
/// JSON numbers and numeric strings are accepted (`12`, `"12"`, `12.0`,
/// `"1e2"`). Every other JSON type, including `null` and booleans, is an
/// invalid format. Strings are read as decimal only: blank strings and
/// hex, octal or binary literals (`""`, `"0x10"`, `"0o7"`, `"0b1"`) are an
/// invalid format rather than 0 or their radix value.
///
/// The integer check runs before the sign check so `-3` reports
/// [`ScoreInputError::Negative`] while `-2.5` reports
/// [`ScoreInputError::InvalidFormat`].
pub fn parse_score(raw: Option<&Value>) -> Result<Score, ScoreInputError> {
    let raw = raw.ok_or(ScoreInputError::Missing)?;
    let n = whole_number(raw).ok_or(ScoreInputError::InvalidFormat)?;
    if n < 0 {
        return Err(ScoreInputError::Negative);
    }
    Score::try_from(n).map_err(|_| ScoreInputError::InvalidFormat)
}

fn whole_number(raw: &Value) -> Option<i128> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(i128::from(u))
            } else {
                n.as_f64().and_then(integral_f64)
            }
        },
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<i128>() {
                Ok(n) => Some(n),
                Err(_) => s.parse::<f64>().ok().and_then(integral_f64),
            }
        },
        _ => None,
    }
}

/// Saturates outside the `i128` range, which the caller rejects anyway.
fn integral_f64(f: f64) -> Option<i128> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i128)
    } else {
        None
    }
}
