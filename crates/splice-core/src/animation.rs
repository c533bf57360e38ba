use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Supported easing functions for keyframes.
///
/// All curves are quadratic; `EaseInOut` is piecewise (accelerate for the first half,
/// decelerate for the second).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl EasingFunction for EasingType {
    fn y(&self, x: f64) -> f64 {
        match self {
            EasingType::Linear => x,
            EasingType::EaseIn => x * x,
            EasingType::EaseOut => x * (2.0 - x),
            EasingType::EaseInOut => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    -1.0 + (4.0 - 2.0 * x) * x
                }
            }
        }
    }
}

impl EasingType {
    /// Evaluates the easing curve at a specific point `x` (0.0 to 1.0).
    pub fn eval(&self, x: f64) -> f64 {
        self.y(x)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Some(EasingType::Linear),
            "ease-in" | "easein" => Some(EasingType::EaseIn),
            "ease-out" | "easeout" => Some(EasingType::EaseOut),
            "ease-in-out" | "easeinout" => Some(EasingType::EaseInOut),
            _ => None,
        }
    }
}

/// The value recorded by a keyframe.
///
/// Only `Number` values are interpolated; the other variants step from one
/// keyframe's value to the next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl KeyframeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            KeyframeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for KeyframeValue {
    fn from(v: f64) -> Self {
        KeyframeValue::Number(v)
    }
}

impl From<bool> for KeyframeValue {
    fn from(v: bool) -> Self {
        KeyframeValue::Bool(v)
    }
}

impl From<&str> for KeyframeValue {
    fn from(v: &str) -> Self {
        KeyframeValue::Text(v.to_string())
    }
}

impl From<String> for KeyframeValue {
    fn from(v: String) -> Self {
        KeyframeValue::Text(v)
    }
}

impl fmt::Display for KeyframeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyframeValue::Number(n) => write!(f, "{}", n),
            KeyframeValue::Bool(b) => write!(f, "{}", b),
            KeyframeValue::Text(s) => f.write_str(s),
        }
    }
}

/// A timed override of one layer property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Composition time in seconds.
    pub time: f64,
    /// Name of the property this keyframe drives (e.g. "x", "opacity").
    pub property: String,
    pub value: KeyframeValue,
    pub easing: EasingType,
}

impl Keyframe {
    pub fn new(time: f64, property: impl Into<String>, value: impl Into<KeyframeValue>, easing: EasingType) -> Self {
        Self {
            time,
            property: property.into(),
            value: value.into(),
            easing,
        }
    }
}

/// Resolves the effective value of `property` at `time`.
///
/// Keyframes for the property are ordered by time. Outside the keyed range the first or
/// last value holds. Inside, the easing of the earlier keyframe shapes the progress `t`
/// between the bracketing pair; numbers are blended linearly by the eased `t`, any other
/// value steps: the earlier value holds while `time < after.time`.
pub fn interpolate_keyframes(keyframes: &[Keyframe], time: f64, property: &str) -> Option<KeyframeValue> {
    let mut matching: Vec<&Keyframe> = keyframes.iter().filter(|k| k.property == property).collect();
    matching.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));

    let (first, last) = match (matching.first(), matching.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return None,
    };
    if matching.len() == 1 {
        return Some(first.value.clone());
    }
    if time <= first.time {
        return Some(first.value.clone());
    }
    if time >= last.time {
        return Some(last.value.clone());
    }

    let (before, after) = matching
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(a, b)| time >= a.time && time <= b.time)
        .unwrap_or((first, last));

    let span = after.time - before.time;
    let t = if span > 0.0 { (time - before.time) / span } else { 1.0 };
    let eased = before.easing.y(t);

    match (&before.value, &after.value) {
        (KeyframeValue::Number(from), KeyframeValue::Number(to)) => {
            Some(KeyframeValue::Number(from + (to - from) * eased))
        }
        _ => {
            if time < after.time {
                Some(before.value.clone())
            } else {
                Some(after.value.clone())
            }
        }
    }
}

/// Numeric convenience over [`interpolate_keyframes`].
pub fn interpolate_number(keyframes: &[Keyframe], time: f64, property: &str) -> Option<f64> {
    interpolate_keyframes(keyframes, time, property).and_then(|v| v.as_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_x() -> Vec<Keyframe> {
        vec![
            Keyframe::new(0.0, "x", 0.0, EasingType::Linear),
            Keyframe::new(10.0, "x", 100.0, EasingType::Linear),
        ]
    }

    #[test]
    fn linear_midpoint_and_clamping() {
        let kfs = linear_x();
        assert_eq!(interpolate_number(&kfs, 5.0, "x"), Some(50.0));
        assert_eq!(interpolate_number(&kfs, -5.0, "x"), Some(0.0));
        assert_eq!(interpolate_number(&kfs, 15.0, "x"), Some(100.0));
    }

    #[test]
    fn no_matching_property_is_none() {
        assert_eq!(interpolate_keyframes(&linear_x(), 5.0, "y"), None);
        assert_eq!(interpolate_keyframes(&[], 5.0, "x"), None);
    }

    #[test]
    fn single_keyframe_holds_everywhere() {
        let kfs = vec![Keyframe::new(3.0, "opacity", 40.0, EasingType::EaseIn)];
        assert_eq!(interpolate_number(&kfs, 0.0, "opacity"), Some(40.0));
        assert_eq!(interpolate_number(&kfs, 99.0, "opacity"), Some(40.0));
    }

    #[test]
    fn unsorted_input_is_ordered_by_time() {
        let mut kfs = linear_x();
        kfs.reverse();
        assert_eq!(interpolate_number(&kfs, 2.5, "x"), Some(25.0));
    }

    #[test]
    fn easing_curves_are_quadratic() {
        let ease_in = vec![
            Keyframe::new(0.0, "x", 0.0, EasingType::EaseIn),
            Keyframe::new(10.0, "x", 100.0, EasingType::Linear),
        ];
        assert!((interpolate_number(&ease_in, 5.0, "x").unwrap() - 25.0).abs() < 1e-9);

        let ease_out = vec![
            Keyframe::new(0.0, "x", 0.0, EasingType::EaseOut),
            Keyframe::new(10.0, "x", 100.0, EasingType::Linear),
        ];
        assert!((interpolate_number(&ease_out, 5.0, "x").unwrap() - 75.0).abs() < 1e-9);

        assert!((EasingType::EaseInOut.eval(0.25) - 0.125).abs() < 1e-9);
        assert!((EasingType::EaseInOut.eval(0.5) - 0.5).abs() < 1e-9);
        assert!((EasingType::EaseInOut.eval(0.75) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_values_step_at_the_later_keyframe() {
        let kfs = vec![
            Keyframe::new(0.0, "label", "intro", EasingType::Linear),
            Keyframe::new(4.0, "label", "outro", EasingType::Linear),
            Keyframe::new(8.0, "label", "credits", EasingType::Linear),
        ];
        assert_eq!(interpolate_keyframes(&kfs, 3.999, "label"), Some("intro".into()));
        // Exactly on an interior keyframe the bracketing pair is (0, 4), and 4 is not < 4.
        assert_eq!(interpolate_keyframes(&kfs, 4.0, "label"), Some("outro".into()));
        assert_eq!(interpolate_keyframes(&kfs, 6.0, "label"), Some("outro".into()));
    }

    #[test]
    fn mixed_value_types_step() {
        let kfs = vec![
            Keyframe::new(0.0, "flag", 1.0, EasingType::Linear),
            Keyframe::new(2.0, "flag", true, EasingType::Linear),
        ];
        assert_eq!(interpolate_keyframes(&kfs, 1.0, "flag"), Some(KeyframeValue::Number(1.0)));
    }

    #[test]
    fn easing_names_parse() {
        assert_eq!(EasingType::parse("ease-in-out"), Some(EasingType::EaseInOut));
        assert_eq!(EasingType::parse("ease_out"), Some(EasingType::EaseOut));
        assert_eq!(EasingType::parse("bounce"), None);
    }
}
