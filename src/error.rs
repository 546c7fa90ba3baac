use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NoiseError {
    /// The output device/context could not be opened or resumed.
    AudioUnavailable { reason: String },
    /// A value that cannot be interpreted (non-finite, unparsable).
    InvalidParameter { name: String, value: String },
    /// No preset with this name exists.
    PresetNotFound { name: String },
    /// A color name that is not one of the five noise colors.
    UnknownColor { name: String },
    /// Serialized presets or settings could not be read or written.
    Storage { message: String },
}

impl NoiseError {
    pub fn audio_unavailable(reason: impl Into<String>) -> Self {
        NoiseError::AudioUnavailable { reason: reason.into() }
    }

    pub fn invalid_parameter(name: &str, value: impl fmt::Display) -> Self {
        NoiseError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for NoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseError::AudioUnavailable { reason } => write!(f, "Audio unavailable: {reason}"),
            NoiseError::InvalidParameter { name, value } => {
                write!(f, "Invalid value '{value}' for parameter '{name}'")
            }
            NoiseError::PresetNotFound { name } => write!(f, "Preset '{name}' not found"),
            NoiseError::UnknownColor { name } => write!(f, "Unknown noise color '{name}'"),
            NoiseError::Storage { message } => write!(f, "Storage error: {message}"),
        }
    }
}

impl std::error::Error for NoiseError {}

impl From<serde_json::Error> for NoiseError {
    fn from(e: serde_json::Error) -> Self {
        NoiseError::Storage { message: e.to_string() }
    }
}

impl From<std::io::Error> for NoiseError {
    fn from(e: std::io::Error) -> Self {
        NoiseError::Storage { message: e.to_string() }
    }
}

/// Reject NaN and infinities; finite values are clamped by the setters.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64, NoiseError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NoiseError::invalid_parameter(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = NoiseError::PresetNotFound { name: "dream".to_string() };
        assert_eq!(e.to_string(), "Preset 'dream' not found");

        let e = NoiseError::audio_unavailable("context closed");
        assert_eq!(e.to_string(), "Audio unavailable: context closed");
    }

    #[test]
    fn non_finite_rejected() {
        assert!(ensure_finite("volume", 0.4).is_ok());
        assert!(matches!(
            ensure_finite("volume", f64::NAN),
            Err(NoiseError::InvalidParameter { .. })
        ));
        assert!(ensure_finite("lowCut", f64::INFINITY).is_err());
    }

    #[test]
    fn json_error_maps_to_storage() {
        let err: NoiseError = serde_json::from_str::<Vec<u8>>("not json").unwrap_err().into();
        assert!(matches!(err, NoiseError::Storage { .. }));
    }
}
