use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::BorderMode;

/// Exclusive upper bound for any pixel dimension accepted from the user.
pub const MAX_DIMENSION: u32 = 100_000;

/// Weight used for any directional padding left unset or negative.
pub const DEFAULT_PAD_WEIGHT: f64 = 50.0;

/// Face height as a percentage of the crop height when none is configured.
pub const DEFAULT_FACE_PERCENT: f64 = 50.0;

/// Model path, relative to the executable or the working directory, used when
/// no model is configured. See [`crate::detect::default_model_path`].
pub const DEFAULT_MODEL_PATH: &str = "model/seeta_fd_frontal_v1.0.bin";

/// Relative weights that split the free space around the face.
/// `None` or a negative value falls back to [`DEFAULT_PAD_WEIGHT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PadWeights {
    pub up: Option<f64>,
    pub down: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl PadWeights {
    /// Resolved `(up, down, left, right)` weights.
    pub fn resolved(&self) -> (f64, f64, f64, f64) {
        let fix = |w: Option<f64>| match w {
            Some(v) if v >= 0.0 && v.is_finite() => v,
            _ => DEFAULT_PAD_WEIGHT,
        };
        (fix(self.up), fix(self.down), fix(self.left), fix(self.right))
    }
}

/// Crop tool parameters suitable for config files and presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropParams {
    pub width: u32,
    pub height: u32,
    /// Pixels removed from the resized crop before the border is added
    pub outer_pad: u32,
    pub border: BorderMode,
    /// Face height as a percentage of the crop height
    pub face_percent: f64,
    pub pad: PadWeights,
    /// Brighten crops with almost no highlights
    pub fix_exposure: bool,
    pub model: PathBuf,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            outer_pad: 0,
            border: BorderMode::Replicate,
            face_percent: DEFAULT_FACE_PERCENT,
            pad: PadWeights::default(),
            fix_exposure: true,
            model: crate::detect::default_model_path(),
        }
    }
}

impl CropParams {
    pub fn validate(&self) -> Result<()> {
        validate_dimension("width", self.width)?;
        validate_dimension("height", self.height)?;
        if self.outer_pad >= self.width.min(self.height) {
            return Err(Error::InvalidArgument {
                arg: "outerPad",
                value: self.outer_pad.to_string(),
            });
        }
        if !self.face_percent.is_finite() {
            return Err(Error::InvalidArgument {
                arg: "facePercent",
                value: self.face_percent.to_string(),
            });
        }
        Ok(())
    }
}

/// Denoise tool parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenoiseParams {
    /// Filter strength for the luminance channel
    pub h: f32,
    /// Filter strength for the color channels
    pub h_color: f32,
    pub template_window: usize,
    pub search_window: usize,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self::with_lum(10.0)
    }
}

impl DenoiseParams {
    /// Same strength for luminance and color, standard 7/21 windows.
    pub fn with_lum(lum: f32) -> Self {
        Self {
            h: lum,
            h_color: lum,
            template_window: 7,
            search_window: 21,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (arg, value) in [("lum", self.h), ("lumColor", self.h_color)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidArgument {
                    arg,
                    value: value.to_string(),
                });
            }
        }
        for (arg, window) in [
            ("templateWindow", self.template_window),
            ("searchWindow", self.search_window),
        ] {
            if window == 0 || window % 2 == 0 {
                return Err(Error::InvalidArgument {
                    arg,
                    value: window.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn validate_dimension(arg: &'static str, value: u32) -> Result<()> {
    if value == 0 || value >= MAX_DIMENSION {
        return Err(Error::InvalidArgument {
            arg,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_missing_weights_fall_back() {
        let pad = PadWeights {
            up: Some(-1.0),
            down: None,
            left: Some(20.0),
            right: Some(0.0),
        };
        assert_eq!(pad.resolved(), (50.0, 50.0, 20.0, 0.0));
    }

    #[test]
    fn crop_params_reject_out_of_range_sizes() {
        let mut params = CropParams::default();
        assert!(params.validate().is_ok());

        params.width = 0;
        assert!(params.validate().is_err());

        params.width = MAX_DIMENSION;
        assert!(params.validate().is_err());

        params.width = 500;
        params.outer_pad = 500;
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidArgument { arg: "outerPad", .. })
        ));
    }

    #[test]
    fn denoise_params_require_positive_strength_and_odd_windows() {
        assert!(DenoiseParams::with_lum(3.0).validate().is_ok());
        assert!(DenoiseParams::with_lum(0.0).validate().is_err());
        assert!(DenoiseParams::with_lum(f32::NAN).validate().is_err());

        let mut params = DenoiseParams::default();
        params.search_window = 20;
        assert!(params.validate().is_err());
    }

    #[test]
    fn params_serialize_border_in_lowercase() {
        let json = serde_json::to_string(&CropParams::default()).unwrap();
        assert!(json.contains("\"border\":\"replicate\""));
    }
}
