//! JSON configuration and report helpers for tape target detection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alignment::{alignment_homography, DEFAULT_TARGET_SCALE};
use crate::core::TargetCorners;
use crate::detect::{
    CandidateParams, ColorRange, CornerStrategy, DetectionResult, ResolverParams,
    SecondarySource, TapeDetector, TapeDetectorParams,
};
use crate::frame::{load_rgb, FrameError};
use crate::messages::Message;
use crate::render::render_overlay;
use crate::stereo::{CalibrationConstants, CalibrationError, StereoEstimate, StereoReconstructor};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum TapeIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

fn default_target_scale() -> f32 {
    DEFAULT_TARGET_SCALE
}

/// Configuration for a detection run over one frame or one stereo pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapeDetectConfig {
    /// Left (or only) camera frame.
    pub image_path: String,
    /// Right camera frame; enables stereo ranging.
    #[serde(default)]
    pub right_image_path: Option<String>,
    /// Calibration JSON; built-in constants are used when absent.
    #[serde(default)]
    pub calibration_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Where to write the left frame with the debug overlay painted on.
    #[serde(default)]
    pub overlay_path: Option<String>,
    #[serde(default)]
    pub color: Option<ColorRange>,
    #[serde(default)]
    pub candidates: Option<CandidateParams>,
    #[serde(default)]
    pub resolver: Option<ResolverParams>,
    #[serde(default)]
    pub corner_strategy: CornerStrategy,
    #[serde(default = "default_target_scale")]
    pub target_scale: f32,
}

impl TapeDetectConfig {
    /// Config for a single image with every parameter at its default.
    pub fn for_image(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            right_image_path: None,
            calibration_path: None,
            output_path: None,
            overlay_path: None,
            color: None,
            candidates: None,
            resolver: None,
            corner_strategy: CornerStrategy::default(),
            target_scale: DEFAULT_TARGET_SCALE,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TapeIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TapeIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("tape_detect_report.json"))
    }

    /// Build detector parameters, applying overrides from the config.
    pub fn build_params(&self) -> TapeDetectorParams {
        let mut params = TapeDetectorParams::default();
        if let Some(color) = self.color {
            params.color = color;
        }
        if let Some(candidates) = self.candidates.clone() {
            params.candidates = candidates;
        }
        if let Some(resolver) = self.resolver.clone() {
            params.resolver = resolver;
        }
        params
    }

    pub fn build_detector(&self) -> TapeDetector {
        TapeDetector::new(self.build_params())
    }

    pub fn load_calibration(&self) -> Result<CalibrationConstants, TapeIoError> {
        match &self.calibration_path {
            Some(path) => Ok(CalibrationConstants::load_json(path)?),
            None => Ok(CalibrationConstants::default()),
        }
    }

    /// Run detection (and stereo ranging when a right frame is configured).
    ///
    /// Stereo failures are recorded in the report, not returned.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(image = %self.image_path))
    )]
    pub fn run(&self, config_path: &Path) -> Result<TapeDetectReport, TapeIoError> {
        let detector = self.build_detector();
        let frame = load_rgb(&self.image_path)?;
        log::info!(
            "loaded {} ({}x{})",
            self.image_path,
            frame.width(),
            frame.height()
        );

        let (result, commands) = detector.detect_with_overlay(&frame);
        let mut report = TapeDetectReport::new(self, config_path);
        report.set_detection(
            &result,
            self.corner_strategy,
            [frame.width(), frame.height()],
            self.target_scale,
        );
        log::info!("left frame: {} target(s)", result.targets.len());

        if let Some(path) = &self.overlay_path {
            let mut canvas = frame;
            render_overlay(&mut canvas, &commands);
            canvas.save(path)?;
            log::info!("overlay written to {path}");
        }

        if let Some(right_path) = &self.right_image_path {
            let right = detector.detect(&load_rgb(right_path)?);
            log::info!("right frame: {} target(s)", right.targets.len());
            let stereo = StereoReconstructor::new(self.load_calibration()?);
            match stereo.reconstruct(&result.targets, &right.targets) {
                Ok(estimate) => report.stereo = Some(estimate),
                Err(err) => {
                    log::warn!("stereo reconstruction failed: {err}");
                    report.set_error(err);
                }
            }
            report.right_targets = Some(right.targets);
        }
        Ok(report)
    }
}

/// Outcome of one [`TapeDetectConfig::run`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapeDetectReport {
    pub image_path: String,
    #[serde(default)]
    pub right_image_path: Option<String>,
    pub config_path: String,
    pub image_size: [u32; 2],
    pub targets: Vec<TargetCorners>,
    #[serde(default)]
    pub secondary: Option<SecondarySource>,
    pub num_unused_candidates: usize,
    /// Outer quadrilateral of the detected target set.
    #[serde(default)]
    pub outer: Option<TargetCorners>,
    /// Homography from the ideal centred target onto `outer`.
    #[serde(default)]
    pub alignment: Option<[[f64; 3]; 3]>,
    #[serde(default)]
    pub right_targets: Option<Vec<TargetCorners>>,
    #[serde(default)]
    pub stereo: Option<StereoEstimate>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TapeDetectReport {
    /// Build an empty report for the input config.
    pub fn new(cfg: &TapeDetectConfig, config_path: &Path) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            right_image_path: cfg.right_image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            image_size: [0, 0],
            targets: Vec::new(),
            secondary: None,
            num_unused_candidates: 0,
            outer: None,
            alignment: None,
            right_targets: None,
            stereo: None,
            error: None,
        }
    }

    /// Populate report fields from the left-frame detection.
    pub fn set_detection(
        &mut self,
        result: &DetectionResult,
        strategy: CornerStrategy,
        image_size: [u32; 2],
        target_scale: f32,
    ) {
        self.image_size = image_size;
        self.targets = result.targets.clone();
        self.secondary = result.secondary;
        self.num_unused_candidates = result.unused.len();
        self.outer = result.outer_corners(strategy);
        self.alignment = self
            .outer
            .and_then(|outer| {
                alignment_homography(&outer, image_size[0], image_size[1], target_scale)
            })
            .map(|h| h.to_array());
    }

    /// Record a failure that did not abort the run.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Wire message summarising this report.
    pub fn to_message(&self) -> Message {
        let corners = (!self.targets.is_empty())
            .then(|| self.targets.iter().flat_map(|t| t.to_pairs()).collect());
        Message::Results {
            corners,
            xdisp: self.stereo.map(|s| s.lateral_offset),
            distance: self.stereo.map(|s| s.distance),
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TapeIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TapeIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
