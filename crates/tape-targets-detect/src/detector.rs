use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::candidate::{extract, Candidate, CandidateParams};
use crate::mask::{classify, ColorRange};
use crate::overlay::{draw_commands, DrawCommand};
use crate::resolver::{DetectionResult, ResolverParams, TargetResolver};

/// Parameters of the full per-frame pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapeDetectorParams {
    pub color: ColorRange,
    pub candidates: CandidateParams,
    pub resolver: ResolverParams,
}

/// Frame in, targets out: mask, candidates, resolution.
///
/// Holds no per-frame state, so one detector can serve any number of
/// frames or threads.
#[derive(Clone, Debug)]
pub struct TapeDetector {
    color: ColorRange,
    candidates: CandidateParams,
    resolver: TargetResolver,
}

impl Default for TapeDetector {
    fn default() -> Self {
        Self::new(TapeDetectorParams::default())
    }
}

impl TapeDetector {
    pub fn new(params: TapeDetectorParams) -> Self {
        let resolver =
            TargetResolver::new(params.resolver).with_candidate_params(params.candidates.clone());
        Self {
            color: params.color,
            candidates: params.candidates,
            resolver,
        }
    }

    pub fn color(&self) -> &ColorRange {
        &self.color
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    pub fn mask(&self, frame: &RgbImage) -> GrayImage {
        classify(frame, &self.color)
    }

    pub fn candidates(&self, mask: &GrayImage) -> Vec<Candidate> {
        extract(mask, &self.candidates)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "info", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn detect(&self, frame: &RgbImage) -> DetectionResult {
        let candidates = self.candidates(&self.mask(frame));
        let result = self
            .resolver
            .resolve_in_frame(candidates, Some(frame.width()));
        log::debug!(
            "{} target(s), secondary {:?}, {} unused",
            result.targets.len(),
            result.secondary,
            result.unused.len()
        );
        result
    }

    /// Detection plus the commands to paint a debug view of it.
    pub fn detect_with_overlay(&self, frame: &RgbImage) -> (DetectionResult, Vec<DrawCommand>) {
        let candidates = self.candidates(&self.mask(frame));
        let result = self
            .resolver
            .resolve_in_frame(candidates.clone(), Some(frame.width()));
        let commands = draw_commands(&candidates, &result);
        (result, commands)
    }
}
