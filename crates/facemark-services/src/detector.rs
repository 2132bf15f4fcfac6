//! Face detector for frames that arrive with a descriptor attached.
//!
//! The descriptor model runs next to the camera. This detector accepts its output when
//! the descriptor has the expected shape and the detection confidence clears the
//! configured floor; anything else counts as "no usable face".

use async_trait::async_trait;
use facemark_core::{AppError, CaptureFrame, FaceCapture, FaceDescriptor, FaceDetector};

/// Detections below this score are treated as no face.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct PrecomputedDescriptorDetector {
    min_confidence: f32,
}

impl Default for PrecomputedDescriptorDetector {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl PrecomputedDescriptorDetector {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }
}

#[async_trait]
impl FaceDetector for PrecomputedDescriptorDetector {
    async fn detect(&self, frame: &CaptureFrame) -> Result<Option<FaceCapture>, AppError> {
        let (Some(values), Some(confidence)) = (frame.descriptor.clone(), frame.confidence) else {
            return Ok(None);
        };

        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            tracing::debug!(confidence, "Detection confidence out of range");
            return Ok(None);
        }
        if confidence < self.min_confidence {
            tracing::debug!(
                confidence,
                min_confidence = self.min_confidence,
                "Detection confidence below threshold"
            );
            return Ok(None);
        }

        let Some(descriptor) = FaceDescriptor::new(values) else {
            tracing::debug!("Face descriptor has the wrong shape");
            return Ok(None);
        };

        Ok(Some(FaceCapture {
            descriptor,
            confidence,
            image_data_uri: frame.image_data_uri.clone(),
        }))
    }
}
