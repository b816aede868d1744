use base64::{engine::general_purpose, Engine as _};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{VisionError, VisionResult};
use crate::input::ImageInput;
use crate::model::{
    AnnotateImageRequest, AnnotateImageResponse, EntityAnnotation, FaceAnnotation, Feature,
    FeatureType, Image,
};
use crate::service::{AnnotationService, HttpAnnotationService};

/// Labels detected for one image of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImage {
    pub name: String,
    pub labels: Vec<EntityAnnotation>,
}

/// Typed operations over an [`AnnotationService`].
pub struct VisionClient<S = HttpAnnotationService> {
    service: S,
    max_image_bytes: usize,
}

impl VisionClient<HttpAnnotationService> {
    pub fn connect(config: &Config) -> VisionResult<Self> {
        let service = HttpAnnotationService::from_config(config)?;
        Ok(Self::new(service).with_max_image_bytes(config.max_image_bytes))
    }
}

impl<S: AnnotationService> VisionClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            max_image_bytes: crate::config::DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub async fn detect_labels(&self, image: &ImageInput) -> VisionResult<Vec<EntityAnnotation>> {
        let response = self.annotate_one(image, FeatureType::LabelDetection).await?;
        info!(image = %image.name, labels = response.label_annotations.len(), "detected labels");
        Ok(response.label_annotations)
    }

    pub async fn detect_texts(&self, image: &ImageInput) -> VisionResult<Vec<EntityAnnotation>> {
        let response = self.annotate_one(image, FeatureType::TextDetection).await?;
        info!(image = %image.name, texts = response.text_annotations.len(), "detected texts");
        Ok(response.text_annotations)
    }

    pub async fn detect_faces(&self, image: &ImageInput) -> VisionResult<Vec<FaceAnnotation>> {
        let response = self.annotate_one(image, FeatureType::FaceDetection).await?;
        info!(image = %image.name, faces = response.face_annotations.len(), "detected faces");
        Ok(response.face_annotations)
    }

    /// Sends all images in one call and pairs responses with images by position.
    pub async fn batch_detect_labels(
        &self,
        images: &[ImageInput],
    ) -> VisionResult<Vec<LabeledImage>> {
        let requests = images
            .iter()
            .map(|image| self.build_request(image, FeatureType::LabelDetection))
            .collect::<VisionResult<Vec<_>>>()?;

        let responses = self.service.batch_annotate(requests).await?;
        let responses = check_responses(images.len(), responses)?;
        info!(images = images.len(), "batch label detection finished");

        Ok(images
            .iter()
            .zip(responses)
            .map(|(image, response)| LabeledImage {
                name: image.name.clone(),
                labels: response.label_annotations,
            })
            .collect())
    }

    async fn annotate_one(
        &self,
        image: &ImageInput,
        feature: FeatureType,
    ) -> VisionResult<AnnotateImageResponse> {
        let request = self.build_request(image, feature)?;
        let responses = self.service.batch_annotate(vec![request]).await?;
        let mut responses = check_responses(1, responses)?;
        Ok(responses.remove(0))
    }

    fn build_request(
        &self,
        image: &ImageInput,
        feature: FeatureType,
    ) -> VisionResult<AnnotateImageRequest> {
        let bytes = image.content.len();
        if bytes > self.max_image_bytes {
            return Err(VisionError::ImageTooLarge {
                name: image.name.clone(),
                bytes,
                max_bytes: self.max_image_bytes,
            });
        }
        debug!(image = %image.name, ?feature, bytes, "building request");

        Ok(AnnotateImageRequest {
            image: Image {
                content: general_purpose::STANDARD.encode(&image.content),
            },
            features: vec![Feature::with_default_cap(feature)],
        })
    }
}

/// Requires one response per request and no per-image error.
fn check_responses(
    expected: usize,
    responses: Vec<AnnotateImageResponse>,
) -> VisionResult<Vec<AnnotateImageResponse>> {
    if responses.len() != expected {
        return Err(VisionError::BatchSizeMismatch {
            expected,
            actual: responses.len(),
        });
    }

    if let Some((index, status)) = responses
        .iter()
        .enumerate()
        .find_map(|(index, response)| response.error.as_ref().map(|status| (index, status)))
    {
        return Err(VisionError::Annotation {
            index,
            code: status.code,
            message: status.message.clone(),
        });
    }

    Ok(responses)
}
