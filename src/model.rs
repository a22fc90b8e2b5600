//! Inference handle and class mapping.
//!
//! The classifier is loaded once by `main` and handed to the router through
//! `AppState`; handlers only ever see `&dyn Classifier`.

use std::path::Path;

use serde::Serialize;
use tract_onnx::prelude::tract_ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::InferenceError;
use crate::labels::{class_name, NUM_CLASSES};
use crate::preprocess::{CHANNELS, IMAGE_SIZE};

pub trait Classifier: Send + Sync {
    /// Runs a forward pass and returns one score per class.
    fn classify(&self, batch: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX export of the trained Keras network, executed with tract.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let load_error = |e: TractError| InferenceError::Load {
            path: path.display().to_string(),
            message: format!("{e:#}"),
        };

        let size = IMAGE_SIZE as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_error)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, CHANNELS)),
            )
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, batch: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let input: Tensor = batch.clone().into_tensor();
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::Run(format!("{e:#}")))?;

        let output = outputs.first().ok_or(InferenceError::EmptyOutput)?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Run(format!("{e:#}")))?;

        Ok(scores.iter().copied().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub index: usize,
    pub label: &'static str,
    /// Probability of the predicted class as a percentage in [0, 100].
    pub confidence: f32,
}

pub fn predict(classifier: &dyn Classifier, batch: &Array4<f32>) -> Result<Prediction, InferenceError> {
    let scores = classifier.classify(batch)?;
    if scores.is_empty() {
        return Err(InferenceError::EmptyOutput);
    }
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(InferenceError::NonFinite { index });
    }
    if scores.len() != NUM_CLASSES {
        return Err(InferenceError::OutputShape {
            expected: NUM_CLASSES,
            actual: scores.len(),
        });
    }

    let probabilities = if is_distribution(&scores) {
        scores
    } else {
        softmax(&scores)
    };

    let (index, probability) = probabilities
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .ok_or(InferenceError::EmptyOutput)?;
    let label = class_name(index).ok_or(InferenceError::OutputShape {
        expected: NUM_CLASSES,
        actual: probabilities.len(),
    })?;

    Ok(Prediction {
        index,
        label,
        confidence: (probability * 100.0).clamp(0.0, 100.0),
    })
}

fn is_distribution(scores: &[f32]) -> bool {
    let sum: f32 = scores.iter().sum();
    scores.iter().all(|s| (0.0..=1.0).contains(s)) && (sum - 1.0).abs() < 1e-3
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
