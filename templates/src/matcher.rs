use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use voicegate_voiceprint::FeatureVector;

use crate::{Category, TemplateError, TemplateStore};

/// Distance function used to compare feature vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// `1 - cos(a, b)`, in `[0, 2]`.
    #[default]
    Cosine,
    /// L2 distance, in `[0, inf)`.
    Euclidean,
}

impl Metric {
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::Cosine => cosine_distance(a, b),
            Metric::Euclidean => euclidean_distance(a, b),
        }
    }

    /// Maps a distance to a confidence in `[0, 1]`; never increases with distance.
    pub fn confidence(self, distance: f32) -> f32 {
        let c = match self {
            Metric::Cosine => 1.0 - distance / 2.0,
            Metric::Euclidean => 1.0 / (1.0 + distance.max(0.0)),
        };
        if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }
    }
}

/// Compute the cosine distance between two vectors.
///
/// Returns a value in `[0, 2]` where 0 means identical direction and
/// 2 means opposite direction. Uses f64 intermediate precision.
/// Returns 2.0 for zero vectors or dimension mismatches.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 2.0;
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 2.0;
    }

    // Clamp to [-1, 1] to absorb rounding.
    let similarity = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    (1.0 - similarity) as f32
}

/// Euclidean distance with f64 accumulation. Infinite on dimension mismatch.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x as f64 - y as f64).powi(2))
        .sum::<f64>()
        .sqrt() as f32
}

/// One template's score against a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub label: String,
    /// Position of the template within its category.
    pub index: usize,
    pub distance: f32,
    pub confidence: f32,
}

/// Best template for a query within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub label: String,
    pub confidence: f32,
    pub distance: f32,
    /// Position of the winning template within its category.
    pub index: usize,
    /// Confidence of the best template with a different label, if any.
    pub runner_up: Option<f32>,
}

/// Nearest-template classifier over a [`TemplateStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    metric: Metric,
}

impl Matcher {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Scores every template of `category`, best first.
    /// Equal distances keep enrollment order.
    pub fn rank(
        &self,
        store: &dyn TemplateStore,
        category: Category,
        query: &FeatureVector,
    ) -> Result<Vec<Ranked>, TemplateError> {
        let templates = store.all(category)?;
        if templates.is_empty() {
            return Err(TemplateError::NoTemplatesEnrolled(category));
        }

        let mut ranked = Vec::with_capacity(templates.len());
        for (index, t) in templates.into_iter().enumerate() {
            if t.features.len() != query.len() {
                return Err(TemplateError::DimensionMismatch {
                    expected: t.features.len(),
                    got: query.len(),
                });
            }
            let distance = self.metric.distance(query.as_slice(), t.features.as_slice());
            ranked.push(Ranked {
                label: t.label,
                index,
                distance,
                confidence: self.metric.confidence(distance),
            });
        }
        // Stable sort: ties stay in enrollment order.
        ranked.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        Ok(ranked)
    }

    /// Returns the closest template of `category` to `query`.
    pub fn best(
        &self,
        store: &dyn TemplateStore,
        category: Category,
        query: &FeatureVector,
    ) -> Result<MatchResult, TemplateError> {
        let mut ranked = self.rank(store, category, query)?.into_iter();
        let Some(best) = ranked.next() else {
            return Err(TemplateError::NoTemplatesEnrolled(category));
        };
        let runner_up = ranked
            .find(|r| r.label != best.label)
            .map(|r| r.confidence);

        debug!(
            %category,
            label = %best.label,
            confidence = best.confidence,
            distance = best.distance,
            ?runner_up,
            "matched"
        );
        Ok(MatchResult {
            label: best.label,
            confidence: best.confidence,
            distance: best.distance,
            index: best.index,
            runner_up,
        })
    }
}
