use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::Result;

/// Sampling cadence of the facial-expression classifier.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_MOOD: &str = "neutral";

/// A raw camera frame handed to the classifier.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Weight distribution over facial-expression labels, as produced by the
/// classifier for a single frame.
#[derive(Clone, Debug, Default)]
pub struct ExpressionScores {
    weights: BTreeMap<String, f64>,
}

impl ExpressionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut scores = Self::new();
        for (label, weight) in pairs {
            scores.set(label, weight);
        }
        scores
    }

    pub fn set(&mut self, label: impl Into<String>, weight: f64) {
        self.weights.insert(label.into(), weight);
    }

    pub fn weight(&self, label: &str) -> f64 {
        self.weights.get(label).copied().unwrap_or(0.0)
    }

    /// The maximal-weight label, or `"neutral"` when nothing was detected.
    /// Ties resolve to the alphabetically first label.
    pub fn dominant_mood(&self) -> String {
        let mut dominant = DEFAULT_MOOD;
        let mut dominant_weight = 0.0;
        for (label, &weight) in &self.weights {
            if weight > dominant_weight {
                dominant_weight = weight;
                dominant = label;
            }
        }
        dominant.to_string()
    }

    /// Anxiety on a 0-10 scale from the weighted expression mix:
    /// `clamp(0, 10, round(20 * max(0, 0.3*angry + 0.3*fearful + 0.2*sad - 0.4*happy)))`.
    /// The raw mix is floored at zero before scaling.
    pub fn anxiety_score(&self) -> u8 {
        let raw = 0.3 * self.weight("angry") + 0.3 * self.weight("fearful")
            + 0.2 * self.weight("sad")
            - 0.4 * self.weight("happy");
        let adjusted = raw.max(0.0);
        (adjusted * 20.0).round().min(10.0) as u8
    }

    pub fn to_sample(&self) -> EmotionSample {
        EmotionSample {
            mood: self.dominant_mood(),
            anxiety_score: self.anxiety_score(),
        }
    }
}

/// The emotion reading attached to an answer at submission time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EmotionSample {
    pub mood: String,
    pub anxiety_score: u8,
}

impl Default for EmotionSample {
    fn default() -> Self {
        Self {
            mood: DEFAULT_MOOD.to_string(),
            anxiety_score: 0,
        }
    }
}

/// Boundary contract for the camera feed: the most recent frame, if any.
pub trait FrameSource: Send + Sync {
    fn latest_frame(&self) -> Option<VideoFrame>;
}

/// Boundary contract for the facial-expression classifier.
#[async_trait]
pub trait ExpressionClassifier: Send + Sync {
    async fn classify(&self, frame: &VideoFrame) -> Result<ExpressionScores>;
}

/// Samples the classifier once per second and keeps only the latest
/// reading. Detection failures keep the last-known sample rather than
/// interrupting the interview.
pub struct EmotionMonitor {
    latest: Arc<Mutex<EmotionSample>>,
    task: Option<JoinHandle<()>>,
}

impl EmotionMonitor {
    pub fn start(
        frames: Arc<dyn FrameSource>,
        classifier: Arc<dyn ExpressionClassifier>,
    ) -> Self {
        let latest = Arc::new(Mutex::new(EmotionSample::default()));
        let shared = latest.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SAMPLE_INTERVAL);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(frame) = frames.latest_frame() else {
                    debug!("No camera frame available, keeping last emotion sample");
                    continue;
                };
                match classifier.classify(&frame).await {
                    Ok(scores) => {
                        let sample = scores.to_sample();
                        debug!(
                            "Emotion sample: mood={} anxiety={}",
                            sample.mood, sample.anxiety_score
                        );
                        *shared.lock() = sample;
                    }
                    Err(e) => {
                        warn!("Emotion detection error (non-fatal): {}", e);
                    }
                }
            }
        });

        Self {
            latest,
            task: Some(task),
        }
    }

    /// The most recent sample, or the neutral default before any detection.
    pub fn latest(&self) -> EmotionSample {
        self.latest.lock().clone()
    }

    /// Stop sampling. Idempotent; also runs on drop so the camera consumer
    /// is released on every exit path.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for EmotionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
