pub mod emotion;
pub mod transcript;

pub use emotion::{EmotionMonitor, EmotionSample, ExpressionClassifier, ExpressionScores, FrameSource, VideoFrame};
pub use transcript::{listen_for_answer, SpeechEvent, SpeechRecognizer, StreamRecognizer, TranscriptAccumulator};
