//! Scripted end-to-end session run against stub providers: loads a small
//! question bank, "answers" each question through the capture pipeline,
//! grades the responses and persists the report into the in-memory store.
//!
//! Run with `RUST_LOG=info cargo run --bin demo_session`.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use rand::Rng;
use tokio_stream::iter;

use hireview::{
    grader_for, listen_for_answer, EmotionMonitor, ExpressionClassifier, ExpressionScores,
    FrameSource, GradingConfig, InterviewSession, MemoryStore, QuestionBank, Result, SessionStore,
    SpeechEvent, StreamRecognizer, SubmitOutcome, TranscriptAccumulator, VideoFrame,
};

const DEMO_BANK: &str = "\
Question,Answer,Category,Difficulty
What does ownership mean in Rust?,Each value has a single owner responsible for freeing it,Technical,Easy
How do you handle a disagreement with a teammate?,Listen first and then work towards a shared decision,Behavioral,Medium
What is a race condition?,Two threads access shared state and the outcome depends on timing,Technical,Medium
";

/// Stand-in camera that always has a frame available.
struct StubCamera;

impl FrameSource for StubCamera {
    fn latest_frame(&self) -> Option<VideoFrame> {
        Some(VideoFrame {
            data: vec![0; 16],
            width: 4,
            height: 4,
        })
    }
}

/// Stand-in expression classifier producing randomized distributions, like
/// a detector watching a slightly nervous candidate.
struct StubClassifier;

#[async_trait]
impl ExpressionClassifier for StubClassifier {
    async fn classify(&self, _frame: &VideoFrame) -> Result<ExpressionScores> {
        let mut rng = rand::thread_rng();
        Ok(ExpressionScores::from_pairs([
            ("neutral", rng.gen_range(0.3..0.7)),
            ("happy", rng.gen_range(0.0..0.3)),
            ("fearful", rng.gen_range(0.0..0.4)),
            ("sad", rng.gen_range(0.0..0.2)),
        ]))
    }
}

/// Split an answer into an interim fragment followed by two final ones,
/// the shape a live speech provider delivers.
fn scripted_events(answer: &str) -> Vec<Result<SpeechEvent>> {
    let words: Vec<&str> = answer.split_whitespace().collect();
    let mid = words.len() / 2;
    vec![
        Ok(SpeechEvent::interim(words[..mid].join(" "))),
        Ok(SpeechEvent::final_result(words[..mid].join(" "))),
        Ok(SpeechEvent::final_result(words[mid..].join(" "))),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let grading_config = GradingConfig::load().unwrap_or_default();
    info!("Grading mode: {:?}", grading_config.effective_mode());
    let grader = grader_for(&grading_config);

    let bank = QuestionBank::from_csv_str(DEMO_BANK)?;
    info!("Bank categories: {:?}", bank.categories());

    let store = MemoryStore::new();
    store.seed_upcoming_interview("demo-interview", "demo-candidate");

    let monitor = EmotionMonitor::start(Arc::new(StubCamera), Arc::new(StubClassifier));

    let mut session = InterviewSession::new("demo-interview", "demo-candidate");
    session.begin(&bank, "All", 3, &mut rand::thread_rng())?;

    loop {
        let question = session
            .current_question()
            .expect("session is in progress")
            .clone();
        info!(
            "Question {}/{}: {}",
            session.current_index() + 1,
            session.question_count(),
            question.text
        );

        // The candidate answers each question with its reference answer.
        let mut recognizer = StreamRecognizer::new(iter(scripted_events(&question.reference_answer)));
        let mut accumulator = TranscriptAccumulator::new();
        listen_for_answer(&mut recognizer, &mut accumulator).await?;

        let transcript = accumulator.take();
        info!("Captured answer: {}", transcript);

        match session.submit_answer(&transcript, monitor.latest())? {
            SubmitOutcome::NextQuestion => continue,
            SubmitOutcome::AllAnswered => break,
        }
    }

    let report = session.complete(grader.as_ref(), &store).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let interview = store.get_interview("demo-interview").await?;
    info!(
        "Interview {} is now {:?} (report {})",
        interview.id,
        interview.status,
        interview.session_id.as_deref().unwrap_or("-")
    );

    Ok(())
}
