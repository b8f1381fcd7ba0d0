//! End-to-end session flow: capture, grading and atomic persistence
//! exercised together through the public API.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_stream::iter;

use hireview::{
    listen_for_answer, EmotionSample, EngineError, Grade, InterviewSession, InterviewStatus,
    LexicalGrader, MemoryStore, QuestionBank, SessionPhase, SessionStore, SpeechEvent,
    StreamRecognizer, SubmitOutcome, TranscriptAccumulator,
};

const BANK_CSV: &str = "\
Question,Answer,Category,Difficulty
Q1,A1,All-purpose,Easy
Q2,A2,All-purpose,Easy
";

#[tokio::test]
async fn verbatim_answers_grade_perfectly_and_complete_the_interview() {
    let bank = QuestionBank::from_csv_str(BANK_CSV).unwrap();
    let store = MemoryStore::new();
    store.seed_upcoming_interview("interview-1", "candidate-1");

    let mut session = InterviewSession::new("interview-1", "candidate-1");
    let mut rng = StdRng::seed_from_u64(11);
    session.begin(&bank, "All", 2, &mut rng).unwrap();
    assert_eq!(session.phase(), SessionPhase::InProgress);

    // Answer both questions verbatim through the capture pipeline.
    loop {
        let reference = session
            .current_question()
            .unwrap()
            .reference_answer
            .clone();

        let mut recognizer = StreamRecognizer::new(iter(vec![
            Ok(SpeechEvent::interim(reference.clone())),
            Ok(SpeechEvent::final_result(reference)),
        ]));
        let mut accumulator = TranscriptAccumulator::new();
        listen_for_answer(&mut recognizer, &mut accumulator)
            .await
            .unwrap();

        let outcome = session
            .submit_answer(&accumulator.take(), EmotionSample::default())
            .unwrap();
        if outcome == SubmitOutcome::AllAnswered {
            break;
        }
    }

    let report = session.complete(&LexicalGrader, &store).await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Completed);
    assert_eq!(report.question_count, 2);
    assert_eq!(report.total_score_percent, 100.0);
    for graded in &report.responses {
        assert_eq!(graded.score, 100);
        assert_eq!(graded.grade, Grade::A);
    }
    // Each response is paired with its own question's reference answer,
    // regardless of the sampled order.
    let mut questions: Vec<&str> = report
        .responses
        .iter()
        .map(|g| g.response.question.as_str())
        .collect();
    questions.sort_unstable();
    assert_eq!(questions, vec!["Q1", "Q2"]);
    for graded in &report.responses {
        assert_eq!(graded.response.answer, graded.reference_answer);
    }

    let interview = store.get_interview("interview-1").await.unwrap();
    assert_eq!(interview.status, InterviewStatus::Completed);
    let report_id = interview.session_id.expect("report back-reference set");
    let stored = store.get_report(&report_id).await.unwrap();
    assert_eq!(stored.total_score_percent, 100.0);
}

#[tokio::test]
async fn failed_persistence_is_atomic_and_retryable() {
    let bank = QuestionBank::from_csv_str(BANK_CSV).unwrap();
    let store = MemoryStore::new();
    store.seed_upcoming_interview("interview-2", "candidate-1");
    store.fail_next_commit();

    let mut session = InterviewSession::new("interview-2", "candidate-1");
    let mut rng = StdRng::seed_from_u64(5);
    session.begin(&bank, "all-PURPOSE", 2, &mut rng).unwrap();

    session
        .submit_answer("first answer", EmotionSample::default())
        .unwrap();
    session
        .submit_answer("second answer", EmotionSample::default())
        .unwrap();

    let err = session.complete(&LexicalGrader, &store).await.unwrap_err();
    assert!(matches!(err, EngineError::Persistence(_)));
    assert_eq!(session.phase(), SessionPhase::InProgress);

    // No partial commit is observable from either side.
    let interview = store.get_interview("interview-2").await.unwrap();
    assert_eq!(interview.status, InterviewStatus::Upcoming);
    assert!(interview.session_id.is_none());

    // The retry completes the session.
    session.complete(&LexicalGrader, &store).await.unwrap();
    let interview = store.get_interview("interview-2").await.unwrap();
    assert_eq!(interview.status, InterviewStatus::Completed);
}
