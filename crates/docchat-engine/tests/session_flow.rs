//! End-to-end session scenarios driven through the public engine API.

use docchat_engine::{
    Answer, ClientError, ConversationEngine, NoticeLevel, Resolution, Role, SessionController,
    SessionError, SessionState, UploadFile, View,
};

fn report_pdf() -> UploadFile {
    UploadFile::new("report.pdf", "application/pdf", vec![0u8; 2_300_000])
}

/// Session that has processed `report.pdf`, with notices drained.
fn ready() -> (SessionController, ConversationEngine) {
    let mut session = SessionController::new();
    let engine = ConversationEngine::new();
    let ticket = session.submit_upload(report_pdf()).unwrap();
    session.on_processing_complete(ticket.generation, Ok(()));
    session.take_notices();
    (session, engine)
}

#[test]
fn upload_report_seeds_single_welcome() {
    let (session, _) = ready();

    let messages = session.history().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::Assistant);
    assert!(messages[0].content.contains("report.pdf"));
    assert!(messages[0].content.contains("2.19 MB"));
    assert_eq!(session.view(), View::Chat);
}

#[test]
fn question_answered_with_source() {
    let (mut session, mut engine) = ready();
    let before = session.history().len();

    let ticket = engine
        .submit_question(session.history_mut(), "What is the summary?")
        .expect("question should be sent");
    assert_eq!(session.history().pending_count(), 1);

    let resolution = engine.resolve(
        session.history_mut(),
        &ticket,
        Ok(Answer {
            content: "It is a test doc.".into(),
            sources: Some(vec!["p.1".into()]),
        }),
    );
    assert_eq!(resolution, Resolution::Answered);

    let messages = session.history().messages();
    assert_eq!(messages.len(), before + 2);
    assert_eq!(messages[before].role, Role::User);
    assert_eq!(messages[before].content, "What is the summary?");
    assert_eq!(messages[before + 1].role, Role::Assistant);
    assert_eq!(messages[before + 1].content, "It is a test doc.");
    assert_eq!(messages[before + 1].sources.as_ref().map(Vec::len), Some(1));
    assert_eq!(session.history().pending_count(), 0);
}

#[test]
fn server_error_removes_pending_and_keeps_question() {
    let (mut session, mut engine) = ready();
    let ticket = engine
        .submit_question(session.history_mut(), "What is the summary?")
        .unwrap();

    engine.resolve(
        session.history_mut(),
        &ticket,
        Err(ClientError::Status {
            status: 500,
            detail: None,
        }),
    );

    let messages = session.history().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(session.history().pending_count(), 0);
    assert!(!engine.is_busy());

    let notices = engine.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[test]
fn text_file_is_rejected_before_any_request() {
    let mut session = SessionController::new();
    let result = session.submit_upload(UploadFile::new("notes.txt", "text/plain", b"x".to_vec()));

    assert!(matches!(result, Err(SessionError::InvalidFileType { .. })));
    assert_eq!(session.state(), SessionState::Empty);
}

#[test]
fn blank_question_never_reaches_the_log() {
    let (mut session, mut engine) = ready();
    let before = session.history().len();

    for text in ["", " ", "\n\t  "] {
        assert!(engine.submit_question(session.history_mut(), text).is_none());
    }
    assert_eq!(session.history().len(), before);
}

#[test]
fn delete_never_shrinks_history() {
    let (mut session, mut engine) = ready();
    let ticket = engine.submit_question(session.history_mut(), "q").unwrap();
    let before = session.history().len();

    session.delete_document().unwrap();
    assert_eq!(session.history().len(), before);
    assert_eq!(session.state(), SessionState::Ready);

    // The answer still lands after the document is gone.
    engine.resolve(
        session.history_mut(),
        &ticket,
        Ok(Answer {
            content: "a".into(),
            sources: None,
        }),
    );
    assert_eq!(session.history().len(), before);
    assert_eq!(session.history().pending_count(), 0);
}

#[test]
fn answer_after_reset_is_discarded() {
    let (mut session, mut engine) = ready();
    let ticket = engine.submit_question(session.history_mut(), "q").unwrap();

    assert!(session.observe_reset(1, &mut engine));
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.history().is_empty());

    let resolution = engine.resolve(
        session.history_mut(),
        &ticket,
        Ok(Answer {
            content: "late".into(),
            sources: None,
        }),
    );
    assert_eq!(resolution, Resolution::Discarded);
    assert!(session.history().is_empty());
}

#[test]
fn pending_indicator_is_unique_across_a_session() {
    let (mut session, mut engine) = ready();
    for round in 0..3 {
        let ticket = engine
            .submit_question(session.history_mut(), &format!("question {round}"))
            .unwrap();
        assert!(engine
            .submit_question(session.history_mut(), "again")
            .is_none());
        assert_eq!(session.history().pending_count(), 1);
        assert!(session.history().messages().last().unwrap().pending);

        engine.resolve(
            session.history_mut(),
            &ticket,
            Ok(Answer {
                content: format!("answer {round}"),
                sources: None,
            }),
        );
        assert_eq!(session.history().pending_count(), 0);
    }
    assert_eq!(session.history().len(), 7);
}
