//! Load stage behaviour against real files on disk

mod support;

use std::fs;
use std::sync::Arc;
use support::*;
use tempfile::TempDir;
use transcript_qa::fs::RealFileSystem;
use transcript_qa::input::{InputDescriptor, InputKind, InputRegistry, QuestionSelector};
use transcript_qa::llm::{MockLLMClient, MockResponse};
use transcript_qa::pipeline::{PipelineError, RunPhase};

const TRANSCRIPT: &str = "Alice: Our primary store is PostgreSQL 15.\nBob: We deploy to Azure.";

fn llm_answering(count: usize) -> Arc<MockLLMClient> {
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses((0..count).map(|_| MockResponse::answer("PostgreSQL", "High", "Alice")));
    llm
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn loads_questions_from_json_workbook() {
    let temp = TempDir::new().unwrap();
    let transcript = write(&temp, "meeting.txt", TRANSCRIPT);
    let questions = write(
        &temp,
        "questions.json",
        r#"{"sheets": [
            {"name": "Cover", "rows": [{"Title": "Architecture review"}]},
            {"name": "Architecture", "rows": [
                {"Question": "What database is used?", "Owner": "Alice"},
                {"Question": "  "},
                {"Question": "Where is it deployed?"}
            ]}
        ]}"#,
    );

    let llm = llm_answering(2);
    let config = fast_config()
        .with_question_selector(QuestionSelector::default().with_sheet("architecture"))
        .with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm.clone(), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(file_inputs(&transcript, &questions)).await;

    assert_eq!(run.phase(), RunPhase::End);
    assert_eq!(run.state.transcript, TRANSCRIPT);
    assert_eq!(
        run.state.questions,
        vec!["What database is used?", "Where is it deployed?"]
    );
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn loads_questions_from_yaml_rows_with_custom_column() {
    let temp = TempDir::new().unwrap();
    let transcript = write(&temp, "meeting.txt", TRANSCRIPT);
    let questions = write(
        &temp,
        "questions.yaml",
        "- Prompt: What database is used?\n  Section: Data\n- Prompt: How many replicas?\n  Section: Ops\n",
    );

    let config = fast_config()
        .with_question_selector(QuestionSelector::new("Prompt"))
        .with_output_path(temp.path().join("report.yaml"));
    let orchestrator = orchestrator(llm_answering(2), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(file_inputs(&transcript, &questions)).await;

    assert!(run.succeeded());
    assert_eq!(
        run.state.questions,
        vec!["What database is used?", "How many replicas?"]
    );
}

#[tokio::test]
async fn loads_questions_from_plain_text() {
    let temp = TempDir::new().unwrap();
    let transcript = write(&temp, "meeting.txt", TRANSCRIPT);
    let questions = write(&temp, "questions.txt", "What database is used?\n\n  Who owns it?  \n");

    let config = fast_config().with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm_answering(2), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(file_inputs(&transcript, &questions)).await;

    assert!(run.succeeded());
    assert_eq!(
        run.state.questions,
        vec!["What database is used?", "Who owns it?"]
    );
}

#[tokio::test]
async fn missing_question_column_fails_load() {
    let temp = TempDir::new().unwrap();
    let transcript = write(&temp, "meeting.txt", TRANSCRIPT);
    let questions = write(&temp, "questions.json", r#"[{"Topic": "Storage"}]"#);

    let llm = llm_answering(1);
    let config = fast_config().with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm.clone(), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(file_inputs(&transcript, &questions)).await;

    assert_eq!(run.phase(), RunPhase::Failed);
    match run.error() {
        Some(PipelineError::InputLoadError { name, message }) => {
            assert_eq!(name, "questions");
            assert!(message.contains("Column 'Question' not found"));
        }
        other => panic!("expected InputLoadError, got {:?}", other),
    }
    assert_eq!(llm.call_count(), 0);
    assert!(!temp.path().join("report.json").exists());
}

#[tokio::test]
async fn malformed_question_document_fails_load() {
    let temp = TempDir::new().unwrap();
    let transcript = write(&temp, "meeting.txt", TRANSCRIPT);
    let questions = write(&temp, "questions.json", "{ not json");

    let config = fast_config().with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm_answering(1), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(file_inputs(&transcript, &questions)).await;

    assert!(matches!(
        run.error(),
        Some(PipelineError::InputLoadError { name, .. }) if name == "questions"
    ));
}

#[tokio::test]
async fn missing_transcript_file_is_input_not_found() {
    let temp = TempDir::new().unwrap();
    let questions = write(&temp, "questions.txt", "What database is used?");
    let missing = temp.path().join("nope.txt");

    let config = fast_config().with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm_answering(1), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(file_inputs(&missing, &questions)).await;

    match run.error() {
        Some(PipelineError::InputNotFound { name, path }) => {
            assert_eq!(name, "transcript");
            assert_eq!(path, &missing);
        }
        other => panic!("expected InputNotFound, got {:?}", other),
    }
    assert!(run.result().message.starts_with("load stage failed"));
}

#[tokio::test]
async fn inline_content_backs_up_missing_files() {
    let temp = TempDir::new().unwrap();
    let inputs = InputRegistry::for_run(
        InputDescriptor::file(InputKind::Text, temp.path().join("absent.txt"))
            .with_content(TRANSCRIPT),
        InputDescriptor::file(InputKind::QuestionSheet, temp.path().join("absent.json"))
            .with_content("What database is used?\nWhere is it deployed?"),
    );

    let config = fast_config().with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm_answering(2), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(inputs).await;

    assert!(run.succeeded());
    assert_eq!(run.state.transcript, TRANSCRIPT);
    assert_eq!(run.state.questions.len(), 2);
}

#[tokio::test]
async fn existing_file_wins_over_inline_content() {
    let temp = TempDir::new().unwrap();
    let transcript = write(&temp, "meeting.txt", TRANSCRIPT);
    let inputs = InputRegistry::for_run(
        InputDescriptor::file(InputKind::Text, &transcript).with_content("stale notes"),
        InputDescriptor::inline(InputKind::QuestionSheet, "What database is used?"),
    );

    let config = fast_config().with_output_path(temp.path().join("report.json"));
    let orchestrator = orchestrator(llm_answering(1), Arc::new(RealFileSystem), config);

    let run = orchestrator.run(inputs).await;

    assert!(run.succeeded());
    assert_eq!(run.state.transcript, TRANSCRIPT);
}
