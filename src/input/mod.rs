//! Input registry and readers
//!
//! A run declares its inputs up front: the transcript and the question
//! source, each either a file locator, inline content, or both (the file wins
//! when it exists). The readers in this module turn those descriptors into
//! transcript text and an ordered question list.

mod error;
mod questions;
mod registry;
mod transcript;

pub use error::ReadError;
pub use questions::{parse_question_lines, FileQuestionReader, QuestionSelector, QuestionSourceReader};
pub use registry::{InputDescriptor, InputKind, InputRegistry, QUESTIONS_INPUT, TRANSCRIPT_INPUT};
pub use transcript::{FsTranscriptReader, TranscriptReader};

#[cfg(test)]
pub use questions::MockQuestionSourceReader;
#[cfg(test)]
pub use transcript::MockTranscriptReader;
