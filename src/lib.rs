mod corpus;
mod error;
mod lexeme;
mod memory;
mod scheduler;
mod sequencer;

pub use corpus::{Corpus, CorpusIndex, Sentence, SentenceId};
pub use error::{ErudifyError, Result};
pub use lexeme::Lexeme;
pub use memory::{DueDate, MemoryConfig, ReviewOutcome, WordModel};
pub use scheduler::{LearnerProgress, LearnerState};
pub use sequencer::{FrequencyList, Introduction, KnownWords, PlanEntry, SequencePlan, sequence};
