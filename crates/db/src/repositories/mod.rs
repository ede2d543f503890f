//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a connection inside a transaction) as the first
//! argument.

pub mod card_repo;
pub mod quiz_answer_repo;
pub mod quiz_round_repo;
pub mod user_repo;
pub mod vocab_entry_repo;

pub use card_repo::CardRepo;
pub use quiz_answer_repo::QuizAnswerRepo;
pub use quiz_round_repo::QuizRoundRepo;
pub use user_repo::UserRepo;
pub use vocab_entry_repo::VocabEntryRepo;
