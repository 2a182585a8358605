// Upload → text → cleaned text → structured record.
// CPU-bound parsing and cleaning must run inside tokio::task::spawn_blocking.

pub mod intelligence;
pub mod prompts;
pub mod router;
pub mod sources;
