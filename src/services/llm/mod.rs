pub mod client;

use std::future::Future;

use crate::detector::SignLabel;
use crate::error::AssemblyError;

pub use client::GeminiAssembler;

/// Turns a buffer of sign labels into a sentence. Implementations are cloned
/// into one task per request.
pub trait SentenceAssembler: Clone + Send + Sync + 'static {
    fn assemble(&self, words: Vec<SignLabel>) -> impl Future<Output = Result<String, AssemblyError>> + Send;
}
