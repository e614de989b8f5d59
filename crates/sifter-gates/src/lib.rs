//! sifter-gates: the content policy pipeline.
//!
//! A draft goes through two rewrite passes (AI tells, then voice), a deterministic verifier,
//! at most one targeted correction call, and the backstop ([`hard_cleanup`]), which removes
//! everything mechanical the generation passes left behind. All rule data lives in one
//! immutable [`RuleCatalog`].

mod backstop;
mod catalog;
mod correction;
mod pipeline;
mod references;
mod rewrite;
mod verifier;

pub use backstop::hard_cleanup;
pub use catalog::{read_terms_from_path, RuleCatalog, RuleCatalogBuilder, CHECK_MARK, CROSS_MARK, SENTINELS};
pub use correction::{correct, format_violation_feedback, GateSettings};
pub use pipeline::{run_content_gates, ContentGates, GateOutcome, GateStage};
pub use references::ReferenceDocs;
pub use rewrite::{rewrite_pass, GatePass};
pub use verifier::{is_clean, summarize, verify, Violation, ViolationCategory};
