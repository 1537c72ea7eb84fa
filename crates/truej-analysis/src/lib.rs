//! Analysis of TrueJ compilation units.
//!
//! The crate implements the passes that give TrueJ source its logical
//! meaning:
//!
//! * scope resolution ([`Scopes`]), recording for every variable its
//!   declaring scope and type;
//! * branch-definition validation ([`validation`]), which refuses
//!   methods in which a value name is defined on only one branch of an
//!   `if` statement; and
//! * the proof pass ([`ProofPass`]), which translates each executable
//!   construct into predicate-logic text over a knowledge base and
//!   discharges every `means` statement by consulting a prover.
//!
//! The [`analyze`] entry point runs the passes in order and returns the
//! collected diagnostics along with the transcript of rewritten text
//! that was sent to the prover.
//!
//! # Examples
//!
//! ```rust
//! use truej_analysis::Config;
//!
//! let analysis = truej_analysis::analyze(
//!     "class Id {
//!        int a;
//!        void id() {
//!          a' = 'a;
//!        }
//!        means(a' = 'a);
//!      }",
//!     &Config::default(),
//! )
//! .expect("analysis should not fail internally");
//! assert!(analysis.diagnostics.is_empty());
//! ```

use anyhow::Result;
use truej_ast::Document;
use truej_grammar::Diagnostic;
use truej_prover::GroundProver;

mod config;
pub mod diagnostics;
mod kb;
mod names;
mod operators;
mod proof;
mod rewrite;
mod scope;
pub mod validation;

pub use config::Config;
pub use kb::KnowledgeBase;
pub use proof::ProofOutcome;
pub use proof::ProofPass;
pub use rewrite::RewriteTable;
pub use rewrite::expand_forall;
pub use scope::Scope;
pub use scope::ScopeId;
pub use scope::Scopes;
pub use scope::VarInfo;

/// The result of analyzing a compilation unit.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The diagnostics reported by parsing, validation, and the proof
    /// pass, in the order they were produced.
    pub diagnostics: Vec<Diagnostic>,
    /// The transcript of rewritten text sent to the prover.
    ///
    /// The transcript is empty when the proof pass did not run.
    pub transcript: String,
}

impl Analysis {
    /// Determines if the analysis recorded any error diagnostics.
    ///
    /// A host should exit non-zero and emit no Java when this is true.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }
}

/// Analyzes TrueJ source: parse, resolve scopes, validate branch
/// definitions, and run the proof pass.
///
/// User-level problems are reported through the returned diagnostics;
/// the error return is reserved for internal translation failures.
pub fn analyze(source: &str, config: &Config) -> Result<Analysis> {
    let (document, diagnostics) = Document::parse(source);
    if !diagnostics.is_empty() {
        // The proof pass requires a syntactically correct tree.
        return Ok(Analysis {
            diagnostics,
            transcript: String::new(),
        });
    }

    let scopes = Scopes::build(&document);
    let validation = validation::check(&document);

    let prover = GroundProver::with_branch_limit(config.branch_limit());
    let pass = ProofPass::new(&scopes, config, prover);
    let outcome = pass.check(&document, &validation.failed_methods)?;

    let mut diagnostics = validation.diagnostics;
    diagnostics.extend(outcome.diagnostics);

    Ok(Analysis {
        diagnostics,
        transcript: outcome.transcript,
    })
}
