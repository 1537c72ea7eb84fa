//! The theorem prover collaborator for the TrueJ proof pass.
//!
//! The proof pass translates TrueJ constructs into predicate-logic text
//! over a small operator vocabulary (`/\`, `\/`, `-`, `=`, `#=`, `=<`,
//! `<`, `>`, `>=`, `===`, `=#=`, `==>`, `<==`, parentheses, identifiers,
//! numeric literals, and `type(T, v)` facts). This crate supplies:
//!
//! * [`Formula`] and [`Term`], the parsed representation of that
//!   vocabulary;
//! * a parser from the textual form ([`Formula::parse`]);
//! * the [`Prover`] trait, offering the three proof verdicts a knowledge
//!   base needs; and
//! * [`GroundProver`], a refutation-based decision procedure for the
//!   ground fragment the proof pass emits.
//!
//! An external prover process may be substituted by implementing
//! [`Prover`] and rendering formulas with their `Display`
//! implementation.

mod formula;
mod solver;
mod text;

pub use formula::CmpOp;
pub use formula::Formula;
pub use formula::FormulaError;
pub use formula::Term;
pub use solver::GroundProver;
pub use solver::Prover;
pub use solver::Verdict;
