//! The knowledge base of assumptions consulted by the proof pass.
//!
//! Knowledge bases form a tree mirroring the lexical scope stack; a
//! child behaves as if it contained the transitive closure of its
//! ancestors' assumptions. The tree is realized as a stack of frames:
//! pushing a frame creates a child context, popping discards it, and
//! every query sees the formulas of all live frames.

use anyhow::Context;
use anyhow::Result;
use tracing::debug;
use truej_prover::Formula;
use truej_prover::Prover;
use truej_prover::Verdict;

/// A single nested assumption context.
#[derive(Debug, Default)]
struct Frame {
    /// The assumed formulas of the frame.
    assumptions: Vec<Formula>,
    /// The type facts of the frame.
    ///
    /// Type facts survive summarization: `substitute_if_proven` discards
    /// a frame's assumptions but never its type facts.
    types: Vec<Formula>,
}

/// The knowledge base: a stack of assumption frames over a prover.
#[derive(Debug)]
pub struct KnowledgeBase<P: Prover> {
    /// The live frames, innermost last.
    frames: Vec<Frame>,
    /// The prover consulted for queries.
    prover: P,
}

impl<P: Prover> KnowledgeBase<P> {
    /// Creates a new, empty knowledge base over the given prover.
    pub fn new(prover: P) -> Self {
        Self {
            frames: Vec::new(),
            prover,
        }
    }

    /// Gets the current depth of the frame stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Pushes a fresh child frame.
    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Pops the innermost frame, discarding its formulas.
    pub fn pop(&mut self) {
        self.frames.pop().expect("knowledge base frame underflow");
    }

    /// Adds a formula as a truth in the innermost frame.
    ///
    /// Fails only when the formula text is rejected by the prover's
    /// syntax; the pass treats that as a fatal internal error.
    pub fn assume(&mut self, text: &str) -> Result<()> {
        let formula = self.parse(text)?;
        debug!(formula = text, "assume");
        self.innermost().assumptions.push(formula);
        Ok(())
    }

    /// Adds a type fact in the innermost frame.
    pub fn assume_type(&mut self, text: &str) -> Result<()> {
        let formula = self.parse(text)?;
        debug!(fact = text, "assume type fact");
        self.innermost().types.push(formula);
        Ok(())
    }

    /// Attempts to prove the given formula against the current context.
    pub fn prove(&mut self, text: &str) -> Result<Verdict> {
        let goal = self.parse(text)?;
        let premises = self.premises();
        let verdict = self.prover.prove(&premises, &goal);
        debug!(goal = text, ?verdict, "prover query");
        Ok(verdict)
    }

    /// Attempts to prove the given formula; on success the formula
    /// becomes a fresh assumption of the innermost frame.
    pub fn assume_if_proven(&mut self, text: &str) -> Result<Verdict> {
        let verdict = self.prove(text)?;
        if verdict == Verdict::ProvenTrue {
            self.assume(text)?;
        }

        Ok(verdict)
    }

    /// Attempts to prove the given formula; on success the innermost
    /// frame's prior assumptions are discarded and replaced by the
    /// formula.
    ///
    /// This is the summarization property of `means` statements: once
    /// the statement is proven, readers may start reading from it
    /// upward.
    pub fn substitute_if_proven(&mut self, text: &str) -> Result<Verdict> {
        let verdict = self.prove(text)?;
        if verdict == Verdict::ProvenTrue {
            self.innermost().assumptions.clear();
            self.assume(text)?;
        }

        Ok(verdict)
    }

    /// Parses formula text, surfacing syntax rejection as an internal
    /// error.
    fn parse(&self, text: &str) -> Result<Formula> {
        Formula::parse(text)
            .with_context(|| format!("the prover rejected the formula `{text}`"))
    }

    /// Gets the innermost frame.
    fn innermost(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("knowledge base should have a frame")
    }

    /// Collects the premises visible in the current context: the type
    /// facts and assumptions of every live frame, outermost first.
    fn premises(&self) -> Vec<Formula> {
        self.frames
            .iter()
            .flat_map(|frame| frame.types.iter().chain(frame.assumptions.iter()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use truej_prover::GroundProver;

    use super::*;

    fn kb() -> KnowledgeBase<GroundProver> {
        let mut kb = KnowledgeBase::new(GroundProver::new());
        kb.push();
        kb
    }

    #[test]
    fn child_sees_parent_assumptions() {
        let mut kb = kb();
        kb.assume("('a^' = '^b')").unwrap();
        kb.push();
        kb.assume("('b^' = 'a^')").unwrap();
        assert_eq!(kb.prove("('b^' = '^b')").unwrap(), Verdict::ProvenTrue);
        kb.pop();
        assert_eq!(kb.prove("('b^' = '^b')").unwrap(), Verdict::Unsupported);
    }

    #[test]
    fn substitution_discards_prior_assumptions() {
        let mut kb = kb();
        kb.assume("('x^' = 1)").unwrap();
        kb.assume("('y^' = 'x^')").unwrap();
        assert_eq!(
            kb.substitute_if_proven("('y^' = 1)").unwrap(),
            Verdict::ProvenTrue
        );

        // The substituted claim stands alone now.
        assert_eq!(kb.prove("('x^' = 1)").unwrap(), Verdict::Unsupported);
        assert_eq!(kb.prove("('y^' = 1)").unwrap(), Verdict::ProvenTrue);
    }

    #[test]
    fn type_facts_survive_substitution() {
        let mut kb = kb();
        kb.assume_type("type(int, 'x^')").unwrap();
        kb.assume("('x^' = 1)").unwrap();
        assert_eq!(
            kb.substitute_if_proven("('x^' >= 1)").unwrap(),
            Verdict::ProvenTrue
        );
        assert_eq!(kb.prove("type(int, 'x^')").unwrap(), Verdict::ProvenTrue);
    }

    #[test]
    fn depth_tracks_push_and_pop() {
        let mut kb = kb();
        assert_eq!(kb.depth(), 1);
        kb.push();
        assert_eq!(kb.depth(), 2);
        kb.pop();
        assert_eq!(kb.depth(), 1);
    }

    #[test]
    fn malformed_formula_is_rejected() {
        let mut kb = kb();
        assert!(kb.assume("('x^' = ").is_err());
    }
}
