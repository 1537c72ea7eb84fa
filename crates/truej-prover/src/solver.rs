//! The ground decision procedure behind the default prover.

use std::collections::HashMap;

use tracing::debug;
use tracing::trace;

use crate::formula::CmpOp;
use crate::formula::Formula;
use crate::formula::Term;

/// The verdict of a proof attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The goal follows from the premises.
    ProvenTrue,
    /// The goal could not be shown to follow from the premises.
    Unsupported,
    /// The prover reached an internal resource limit before reaching a
    /// conclusion.
    ReachedLimit,
}

/// A trait implemented by provers.
///
/// A prover decides whether a goal formula follows from a list of
/// premises, reporting one of the three verdicts of [`Verdict`].
pub trait Prover {
    /// Attempts to prove the goal from the given premises.
    fn prove(&mut self, premises: &[Formula], goal: &Formula) -> Verdict;
}

/// The default number of disjunctive branches explored before the prover
/// reports [`Verdict::ReachedLimit`].
const DEFAULT_BRANCH_LIMIT: usize = 4096;

/// A refutation-based prover for the ground fragment emitted by the
/// proof pass.
///
/// To prove a goal `P` from premises `A1 .. An`, the prover checks that
/// `A1 /\ .. /\ An /\ -P` is unsatisfiable: the conjunction is
/// normalized to negation normal form, case-split into disjunctive
/// branches, and each branch is closed by congruence closure over its
/// equalities together with an order-consistency check over its
/// inequality literals.
#[derive(Debug, Clone)]
pub struct GroundProver {
    /// The maximum number of disjunctive branches to explore.
    branch_limit: usize,
}

impl GroundProver {
    /// Creates a new ground prover with the default branch limit.
    pub fn new() -> Self {
        Self {
            branch_limit: DEFAULT_BRANCH_LIMIT,
        }
    }

    /// Creates a new ground prover with the given branch limit.
    pub fn with_branch_limit(branch_limit: usize) -> Self {
        Self { branch_limit }
    }
}

impl Default for GroundProver {
    fn default() -> Self {
        Self::new()
    }
}

impl Prover for GroundProver {
    fn prove(&mut self, premises: &[Formula], goal: &Formula) -> Verdict {
        let query = Formula::conjoin(
            premises
                .iter()
                .cloned()
                .chain(std::iter::once(Formula::not(goal.clone()))),
        );

        let norm = nnf(&query, false);
        let branches = match dnf(&norm, self.branch_limit) {
            Some(branches) => branches,
            None => {
                debug!("query exceeded the branch limit of {}", self.branch_limit);
                return Verdict::ReachedLimit;
            }
        };

        trace!("query split into {} branches", branches.len());
        for branch in &branches {
            if !branch_closed(branch) {
                return Verdict::Unsupported;
            }
        }

        Verdict::ProvenTrue
    }
}

/// A literal of a normalized formula.
///
/// The boolean field carries the sign of the literal: `true` for a
/// positive occurrence and `false` for a negated one.
#[derive(Debug, Clone)]
enum Literal {
    /// A constant truth value.
    Truth(bool),
    /// A signed proposition.
    Prop(bool, Term),
    /// A signed applied predicate.
    Pred(bool, String, Vec<Term>),
    /// A signed comparison.
    Cmp(bool, CmpOp, Term, Term),
}

/// A formula in negation normal form.
enum Norm {
    /// A literal.
    Lit(Literal),
    /// A conjunction.
    And(Box<Norm>, Box<Norm>),
    /// A disjunction.
    Or(Box<Norm>, Box<Norm>),
}

/// Normalizes a formula to negation normal form.
///
/// The `negated` flag tracks whether the current subformula appears
/// under an odd number of negations.
fn nnf(formula: &Formula, negated: bool) -> Norm {
    match formula {
        Formula::True => Norm::Lit(Literal::Truth(!negated)),
        Formula::False => Norm::Lit(Literal::Truth(negated)),
        Formula::Prop(term) => Norm::Lit(Literal::Prop(!negated, term.clone())),
        Formula::Pred(name, args) => {
            Norm::Lit(Literal::Pred(!negated, name.clone(), args.clone()))
        }
        Formula::Cmp(op, lhs, rhs) => {
            Norm::Lit(Literal::Cmp(!negated, *op, lhs.clone(), rhs.clone()))
        }
        Formula::Not(inner) => nnf(inner, !negated),
        Formula::And(lhs, rhs) => {
            if negated {
                Norm::Or(Box::new(nnf(lhs, true)), Box::new(nnf(rhs, true)))
            } else {
                Norm::And(Box::new(nnf(lhs, false)), Box::new(nnf(rhs, false)))
            }
        }
        Formula::Or(lhs, rhs) => {
            if negated {
                Norm::And(Box::new(nnf(lhs, true)), Box::new(nnf(rhs, true)))
            } else {
                Norm::Or(Box::new(nnf(lhs, false)), Box::new(nnf(rhs, false)))
            }
        }
        Formula::Implies(lhs, rhs) => {
            if negated {
                Norm::And(Box::new(nnf(lhs, false)), Box::new(nnf(rhs, true)))
            } else {
                Norm::Or(Box::new(nnf(lhs, true)), Box::new(nnf(rhs, false)))
            }
        }
        Formula::Iff(lhs, rhs) => iff_nnf(lhs, rhs, negated),
        Formula::Xor(lhs, rhs) => iff_nnf(lhs, rhs, !negated),
    }
}

/// Normalizes a biconditional, expanding it into its two cases.
fn iff_nnf(lhs: &Formula, rhs: &Formula, negated: bool) -> Norm {
    if negated {
        // One side holds and the other does not.
        Norm::Or(
            Box::new(Norm::And(
                Box::new(nnf(lhs, false)),
                Box::new(nnf(rhs, true)),
            )),
            Box::new(Norm::And(
                Box::new(nnf(lhs, true)),
                Box::new(nnf(rhs, false)),
            )),
        )
    } else {
        // Both sides hold or neither does.
        Norm::Or(
            Box::new(Norm::And(
                Box::new(nnf(lhs, false)),
                Box::new(nnf(rhs, false)),
            )),
            Box::new(Norm::And(
                Box::new(nnf(lhs, true)),
                Box::new(nnf(rhs, true)),
            )),
        )
    }
}

/// Expands a normalized formula into its disjunctive branches.
///
/// Returns `None` when the number of branches exceeds the given limit.
fn dnf(norm: &Norm, limit: usize) -> Option<Vec<Vec<Literal>>> {
    match norm {
        Norm::Lit(literal) => Some(vec![vec![literal.clone()]]),
        Norm::Or(lhs, rhs) => {
            let mut branches = dnf(lhs, limit)?;
            branches.extend(dnf(rhs, limit)?);
            if branches.len() > limit {
                return None;
            }
            Some(branches)
        }
        Norm::And(lhs, rhs) => {
            let lhs = dnf(lhs, limit)?;
            let rhs = dnf(rhs, limit)?;
            if lhs.len().checked_mul(rhs.len())? > limit {
                return None;
            }

            let mut branches = Vec::with_capacity(lhs.len() * rhs.len());
            for left in &lhs {
                for right in &rhs {
                    let mut branch = left.clone();
                    branch.extend(right.iter().cloned());
                    branches.push(branch);
                }
            }
            Some(branches)
        }
    }
}

/// A congruence closure over the ground terms of a branch.
#[derive(Default)]
struct Congruence {
    /// The interned terms.
    terms: Vec<Term>,
    /// The index of each interned term.
    index: HashMap<Term, usize>,
    /// The union-find parent of each interned term.
    parent: Vec<usize>,
}

impl Congruence {
    /// Interns a term and its subterms, returning the term's index.
    fn add(&mut self, term: &Term) -> usize {
        if let Some(index) = self.index.get(term) {
            return *index;
        }

        if let Term::App(_, args) = term {
            for arg in args {
                self.add(arg);
            }
        }

        let index = self.terms.len();
        self.terms.push(term.clone());
        self.index.insert(term.clone(), index);
        self.parent.push(index);
        index
    }

    /// Finds the representative of the given term index.
    fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = index;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Unions the classes of the two term indices.
    fn union(&mut self, a: usize, b: usize) {
        let a = self.find(a);
        let b = self.find(b);
        if a != b {
            self.parent[a] = b;
        }
    }

    /// Runs the congruence rule to a fixpoint: applications with equal
    /// functors and pairwise-equal arguments are equal.
    fn close(&mut self) {
        let apps: Vec<Option<(String, Vec<usize>)>> = self
            .terms
            .iter()
            .map(|term| match term {
                Term::App(functor, args) => Some((
                    functor.clone(),
                    args.iter().map(|arg| self.index[arg]).collect(),
                )),
                _ => None,
            })
            .collect();

        loop {
            let mut changed = false;
            for i in 0..apps.len() {
                let Some((f, fa)) = &apps[i] else {
                    continue;
                };

                for j in (i + 1)..apps.len() {
                    let Some((g, ga)) = &apps[j] else {
                        continue;
                    };

                    if f != g || fa.len() != ga.len() || self.find(i) == self.find(j) {
                        continue;
                    }

                    if fa
                        .iter()
                        .zip(ga.iter())
                        .all(|(&a, &b)| self.find(a) == self.find(b))
                    {
                        self.union(i, j);
                        changed = true;
                    }
                }
            }

            if !changed {
                break;
            }
        }
    }
}

/// Determines if a branch is closed (i.e. its literals are mutually
/// inconsistent).
fn branch_closed(literals: &[Literal]) -> bool {
    let mut cc = Congruence::default();

    // Intern every term and union the positive equalities.
    for literal in literals {
        match literal {
            Literal::Truth(true) => {}
            Literal::Truth(false) => return true,
            Literal::Prop(_, term) => {
                cc.add(term);
            }
            Literal::Pred(_, _, args) => {
                for arg in args {
                    cc.add(arg);
                }
            }
            Literal::Cmp(_, _, lhs, rhs) => {
                cc.add(lhs);
                cc.add(rhs);
            }
        }
    }

    for literal in literals {
        let (lhs, rhs) = match literal {
            Literal::Cmp(true, CmpOp::Eq, lhs, rhs) => (lhs, rhs),
            Literal::Cmp(false, CmpOp::Ne, lhs, rhs) => (lhs, rhs),
            _ => continue,
        };

        let lhs = cc.index[lhs];
        let rhs = cc.index[rhs];
        cc.union(lhs, rhs);
    }

    cc.close();

    // Two distinct numerals in one class is a contradiction.
    let mut int_value: HashMap<usize, i64> = HashMap::new();
    let mut dec_value: HashMap<usize, String> = HashMap::new();
    for i in 0..cc.terms.len() {
        let rep = cc.find(i);
        match &cc.terms[i] {
            Term::Int(value) => {
                if let Some(existing) = int_value.insert(rep, *value) {
                    if existing != *value {
                        return true;
                    }
                }
            }
            Term::Dec(value) => {
                if let Some(existing) = dec_value.insert(rep, value.clone()) {
                    if existing != *value {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }

    // Disequalities between equal classes are contradictions.
    for literal in literals {
        let (lhs, rhs) = match literal {
            Literal::Cmp(true, CmpOp::Ne, lhs, rhs) => (lhs, rhs),
            Literal::Cmp(false, CmpOp::Eq, lhs, rhs) => (lhs, rhs),
            _ => continue,
        };

        let lhs = cc.index[lhs];
        let rhs = cc.index[rhs];
        if cc.find(lhs) == cc.find(rhs) {
            return true;
        }
    }

    // Conflicting signs on one proposition or predicate instance close
    // the branch.
    let mut props: HashMap<usize, bool> = HashMap::new();
    let mut preds: HashMap<(String, Vec<usize>), bool> = HashMap::new();
    for literal in literals {
        match literal {
            Literal::Prop(sign, term) => {
                let index = cc.index[term];
                let rep = cc.find(index);
                if let Some(existing) = props.insert(rep, *sign) {
                    if existing != *sign {
                        return true;
                    }
                }
            }
            Literal::Pred(sign, name, args) => {
                let reps: Vec<_> = args
                    .iter()
                    .map(|arg| {
                        let index = cc.index[arg];
                        cc.find(index)
                    })
                    .collect();
                if let Some(existing) = preds.insert((name.clone(), reps), *sign) {
                    if existing != *sign {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }

    // Order-consistency: collect `<`/`=<` edges over representatives
    // (negated comparisons flip), add the known ordering of integer
    // numerals, and look for a cycle containing a strict edge.
    let mut edges: Vec<(usize, usize, bool)> = Vec::new();
    for literal in literals {
        if let Literal::Cmp(sign, op, lhs, rhs) = literal {
            let lhs = cc.index[lhs];
            let rhs = cc.index[rhs];
            let lhs = cc.find(lhs);
            let rhs = cc.find(rhs);
            let edge = match (sign, op) {
                (true, CmpOp::Lt) => Some((lhs, rhs, true)),
                (true, CmpOp::Le) => Some((lhs, rhs, false)),
                (true, CmpOp::Gt) => Some((rhs, lhs, true)),
                (true, CmpOp::Ge) => Some((rhs, lhs, false)),
                (false, CmpOp::Lt) => Some((rhs, lhs, false)),
                (false, CmpOp::Le) => Some((rhs, lhs, true)),
                (false, CmpOp::Gt) => Some((lhs, rhs, false)),
                (false, CmpOp::Ge) => Some((lhs, rhs, true)),
                _ => None,
            };

            if let Some(edge) = edge {
                edges.push(edge);
            }
        }
    }

    let numerals: Vec<(usize, i64)> = int_value.iter().map(|(rep, value)| (*rep, *value)).collect();
    for (i, (rep_a, a)) in numerals.iter().enumerate() {
        for (rep_b, b) in numerals.iter().skip(i + 1) {
            if a < b {
                edges.push((*rep_a, *rep_b, true));
            } else if b < a {
                edges.push((*rep_b, *rep_a, true));
            }
        }
    }

    // A strict self-edge is already a contradiction; otherwise check
    // whether any strict edge participates in a cycle.
    for (from, to, strict) in &edges {
        if *strict && from == to {
            return true;
        }
    }

    for (from, to, strict) in &edges {
        if *strict && reachable(&edges, *to, *from) {
            return true;
        }
    }

    false
}

/// Determines if `to` is reachable from `from` along the given edges.
fn reachable(edges: &[(usize, usize, bool)], from: usize, to: usize) -> bool {
    if from == to {
        return true;
    }

    let mut visited = vec![from];
    let mut queue = vec![from];
    while let Some(current) = queue.pop() {
        for (a, b, _) in edges {
            if *a == current && !visited.contains(b) {
                if *b == to {
                    return true;
                }
                visited.push(*b);
                queue.push(*b);
            }
        }
    }

    false
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(source: &str) -> Formula {
        Formula::parse(source).expect("formula should parse")
    }

    fn prove(premises: &[&str], goal: &str) -> Verdict {
        let premises: Vec<_> = premises.iter().map(|p| parse(p)).collect();
        GroundProver::new().prove(&premises, &parse(goal))
    }

    #[test]
    fn equality_is_transitive() {
        assert_eq!(
            prove(
                &["('startingA^' = '^a')", "('a^' = '^b')", "('b^' = 'startingA^')"],
                "('b^' = '^a')"
            ),
            Verdict::ProvenTrue
        );
    }

    #[test]
    fn unrelated_equality_is_unsupported() {
        assert_eq!(
            prove(&["('a^' = '^b')"], "('b^' = '^a')"),
            Verdict::Unsupported
        );
    }

    #[test]
    fn conjunction_of_premises() {
        assert_eq!(
            prove(
                &["('a^' = '^b')", "('b^' = '^a')"],
                "(('a^' = '^b') /\\ ('b^' = '^a'))"
            ),
            Verdict::ProvenTrue
        );
    }

    #[test]
    fn case_split_with_ordering() {
        // The meaning of a two-branch sort: either the guard held and the
        // values were swapped, or it did not and they were kept.
        let premise = "((('^a' > '^b') /\\ (('a^' = '^b') /\\ ('b^' = '^a'))) \\/ ((- ('^a' > '^b')) /\\ (('a^' = '^a') /\\ ('b^' = '^b'))))";
        assert_eq!(
            prove(&[premise], "('a^' =< 'b^')"),
            Verdict::ProvenTrue
        );
    }

    #[test]
    fn strict_order_implies_nonstrict() {
        assert_eq!(prove(&["(x < y)"], "(x =< y)"), Verdict::ProvenTrue);
        assert_eq!(prove(&["(x =< y)"], "(x < y)"), Verdict::Unsupported);
    }

    #[test]
    fn order_is_transitive() {
        assert_eq!(
            prove(&["(x < y)", "(y =< z)"], "(x < z)"),
            Verdict::ProvenTrue
        );
    }

    #[test]
    fn distinct_numerals_differ() {
        assert_eq!(prove(&[], "(1 #= 2)"), Verdict::ProvenTrue);
        assert_eq!(prove(&["(x = 1)", "(x = 2)"], "false"), Verdict::ProvenTrue);
    }

    #[test]
    fn numeral_ordering_is_known() {
        assert_eq!(prove(&["(x =< 1)"], "(x < 2)"), Verdict::ProvenTrue);
    }

    #[test]
    fn boolean_biconditional() {
        assert_eq!(prove(&["(p === q)", "p"], "q"), Verdict::ProvenTrue);
        assert_eq!(prove(&["(p =#= q)", "p"], "(- q)"), Verdict::ProvenTrue);
    }

    #[test]
    fn congruent_applications_are_equal() {
        assert_eq!(
            prove(&["(x = y)"], "((x + 1) = (y + 1))"),
            Verdict::ProvenTrue
        );
    }

    #[test]
    fn branch_limit_is_reported() {
        let mut prover = GroundProver::with_branch_limit(1);
        let premise = parse("(p \\/ q)");
        assert_eq!(
            prover.prove(&[premise], &parse("(p \\/ q)")),
            Verdict::ReachedLimit
        );
    }

    #[test]
    fn type_facts_are_inert() {
        assert_eq!(
            prove(&["type(int, 'a^')", "('a^' = 1)"], "('a^' = 1)"),
            Verdict::ProvenTrue
        );
    }
}
