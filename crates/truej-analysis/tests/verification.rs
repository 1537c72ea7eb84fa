//! End-to-end tests of the proof pass.
//!
//! Each test analyzes a complete TrueJ compilation unit and asserts on
//! the resulting diagnostics and transcript.

use pretty_assertions::assert_eq;
use truej_analysis::Config;
use truej_analysis::analyze;

/// Installs a tracing subscriber honoring `RUST_LOG`, once per process.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Analyzes the given source with the default configuration.
fn check(source: &str) -> truej_analysis::Analysis {
    init_tracing();
    analyze(source, &Config::default()).expect("analysis should not fail internally")
}

/// Asserts that the given source verifies without diagnostics.
fn assert_verifies(source: &str) -> truej_analysis::Analysis {
    let analysis = check(source);
    assert_eq!(
        analysis
            .diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>(),
        Vec::<String>::new(),
        "expected the source to verify"
    );
    analysis
}

#[test]
fn block_meaning_from_statements() {
    // The meaning of the method body is the conjunction of its
    // statements; the trailing means statement restates it.
    let analysis = assert_verifies(
        "class BlockMeaning1 {
           int a, b, startingA;

           void swap() {
             startingA' = 'a;
             a' = 'b;
             b' = startingA';
           }
           means(startingA' = 'a & a' = 'b & b' = startingA');
         }",
    );

    assert!(
        analysis
            .transcript
            .contains("('this.startingA^' = 'this.^a')"),
        "transcript should contain the translated first statement:\n{}",
        analysis.transcript
    );
}

#[test]
fn block_meaning_via_means_statement() {
    // The local snapshot of `a` lets the means statement relate the
    // final values of the fields to their entry values; the method-level
    // meaning is the means expression.
    let analysis = assert_verifies(
        "class BlockMeaning2 {
           int a, b;

           void swap() {
             int startingA' = 'a;
             a' = 'b;
             b' = startingA';
             means(a' = 'b & b' = 'a);
           }
         }",
    );

    assert!(
        analysis
            .transcript
            .contains("(('this.a^' = 'this.^b') /\\ ('this.b^' = 'this.^a'))"),
        "transcript should contain the summarized method meaning:\n{}",
        analysis.transcript
    );
}

#[test]
fn means_quenches_prior_conjuncts() {
    let source = "class BlockMeaning3 {
           int aa, b;

           void quench() {
             int a' = 'b;
             means(a' = 'b);
             b' = a';
             means(a' = 'b & b' = 'aa);
           }
         }";
    let analysis = check(source);

    assert_eq!(analysis.diagnostics.len(), 1, "{:?}", analysis.diagnostics);
    let diagnostic = &analysis.diagnostics[0];
    assert_eq!(
        diagnostic.message(),
        "The code does not support the proof of the statement: b' = 'aa"
    );
    assert_eq!(diagnostic.component(), Some("Prover"));

    // Conjunct localization: the reported span lies on the failing
    // conjunct, not on the whole claim.
    let label = diagnostic.labels().next().expect("should have a label");
    let expected = source.find("b' = 'aa").expect("conjunct should be in source");
    assert_eq!(label.span().start(), expected);
    assert_eq!(label.span().len(), "b' = 'aa".len());
}

#[test]
fn if_requires_both_branches() {
    let analysis = check(
        "class Rates_1X {
           boolean risky;
           int rate, reportRate;

           void setRates() {
             if ('risky) {
               rate' = 3;
             }
             reportRate' = rate';
           }
           means(reportRate' = rate');
         }",
    );

    assert_eq!(
        analysis
            .diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>(),
        vec![
            "value name rate' is not defined for the else-branch of the if statement".to_string()
        ]
    );
}

#[test]
fn explicit_noop_else() {
    assert_verifies(
        "class Pair_2 {
           int a, b;

           void sort() {
             if ('a > 'b) {
               a' = 'b;
               b' = 'a;
             } else {
               a' = 'a;
               b' = 'b;
             }
             means(a' <= b');
           }
         }",
    );
}

#[test]
fn three_sort() {
    // Each inner means statement is entailed by the guards of its
    // branch; the whole method verifies with zero errors.
    assert_verifies(
        "class Triplet {
           int a, b, c;

           void threeSort() {
             if ('a <= 'b) {
               if ('b <= 'c) {
                 a' = 'a;
                 b' = 'b;
                 c' = 'c;
                 means(a' <= b' & b' <= c');
               } else {
                 a' = 'a;
                 b' = 'b;
                 c' = 'c;
                 means(a' <= b' & c' <= b');
               }
             } else {
               if ('b <= 'c) {
                 a' = 'b;
                 b' = 'a;
                 c' = 'c;
                 means(a' <= b' & a' <= c');
               } else {
                 a' = 'c;
                 b' = 'b;
                 c' = 'a;
                 means(a' <= b' & b' <= c');
               }
             }
           }
         }",
    );
}

#[test]
fn idempotent_summarization() {
    // Restating the last means statement of a block verbatim changes
    // neither the verdicts nor the transcript.
    let original = "class BlockMeaning2 {
           int a, b;

           void swap() {
             int startingA' = 'a;
             a' = 'b;
             b' = startingA';
             means(a' = 'b & b' = 'a);
           }
         }";
    let restated = "class BlockMeaning2 {
           int a, b;

           void swap() {
             int startingA' = 'a;
             a' = 'b;
             b' = startingA';
             means(a' = 'b & b' = 'a);
             means(a' = 'b & b' = 'a);
           }
         }";

    let original = assert_verifies(original);
    let restated = assert_verifies(restated);
    assert_eq!(original.transcript, restated.transcript);
}

#[test]
fn branch_symmetry() {
    // Swapping the branches and negating the condition is accepted iff
    // the original is.
    assert_verifies(
        "class Pair_2 {
           int a, b;

           void sort() {
             if (!('a > 'b)) {
               a' = 'a;
               b' = 'b;
             } else {
               a' = 'b;
               b' = 'a;
             }
             means(a' <= b');
           }
         }",
    );
}

#[test]
fn equality_lifts_over_boolean_operands() {
    let analysis = assert_verifies(
        "class Flags {
           boolean p, q;
           int n, m;

           void copy() {
             p' = 'q;
             n' = 'm;
             means((p' === 'q) & n' = 'm);
           }
         }",
    );

    assert!(
        analysis.transcript.contains("('this.p^' === 'this.^q')"),
        "boolean assignment should lift `=` to `===`:\n{}",
        analysis.transcript
    );
    assert!(
        analysis.transcript.contains("('this.n^' = 'this.^m')"),
        "arithmetic assignment should keep `=`:\n{}",
        analysis.transcript
    );
}

#[test]
fn return_translates_to_decorated_final_value() {
    let analysis = assert_verifies(
        "class Successor {
           int a;

           int next() {
             return 'a + 1;
           }
           means(return' = 'a + 1);
         }",
    );

    assert!(
        analysis
            .transcript
            .contains("('return^' = ('this.^a' + 1))"),
        "transcript should contain the translated return:\n{}",
        analysis.transcript
    );
}

#[test]
fn undecorated_return_requires_compatibility_switch() {
    let source = "class Successor {
           int a;

           int next() {
             return 'a + 1;
           }
           means(return = 'a + 1);
         }";

    // With the default configuration, only `return'` may be referenced.
    let strict = check(source);
    assert_eq!(strict.diagnostics.len(), 1, "{:?}", strict.diagnostics);
    assert_eq!(
        strict.diagnostics[0].message(),
        "The code does not support the proof of the statement: return = 'a + 1"
    );

    // The compatibility switch also asserts the undecorated name.
    let config = Config::default().with_require_decorated_final_value(false);
    let relaxed = analyze(source, &config).expect("analysis should not fail internally");
    assert_eq!(
        relaxed
            .diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>(),
        Vec::<String>::new()
    );
}

#[test]
fn while_translation_keeps_condition() {
    let analysis = assert_verifies(
        "class Loop {
           int a, n;

           void spin() {
             while (n > 0) {
               a' = 'n;
             }
           }
         }",
    );

    assert!(
        analysis.transcript.contains("((n > 0) /\\"),
        "transcript should contain the loop condition:\n{}",
        analysis.transcript
    );
}

#[test]
fn prover_limit_suggests_a_lemma() {
    let source = "class Pair_2 {
           int a, b;

           void sort() {
             if ('a > 'b) {
               a' = 'b;
               b' = 'a;
             } else {
               a' = 'a;
               b' = 'b;
             }
             means(a' <= b');
           }
         }";

    let config = Config::default().with_branch_limit(1);
    let analysis = analyze(source, &config).expect("analysis should not fail internally");
    assert_eq!(analysis.diagnostics.len(), 1, "{:?}", analysis.diagnostics);
    assert_eq!(
        analysis.diagnostics[0].message(),
        "The prover reached an internal limit. Consider adding a lemma to help prove the \
         statement: \n    a' <= b'"
    );
}

#[test]
fn proof_failures_do_not_stop_the_pass() {
    // Both unsupported claims are reported; the walker continues past
    // the first failure.
    let analysis = check(
        "class TwoClaims {
           int a, b;

           void wrong() {
             a' = 'a;
             means(a' = 'b);
             b' = 'a;
             means(b' = 'b);
           }
         }",
    );

    assert_eq!(
        analysis
            .diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>(),
        vec![
            "The code does not support the proof of the statement: a' = 'b".to_string(),
            "The code does not support the proof of the statement: b' = 'b".to_string(),
        ]
    );
}

#[test]
fn unknown_value_name_is_reported() {
    let analysis = check(
        "class Typo {
           int a;

           void copy() {
             a' = 'missing;
           }
         }",
    );

    assert_eq!(
        analysis
            .diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>(),
        vec!["value name 'missing is not declared".to_string()]
    );
}
