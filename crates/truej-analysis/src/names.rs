//! Translation of decorated value names into prover atoms.
//!
//! The surface decoration mark `'` selects one of a variable's value
//! snapshots: `'x` on entry, `x'` on exit, `x'tag` a named intermediate.
//! The canonical prover form replaces the mark with `^`, prepends the
//! scope path when the variable is a field, and quotes the whole atom:
//! `'this.^x'`, `'this.x^'`, `'this.x^tag'`.

use truej_grammar::SyntaxKind;

/// The decoration carried by a value name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// The name is undecorated.
    None,
    /// The value of the variable on entry (`'x`).
    Pre,
    /// The final value of the variable (`x'`).
    Post,
    /// A named intermediate value of the variable (`x'tag`).
    Mid(String),
}

/// Gets the decoration of a name token.
pub fn decoration_of(kind: SyntaxKind, text: &str) -> Decoration {
    match kind {
        SyntaxKind::PreValueName => Decoration::Pre,
        SyntaxKind::PostValueName => Decoration::Post,
        SyntaxKind::MidValueName => {
            let tag = text
                .split_once('\'')
                .map(|(_, tag)| tag.to_string())
                .unwrap_or_default();
            Decoration::Mid(tag)
        }
        _ => Decoration::None,
    }
}

/// Gets the underlying variable identifier of a name token's text.
pub fn base_name(text: &str) -> &str {
    let text = text.strip_prefix('\'').unwrap_or(text);
    match text.split_once('\'') {
        Some((base, _)) => base,
        None => text,
    }
}

/// Translates a decorated value name into its quoted prover atom.
///
/// The prefix is the dotted scope path of the declaring scope (`"this."`
/// for fields, empty for executable-local variables).
pub fn atom(prefix: &str, base: &str, decoration: &Decoration) -> String {
    match decoration {
        Decoration::None => format!("{prefix}{base}"),
        Decoration::Pre => format!("'{prefix}^{base}'"),
        Decoration::Post => format!("'{prefix}{base}^'"),
        Decoration::Mid(tag) => format!("'{prefix}{base}^{tag}'"),
    }
}

/// Recovers the variable identifier from a prover atom, up to the scope
/// prefix.
///
/// This is the inverse of [`atom`]: quotes and the scope path are
/// stripped, and the `^` decorator along with any trailing tag is
/// removed.
pub fn var_name(atom: &str) -> String {
    let atom = atom.strip_prefix('\'').unwrap_or(atom);
    let atom = atom.strip_suffix('\'').unwrap_or(atom);
    let atom = match atom.rsplit_once('.') {
        Some((_, rest)) => rest,
        None => atom,
    };

    match atom.strip_prefix('^') {
        Some(base) => base.to_string(),
        None => match atom.split_once('^') {
            Some((base, _)) => base.to_string(),
            None => atom.to_string(),
        },
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decorated_forms() {
        assert_eq!(atom("this.", "x", &Decoration::Pre), "'this.^x'");
        assert_eq!(atom("this.", "x", &Decoration::Post), "'this.x^'");
        assert_eq!(
            atom("this.", "x", &Decoration::Mid("tag".to_string())),
            "'this.x^tag'"
        );
        assert_eq!(atom("", "x", &Decoration::Post), "'x^'");
        assert_eq!(atom("", "x", &Decoration::None), "x");
    }

    #[test]
    fn base_names() {
        assert_eq!(base_name("'x"), "x");
        assert_eq!(base_name("x'"), "x");
        assert_eq!(base_name("x'tag"), "x");
        assert_eq!(base_name("x"), "x");
    }

    #[test]
    fn atom_round_trip() {
        for decoration in [
            Decoration::Pre,
            Decoration::Post,
            Decoration::Mid("mark".to_string()),
        ] {
            for prefix in ["", "this.", "super."] {
                assert_eq!(var_name(&atom(prefix, "value", &decoration)), "value");
            }
        }
    }
}
