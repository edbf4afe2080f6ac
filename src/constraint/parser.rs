//! Range-expression grammar.
//!
//! Composer-style: `||` separates alternatives, whitespace or commas separate
//! conjunctive atoms, and `A - B` is an inclusive hyphen range.

use semver::{Prerelease, Version};

use super::{Comparator, ConstraintError};

const OPERATORS: &[&str] = &["<=", ">=", "<>", "!=", "==", "<", ">", "="];

/// Pre-release identifier standing in for Composer's `dev` stability.
/// Numeric identifiers sort below `alpha`, `beta` and `rc`.
const DEV_PRE: &str = "0";

/// A version literal as written in a constraint.
struct Literal {
    version: Version,
    /// Number of numeric components written (1 to 4).
    precision: usize,
    /// Whether a stability suffix such as `-beta1` was written.
    explicit_stability: bool,
}

pub(super) fn parse_expression(input: &str) -> Result<Vec<Vec<Comparator>>, ConstraintError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConstraintError::Empty);
    }

    let mut alternatives = Vec::new();
    for group in trimmed.split("||") {
        for alternative in group.split('|') {
            let alternative = alternative.trim();
            if alternative.is_empty() {
                return Err(ConstraintError::EmptyAlternative(input.to_string()));
            }
            alternatives.push(parse_conjunction(alternative, input)?);
        }
    }
    Ok(alternatives)
}

fn parse_conjunction(text: &str, source: &str) -> Result<Vec<Comparator>, ConstraintError> {
    if let Some((from, to)) = split_hyphen_range(text) {
        return parse_hyphen_range(from, to, source);
    }

    let mut atoms: Vec<String> = Vec::new();
    let mut pending: Option<String> = None;
    for token in text.split([',', ' ', '\t']).filter(|t| !t.is_empty()) {
        let token = match pending.take() {
            Some(op) => format!("{}{}", op, token),
            None => token.to_string(),
        };
        if is_bare_operator(&token) {
            pending = Some(token);
        } else {
            atoms.push(token);
        }
    }
    if let Some(op) = pending {
        return Err(ConstraintError::DanglingOperator {
            operator: op,
            constraint: source.to_string(),
        });
    }

    let mut comparators = Vec::new();
    for atom in atoms {
        comparators.extend(parse_atom(&atom, source)?);
    }
    Ok(comparators)
}

fn is_bare_operator(token: &str) -> bool {
    token == "~" || token == "^" || OPERATORS.contains(&token)
}

fn split_hyphen_range(text: &str) -> Option<(&str, &str)> {
    let (from, to) = text.split_once(" - ")?;
    let (from, to) = (from.trim(), to.trim());
    let single = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
    (single(from) && single(to)).then_some((from, to))
}

fn parse_hyphen_range(from: &str, to: &str, source: &str) -> Result<Vec<Comparator>, ConstraintError> {
    let lower = parse_literal(from, source)?;
    let upper = parse_literal(to, source)?;

    let lower_bound = if lower.explicit_stability {
        lower.version
    } else {
        with_dev(lower.version)
    };
    let upper_bound = if upper.precision >= 3 || upper.explicit_stability {
        Comparator::LessOrEqual(upper.version)
    } else {
        let next = bump(&upper.version, upper.precision).ok_or_else(|| overflow(to, source))?;
        Comparator::Less(with_dev(next))
    };

    Ok(vec![Comparator::GreaterOrEqual(lower_bound), upper_bound])
}

fn parse_atom(atom: &str, source: &str) -> Result<Vec<Comparator>, ConstraintError> {
    let atom = atom.split('#').next().unwrap_or(atom);
    let atom = atom.split('@').next().unwrap_or(atom);

    if atom.is_empty() || matches!(atom, "*" | "x" | "X" | "*.*" | "*.*.*") {
        return Ok(vec![Comparator::Any]);
    }
    if atom.starts_with("dev-") {
        return Ok(vec![Comparator::Branch(atom.to_string())]);
    }

    if let Some(rest) = atom.strip_prefix('~') {
        let literal = parse_literal(rest, source)?;
        let v = &literal.version;
        let upper = match literal.precision {
            1 | 2 => v.major.checked_add(1).map(|major| Version::new(major, 0, 0)),
            3 => v.minor.checked_add(1).map(|minor| Version::new(v.major, minor, 0)),
            _ => v
                .patch
                .checked_add(1)
                .map(|patch| Version::new(v.major, v.minor, patch)),
        }
        .ok_or_else(|| overflow(rest, source))?;
        return Ok(vec![
            Comparator::GreaterOrEqual(lower_bound(literal)),
            Comparator::Less(with_dev(upper)),
        ]);
    }

    if let Some(rest) = atom.strip_prefix('^') {
        let literal = parse_literal(rest, source)?;
        let v = &literal.version;
        let upper = if v.major > 0 || literal.precision == 1 {
            v.major.checked_add(1).map(|major| Version::new(major, 0, 0))
        } else if v.minor > 0 || literal.precision == 2 {
            v.minor.checked_add(1).map(|minor| Version::new(0, minor, 0))
        } else {
            v.patch.checked_add(1).map(|patch| Version::new(0, 0, patch))
        }
        .ok_or_else(|| overflow(rest, source))?;
        return Ok(vec![
            Comparator::GreaterOrEqual(lower_bound(literal)),
            Comparator::Less(with_dev(upper)),
        ]);
    }

    if let Some(prefix) = wildcard_prefix(atom) {
        let literal = parse_literal(prefix, source)?;
        let upper = bump(&literal.version, literal.precision).ok_or_else(|| overflow(atom, source))?;
        return Ok(vec![
            Comparator::GreaterOrEqual(with_dev(literal.version)),
            Comparator::Less(with_dev(upper)),
        ]);
    }

    let (operator, rest) = split_operator(atom);
    let literal = parse_literal(rest, source)?;
    let comparator = match operator {
        ">=" => Comparator::GreaterOrEqual(lower_bound(literal)),
        "<" => {
            if literal.explicit_stability {
                Comparator::Less(literal.version)
            } else {
                Comparator::Less(with_dev(literal.version))
            }
        }
        ">" => Comparator::Greater(literal.version),
        "<=" => Comparator::LessOrEqual(literal.version),
        "!=" | "<>" => Comparator::NotEqual(literal.version),
        _ => Comparator::Equal(literal.version),
    };
    Ok(vec![comparator])
}

fn split_operator(atom: &str) -> (&str, &str) {
    for op in OPERATORS {
        if let Some(rest) = atom.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", atom)
}

/// `3.*`, `3.4.*` and `3.4.x` become the numeric prefix before the wildcard.
fn wildcard_prefix(atom: &str) -> Option<&str> {
    ["*", "x", "X"].iter().find_map(|w| {
        atom.strip_suffix(w)
            .and_then(|head| head.strip_suffix('.'))
            .filter(|head| !head.is_empty())
    })
}

fn lower_bound(literal: Literal) -> Version {
    if literal.explicit_stability {
        literal.version
    } else {
        with_dev(literal.version)
    }
}

fn with_dev(mut version: Version) -> Version {
    if version.pre.is_empty() {
        version.pre = Prerelease::new(DEV_PRE).unwrap_or(Prerelease::EMPTY);
    }
    version
}

/// The smallest version above every version sharing the first `precision` components.
/// `None` when the bumped component would overflow.
fn bump(version: &Version, precision: usize) -> Option<Version> {
    match precision {
        1 => version.major.checked_add(1).map(|major| Version::new(major, 0, 0)),
        2 => version
            .minor
            .checked_add(1)
            .map(|minor| Version::new(version.major, minor, 0)),
        _ => version
            .patch
            .checked_add(1)
            .map(|patch| Version::new(version.major, version.minor, patch)),
    }
}

fn overflow(version: &str, source: &str) -> ConstraintError {
    ConstraintError::InvalidVersion {
        version: version.to_string(),
        constraint: source.to_string(),
    }
}

fn parse_literal(text: &str, source: &str) -> Result<Literal, ConstraintError> {
    let invalid = || ConstraintError::InvalidVersion {
        version: text.to_string(),
        constraint: source.to_string(),
    };

    let text = text.trim();
    let text = text
        .strip_prefix('v')
        .or_else(|| text.strip_prefix('V'))
        .unwrap_or(text);
    let (numeric, suffix) = match text.split_once('-') {
        Some((numeric, suffix)) => (numeric, Some(suffix)),
        None => (text, None),
    };

    let mut numbers = Vec::with_capacity(4);
    for part in numeric.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        numbers.push(part.parse::<u64>().map_err(|_| invalid())?);
    }
    if numbers.is_empty() || numbers.len() > 4 {
        return Err(invalid());
    }
    if numbers.len() == 4 && numbers[3] != 0 {
        return Err(ConstraintError::FourthComponent(text.to_string()));
    }

    let get = |i: usize| numbers.get(i).copied().unwrap_or(0);
    let mut version = Version::new(get(0), get(1), get(2));

    let explicit_stability = match suffix {
        None => false,
        Some(suffix) => {
            version.pre = stability_prerelease(suffix).ok_or_else(invalid)?;
            true
        }
    };

    Ok(Literal {
        version,
        precision: numbers.len(),
        explicit_stability,
    })
}

/// Map a Composer stability suffix onto a semver pre-release that sorts
/// `dev < alpha < beta < rc < stable`. Patch releases count as stable.
fn stability_prerelease(suffix: &str) -> Option<Prerelease> {
    let lower = suffix.to_ascii_lowercase();
    let word_end = lower
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(lower.len());
    let (word, number) = lower.split_at(word_end);
    let number = number.trim_start_matches(['.', '-']);
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let label = match word {
        "dev" => return Prerelease::new(DEV_PRE).ok(),
        "stable" | "patch" | "pl" | "p" => return Some(Prerelease::EMPTY),
        "alpha" | "a" => "alpha",
        "beta" | "b" => "beta",
        "rc" => "rc",
        _ => return None,
    };

    let identifier = if number.is_empty() {
        label.to_string()
    } else {
        let n: u64 = number.parse().ok()?;
        format!("{}.{}", label, n)
    };
    Prerelease::new(&identifier).ok()
}
