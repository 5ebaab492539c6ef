use crate::error::{Error, Result};
use crate::formlang::EPSILON_MARKER;
use crate::syntax::{
    ALTERNATION, CLOSE_GROUP, CONCATENATION, OPEN_GROUP, OPTIONAL, PLUS, STAR,
};

/// Rewrites an infix expression so that it only uses `|`, `^`, `*` and
/// parentheses.
///
/// * `X+` becomes `XX*`.
/// * `X?` becomes `(X|ε)`.
/// * An explicit `^` is inserted wherever concatenation is implicit.
///
/// The operand `X` of a quantifier is the parenthesized group that ends
/// right before it, or else the single symbol right before it. Stars already
/// applied to the operand are part of it, so `a*+` is `a*a**`.
///
/// ```
/// assert_eq!(regexfa::syntax::normalize("(ab)+c?").unwrap(), "(a^b)^(a^b)*^(c|ε)");
/// ```
pub fn normalize(regex: &str) -> Result<String> {
    let chars: Vec<char> = regex.chars().collect();
    check_balance(&chars)?;
    let expanded = expand_quantifiers(&chars)?;
    Ok(insert_concatenation(&expanded).into_iter().collect())
}

/// Fails with the position of the first parenthesis that has no partner.
fn check_balance(chars: &[char]) -> Result<()> {
    let mut open = Vec::new();

    for (position, &c) in chars.iter().enumerate() {
        match c {
            OPEN_GROUP => open.push(position),
            CLOSE_GROUP => {
                if open.pop().is_none() {
                    return Err(Error::MalformedExpression {
                        position,
                        reason: "unmatched `)`",
                    });
                }
            }
            _ => {}
        }
    }

    match open.first() {
        Some(&position) => Err(Error::MalformedExpression {
            position,
            reason: "unmatched `(`",
        }),
        None => Ok(()),
    }
}

/// Index in `out` where the operand of a quantifier found at `position`
/// starts.
fn operand_start(out: &[char], position: usize) -> Result<usize> {
    let mut end = out.len();
    while end > 0 && out[end - 1] == STAR {
        end -= 1;
    }

    let no_operand = Error::MalformedExpression {
        position,
        reason: "quantifier without operand",
    };

    let Some(&last) = end.checked_sub(1).and_then(|i| out.get(i)) else {
        return Err(no_operand);
    };

    match last {
        CLOSE_GROUP => {
            let mut depth = 0usize;
            for j in (0..end).rev() {
                match out[j] {
                    CLOSE_GROUP => depth += 1,
                    OPEN_GROUP => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(j);
                        }
                    }
                    _ => {}
                }
            }
            Err(Error::MalformedExpression {
                position,
                reason: "no group start found before quantifier",
            })
        }
        OPEN_GROUP | ALTERNATION | CONCATENATION => Err(no_operand),
        _ => Ok(end - 1),
    }
}

/// Desugars `+` and `?` in a single left-to-right pass, so quantifiers
/// nested in groups are already rewritten by the time the group is quantified.
fn expand_quantifiers(chars: &[char]) -> Result<Vec<char>> {
    let mut out: Vec<char> = Vec::with_capacity(chars.len() * 2);

    for (position, &c) in chars.iter().enumerate() {
        match c {
            PLUS => {
                let start = operand_start(&out, position)?;
                let operand = out[start..].to_vec();
                out.extend(operand);
                out.push(STAR);
            }
            OPTIONAL => {
                let start = operand_start(&out, position)?;
                out.insert(start, OPEN_GROUP);
                out.extend([ALTERNATION, EPSILON_MARKER, CLOSE_GROUP]);
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Makes concatenation explicit: a `^` goes between two adjacent tokens
/// unless the left one opens something (`|`, `(`, `^`) or the right one
/// closes or quantifies something (`|`, `)`, `*`, `+`, `?`).
fn insert_concatenation(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() * 2);

    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        let Some(&next) = chars.get(i + 1) else {
            break;
        };
        if !matches!(c, ALTERNATION | OPEN_GROUP | CONCATENATION)
            && !matches!(next, ALTERNATION | CLOSE_GROUP | STAR | PLUS | OPTIONAL)
        {
            out.push(CONCATENATION);
        }
    }

    out
}
