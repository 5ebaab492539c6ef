use crate::syntax::{
    ALTERNATION, CLOSE_GROUP, CONCATENATION, OPEN_GROUP, OPTIONAL, PLUS, STAR,
};

/// Binding strength of an operator, 0 for anything that is not one.
///
/// `+` and `?` never reach [`infix_to_postfix`] after normalization, but
/// they bind like `*`.
pub fn precedence(c: char) -> u8 {
    match c {
        OPEN_GROUP => 1,
        ALTERNATION => 2,
        CONCATENATION => 3,
        STAR | PLUS | OPTIONAL => 4,
        _ => 0,
    }
}

fn is_operator(c: char) -> bool {
    matches!(c, ALTERNATION | CONCATENATION | STAR | PLUS | OPTIONAL)
}

/// Converts a normalized infix expression to postfix with the shunting-yard
/// algorithm.
///
/// Operators of equal precedence associate to the left. A `)` without a
/// matching `(` is dropped; [`normalize`](crate::syntax::normalize) rejects
/// such input before it gets here.
///
/// ```
/// assert_eq!(regexfa::syntax::infix_to_postfix("(a|b)*^a"), "ab|*a^");
/// ```
pub fn infix_to_postfix(regex: &str) -> String {
    let mut postfix = String::with_capacity(regex.len());
    let mut stack: Vec<char> = Vec::new();

    for c in regex.chars() {
        match c {
            OPEN_GROUP => stack.push(c),
            CLOSE_GROUP => {
                while let Some(top) = stack.pop() {
                    if top == OPEN_GROUP {
                        break;
                    }
                    postfix.push(top);
                }
            }
            _ if is_operator(c) => {
                while let Some(&top) = stack.last() {
                    if precedence(top) < precedence(c) {
                        break;
                    }
                    postfix.push(top);
                    stack.pop();
                }
                stack.push(c);
            }
            _ => postfix.push(c),
        }
    }

    while let Some(top) = stack.pop() {
        postfix.push(top);
    }

    postfix
}
