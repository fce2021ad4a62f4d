//! Lenient numeric input parsing for dialog fields.
//!
//! French users type `1,5`; browsers hand us `1.5`. Both must work, and
//! trailing junk (`12 m`) is ignored the same way `parseFloat` ignores it.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::one_of;

/// Parse the leading float of `input`, accepting `,` as decimal separator.
///
/// Returns `NaN` when no number starts the (whitespace-trimmed) input.
pub fn parse_input_float(input: &str) -> f64 {
    let normalized = input.replacen(',', ".", 1);
    let mut rest = normalized.trim_start();
    float_prefix
        .parse_next(&mut rest)
        .ok()
        .and_then(|matched| matched.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// `parse_input_float` with NaN mapped to `None`.
pub fn parse_number(input: &str) -> Option<f64> {
    let value = parse_input_float(input);
    (!value.is_nan()).then_some(value)
}

fn float_prefix<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        (opt(one_of(['+', '-'])), "Infinity").take(),
        (opt(one_of(['+', '-'])), mantissa, opt(exponent)).take(),
    ))
    .parse_next(input)
}

fn mantissa(input: &mut &str) -> ModalResult<()> {
    alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())).parse_next(input)
}

fn exponent(input: &mut &str) -> ModalResult<()> {
    (one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)
        .void()
        .parse_next(input)
}
