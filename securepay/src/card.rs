//! Card number handling.
//!
//! [`CardNumber`] keeps the primary account number (PAN) out of logs: its
//! `Debug` output is masked and the digits are zeroized on drop. The only way to
//! read the raw digits is [`CardNumber::expose_digits`], which the message
//! builder calls when serializing the wire document.
//!
//! [`scrub_card_numbers`] masks anything that looks like a PAN inside free text
//! such as gateway error excerpts.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder joining the visible prefix and suffix of a masked PAN.
pub const MASK_PLACEHOLDER: &str = "...";

const VISIBLE_PREFIX: usize = 6;
const VISIBLE_SUFFIX: usize = 3;

/// Minimum and maximum lengths of a digit run treated as a PAN by
/// [`scrub_card_numbers`].
const PAN_MIN_DIGITS: usize = 12;
const PAN_MAX_DIGITS: usize = 19;

/// A card number reduced to its digits.
///
/// Every non-digit character (spaces, dashes, letters) is stripped on
/// construction and digit order is preserved. No Luhn or length check is made:
/// an empty result is still sent and left for the gateway to reject.
///
/// # Examples
///
/// ```
/// use securepay::card::CardNumber;
///
/// let card = CardNumber::new("4444 3333x2222-1111");
/// assert_eq!(card.expose_digits(), "4444333322221111");
/// assert_eq!(card.masked(), "444433...111");
/// assert_eq!(format!("{card:?}"), "CardNumber(444433...111)");
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CardNumber(String);

impl CardNumber {
    /// Normalizes `raw` by dropping every non-digit character.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    /// Returns the raw digits.
    ///
    /// Only the wire serializer should need this.
    #[must_use]
    pub fn expose_digits(&self) -> &str {
        &self.0
    }

    /// Number of digits after normalization.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether normalization left no digits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first six and last three digits joined by
    /// [`MASK_PLACEHOLDER`].
    ///
    /// Numbers too short to hide anything between prefix and suffix are
    /// masked entirely.
    #[must_use]
    pub fn masked(&self) -> String {
        mask_digits(&self.0)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardNumber({})", self.masked())
    }
}

impl From<&str> for CardNumber {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CardNumber {
    fn from(mut raw: String) -> Self {
        let card = Self::new(&raw);
        raw.zeroize();
        card
    }
}

#[allow(
    clippy::string_slice,
    reason = "input is ASCII digits only, so byte offsets are char boundaries"
)]
fn mask_digits(digits: &str) -> String {
    if digits.len() <= VISIBLE_PREFIX + VISIBLE_SUFFIX {
        return MASK_PLACEHOLDER.to_owned();
    }
    format!(
        "{}{MASK_PLACEHOLDER}{}",
        &digits[..VISIBLE_PREFIX],
        &digits[digits.len() - VISIBLE_SUFFIX..]
    )
}

/// Masks every run of 12-19 consecutive ASCII digits in `input`.
///
/// Each run is replaced by its first six and last three digits joined by
/// [`MASK_PLACEHOLDER`]. Shorter runs (amounts, order numbers, bank codes) are
/// left untouched.
///
/// # Examples
///
/// ```
/// use securepay::card::scrub_card_numbers;
///
/// let text = "<pan>4444333322221111</pan><amount>100</amount>";
/// assert_eq!(scrub_card_numbers(text), "<pan>444433...111</pan><amount>100</amount>");
/// ```
#[must_use]
pub fn scrub_card_numbers(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut run = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            run.push(ch);
            continue;
        }
        flush_run(&mut result, &mut run);
        result.push(ch);
    }
    flush_run(&mut result, &mut run);

    result
}

fn flush_run(out: &mut String, run: &mut String) {
    if (PAN_MIN_DIGITS..=PAN_MAX_DIGITS).contains(&run.len()) {
        out.push_str(&mask_digits(run));
    } else {
        out.push_str(run);
    }
    run.zeroize();
}
