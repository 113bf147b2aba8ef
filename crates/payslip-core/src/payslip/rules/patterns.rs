//! Common regex patterns for payslip token recognition.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Plain decimal after currency symbols and separators are removed:
    // optional sign, digits with optional fraction, or a bare fraction.
    pub static ref PLAIN_DECIMAL: Regex = Regex::new(
        r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$"
    ).unwrap();
}
