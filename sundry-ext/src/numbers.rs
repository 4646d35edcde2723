//! Number display helpers.

/// Insert `,` between every group of three digits in a run of ASCII digits.
pub fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// An unsigned integer with thousands separators.
pub fn with_thousands(n: impl Into<u128>) -> String {
    group_digits(&n.into().to_string())
}
