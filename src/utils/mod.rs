//! Project-specific utilities live here.

/// Format a VND amount the way the console tables display it: dotted
/// thousands groups and the đồng sign, e.g. `123.000 ₫`.
pub fn format_price(amount: f64) -> String {
    let whole = amount.round().max(0.0) as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{grouped} ₫")
}

/// Placeholder avatar for records without an uploaded image, derived from
/// the display name.
pub fn avatar_from_name(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect();
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        initials
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_group_thousands_with_dots() {
        assert_eq!(format_price(0.0), "0 ₫");
        assert_eq!(format_price(45_000.0), "45.000 ₫");
        assert_eq!(format_price(1_234_567.0), "1.234.567 ₫");
    }

    #[test]
    fn avatars_use_up_to_two_initials() {
        assert_eq!(
            avatar_from_name("Kim Đồng"),
            "https://ui-avatars.com/api/?name=KĐ&background=random"
        );
    }
}
