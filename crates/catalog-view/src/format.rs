/// Format an amount as Brazilian reais: `R$ 1.234,50`.
///
/// Rounds to cents. Non-finite amounts render as zero.
pub fn format_brl(amount: f64) -> String {
    let cents = if amount.is_finite() {
        (amount * 100.0).round() as i64
    } else {
        0
    };
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{sign}R$ {grouped},{:02}", cents % 100)
}
