//! Translation between display symbols and evaluator syntax.

/// Rewrites display operators into evaluator syntax: `×` → `*`, `÷` → `/`,
/// `%` → `/100`.
///
/// Returns a new string; the input is never modified.
pub fn to_evaluator_syntax(display: &str) -> String {
    let mut out = String::with_capacity(display.len() + 4);
    for c in display.chars() {
        match c {
            '×' => out.push('*'),
            '÷' => out.push('/'),
            '%' => out.push_str("/100"),
            c => out.push(c),
        }
    }
    out
}

/// Rewrites `*` and `/` back into their display forms.
///
/// A translated `%` comes back as `÷100`; the original percent sign is not
/// recovered.
pub fn to_display_syntax(evaluator: &str) -> String {
    evaluator
        .chars()
        .map(|c| match c {
            '*' => '×',
            '/' => '÷',
            c => c,
        })
        .collect()
}
