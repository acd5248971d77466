/// Normalizes raw PDF / OCR text before it goes into the prompt.
///
/// - every whitespace run collapses to one space
/// - `|` (a frequent OCR misread) becomes `I`
/// - a lowercase letter directly followed by an uppercase one gets a space
///   between them, undoing glued words like `EngineerGoogle`
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        let c = if c == '|' { 'I' } else { c };

        if pending_space {
            out.push(' ');
            pending_space = false;
        } else if let Some(p) = prev {
            if p.is_lowercase() && c.is_uppercase() {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out
}
