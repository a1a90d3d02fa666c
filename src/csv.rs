/// Splits one catalog line into fields.
///
/// Fields are comma separated; a field may be wrapped in double quotes to
/// carry commas, and `""` inside a quoted field is a literal quote.
pub fn parse_record(line: &str) -> Vec<String> {
    let mut chars = line.chars().peekable();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes && current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Yields `(line_number, fields)` for every line that carries data.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers are
/// 1-based so they can be quoted back in error messages.
pub fn records(content: &str) -> impl Iterator<Item = (usize, Vec<String>)> + '_ {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| (idx + 1, parse_record(line)))
}
