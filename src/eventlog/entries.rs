use super::LogEntry;

const LABEL_MARKER: &str = "LABEL:";
const SEPARATOR_MIN_LEN: usize = 32;

/// Splits a raw event log dump into entries, preserving source order.
///
/// A new entry starts on a dashed rule, or on a `LABEL:` line once the current
/// entry already holds at least one line. The boundary line opens the next
/// entry. Blocks that are blank or consist only of rules are dropped.
pub fn split_entries(raw: &str) -> Vec<LogEntry> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        let starts_label = trimmed.starts_with(LABEL_MARKER) && !current.is_empty();
        if is_separator(trimmed) || starts_label {
            flush(&mut current, &mut out);
        }
        current.push(line);
    }
    flush(&mut current, &mut out);

    out
}

fn flush(current: &mut Vec<&str>, out: &mut Vec<LogEntry>) {
    if current.is_empty() {
        return;
    }
    let joined = current.join("\n");
    current.clear();

    let text = joined.trim();
    if text.is_empty() || text.lines().all(|l| is_separator(l.trim())) {
        return;
    }
    out.push(LogEntry::new(text));
}

fn is_separator(trimmed: &str) -> bool {
    trimmed.len() >= SEPARATOR_MIN_LEN && trimmed.bytes().all(|b| b == b'-')
}
