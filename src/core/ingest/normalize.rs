use crate::core::batch::WorkItem;

const BOM: char = '\u{feff}';

/// Separators accepted between the identifier and its qualifier
const FIELD_SEPARATORS: [char; 3] = [';', ',', '\t'];

/// Normalize an identifier token.
///
/// Drops a leading BOM, punctuation (`.`, `-`, `/`) and whitespace, and uppercases
/// what is left. Returns `None` when nothing remains.
pub fn normalize_identifier(token: &str) -> Option<String> {
    let normalized: String = token
        .trim_start_matches(BOM)
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/') && !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    (!normalized.is_empty()).then_some(normalized)
}

/// Parse one input line into a work item.
///
/// Blank lines and `#` comments yield `None`. The first field is the identifier and
/// the optional second field is the qualifier.
pub fn parse_line(line: &str) -> Option<WorkItem> {
    let line = line.trim_start_matches(BOM).trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split(FIELD_SEPARATORS);
    let key = normalize_identifier(fields.next()?)?;
    let item = WorkItem::new(key);

    match fields.next().map(str::trim).filter(|q| !q.is_empty()) {
        Some(qualifier) => Some(item.with_qualifier(qualifier)),
        None => Some(item),
    }
}
