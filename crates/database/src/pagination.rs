//! Page math and search patterns shared by the invoice list and its page count.

/// Rows per page of the invoices table.
pub const ITEMS_PER_PAGE: i64 = 6;

/// Row offset of a 1-based page. Callers guarantee `page >= 1`.
///
/// Saturates instead of overflowing, so a huge page number yields an empty page.
pub fn page_offset(page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(ITEMS_PER_PAGE)
}

/// Number of pages needed to show `count` rows; zero rows means zero pages.
pub fn total_pages(count: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    (count + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}

/// Wraps user search text into an `ILIKE` substring pattern.
///
/// `%`, `_` and `\` are escaped so they match literally; the result is always
/// bound as a parameter, never spliced into SQL.
pub fn search_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
