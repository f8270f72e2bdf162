/// Parse a page range string like "1,3-5" into 0-indexed page numbers,
/// sorted and without duplicates.
///
/// Input is 1-indexed (user-facing). Empty parts are skipped, so "1,,2" is
/// accepted. Page 0, pages past `page_count`, reversed ranges and anything
/// that is not a number are errors.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = page_number(start, page_count)?;
                let end = page_number(end, page_count)?;
                if start > end {
                    return Err(format!("invalid page range: '{part}' (start after end)"));
                }
                pages.extend(start - 1..end);
            }
            None => pages.push(page_number(part, page_count)? - 1),
        }
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

/// A single validated 1-based page number.
fn page_number(raw: &str, page_count: usize) -> Result<usize, String> {
    let raw = raw.trim();
    let page: usize = raw
        .parse()
        .map_err(|_| format!("invalid page number: '{raw}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        assert_eq!(parse_page_range("1", 5).unwrap(), vec![0]);
        assert_eq!(parse_page_range("3", 5).unwrap(), vec![2]);
    }

    #[test]
    fn ranges_and_lists() {
        assert_eq!(parse_page_range("2-4", 5).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_page_range("1,3,5", 5).unwrap(), vec![0, 2, 4]);
        assert_eq!(
            parse_page_range("1-3,7,10-12", 12).unwrap(),
            vec![0, 1, 2, 6, 9, 10, 11]
        );
    }

    #[test]
    fn sorted_and_deduplicated() {
        assert_eq!(parse_page_range("3,1,1-2", 5).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn whitespace_and_empty_parts() {
        assert_eq!(
            parse_page_range(" 1 , 3 - 5 ,", 5).unwrap(),
            vec![0, 2, 3, 4]
        );
        assert!(parse_page_range("", 5).unwrap().is_empty());
    }

    #[test]
    fn page_zero_invalid() {
        assert!(parse_page_range("0", 5).unwrap_err().contains("invalid"));
        assert!(parse_page_range("0-2", 5).unwrap_err().contains("invalid"));
    }

    #[test]
    fn page_exceeds_count() {
        assert!(parse_page_range("6", 5).unwrap_err().contains("exceeds"));
        assert!(parse_page_range("4-9", 5).unwrap_err().contains("exceeds"));
    }

    #[test]
    fn reversed_range() {
        assert!(parse_page_range("4-2", 5).unwrap_err().contains("start after end"));
    }

    #[test]
    fn not_a_number() {
        assert!(parse_page_range("x", 5).unwrap_err().contains("'x'"));
    }
}
