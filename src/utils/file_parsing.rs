/// Splits one ARFF data row on commas, ignoring commas inside single or
/// double quotes. Quotes are kept; callers strip them per token.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', Some(_)) => {
                current.push(c);
                escaped = true;
            }
            ('\'' | '"', None) => {
                quote = Some(c);
                current.push(c);
            }
            (q, Some(open)) if q == open => {
                quote = None;
                current.push(c);
            }
            (',', None) => {
                out.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    out.push(current.trim().to_string());
    out
}

pub fn strip_surrounding_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_row() {
        assert_eq!(
            split_csv_preserving_quotes("sunny, 85,85 ,FALSE"),
            vec!["sunny", "85", "85", "FALSE"]
        );
    }

    #[test]
    fn keeps_commas_inside_quotes() {
        assert_eq!(
            split_csv_preserving_quotes("'a,b',\"c,d\",e"),
            vec!["'a,b'", "\"c,d\"", "e"]
        );
    }

    #[test]
    fn escaped_quote_does_not_close() {
        assert_eq!(
            split_csv_preserving_quotes(r"'it\'s,fine',x"),
            vec![r"'it\'s,fine'", "x"]
        );
    }

    #[test]
    fn strip_quotes_only_when_balanced() {
        assert_eq!(strip_surrounding_quotes("'yes'"), "yes");
        assert_eq!(strip_surrounding_quotes("\"no\""), "no");
        assert_eq!(strip_surrounding_quotes("'open"), "'open");
        assert_eq!(strip_surrounding_quotes("'"), "'");
    }
}
