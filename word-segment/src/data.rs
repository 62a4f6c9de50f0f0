use std::io::BufRead;
use std::str::FromStr;

use smartstring::alias::String as SmartString;

use crate::ModelError;

/// Read `(word, count)` pairs, one `word<delimiter>count` pair per line
///
/// Trailing whitespace and blank lines are ignored. Errors report the 1-based line
/// number of the offending line.
pub fn parse_counts<R: BufRead>(
    mut reader: R,
    delimiter: char,
) -> Result<Vec<(SmartString, u64)>, ModelError> {
    let mut ln = String::new();
    let mut i = 0;
    let mut counts = Vec::new();
    while reader.read_line(&mut ln)? > 0 {
        i += 1;
        let line = ln.trim_end();
        if line.trim_start().is_empty() {
            ln.clear();
            continue;
        }

        let split = line
            .find(delimiter)
            .ok_or(ModelError::MissingDelimiter { line: i })?;
        if split == 0 {
            return Err(ModelError::EmptyWord { line: i });
        }

        let count = u64::from_str(line[split + delimiter.len_utf8()..].trim())
            .map_err(|source| ModelError::InvalidCount { line: i, source })?;
        counts.push((line[..split].into(), count));
        ln.clear();
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let data = "研究 100\n生 50\r\n\n研究生\t80 \n";
        let counts = parse_counts(data.as_bytes(), ' ');
        // The last line uses a tab
        assert!(matches!(counts, Err(ModelError::MissingDelimiter { line: 4 })));

        let counts = parse_counts("研究\t100\n生\t50\r\n\n研究生\t80 \n".as_bytes(), '\t').unwrap();
        let expected: Vec<(SmartString, u64)> =
            vec![("研究".into(), 100), ("生".into(), 50), ("研究生".into(), 80)];
        assert_eq!(counts, expected);
    }

    #[test]
    fn missing_trailing_newline() {
        let counts = parse_counts("a 1\nb 2".as_bytes(), ' ').unwrap();
        let expected: Vec<(SmartString, u64)> = vec![("a".into(), 1), ("b".into(), 2)];
        assert_eq!(counts, expected);
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            parse_counts("a 1\nb two\n".as_bytes(), ' '),
            Err(ModelError::InvalidCount { line: 2, .. })
        ));
        assert!(matches!(
            parse_counts("a -1\n".as_bytes(), ' '),
            Err(ModelError::InvalidCount { line: 1, .. })
        ));
        assert!(matches!(
            parse_counts("a \n".as_bytes(), ' '),
            Err(ModelError::MissingDelimiter { line: 1 })
        ));
        assert!(matches!(
            parse_counts(" 5\n".as_bytes(), ' '),
            Err(ModelError::EmptyWord { line: 1 })
        ));
    }
}
