//! The `node.hashPowerChanges` grammar: `'{' entry (',' entry)* '}'`,
//! `entry = integer ':' float ':' integer`, whitespace permitted around
//! every token, empty braces permitted.

use crate::error::HashPowerGrammarError;

/// One scheduled hashpower change, as parsed from the config string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HashPowerChangeEntry {
    pub node_id: u64,
    pub new_power: f64,
    pub time: u64,
}

pub fn parse_hashpower_changes(input: &str) -> Result<Vec<HashPowerChangeEntry>, HashPowerGrammarError> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| HashPowerGrammarError::MissingBrackets {
            input: trimmed.to_string(),
        })?;

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner.split(',').map(parse_entry).collect()
}

fn parse_entry(raw: &str) -> Result<HashPowerChangeEntry, HashPowerGrammarError> {
    let entry = raw.trim();
    let fields: Vec<&str> = entry.split(':').map(str::trim).collect();
    let [node_str, power_str, time_str] = fields.as_slice() else {
        return Err(HashPowerGrammarError::WrongArity {
            entry: entry.to_string(),
        });
    };

    let node_id: u64 = node_str
        .parse()
        .map_err(|_| HashPowerGrammarError::NonNumericField {
            entry: entry.to_string(),
            field: node_str.to_string(),
        })?;

    let new_power: f64 = power_str
        .parse()
        .map_err(|_| HashPowerGrammarError::NonNumericField {
            entry: entry.to_string(),
            field: power_str.to_string(),
        })?;
    if new_power < 0.0 {
        return Err(HashPowerGrammarError::NegativeHashpower { value: new_power });
    }

    let time: i64 = time_str
        .parse()
        .map_err(|_| HashPowerGrammarError::NonNumericField {
            entry: entry.to_string(),
            field: time_str.to_string(),
        })?;
    if time < 0 {
        return Err(HashPowerGrammarError::NegativeTime { time });
    }

    Ok(HashPowerChangeEntry {
        node_id,
        new_power,
        time: time as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s7_single_entry_with_scientific_notation() {
        let entries = parse_hashpower_changes("{3:5.0E10:50000}").unwrap();
        assert_eq!(
            entries,
            vec![HashPowerChangeEntry {
                node_id: 3,
                new_power: 5.0e10,
                time: 50000
            }]
        );
    }

    #[test]
    fn s8_negative_hashpower_is_rejected() {
        let err = parse_hashpower_changes("{0:-5.0E10:10000}").unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn s8_empty_braces_yield_empty_schedule() {
        assert_eq!(parse_hashpower_changes("{}").unwrap(), Vec::new());
    }

    #[test]
    fn s8_two_entries_with_whitespace_preserve_order() {
        let entries =
            parse_hashpower_changes("{ 0 : 5.0E10 : 10000 , 1 : 3.0E10 : 20000 }").unwrap();
        assert_eq!(
            entries,
            vec![
                HashPowerChangeEntry {
                    node_id: 0,
                    new_power: 5.0e10,
                    time: 10000
                },
                HashPowerChangeEntry {
                    node_id: 1,
                    new_power: 3.0e10,
                    time: 20000
                },
            ]
        );
    }

    #[test]
    fn missing_brackets_is_rejected() {
        assert!(parse_hashpower_changes("3:5.0E10:50000").is_err());
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(parse_hashpower_changes("{3:5.0E10}").is_err());
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        assert!(parse_hashpower_changes("{x:5.0E10:50000}").is_err());
    }

    #[test]
    fn negative_time_is_rejected() {
        let err = parse_hashpower_changes("{0:5.0E10:-10}").unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }
}
