//! Raw `key = value` line parsing, independent of what the keys mean.

use std::collections::BTreeMap;

/// Parses `key = value` (or `key=value`) lines into a map. Blank lines and
/// lines starting with `#` are ignored. Does not interpret any key; that
/// is `keys::Config`'s job.
pub fn parse_lines(text: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_comments_and_blank_lines() {
        let map = parse_lines(
            "\n# a comment\nsim.terminate.atTime = 1000\n\nnet.numOfHonestNodes=3\n",
        );
        assert_eq!(map.get("sim.terminate.atTime").unwrap(), "1000");
        assert_eq!(map.get("net.numOfHonestNodes").unwrap(), "3");
        assert_eq!(map.len(), 2);
    }
}
