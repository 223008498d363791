use std::collections::BTreeMap;

use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;

/// Decodes the payload of a [`Rules`](crate::packet::ResponseKind::Rules)
/// response into a key/value map.
///
/// The declared rule count is trusted; a count pointing past the end of
/// the payload fails in the cursor. The wire format does not promise
/// unique keys, so a repeated key keeps the last value seen.
pub(crate) fn parse_rules(data: &[u8]) -> Result<BTreeMap<String, String>, SourceQueryError> {
    let mut cursor = PacketCursor::new(data);

    let rule_count = cursor.read_short()?;
    let mut rules = BTreeMap::new();

    for _ in 0..rule_count {
        let key = cursor.read_string()?;
        let value = cursor.read_string()?;
        rules.insert(key, value);
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> Vec<u8> {
        let mut payload = (pairs.len() as i16).to_le_bytes().to_vec();
        for (key, value) in pairs {
            payload.extend_from_slice(key.as_bytes());
            payload.push(0);
            payload.extend_from_slice(value.as_bytes());
            payload.push(0);
        }
        payload
    }

    #[test]
    fn parses_key_value_pairs() {
        let rules = parse_rules(&payload(&[
            ("mp_falldamage", "0"),
            ("mp_timelimit", "30"),
            ("sv_gravity", "800"),
        ]))
        .unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules["mp_falldamage"], "0");
        assert_eq!(rules["mp_timelimit"], "30");
        assert_eq!(rules["sv_gravity"], "800");
    }

    #[test]
    fn empty_rule_set() {
        assert!(parse_rules(&payload(&[])).unwrap().is_empty());
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let rules = parse_rules(&payload(&[
            ("sv_cheats", "1"),
            ("sv_cheats", "0"),
        ]))
        .unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules["sv_cheats"], "0");
    }

    #[test]
    fn count_beyond_payload_is_malformed() {
        let mut bytes = payload(&[("sv_gravity", "800")]);
        bytes[0] = 2;
        assert!(matches!(
            parse_rules(&bytes),
            Err(SourceQueryError::MalformedPacket(_))
        ));
    }

    #[test]
    fn trailing_bytes_after_the_declared_count_are_ignored() {
        let mut bytes = payload(&[("sv_gravity", "800")]);
        bytes.extend_from_slice(b"leftover\0bytes\0");
        let rules = parse_rules(&bytes).unwrap();
        assert_eq!(rules.len(), 1);
    }
}
