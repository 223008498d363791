use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;

/// One entry from an A2S_PLAYER response.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Index of the player's chunk in the response. Not necessarily the
    /// player's position in the returned list.
    pub index: u8,
    pub name: String,
    /// Server-defined score, usually kills or points.
    pub score: i32,
    /// Seconds the player has been connected.
    pub duration: f32,
    /// Deaths. Only sent by The Ship servers.
    pub deaths: Option<i32>,
    /// Money. Only sent by The Ship servers.
    pub money: Option<i32>,
}

/// Decodes the payload of a [`Player`](crate::packet::ResponseKind::Player)
/// response.
///
/// The Ship appends one `(deaths, money)` pair per player after the
/// regular chunks. No flag announces them; the only signal is that payload
/// bytes remain once every chunk has been read, and then every player gets
/// a pair, in the order the chunks arrived. A trailing block of the wrong
/// size surfaces as an underrun on the last pair.
pub(crate) fn parse_players(data: &[u8]) -> Result<Vec<Player>, SourceQueryError> {
    let mut cursor = PacketCursor::new(data);

    let player_count = cursor.read_byte()?;
    let mut players = Vec::with_capacity(usize::from(player_count));

    for _ in 0..player_count {
        players.push(Player {
            index: cursor.read_byte()?,
            name: cursor.read_string()?,
            score: cursor.read_long()?,
            duration: cursor.read_float()?,
            deaths: None,
            money: None,
        });
    }

    if cursor.has_remaining() {
        for player in &mut players {
            player.deaths = Some(cursor.read_long()?);
            player.money = Some(cursor.read_long()?);
        }
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload(count: u8) -> Vec<u8> {
        let mut payload = vec![count];
        for i in 0..count {
            payload.push(i);
            payload.extend_from_slice(format!("player {i}").as_bytes());
            payload.push(0);
            payload.extend_from_slice(&i32::from(i).to_le_bytes());
            payload.extend_from_slice(&(f32::from(i) * 60.0).to_le_bytes());
        }
        payload
    }

    #[test]
    fn empty_list() {
        assert_eq!(parse_players(&[0]).unwrap(), Vec::new());
    }

    #[test]
    fn base_chunks_only() {
        let players = parse_players(&base_payload(4)).unwrap();
        assert_eq!(players.len(), 4);
        assert_eq!(players[2].index, 2);
        assert_eq!(players[2].name, "player 2");
        assert_eq!(players[2].score, 2);
        assert_eq!(players[2].duration, 120.0);
        assert!(players.iter().all(|p| p.deaths.is_none() && p.money.is_none()));
    }

    #[test]
    fn exact_payload_never_sets_the_ship_extension() {
        for count in 0..=255u8 {
            let players = parse_players(&base_payload(count)).unwrap();
            assert_eq!(players.len(), usize::from(count));
            assert!(
                players.iter().all(|p| p.deaths.is_none() && p.money.is_none()),
                "count {count}"
            );
        }
    }

    #[test]
    fn trailing_pairs_attach_to_every_player_in_order() {
        for count in 1..=255u8 {
            let mut payload = base_payload(count);
            for i in 0..count {
                payload.extend_from_slice(&(i32::from(i) + 1000).to_le_bytes());
                payload.extend_from_slice(&(i32::from(i) + 2000).to_le_bytes());
            }

            let players = parse_players(&payload).unwrap();
            assert_eq!(players.len(), usize::from(count));
            for (i, player) in players.iter().enumerate() {
                assert_eq!(player.deaths, Some(i as i32 + 1000), "count {count}");
                assert_eq!(player.money, Some(i as i32 + 2000), "count {count}");
            }
        }
    }

    #[test]
    fn short_trailing_block_underruns_on_the_last_player() {
        let mut payload = base_payload(2);
        // one and a half pairs instead of two
        payload.extend_from_slice(&[0; 12]);
        assert!(matches!(
            parse_players(&payload),
            Err(SourceQueryError::MalformedPacket(_))
        ));
    }

    #[test]
    fn truncated_chunk_is_malformed() {
        let payload = base_payload(3);
        assert!(matches!(
            parse_players(&payload[..payload.len() - 2]),
            Err(SourceQueryError::MalformedPacket(_))
        ));
    }
}
