use byteorder::{ByteOrder, LittleEndian};

use crate::error::SourceQueryError;

/// Leading 4-byte format marker on every datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketFormat {
    /// `-1`: the whole response fits in one datagram.
    Single,
    /// `-2`: the response is split across datagrams. Recognized so it can
    /// be rejected cleanly, never parsed.
    Split,
}

impl TryFrom<i32> for PacketFormat {
    type Error = SourceQueryError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(PacketFormat::Single),
            -2 => Ok(PacketFormat::Split),
            n => Err(SourceQueryError::MalformedPacket(format!(
                "unknown packet format marker {n}"
            ))),
        }
    }
}

/// Client-to-server request tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A2S_INFO
    Info,
    /// A2S_PLAYER
    Player,
    /// A2S_RULES
    Rules,
}

impl RequestKind {
    pub fn as_byte(self) -> u8 {
        match self {
            RequestKind::Info => 0x54,
            RequestKind::Player => 0x55,
            RequestKind::Rules => 0x56,
        }
    }

    /// Only A2S_INFO carries an ASCII body.
    fn body(self) -> Option<&'static str> {
        match self {
            RequestKind::Info => Some("Source Engine Query"),
            RequestKind::Player | RequestKind::Rules => None,
        }
    }
}

/// Server-to-client response tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// S2C_CHALLENGE: repeat the request with the enclosed token.
    Challenge,
    /// A2S_INFO reply from a Source engine server.
    InfoModern,
    /// A2S_INFO reply from a GoldSource engine server.
    InfoLegacy,
    /// A2S_PLAYER reply.
    Player,
    /// A2S_RULES reply.
    Rules,
}

impl TryFrom<u8> for ResponseKind {
    type Error = SourceQueryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x41 => Ok(ResponseKind::Challenge),
            0x49 => Ok(ResponseKind::InfoModern),
            0x6D => Ok(ResponseKind::InfoLegacy),
            0x44 => Ok(ResponseKind::Player),
            0x45 => Ok(ResponseKind::Rules),
            n => Err(SourceQueryError::UnrecognizedResponseKind(n)),
        }
    }
}

/// Valve caps single-datagram responses at 1400 bytes plus IP/UDP headers;
/// receive buffers are sized to match.
pub const MAX_PACKET_SIZE: usize = 1400;

/// Challenge placeholder sent on the first attempt of every query.
pub const NO_CHALLENGE: i32 = -1;

/// One outgoing query datagram.
#[derive(Debug, PartialEq, Eq)]
pub struct RequestPacket {
    kind: RequestKind,
    challenge: i32,
}

impl RequestPacket {
    pub fn new(kind: RequestKind, challenge: i32) -> Self {
        RequestPacket { kind, challenge }
    }

    /// Serializes the request: format marker, kind tag, NUL-terminated
    /// body (A2S_INFO only), then the 4-byte challenge token
    /// ([`NO_CHALLENGE`] until the server has issued one).
    pub fn pack(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&(-1i32).to_le_bytes());
        payload.push(self.kind.as_byte());
        if let Some(body) = self.kind.body() {
            payload.extend_from_slice(body.as_bytes());
            payload.push(0);
        }
        payload.extend_from_slice(&self.challenge.to_le_bytes());
        payload
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

/// One received datagram, split into its envelope fields.
#[derive(Debug, PartialEq, Eq)]
pub struct ResponsePacket {
    format: PacketFormat,
    kind: ResponseKind,
    body: Vec<u8>,
}

impl ResponsePacket {
    const HEADER_LEN: usize = 5;

    /// Strips the format marker and kind tag off a raw datagram, leaving
    /// the payload for the matching record parser. Split (multi-packet)
    /// responses are rejected outright.
    pub fn unpack(incoming: &[u8]) -> Result<Self, SourceQueryError> {
        if incoming.len() < Self::HEADER_LEN {
            return Err(SourceQueryError::MalformedPacket(format!(
                "datagram of {} bytes is shorter than the envelope header",
                incoming.len()
            )));
        }

        let format = PacketFormat::try_from(LittleEndian::read_i32(&incoming[..4]))?;
        if format == PacketFormat::Split {
            return Err(SourceQueryError::UnsupportedFormat);
        }
        let kind = ResponseKind::try_from(incoming[4])?;

        Ok(ResponsePacket {
            format,
            kind,
            body: incoming[Self::HEADER_LEN..].to_vec(),
        })
    }

    pub fn format(&self) -> PacketFormat {
        self.format
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_info_request_without_challenge() {
        let packet = RequestPacket::new(RequestKind::Info, NO_CHALLENGE);
        let mut expected = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x54];
        expected.extend_from_slice(b"Source Engine Query\0");
        expected.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(packet.pack(), expected);
    }

    #[test]
    fn packs_challenge_token_little_endian() {
        let packet = RequestPacket::new(RequestKind::Player, 0x1122_3344);
        assert_eq!(
            packet.pack(),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0x55, 0x44, 0x33, 0x22, 0x11]
        );
    }

    #[test]
    fn only_info_requests_carry_a_body() {
        assert_eq!(
            RequestPacket::new(RequestKind::Rules, NO_CHALLENGE).pack(),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0x56, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn unpacks_challenge_response() {
        let packet =
            ResponsePacket::unpack(&[0xFF, 0xFF, 0xFF, 0xFF, 0x41, 0x0A, 0x08, 0x5E, 0xEA])
                .unwrap();
        assert_eq!(packet.format(), PacketFormat::Single);
        assert_eq!(packet.kind(), ResponseKind::Challenge);
        assert_eq!(packet.body(), &[0x0A, 0x08, 0x5E, 0xEA]);
    }

    #[test]
    fn rejects_split_responses() {
        assert!(matches!(
            ResponsePacket::unpack(&[0xFE, 0xFF, 0xFF, 0xFF, 0x49, 0x00]),
            Err(SourceQueryError::UnsupportedFormat)
        ));
    }

    #[test]
    fn rejects_unknown_response_kind() {
        assert!(matches!(
            ResponsePacket::unpack(&[0xFF, 0xFF, 0xFF, 0xFF, 0x5A]),
            Err(SourceQueryError::UnrecognizedResponseKind(0x5A))
        ));
    }

    #[test]
    fn rejects_unknown_format_marker() {
        assert!(matches!(
            ResponsePacket::unpack(&[0x00, 0x00, 0x00, 0x00, 0x49]),
            Err(SourceQueryError::MalformedPacket(_))
        ));
    }

    #[test]
    fn rejects_truncated_envelope() {
        assert!(matches!(
            ResponsePacket::unpack(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(SourceQueryError::MalformedPacket(_))
        ));
    }
}
