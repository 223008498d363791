use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, trace};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;
use crate::info::{GoldSourceInfo, ServerInfo, SourceInfo};
use crate::packet::{
    RequestKind, RequestPacket, ResponseKind, ResponsePacket, MAX_PACKET_SIZE, NO_CHALLENGE,
};
use crate::player::{parse_players, Player};
use crate::rules::parse_rules;

/// Standard query port for Source and GoldSource servers.
pub const DEFAULT_PORT: u16 = 27015;

/// Timeout applied to connect, send and receive when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A connected A2S query client.
///
/// One instance owns one UDP socket, connected at construction and usable
/// for any number of sequential queries until [`close`](A2SQuery::close).
/// Queries take `&mut self` because the protocol has no request ids: a
/// reply is matched to a request purely by arriving next, so a second
/// in-flight query on the same socket could pair replies with the wrong
/// call.
pub struct A2SQuery {
    socket: Option<UdpSocket>,
    timeout_dur: Duration,
}

impl A2SQuery {
    /// Opens a local UDP socket and connects it to `host:port`.
    ///
    /// `timeout_dur` bounds the connect and every later send and receive
    /// individually; [`DEFAULT_TIMEOUT`] applies when `None`. Most games
    /// answer queries on their regular connection port, conventionally
    /// [`DEFAULT_PORT`].
    pub async fn connect(
        host: &str,
        port: u16,
        timeout_dur: Option<Duration>,
    ) -> Result<Self, SourceQueryError> {
        let timeout_dur = timeout_dur.unwrap_or(DEFAULT_TIMEOUT);

        // any free local port will do
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(SourceQueryError::FailedPortBind)?;

        timeout(timeout_dur, socket.connect((host, port)))
            .await?
            .map_err(SourceQueryError::UnreachableHost)?;

        debug!("connected to {host}:{port}");

        Ok(A2SQuery {
            socket: Some(socket),
            timeout_dur,
        })
    }

    /// Queries general information about the server.
    ///
    /// The response tag tells the two info layouts apart: Source engine
    /// servers answer [`ServerInfo::Source`], GoldSource engine servers
    /// answer [`ServerInfo::GoldSource`].
    pub async fn info(&mut self) -> Result<ServerInfo, SourceQueryError> {
        let response = self.request(RequestKind::Info).await?;

        match response.kind() {
            ResponseKind::InfoModern => {
                Ok(ServerInfo::Source(SourceInfo::parse(response.body())?))
            }
            ResponseKind::InfoLegacy => {
                Ok(ServerInfo::GoldSource(GoldSourceInfo::parse(response.body())?))
            }
            got => Err(SourceQueryError::UnexpectedResponseKind {
                got,
                expected: "InfoModern or InfoLegacy",
            }),
        }
    }

    /// Queries the server's current players and bots.
    pub async fn players(&mut self) -> Result<Vec<Player>, SourceQueryError> {
        let response = self.request(RequestKind::Player).await?;

        match response.kind() {
            ResponseKind::Player => parse_players(response.body()),
            got => Err(SourceQueryError::UnexpectedResponseKind {
                got,
                expected: "Player",
            }),
        }
    }

    /// Alias of [`players`](A2SQuery::players).
    pub async fn player_list(&mut self) -> Result<Vec<Player>, SourceQueryError> {
        self.players().await
    }

    /// Queries the server's rules (console variables) as key/value pairs.
    pub async fn rules(&mut self) -> Result<BTreeMap<String, String>, SourceQueryError> {
        let response = self.request(RequestKind::Rules).await?;

        match response.kind() {
            ResponseKind::Rules => parse_rules(response.body()),
            got => Err(SourceQueryError::UnexpectedResponseKind {
                got,
                expected: "Rules",
            }),
        }
    }

    /// Closes the socket. Every query made afterwards fails with
    /// [`SourceQueryError::ClosedConnection`] without touching the network.
    pub fn close(&mut self) {
        self.socket = None;
    }

    /// One logical query: send, receive, and answer at most one challenge.
    ///
    /// Servers may demand the request be repeated with the token they
    /// issue. A server that challenges the re-sent token as well would
    /// have the exchange looping forever, so a second challenge is an
    /// error.
    async fn request(&mut self, kind: RequestKind) -> Result<ResponsePacket, SourceQueryError> {
        let mut challenge = NO_CHALLENGE;

        loop {
            let response = self.send_recv(&RequestPacket::new(kind, challenge)).await?;

            if response.kind() != ResponseKind::Challenge {
                return Ok(response);
            }
            if challenge != NO_CHALLENGE {
                return Err(SourceQueryError::ChallengeLoop);
            }

            challenge = PacketCursor::new(response.body()).read_long()?;
            debug!("server challenged {kind:?} request, retrying with token {challenge:#010X}");
        }
    }

    async fn send_recv(
        &mut self,
        packet: &RequestPacket,
    ) -> Result<ResponsePacket, SourceQueryError> {
        let socket = self
            .socket
            .as_ref()
            .ok_or(SourceQueryError::ClosedConnection)?;

        let request = packet.pack();
        timeout(self.timeout_dur, socket.send(&request))
            .await?
            .map_err(SourceQueryError::SendError)?;
        trace!("sent {} byte {:?} request", request.len(), packet.kind());

        let mut buf = [0u8; MAX_PACKET_SIZE];
        let received = timeout(self.timeout_dur, socket.recv(&mut buf))
            .await?
            .map_err(SourceQueryError::ReceiveError)?;
        trace!("received {received} byte datagram");

        ResponsePacket::unpack(&buf[..received])
    }
}
