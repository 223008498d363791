use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;

/// App ID of The Ship: Murder Party, the one title whose info and player
/// responses carry extra fields.
const THE_SHIP_APP_ID: i16 = 2400;

/// Server type, decoded from a single character on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    Dedicated,
    /// Listen server.
    NonDedicated,
    /// SourceTV relay (proxy).
    SourceTv,
    Unknown,
}

impl ServerType {
    /// Uppercase codes from older GoldSource servers are folded to
    /// lowercase first; anything outside `d`/`l`/`p` maps to
    /// [`ServerType::Unknown`].
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_lowercase() {
            'd' => ServerType::Dedicated,
            'l' => ServerType::NonDedicated,
            'p' => ServerType::SourceTv,
            _ => ServerType::Unknown,
        }
    }
}

/// Operating system the server runs on, decoded from a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Linux,
    Windows,
    Mac,
    Unknown,
}

impl Environment {
    /// `o` is the historical Mac code some servers still report.
    /// Case-normalized like [`ServerType::from_code`]; anything else maps
    /// to [`Environment::Unknown`].
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_lowercase() {
            'l' => Environment::Linux,
            'w' => Environment::Windows,
            'm' | 'o' => Environment::Mac,
            _ => Environment::Unknown,
        }
    }
}

/// Successful reply to [`info`](crate::query::A2SQuery::info). Which of
/// the two layouts comes back depends on the engine the server runs; the
/// response tag selects exactly one, there is no fallback between them.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerInfo {
    Source(SourceInfo),
    GoldSource(GoldSourceInfo),
}

/// A Source engine server's reply to A2S_INFO.
///
/// Optional fields default to `None` and are populated only when their
/// governing condition holds: the mode/witnesses/duration trio on The
/// Ship servers, everything after `extra_data_flag` per its bits.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    /// Protocol version used by the server.
    pub protocol: u8,
    /// Server hostname, as shown in server browsers.
    pub name: String,
    /// Current map.
    pub map: String,
    /// Name of the folder containing the game files.
    pub folder: String,
    /// Full name of the game.
    pub game: String,
    /// Steam App ID of the game.
    pub app_id: i16,
    /// Current player count. May include bots.
    pub players: u8,
    /// Maximum number of players allowed.
    pub max_players: u8,
    /// Number of bots on the server.
    pub bots: u8,
    pub server_type: ServerType,
    pub environment: Environment,
    /// Whether the server is password locked.
    pub password: bool,
    /// Whether the server is VAC protected.
    pub vac: bool,
    /// Version of the game installed on the server.
    pub version: String,
    /// Bitmask recording which of the optional trailing fields were sent.
    pub extra_data_flag: u8,

    /// Game mode. Only sent by The Ship (`app_id` 2400).
    pub mode: Option<u8>,
    /// Witnesses needed to arrest a player. Only sent by The Ship.
    pub witnesses: Option<u8>,
    /// Seconds a witnessed player has before arrest. Only sent by The Ship.
    pub duration: Option<u8>,

    /// The server's game port.
    pub port: Option<i16>,
    /// The server's 64-bit Steam ID.
    pub steam_id: Option<u64>,
    /// SourceTV spectator port.
    pub spectator_port: Option<i16>,
    /// SourceTV spectator server name.
    pub spectator_name: Option<String>,
    /// Tags describing the server.
    pub keywords: Option<String>,
    /// The server's 64-bit game ID.
    pub game_id: Option<u64>,
}

impl SourceInfo {
    /// Decodes the payload of an [`InfoModern`](crate::packet::ResponseKind::InfoModern)
    /// response.
    pub(crate) fn parse(data: &[u8]) -> Result<SourceInfo, SourceQueryError> {
        let mut cursor = PacketCursor::new(data);

        let protocol = cursor.read_byte()?;
        let name = cursor.read_string()?;
        let map = cursor.read_string()?;
        let folder = cursor.read_string()?;
        let game = cursor.read_string()?;
        let app_id = cursor.read_short()?;
        let players = cursor.read_byte()?;
        let max_players = cursor.read_byte()?;
        let bots = cursor.read_byte()?;
        let server_type = ServerType::from_code(cursor.read_char()?);
        let environment = Environment::from_code(cursor.read_char()?);
        let password = cursor.read_bool()?;
        let vac = cursor.read_bool()?;

        // The Ship wedges three extra fields in before the version string.
        // The gate is the exact app id, nothing else.
        let (mode, witnesses, duration) = if app_id == THE_SHIP_APP_ID {
            (
                Some(cursor.read_byte()?),
                Some(cursor.read_byte()?),
                Some(cursor.read_byte()?),
            )
        } else {
            (None, None, None)
        };

        let version = cursor.read_string()?;
        let extra_data_flag = cursor.read_byte()?;

        // Bits are independent and read in this fixed order.
        let mut port = None;
        let mut steam_id = None;
        let mut spectator_port = None;
        let mut spectator_name = None;
        let mut keywords = None;
        let mut game_id = None;

        if extra_data_flag & 0x80 != 0 {
            port = Some(cursor.read_short()?);
        }
        if extra_data_flag & 0x10 != 0 {
            steam_id = Some(cursor.read_long_long()?);
        }
        if extra_data_flag & 0x40 != 0 {
            spectator_port = Some(cursor.read_short()?);
            spectator_name = Some(cursor.read_string()?);
        }
        if extra_data_flag & 0x20 != 0 {
            keywords = Some(cursor.read_string()?);
        }
        if extra_data_flag & 0x01 != 0 {
            game_id = Some(cursor.read_long_long()?);
        }

        Ok(SourceInfo {
            protocol,
            name,
            map,
            folder,
            game,
            app_id,
            players,
            max_players,
            bots,
            server_type,
            environment,
            password,
            vac,
            version,
            extra_data_flag,
            mode,
            witnesses,
            duration,
            port,
            steam_id,
            spectator_port,
            spectator_name,
            keywords,
            game_id,
        })
    }
}

/// A GoldSource engine server's reply to A2S_INFO.
///
/// The six `mod_*` fields are populated only when `modded` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldSourceInfo {
    /// IP address and port of the server.
    pub address: String,
    /// Server hostname.
    pub name: String,
    /// Current map.
    pub map: String,
    /// Name of the folder containing the game files.
    pub folder: String,
    /// Full name of the game.
    pub game: String,
    /// Current player count.
    pub players: u8,
    /// Maximum number of players allowed.
    pub max_players: u8,
    /// Protocol version used by the server.
    pub protocol: u8,
    pub server_type: ServerType,
    pub environment: Environment,
    /// Whether the server is password locked.
    pub password: bool,
    /// Whether the server runs a Half-Life mod.
    pub modded: bool,
    /// Whether the server is VAC protected.
    pub vac: bool,
    /// Number of bots on the server.
    pub bots: u8,

    /// URL to the mod's website.
    pub mod_link: Option<String>,
    /// URL to download the mod.
    pub mod_download_link: Option<String>,
    /// Version of the mod running on the server.
    pub mod_version: Option<i32>,
    /// Space taken by the mod, in bytes.
    pub mod_size: Option<i32>,
    /// Whether the mod is multiplayer only.
    pub mod_multiplayer_only: Option<bool>,
    /// Whether the mod uses its own DLL rather than the Half-Life one.
    pub mod_uses_custom_dll: Option<bool>,
}

impl GoldSourceInfo {
    /// Decodes the payload of an [`InfoLegacy`](crate::packet::ResponseKind::InfoLegacy)
    /// response.
    pub(crate) fn parse(data: &[u8]) -> Result<GoldSourceInfo, SourceQueryError> {
        let mut cursor = PacketCursor::new(data);

        let address = cursor.read_string()?;
        let name = cursor.read_string()?;
        let map = cursor.read_string()?;
        let folder = cursor.read_string()?;
        let game = cursor.read_string()?;
        let players = cursor.read_byte()?;
        let max_players = cursor.read_byte()?;
        let protocol = cursor.read_byte()?;
        let server_type = ServerType::from_code(cursor.read_char()?);
        let environment = Environment::from_code(cursor.read_char()?);
        let password = cursor.read_bool()?;
        let modded = cursor.read_bool()?;

        let mut mod_link = None;
        let mut mod_download_link = None;
        let mut mod_version = None;
        let mut mod_size = None;
        let mut mod_multiplayer_only = None;
        let mut mod_uses_custom_dll = None;

        if modded {
            mod_link = Some(cursor.read_string()?);
            mod_download_link = Some(cursor.read_string()?);
            mod_version = Some(cursor.read_long()?);
            mod_size = Some(cursor.read_long()?);
            mod_multiplayer_only = Some(cursor.read_bool()?);
            mod_uses_custom_dll = Some(cursor.read_bool()?);
        }

        let vac = cursor.read_bool()?;
        let bots = cursor.read_byte()?;

        Ok(GoldSourceInfo {
            address,
            name,
            map,
            folder,
            game,
            players,
            max_players,
            protocol,
            server_type,
            environment,
            password,
            modded,
            vac,
            bots,
            mod_link,
            mod_download_link,
            mod_version,
            mod_size,
            mod_multiplayer_only,
            mod_uses_custom_dll,
        })
    }
}
