use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cell::Direction;
use super::error::ProtocolError;
use super::world::{Bonus, BonusKind, GameConfig, PlayerView, World};

/// Key of the local player inside `players`.
pub const ME: &str = "i";

#[derive(Debug, Clone)]
pub enum Message {
    StartGame(GameConfig),
    Tick(TickParams),
    EndGame,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    params: serde_json::Value,
}

impl Message {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let raw: RawMessage = serde_json::from_str(line)?;
        let message = match raw.kind.as_str() {
            "start_game" => serde_json::from_value(raw.params).map(Message::StartGame),
            "tick" => serde_json::from_value(raw.params).map(Message::Tick),
            "end_game" => Ok(Message::EndGame),
            _ => return Err(ProtocolError::UnknownType(raw.kind)),
        };

        message.map_err(|source| ProtocolError::Params {
            kind: raw.kind,
            source,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerBonusParams {
    #[serde(rename = "type")]
    pub kind: BonusKind,
    #[serde(default)]
    pub ticks: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerParams {
    #[serde(default)]
    pub score: i32,
    pub position: [i32; 2],
    #[serde(default)]
    pub territory: Vec<[i32; 2]>,
    #[serde(default)]
    pub lines: Vec<[i32; 2]>,
    #[serde(default)]
    pub bonuses: Vec<PlayerBonusParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BonusParams {
    #[serde(rename = "type")]
    pub kind: BonusKind,
    pub position: [i32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickParams {
    pub players: HashMap<String, PlayerParams>,
    #[serde(default)]
    pub bonuses: Vec<BonusParams>,
    pub tick_num: i32,
}

impl PlayerParams {
    fn to_view(&self, config: &GameConfig) -> PlayerView {
        PlayerView {
            position: config.normalize(self.position),
            territory: self.territory.iter().map(|&p| config.normalize(p)).collect(),
            lines: self.lines.iter().map(|&p| config.normalize(p)).collect(),
            bonuses: self.bonuses.iter().map(|bonus| bonus.kind).collect(),
        }
    }
}

impl TickParams {
    pub fn to_world(&self, config: &GameConfig) -> Result<World, ProtocolError> {
        let me = self
            .players
            .get(ME)
            .ok_or(ProtocolError::MissingSelf(self.tick_num))?
            .to_view(config);

        let enemies = self
            .players
            .iter()
            .filter(|(id, _)| id.as_str() != ME)
            .map(|(id, player)| (id.clone(), player.to_view(config)))
            .collect();

        let bonuses = self
            .bonuses
            .iter()
            .map(|bonus| Bonus {
                kind: bonus.kind,
                position: config.normalize(bonus.position),
            })
            .collect();

        Ok(World {
            config: *config,
            me,
            enemies,
            bonuses,
            tick_num: self.tick_num,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Command {
    pub command: Direction,
    pub debug: String,
}

impl Command {
    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
