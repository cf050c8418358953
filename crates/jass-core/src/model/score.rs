use crate::bits::{bits32, bits64};
use crate::model::error::{ModelError, PackedKind};
use crate::model::player::TeamId;
use crate::model::{MATCH_ADDITIONAL_POINTS, TRICKS_PER_TURN};
use core::fmt;

const TRICKS_START: u32 = 0;
const TRICKS_SIZE: u32 = 4;
const TURN_POINTS_START: u32 = 4;
const TURN_POINTS_SIZE: u32 = 9;
const GAME_POINTS_START: u32 = 13;
const GAME_POINTS_SIZE: u32 = 11;
const RECORD_SIZE: u32 = TRICKS_SIZE + TURN_POINTS_SIZE + GAME_POINTS_SIZE;
const TEAM_STRIDE: u32 = 32;

const MAX_TURN_POINTS: u32 = 257;
const MAX_GAME_POINTS: u32 = 2000;

/// One team's share of a [`Score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamScore {
    pub tricks: u32,
    pub turn_points: u32,
    pub game_points: u32,
}

impl TeamScore {
    fn pack(self) -> Result<u32, ModelError> {
        Ok(bits32::pack(&[
            (self.tricks, TRICKS_SIZE),
            (self.turn_points, TURN_POINTS_SIZE),
            (self.game_points, GAME_POINTS_SIZE),
        ])?)
    }

    const fn unpack(record: u32) -> Self {
        Self {
            tricks: bits32::extract(record, TRICKS_START, TRICKS_SIZE),
            turn_points: bits32::extract(record, TURN_POINTS_START, TURN_POINTS_SIZE),
            game_points: bits32::extract(record, GAME_POINTS_START, GAME_POINTS_SIZE),
        }
    }

    // Fields are already known to fit; skips the checks of `pack`.
    const fn pack_unchecked(self) -> u32 {
        (self.tricks << TRICKS_START)
            | (self.turn_points << TURN_POINTS_START)
            | (self.game_points << GAME_POINTS_START)
    }
}

/// Both teams' tricks, turn points and game points packed into 64 bits.
///
/// Team 1 occupies the low 32 bits and team 2 the high 32 bits. Each record holds the tricks
/// won this turn (4 bits), the turn points (9 bits) and the game points (11 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Score(u64);

impl Score {
    pub const INITIAL: Score = Score(0);

    pub fn new(team1: TeamScore, team2: TeamScore) -> Result<Self, ModelError> {
        let packed = bits64::pack(&[
            (u64::from(team1.pack()?), TEAM_STRIDE),
            (u64::from(team2.pack()?), TEAM_STRIDE),
        ])?;
        Self::from_packed(packed)
    }

    pub fn is_valid_packed(packed: u64) -> bool {
        let mut tricks = 0;
        for team in TeamId::ALL {
            let record = Self::record(packed, team);
            if bits32::extract(record, RECORD_SIZE, bits32::WIDTH - RECORD_SIZE) != 0 {
                return false;
            }
            let fields = TeamScore::unpack(record);
            if fields.turn_points > MAX_TURN_POINTS || fields.game_points > MAX_GAME_POINTS {
                return false;
            }
            tricks += fields.tricks;
        }
        tricks <= TRICKS_PER_TURN
    }

    pub fn from_packed(packed: u64) -> Result<Self, ModelError> {
        if Self::is_valid_packed(packed) {
            Ok(Score(packed))
        } else {
            Err(ModelError::invalid(PackedKind::Score, packed))
        }
    }

    pub const fn packed(self) -> u64 {
        self.0
    }

    pub fn team(self, team: TeamId) -> TeamScore {
        TeamScore::unpack(Self::record(self.0, team))
    }

    pub fn turn_tricks(self, team: TeamId) -> u32 {
        self.team(team).tricks
    }

    pub fn turn_points(self, team: TeamId) -> u32 {
        self.team(team).turn_points
    }

    pub fn game_points(self, team: TeamId) -> u32 {
        self.team(team).game_points
    }

    pub fn total_points(self, team: TeamId) -> u32 {
        let fields = self.team(team);
        fields.turn_points + fields.game_points
    }

    /// Credits `winning_team` with one more trick worth `trick_points`.
    ///
    /// Winning all nine tricks of a turn adds the match bonus.
    pub fn with_additional_trick(self, winning_team: TeamId, trick_points: u32) -> Self {
        let mut fields = self.team(winning_team);
        fields.tricks += 1;
        fields.turn_points += trick_points;
        if fields.tricks == TRICKS_PER_TURN {
            fields.turn_points += MATCH_ADDITIONAL_POINTS;
        }
        self.with_team(winning_team, fields)
    }

    /// Moves turn points into game points and clears the per-turn counters.
    pub fn next_turn(self) -> Self {
        TeamId::ALL.iter().fold(Score::INITIAL, |score, &team| {
            let current = self.team(team);
            score.with_team(
                team,
                TeamScore {
                    tricks: 0,
                    turn_points: 0,
                    game_points: current.game_points + current.turn_points,
                },
            )
        })
    }

    const fn record(packed: u64, team: TeamId) -> u32 {
        bits64::extract(packed, team as u32 * TEAM_STRIDE, TEAM_STRIDE) as u32
    }

    fn with_team(self, team: TeamId, fields: TeamScore) -> Self {
        let shift = team as u32 * TEAM_STRIDE;
        let cleared = self.0 & !bits64::mask(shift, TEAM_STRIDE);
        Score(cleared | (u64::from(fields.pack_unchecked()) << shift))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let one = self.team(TeamId::Team1);
        let two = self.team(TeamId::Team2);
        write!(
            f,
            "({}, {}, {}) / ({}, {}, {})",
            one.tricks, one.turn_points, one.game_points, two.tricks, two.turn_points, two.game_points
        )
    }
}
