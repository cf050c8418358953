use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerId {
    Player1 = 0,
    Player2 = 1,
    Player3 = 2,
    Player4 = 3,
}

impl PlayerId {
    pub const COUNT: usize = 4;
    pub const ALL: [PlayerId; 4] = [
        PlayerId::Player1,
        PlayerId::Player2,
        PlayerId::Player3,
        PlayerId::Player4,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerId::Player1),
            1 => Some(PlayerId::Player2),
            2 => Some(PlayerId::Player3),
            3 => Some(PlayerId::Player4),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The player `offset` seats further in playing order.
    pub const fn offset(self, offset: usize) -> PlayerId {
        match (self.index() + offset) % Self::COUNT {
            0 => PlayerId::Player1,
            1 => PlayerId::Player2,
            2 => PlayerId::Player3,
            _ => PlayerId::Player4,
        }
    }

    pub const fn next(self) -> PlayerId {
        self.offset(1)
    }

    pub const fn team(self) -> TeamId {
        match self {
            PlayerId::Player1 | PlayerId::Player3 => TeamId::Team1,
            PlayerId::Player2 | PlayerId::Player4 => TeamId::Team2,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerId::Player1 => "Player 1",
            PlayerId::Player2 => "Player 2",
            PlayerId::Player3 => "Player 3",
            PlayerId::Player4 => "Player 4",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TeamId {
    Team1 = 0,
    Team2 = 1,
}

impl TeamId {
    pub const ALL: [TeamId; 2] = [TeamId::Team1, TeamId::Team2];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> TeamId {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TeamId::Team1 => "Team 1",
            TeamId::Team2 => "Team 2",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::{PlayerId, TeamId};

    #[test]
    fn next_wraps_around() {
        assert_eq!(PlayerId::Player4.next(), PlayerId::Player1);
        assert_eq!(PlayerId::Player2.offset(3), PlayerId::Player1);
    }

    #[test]
    fn partners_sit_opposite() {
        assert_eq!(PlayerId::Player1.team(), TeamId::Team1);
        assert_eq!(PlayerId::Player3.team(), TeamId::Team1);
        assert_eq!(PlayerId::Player2.team(), TeamId::Team2);
        assert_eq!(PlayerId::Player4.team(), TeamId::Team2);
        assert_eq!(TeamId::Team1.other(), TeamId::Team2);
    }

    #[test]
    fn index_roundtrip() {
        for (i, player) in PlayerId::ALL.iter().enumerate() {
            assert_eq!(PlayerId::from_index(i), Some(*player));
            assert_eq!(player.index(), i);
        }
        assert_eq!(PlayerId::from_index(4), None);
    }
}
