use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Six = 0,
    Seven = 1,
    Eight = 2,
    Nine = 3,
    Ten = 4,
    Jack = 5,
    Queen = 6,
    King = 7,
    Ace = 8,
}

impl Rank {
    pub const COUNT: usize = 9;
    pub const ORDERED: [Rank; 9] = [
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Rank::Six),
            1 => Some(Rank::Seven),
            2 => Some(Rank::Eight),
            3 => Some(Rank::Nine),
            4 => Some(Rank::Ten),
            5 => Some(Rank::Jack),
            6 => Some(Rank::Queen),
            7 => Some(Rank::King),
            8 => Some(Rank::Ace),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position in the trump suit, where the nine and the jack outrank the ace.
    pub const fn trump_ordinal(self) -> u8 {
        match self {
            Rank::Six => 0,
            Rank::Seven => 1,
            Rank::Eight => 2,
            Rank::Ten => 3,
            Rank::Queen => 4,
            Rank::King => 5,
            Rank::Ace => 6,
            Rank::Nine => 7,
            Rank::Jack => 8,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn from_index_maps() {
        assert_eq!(Rank::from_index(5), Some(Rank::Jack));
        assert_eq!(Rank::from_index(9), None);
    }

    #[test]
    fn display_matches_symbols() {
        assert_eq!(Rank::Queen.to_string(), "Q");
        assert_eq!(Rank::Ten.to_string(), "10");
    }

    #[test]
    fn trump_order_puts_jack_then_nine_on_top() {
        let mut by_trump = Rank::ORDERED;
        by_trump.sort_by_key(|rank| rank.trump_ordinal());
        assert_eq!(by_trump[8], Rank::Jack);
        assert_eq!(by_trump[7], Rank::Nine);
        assert_eq!(by_trump[6], Rank::Ace);
        assert_eq!(by_trump[3], Rank::Ten);
    }
}
