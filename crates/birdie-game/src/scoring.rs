use serde::{Deserialize, Serialize};

use birdie_core::Side;

/// Points needed to take the match.
pub const POINTS_TO_WIN: u32 = 7;

/// Running score for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub left: u32,
    pub right: u32,
}

impl Scoreboard {
    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Credit `side` with a rally. Returns the winner once a side reaches
    /// [`POINTS_TO_WIN`].
    pub fn award(&mut self, side: Side) -> Option<Side> {
        let points = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *points += 1;
        self.winner()
    }

    pub fn winner(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.points(side) >= POINTS_TO_WIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_credits_only_that_side() {
        let mut board = Scoreboard::default();
        assert_eq!(board.award(Side::Right), None);
        assert_eq!(board.points(Side::Right), 1);
        assert_eq!(board.points(Side::Left), 0);
    }

    #[test]
    fn seventh_point_wins() {
        let mut board = Scoreboard::default();
        for _ in 0..6 {
            assert_eq!(board.award(Side::Left), None);
        }
        // 6-0 is not yet a win; the seventh point is
        assert_eq!(board.award(Side::Left), Some(Side::Left));
        assert_eq!(board.winner(), Some(Side::Left));
    }

    #[test]
    fn no_deuce_rule() {
        let mut board = Scoreboard { left: 6, right: 6 };
        assert_eq!(board.award(Side::Right), Some(Side::Right));
    }
}
