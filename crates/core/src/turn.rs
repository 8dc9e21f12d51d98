#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnCycle {
    current: usize,
}

impl TurnCycle {
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self, player_count: usize) -> usize {
        if player_count > 0 {
            self.current = (self.current + 1) % player_count;
        }
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_around() {
        let mut turn = TurnCycle::default();
        assert_eq!(turn.current(), 0);
        assert_eq!(turn.advance(3), 1);
        assert_eq!(turn.advance(3), 2);
        assert_eq!(turn.advance(3), 0);
    }

    #[test]
    fn single_player_keeps_the_turn() {
        let mut turn = TurnCycle::default();
        assert_eq!(turn.advance(1), 0);
    }

    #[test]
    fn reset_returns_to_first_player() {
        let mut turn = TurnCycle::default();
        turn.advance(4);
        turn.advance(4);
        turn.reset();
        assert_eq!(turn.current(), 0);
    }
}
