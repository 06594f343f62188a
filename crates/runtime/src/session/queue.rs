//! Per-player inbound command queues.

use std::collections::VecDeque;

use tactics_core::{Command, PlayerId};

/// One FIFO per player. Draining alternates between players, starting
/// with whoever was not served last, so neither seat can starve the other.
#[derive(Debug, Default)]
pub struct InboundQueues {
    queues: [VecDeque<Command>; 2],
    next: usize,
}

impl InboundQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queues[command.player.index()].push_back(command);
    }

    /// Next command in round-robin order.
    pub fn pop(&mut self) -> Option<Command> {
        for offset in 0..2 {
            let index = (self.next + offset) % 2;
            if let Some(command) = self.queues[index].pop_front() {
                self.next = (index + 1) % 2;
                return Some(command);
            }
        }
        None
    }

    pub fn len_for(&self, player: PlayerId) -> usize {
        self.queues[player.index()].len()
    }

    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.queues.iter_mut().for_each(VecDeque::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_players_and_keeps_each_fifo() {
        let mut queues = InboundQueues::new();
        queues.push(Command::end_phase(1, PlayerId::One));
        queues.push(Command::end_phase(2, PlayerId::One));
        queues.push(Command::end_phase(3, PlayerId::One));
        queues.push(Command::end_phase(10, PlayerId::Two));

        let order: Vec<u64> = std::iter::from_fn(|| queues.pop()).map(|c| c.id.0).collect();
        assert_eq!(order, vec![1, 10, 2, 3]);
        assert!(queues.is_empty());
    }

    #[test]
    fn counts_per_player() {
        let mut queues = InboundQueues::new();
        queues.push(Command::end_phase(1, PlayerId::Two));
        assert_eq!(queues.len_for(PlayerId::Two), 1);
        assert_eq!(queues.len_for(PlayerId::One), 0);
        queues.clear();
        assert_eq!(queues.len(), 0);
    }
}
