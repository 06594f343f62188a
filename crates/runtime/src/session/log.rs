//! Execution log of processed commands.
//!
//! Every command the session handles is recorded with the turn and phase it
//! arrived in and whether the engine accepted it. The log keeps the most
//! recent entries up to its capacity and can be exported as JSON lines for
//! offline inspection.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tactics_core::{
    Command, CommandOutcome, CommandRejection, ErrorContext, GameError, Phase,
};

use crate::api::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LogOutcome {
    Accepted {
        outcome: CommandOutcome,
    },
    Rejected {
        code: &'static str,
        reason: String,
        context: ErrorContext,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Position in processing order, starting at 0.
    pub sequence: u64,
    pub turn: u32,
    pub phase: Phase,
    pub command: Command,
    pub outcome: LogOutcome,
}

impl LogEntry {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, LogOutcome::Accepted { .. })
    }
}

/// In-memory command log. A disabled log accepts records and drops them.
///
/// Once `capacity` entries are held, each new entry evicts the oldest.
/// Sequence numbers keep counting across evictions.
#[derive(Debug)]
pub struct CommandLog {
    entries: VecDeque<LogEntry>,
    next_sequence: u64,
    capacity: usize,
    enabled: bool,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new(false)
    }
}

impl CommandLog {
    pub const DEFAULT_CAPACITY: usize = 4096;

    pub fn new(enabled: bool) -> Self {
        Self::with_capacity(enabled, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(enabled: bool, capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            next_sequence: 0,
            capacity: capacity.max(1),
            enabled,
        }
    }

    pub fn record_accepted(&mut self, turn: u32, phase: Phase, command: &Command, outcome: CommandOutcome) {
        self.push(turn, phase, command, LogOutcome::Accepted { outcome });
    }

    pub fn record_rejected(
        &mut self,
        turn: u32,
        phase: Phase,
        command: &Command,
        rejection: &CommandRejection,
    ) {
        let mut context = ErrorContext::new(turn);
        if let Some(unit) = command.kind.unit() {
            context = context.with_unit(unit);
        }
        if let Some(position) = command.kind.target() {
            context = context.with_position(position);
        }
        let outcome = LogOutcome::Rejected {
            code: rejection.error_code(),
            reason: rejection.to_string(),
            context,
        };
        self.push(turn, phase, command, outcome);
    }

    fn push(&mut self, turn: u32, phase: Phase, command: &Command, outcome: LogOutcome) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        if !self.enabled {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            sequence,
            turn,
            phase,
            command: command.clone(),
            outcome,
        });
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|entry| !entry.is_accepted())
    }

    /// Writes one JSON object per line.
    pub fn write_json_lines(&self, path: &Path) -> Result<()> {
        let io_error = |source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        for entry in &self.entries {
            serde_json::to_writer(&mut writer, entry)?;
            writer.write_all(b"\n").map_err(io_error)?;
        }
        writer.flush().map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{GridPosition, PlayerId, UnitId};

    fn rejection() -> CommandRejection {
        CommandRejection::UnitNotFound(UnitId(9))
    }

    #[test]
    fn rejections_carry_unit_and_target_context() {
        let mut log = CommandLog::new(true);
        let command = Command::move_unit(4, PlayerId::One, UnitId(9), GridPosition::new(3, 1));
        log.record_rejected(2, Phase::MovementPhase, &command, &rejection());

        let entry = &log.entries()[0];
        let LogOutcome::Rejected { code, context, .. } = &entry.outcome else {
            panic!("expected a rejection");
        };
        assert_eq!(*code, "COMMAND_UNIT_NOT_FOUND");
        assert_eq!(context.turn, 2);
        assert_eq!(context.unit, Some(UnitId(9)));
        assert_eq!(context.position, Some(GridPosition::new(3, 1)));
    }

    #[test]
    fn disabled_log_still_advances_sequence() {
        let mut log = CommandLog::new(false);
        let command = Command::end_phase(1, PlayerId::Two);
        log.record_rejected(1, Phase::AuraPhase1A, &command, &rejection());
        assert!(log.is_empty());
        assert_eq!(log.next_sequence, 1);
    }

    #[test]
    fn full_log_evicts_oldest_and_keeps_counting() {
        let mut log = CommandLog::with_capacity(true, 3);
        let command = Command::end_phase(1, PlayerId::Two);
        for _ in 0..5 {
            log.record_rejected(1, Phase::AuraPhase1A, &command, &rejection());
        }

        assert_eq!(log.len(), 3);
        let sequences: Vec<u64> = log.entries().iter().map(|entry| entry.sequence).collect();
        assert_eq!(sequences, vec![2, 3, 4]);
        assert_eq!(log.next_sequence, 5);
    }

    #[test]
    fn exports_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.jsonl");

        let mut log = CommandLog::new(true);
        let command = Command::end_phase(1, PlayerId::Two);
        log.record_rejected(1, Phase::AuraPhase1A, &command, &rejection());
        log.record_rejected(1, Phase::AuraPhase1A, &command, &rejection());
        log.write_json_lines(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["outcome"]["result"], "rejected");
        assert_eq!(first["sequence"], 0);
    }
}
