// Move journal for offline replay
//
// Fire-and-forget JSONL export: the scheduler hands entries to a background writer thread and never
// waits on disk. The first write failure is logged and disables the journal for good.

use log::error;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::JournalConfig;
use crate::strategy::StrategyName;
use crate::types::{GameMove, Graph, Role, VertexId};

/// One line of the journal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    RoundStart {
        player: String,
        role: Role,
        width: i32,
        height: i32,
        vertices: usize,
        edges: Vec<(u32, u32)>,
        timestamp: String,
    },
    Move {
        /// Role of the journaling player in this round
        round_role: Role,
        /// Who placed the vertex
        actor: Role,
        vertex: VertexId,
        x: i32,
        y: i32,
        /// Only set for the journaling player's own moves
        strategy: Option<String>,
        quality: Option<u64>,
        elapsed_ms: Option<f64>,
        timestamp: String,
    },
}

impl JournalEntry {
    pub fn round_start(player: &str, role: Role, graph: &Graph, width: i32, height: i32) -> Self {
        JournalEntry::RoundStart {
            player: player.to_string(),
            role,
            width,
            height,
            vertices: graph.vertex_count(),
            edges: graph.edge_pairs(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn own_move(
        role: Role,
        mv: &GameMove,
        strategy: StrategyName,
        quality: u64,
        elapsed: Duration,
    ) -> Self {
        JournalEntry::Move {
            round_role: role,
            actor: role,
            vertex: mv.vertex,
            x: mv.coord.x,
            y: mv.coord.y,
            strategy: Some(strategy.as_str().to_string()),
            quality: Some(quality),
            elapsed_ms: Some(elapsed.as_secs_f64() * 1000.0),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn opponent_move(role: Role, mv: &GameMove) -> Self {
        JournalEntry::Move {
            round_role: role,
            actor: role.opponent(),
            vertex: mv.vertex,
            x: mv.coord.x,
            y: mv.coord.y,
            strategy: None,
            quality: None,
            elapsed_ms: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type SharedSender = Arc<Mutex<Option<Sender<JournalEntry>>>>;

/// Cheap to clone; clones feed the same writer
#[derive(Clone)]
pub struct Journal {
    sender: SharedSender,
    writer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Journal {
    /// Creates a disabled journal (no-op)
    pub fn disabled() -> Self {
        Journal {
            sender: Arc::new(Mutex::new(None)),
            writer: Arc::new(Mutex::new(None)),
        }
    }

    /// Journal file for one player, named after the player and the current time
    pub fn for_player(config: &JournalConfig, player: &str) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let path = Path::new(&config.directory).join(format!("{}-{}.jsonl", player, stamp));
        Self::open(path)
    }

    /// Truncates or creates `path` and starts the writer.
    /// Failing to open the file yields a disabled journal.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(dir) {
                error!("Failed to create journal directory '{}': {}", dir.display(), e);
                return Self::disabled();
            }
        }
        let file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) => {
                error!("Failed to create journal file '{}': {}", path.display(), e);
                return Self::disabled();
            }
        };

        let (tx, rx) = mpsc::channel();
        let sender: SharedSender = Arc::new(Mutex::new(Some(tx)));
        let writer_sender = Arc::clone(&sender);
        let spawned = thread::Builder::new()
            .name("journal-writer".into())
            .spawn(move || Self::write_loop(file, rx, writer_sender));

        match spawned {
            Ok(handle) => {
                log::info!("Move journal enabled: {}", path.display());
                Journal {
                    sender,
                    writer: Arc::new(Mutex::new(Some(handle))),
                }
            }
            Err(e) => {
                error!("Failed to start journal writer: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Queues an entry without waiting for the write
    pub fn record(&self, entry: JournalEntry) {
        let mut guard = self.sender.lock();
        if let Some(tx) = guard.as_ref() {
            if tx.send(entry).is_err() {
                *guard = None;
            }
        }
    }

    /// Stops accepting entries and waits until everything queued is on disk
    pub fn close(&self) {
        self.sender.lock().take();
        if let Some(handle) = self.writer.lock().take() {
            if handle.join().is_err() {
                error!("Journal writer panicked");
            }
        }
    }

    fn write_loop(file: File, rx: Receiver<JournalEntry>, sender: SharedSender) {
        let mut out = BufWriter::new(file);
        for entry in rx {
            let written = serde_json::to_writer(&mut out, &entry)
                .map_err(std::io::Error::from)
                .and_then(|_| out.write_all(b"\n"))
                .and_then(|_| out.flush());
            if let Err(e) = written {
                error!("Failed to write journal entry, disabling journal: {}", e);
                sender.lock().take();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;
    use std::io::{BufRead, BufReader};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rtree-journal-{}-{}.jsonl", name, std::process::id()))
    }

    #[test]
    fn test_disabled_journal_is_noop() {
        let journal = Journal::disabled();
        assert!(!journal.is_enabled());
        journal.record(JournalEntry::opponent_move(
            Role::Max,
            &GameMove::new(VertexId(0), Coord::new(0, 0)),
        ));
        journal.close();
    }

    #[test]
    fn test_entries_are_written_as_jsonl() {
        let path = temp_path("write");
        let journal = Journal::open(&path);
        assert!(journal.is_enabled());

        let graph = Graph::cycle(3);
        journal.record(JournalEntry::round_start("p1", Role::Max, &graph, 4, 4));
        let mv = GameMove::new(VertexId(1), Coord::new(2, 3));
        journal.record(JournalEntry::own_move(
            Role::Max,
            &mv,
            StrategyName::RandomMove,
            7,
            Duration::from_millis(3),
        ));
        journal.record(JournalEntry::opponent_move(Role::Max, &mv));
        journal.close();

        let lines: Vec<String> = BufReader::new(File::open(&path).unwrap())
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"kind\":\"round_start\""));

        let second: JournalEntry = serde_json::from_str(&lines[1]).unwrap();
        match second {
            JournalEntry::Move {
                actor,
                vertex,
                x,
                y,
                strategy,
                quality,
                ..
            } => {
                assert_eq!(actor, Role::Max);
                assert_eq!(vertex, VertexId(1));
                assert_eq!((x, y), (2, 3));
                assert_eq!(strategy.as_deref(), Some("random_move"));
                assert_eq!(quality, Some(7));
            }
            other => panic!("unexpected entry {:?}", other),
        }

        let third: JournalEntry = serde_json::from_str(&lines[2]).unwrap();
        assert!(matches!(third, JournalEntry::Move { actor: Role::Min, strategy: None, .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_disables_journal() {
        let dir = temp_path("dir-as-file");
        fs::create_dir_all(&dir).unwrap();
        // Opening a directory as a file fails
        let journal = Journal::open(&dir);
        assert!(!journal.is_enabled());
        let _ = fs::remove_dir_all(&dir);
    }
}
