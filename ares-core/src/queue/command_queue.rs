//! Ordered instruction queue with monotonic completion tracking
//!
//! The controller echoes the kind of every tracked instruction it
//! finishes. Completion is matched by kind, scanning from the head, so an
//! echo for an instruction discarded by a clear still resolves cleanly.
//!
//! Two counters make completion observable without holding on to queue
//! entries: `id_counter` counts every tracked instruction ever appended
//! and `last_deleted_id` counts every tracked instruction ever completed
//! or discarded. Ids are handed out 1-based, so id `n` is done exactly
//! when `last_deleted_id >= n`.

use heapless::Vec;

use ares_protocol::{CommandKind, Instruction, TrackedCommand, UntrackedCommand};

/// Maximum queued instructions
pub const QUEUE_CAPACITY: usize = 32;

/// Identifier of a tracked instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandId(pub u32);

impl CommandId {
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Queue operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// No room for another instruction
    Full,
    /// Tracked instructions may only be appended
    TrackedInsert,
    /// Insert position past the end of the queue
    IndexOutOfRange,
    /// Insert would displace the in-flight head
    HeadInFlight,
}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Full => write!(f, "command queue is full"),
            Self::TrackedInsert => write!(f, "tracked instructions cannot be inserted"),
            Self::IndexOutOfRange => write!(f, "insert index out of range"),
            Self::HeadInFlight => write!(f, "cannot insert ahead of the in-flight instruction"),
        }
    }
}

impl std::error::Error for QueueError {}

/// A queue entry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueuedInstruction {
    pub instruction: Instruction,
    /// Set for tracked instructions only
    pub id: Option<CommandId>,
}

/// Pending controller instructions
#[derive(Debug, Clone)]
pub struct CommandQueue {
    entries: Vec<QueuedInstruction, QUEUE_CAPACITY>,
    /// Head has been sent and awaits its completion echo
    head_in_flight: bool,
    id_counter: u32,
    last_deleted_id: u32,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            head_in_flight: false,
            id_counter: 0,
            last_deleted_id: 0,
        }
    }

    /// Append an instruction, optionally clearing the queue first
    ///
    /// Returns the id for tracked instructions. Call
    /// [`next_dispatch`](Self::next_dispatch) afterwards to learn what must
    /// be sent.
    pub fn append(
        &mut self,
        instruction: impl Into<Instruction>,
        clear_first: bool,
    ) -> Result<Option<CommandId>, QueueError> {
        let instruction = instruction.into();
        if clear_first {
            self.clear();
        }

        let id = instruction
            .is_tracked()
            .then(|| CommandId(self.id_counter + 1));
        self.entries
            .push(QueuedInstruction { instruction, id })
            .map_err(|_| QueueError::Full)?;
        if id.is_some() {
            self.id_counter += 1;
        }
        Ok(id)
    }

    /// Append a tracked instruction
    pub fn append_tracked(
        &mut self,
        command: TrackedCommand,
        clear_first: bool,
    ) -> Result<CommandId, QueueError> {
        let id = self.append(command, clear_first)?;
        // Tracked instructions always receive an id
        Ok(id.unwrap_or(CommandId(self.id_counter)))
    }

    /// Append a fire-and-forget instruction
    pub fn append_untracked(
        &mut self,
        command: UntrackedCommand,
        clear_first: bool,
    ) -> Result<(), QueueError> {
        self.append(command, clear_first).map(|_| ())
    }

    /// Insert an untracked instruction at `index`
    pub fn insert(&mut self, index: usize, instruction: Instruction) -> Result<(), QueueError> {
        if instruction.is_tracked() {
            return Err(QueueError::TrackedInsert);
        }
        if index > self.entries.len() {
            return Err(QueueError::IndexOutOfRange);
        }
        if index == 0 && self.head_in_flight {
            return Err(QueueError::HeadInFlight);
        }
        self.entries
            .insert(index, QueuedInstruction { instruction, id: None })
            .map_err(|_| QueueError::Full)
    }

    /// Next instruction to put on the wire, if any
    ///
    /// An untracked head is removed as it is handed out. A tracked head is
    /// marked in flight and stays until its completion arrives. Call in a
    /// loop until it returns `None`.
    pub fn next_dispatch(&mut self) -> Option<Instruction> {
        let head = *self.entries.first()?;
        match head.instruction {
            Instruction::Untracked(_) => {
                self.entries.remove(0);
                Some(head.instruction)
            }
            Instruction::Tracked(_) if self.head_in_flight => None,
            Instruction::Tracked(_) => {
                self.head_in_flight = true;
                Some(head.instruction)
            }
        }
    }

    /// Undo the last tracked dispatch after the send failed
    ///
    /// The head stays queued and the next [`Self::next_dispatch`] hands it
    /// out again.
    pub fn release_head(&mut self) {
        self.head_in_flight = false;
    }

    /// Handle a completion echo for `kind`
    ///
    /// Removes every entry up to and including the first one of that kind.
    /// Returns the number of entries removed, zero when nothing matched.
    pub fn on_completion(&mut self, kind: CommandKind) -> usize {
        let Some(position) = self
            .entries
            .iter()
            .position(|entry| entry.instruction.kind() == kind)
        else {
            return 0;
        };

        let removed = position + 1;
        let tracked = self.entries[..removed]
            .iter()
            .filter(|entry| entry.id.is_some())
            .count();
        self.drop_front(removed);
        self.retire(tracked);
        self.head_in_flight = false;
        removed
    }

    /// Discard everything, counting discarded tracked entries as done
    pub fn clear(&mut self) {
        let tracked = self.entries.iter().filter(|entry| entry.id.is_some()).count();
        self.entries.clear();
        self.retire(tracked);
        self.head_in_flight = false;
    }

    /// Whether the tracked instruction `id` completed or was discarded
    pub fn is_completed(&self, id: CommandId) -> bool {
        self.last_deleted_id >= id.0
    }

    pub fn id_counter(&self) -> u32 {
        self.id_counter
    }

    pub fn last_deleted_id(&self) -> u32 {
        self.last_deleted_id
    }

    pub fn head_in_flight(&self) -> bool {
        self.head_in_flight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QueuedInstruction] {
        &self.entries
    }

    fn drop_front(&mut self, count: usize) {
        let remaining = self.entries.len() - count;
        for i in 0..remaining {
            self.entries[i] = self.entries[i + count];
        }
        self.entries.truncate(remaining);
    }

    fn retire(&mut self, tracked: usize) {
        // Never run past the ids actually handed out
        let advanced = self.last_deleted_id.saturating_add(tracked as u32);
        self.last_deleted_id = advanced.min(self.id_counter);
    }
}
