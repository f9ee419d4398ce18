//! Held-key tracking for the locomotion controller.
//!
//! Platform code forwards raw key identifiers; they are normalized into
//! [`LogicalKey`]s and kept in an [`InputState`] that the integrator reads
//! once per frame.

/// A logical control key, independent of the physical binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// Move along the current facing.
    Forward,
    /// Back up at a reduced speed.
    Backward,
    /// Turn counter-clockwise (positive yaw).
    Left,
    /// Turn clockwise (negative yaw).
    Right,
    /// Use the boost speed while held.
    Boost,
    /// Leave the current mount. Edge-triggered, never held.
    Dismount,
}

impl LogicalKey {
    /// Every logical key, in bit order.
    pub const ALL: [LogicalKey; 6] = [
        LogicalKey::Forward,
        LogicalKey::Backward,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Boost,
        LogicalKey::Dismount,
    ];

    /// Normalize a platform key identifier (`"w"`, `"ArrowUp"`, `" "`,
    /// `"Escape"`, ...). Matching is case-insensitive.
    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::binding(name).map(|(key, _)| key)
    }

    /// Like [`from_key_name`](Self::from_key_name), also returning which
    /// physical key produced it. `"w"` and `"ArrowUp"` are both
    /// [`Forward`](Self::Forward) but are separate sources.
    pub fn binding(name: &str) -> Option<(Self, KeySource)> {
        let binding = match name.to_ascii_lowercase().as_str() {
            "w" => (LogicalKey::Forward, KeySource::LETTER),
            "arrowup" => (LogicalKey::Forward, KeySource::ARROW),
            "s" => (LogicalKey::Backward, KeySource::LETTER),
            "arrowdown" => (LogicalKey::Backward, KeySource::ARROW),
            "a" => (LogicalKey::Left, KeySource::LETTER),
            "arrowleft" => (LogicalKey::Left, KeySource::ARROW),
            "d" => (LogicalKey::Right, KeySource::LETTER),
            "arrowright" => (LogicalKey::Right, KeySource::ARROW),
            // Different names for the same physical key.
            " " | "space" | "spacebar" => (LogicalKey::Boost, KeySource::LETTER),
            "escape" | "esc" => (LogicalKey::Dismount, KeySource::LETTER),
            _ => return None,
        };
        Some(binding)
    }

    /// Whether the host should cancel the platform's default action for
    /// this key (page scrolling in a browser).
    pub fn suppresses_default(self) -> bool {
        !matches!(self, LogicalKey::Dismount)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Physical key behind a logical key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeySource(u8);

impl KeySource {
    /// Letter key (WASD) or the only key of its action.
    pub const LETTER: KeySource = KeySource(0);
    /// Arrow key.
    pub const ARROW: KeySource = KeySource(1);
    /// Press that arrived already normalized, with no physical key.
    pub const LOGICAL: KeySource = KeySource(7);

    fn bit(self) -> u8 {
        1 << self.0
    }
}

/// Set of currently held logical keys.
///
/// A logical key stays held while any of its sources is down, so letting go
/// of `"w"` keeps moving if `"ArrowUp"` is still pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    sources: [u8; LogicalKey::ALL.len()],
}

impl InputState {
    /// Mark a key as held. Returns `true` if it was not already held.
    pub fn press(&mut self, key: LogicalKey) -> bool {
        self.press_from(key, KeySource::LOGICAL)
    }

    /// Mark a key as held by one physical source. Returns `true` if the
    /// logical key was not already held.
    pub fn press_from(&mut self, key: LogicalKey, source: KeySource) -> bool {
        let newly = !self.is_held(key);
        self.sources[key.index()] |= source.bit();
        newly
    }

    /// Mark a key as released, whichever sources held it.
    pub fn release(&mut self, key: LogicalKey) {
        self.sources[key.index()] = 0;
    }

    /// Release one physical source. The key stays held if another source
    /// still holds it.
    pub fn release_from(&mut self, key: LogicalKey, source: KeySource) {
        self.sources[key.index()] &= !source.bit();
    }

    /// Check whether a key is held.
    pub fn is_held(&self, key: LogicalKey) -> bool {
        self.sources[key.index()] != 0
    }

    /// Release every key.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether no key is held.
    pub fn is_empty(&self) -> bool {
        self.sources.iter().all(|&bits| bits == 0)
    }

    /// Iterate over the held keys.
    pub fn held(self) -> impl Iterator<Item = LogicalKey> {
        LogicalKey::ALL.into_iter().filter(move |k| self.is_held(*k))
    }
}
