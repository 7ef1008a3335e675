//! Information set keys and legal-action masks.
//!
//! A key records, from the acting player's point of view, every move that
//! player made so far together with whether it succeeded. Each ply is a 5-bit
//! digit `2 * (action + 1) + outcome`, the oldest ply in the most significant
//! digit. The root key is 0 and the parent of a key is the key shifted right
//! by one digit, so `parent < child` holds numerically and an ascending sort
//! of keys is a parent-before-child order.

use std::fmt;

/// Maximum number of actions at any decision point.
pub const MAX_ACTIONS: usize = 9;

/// Player index, 0 or 1.
pub type Player = usize;

/// Bitmask over actions `0..9`; bit `j` set means action `j` is legal.
pub type ActionMask = u32;

/// Mask with all nine actions legal.
pub const FULL_MASK: ActionMask = (1 << MAX_ACTIONS) - 1;

const DIGIT_BITS: u32 = 5;
const DIGIT_MASK: u64 = (1 << DIGIT_BITS) - 1;

/// Most plies a key can record.
pub const MAX_DEPTH: usize = (u64::BITS / DIGIT_BITS) as usize;

/// Returns true if action `j` is set in `mask`.
#[inline]
pub fn is_legal(mask: ActionMask, j: usize) -> bool {
    mask & (1 << j) != 0
}

/// Iterates over the legal actions of `mask` in ascending order.
pub fn legal_actions(mask: ActionMask) -> impl Iterator<Item = usize> {
    (0..MAX_ACTIONS).filter(move |&j| is_legal(mask, j))
}

/// Identifier of one decision point of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InfosetKey(u64);

impl InfosetKey {
    /// Key of a player's first decision point.
    pub const ROOT: InfosetKey = InfosetKey(0);

    /// Wraps a raw encoded key.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw encoded value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns true for the root key.
    pub fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Key reached after playing `action` here with the given outcome.
    ///
    /// # Panics
    /// If `action` is not below [`MAX_ACTIONS`] or the key already records
    /// [`MAX_DEPTH`] plies.
    pub fn child(self, action: usize, success: bool) -> Self {
        assert!(action < MAX_ACTIONS, "action {} out of range", action);
        assert!(self.depth() < MAX_DEPTH, "infoset key is full ({} plies)", MAX_DEPTH);
        let digit = 2 * (action as u64 + 1) + success as u64;
        Self((self.0 << DIGIT_BITS) | digit)
    }

    /// Key of the previous decision point, `None` at the root.
    pub fn parent(self) -> Option<Self> {
        if self.is_root() {
            None
        } else {
            Some(Self(self.0 >> DIGIT_BITS))
        }
    }

    /// Action played at the parent to reach this key, `None` at the root.
    pub fn parent_action(self) -> Option<usize> {
        if self.is_root() {
            None
        } else {
            Some((((self.0 & DIGIT_MASK) >> 1) - 1) as usize)
        }
    }

    /// Number of plies recorded in the key.
    pub fn depth(self) -> usize {
        let bits = 64 - self.0.leading_zeros();
        bits.div_ceil(DIGIT_BITS) as usize
    }

    /// The recorded `(action, success)` plies, oldest first.
    pub fn plies(self) -> impl Iterator<Item = (usize, bool)> {
        let depth = self.depth();
        let raw = self.0;
        (0..depth).rev().map(move |k| {
            let digit = (raw >> (DIGIT_BITS as usize * k)) & DIGIT_MASK;
            (((digit >> 1) - 1) as usize, digit & 1 == 1)
        })
    }
}

impl fmt::Display for InfosetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (action, success) in self.plies() {
            write!(f, "{}{}", action, if success { '*' } else { '.' })?;
        }
        Ok(())
    }
}

/// Per-infoset data stored in a treeplex lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfosetMetadata {
    /// Legal actions at this infoset.
    pub legal_actions: ActionMask,
    /// Row of this infoset in every strategy buffer.
    pub infoset_id: u32,
}
