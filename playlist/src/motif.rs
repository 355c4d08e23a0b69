//! Deterministic note sequences for local playback.
//!
//! The local backend has no audio files, so each song is rendered as a short
//! looping motif whose notes are picked from a scale by a hash of its id.

use serde::{Deserialize, Serialize};

use crate::song::SongId;

// ════════════════════════════════════════════════════════════════════════════
// Scale
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scale {
    Major,
    Minor,
    PentatonicMajor,
    PentatonicMinor,
    Dorian,
}

impl Default for Scale {
    fn default() -> Self {
        Scale::PentatonicMajor
    }
}

impl Scale {
    /// Semitone offsets from the root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major           => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor           => &[0, 2, 3, 5, 7, 8, 10],
            Scale::PentatonicMajor => &[0, 2, 4, 7, 9],
            Scale::PentatonicMinor => &[0, 3, 5, 7, 10],
            Scale::Dorian          => &[0, 2, 3, 5, 7, 9, 10],
        }
    }

    /// Scale degree `d` above `root`, wrapping into higher octaves; clamped
    /// to the MIDI range.
    pub fn note_for(self, root: u8, d: usize) -> u8 {
        let iv = self.intervals();
        let octave = d / iv.len();
        let note = root as usize + octave * 12 + iv[d % iv.len()] as usize;
        note.min(127) as u8
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Motif
// ════════════════════════════════════════════════════════════════════════════

/// Notes per motif before it loops.
pub const MOTIF_LEN: usize = 16;

/// Two octaves of `scale` above `root`, ordered by the song's hash.
pub fn motif_for(id: &SongId, scale: Scale, root: u8) -> Vec<u8> {
    let span = scale.intervals().len() * 2;
    let mut state = fnv1a(id.as_str().as_bytes());
    (0..MOTIF_LEN)
        .map(|_| {
            state = xorshift(state);
            scale.note_for(root, (state % span as u64) as usize)
        })
        .collect()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}
