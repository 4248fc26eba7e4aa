//! Identifier allocation for nodes, styles, and image hashes.
//!
//! Node ids follow the host's `"{major}:{minor}"` scheme and are fully
//! deterministic: given the same sequence of creation calls, the same
//! ids come out. Style ids and image hashes are 40-character tokens
//! drawn from a seeded generator, so they too are reproducible within a
//! session while still looking like the host's opaque keys.

use crate::Guid;
use serde::{Deserialize, Serialize};

/// Fixed id of the document root node.
pub const ROOT_ID: &str = "0:0";

/// Fixed id of the default page created with every session.
pub const FIRST_PAGE_ID: &str = "0:1";

/// Allocates `"{major}:{minor}"` node ids.
///
/// The two counters are independent: `minor` is incremented before
/// every allocation, page allocations emit `"{major}:1"` and then bump
/// `major`. The root (`"0:0"`) and the default page (`"0:1"`) are
/// seeded outside the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdAllocator {
    major: u64,
    minor: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { major: 1, minor: 1 }
    }
}

impl IdAllocator {
    /// Create an allocator in its initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next node id.
    ///
    /// `bump_major` is set for page creation only.
    pub fn allocate(&mut self, bump_major: bool) -> Guid {
        self.minor += 1;
        if bump_major {
            let id = format!("{}:1", self.major);
            self.major += 1;
            id
        } else {
            format!("{}:{}", self.major, self.minor)
        }
    }
}

const TOKEN_LEN: usize = 40;
const TOKEN_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Deterministic stream of opaque 40-character tokens.
///
/// The host uses random tokens here; the simulator keeps a splitmix64
/// state per session instead so that test runs are reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGenerator {
    state: u64,
}

impl TokenGenerator {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        // splitmix64
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Produce the next 40-character token.
    pub fn token(&mut self) -> String {
        let mut out = String::with_capacity(TOKEN_LEN);
        let mut bits = 0u64;
        let mut available = 0u32;
        for _ in 0..TOKEN_LEN {
            if available < 6 {
                bits = self.next_u64();
                available = 64;
            }
            out.push(TOKEN_ALPHABET[(bits & 0x3f) as usize] as char);
            bits >>= 6;
            available -= 6;
        }
        out
    }

    /// Produce a style id: `"S:" + token + ","`.
    ///
    /// The trailing comma is how the host formats these ids; it is kept
    /// verbatim because downstream tests assert on the 43-byte length.
    pub fn style_id(&mut self) -> String {
        format!("S:{},", self.token())
    }

    /// Produce an image content hash (a bare token).
    pub fn image_hash(&mut self) -> String {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_allocations_follow_seeded_page() {
        let mut alloc = IdAllocator::new();
        // Root "0:0" and the first page "0:1" are seeded, so the first
        // two non-page allocations are rectangles on page one.
        assert_eq!(alloc.allocate(false), "1:2");
        assert_eq!(alloc.allocate(false), "1:3");
    }

    #[test]
    fn page_ids_increment_major() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.allocate(true), "1:1");
        assert_eq!(alloc.allocate(true), "2:1");
        assert_eq!(alloc.allocate(true), "3:1");
    }

    #[test]
    fn minor_keeps_counting_across_major_bumps() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.allocate(false), "1:2");
        assert_eq!(alloc.allocate(false), "1:3");
        assert_eq!(alloc.allocate(true), "1:1");
        assert_eq!(alloc.allocate(false), "2:5");
        assert_eq!(alloc.allocate(false), "2:6");
    }

    #[test]
    fn style_id_shape() {
        let mut tokens = TokenGenerator::new(7);
        let id = tokens.style_id();
        assert_eq!(id.len(), 43);
        assert!(id.starts_with("S:"));
        assert!(id.ends_with(','));
    }

    #[test]
    fn tokens_are_deterministic_per_seed() {
        let mut a = TokenGenerator::new(42);
        let mut b = TokenGenerator::new(42);
        assert_eq!(a.token(), b.token());
        assert_eq!(a.token(), b.token());
    }

    #[test]
    fn tokens_differ_within_a_stream() {
        let mut tokens = TokenGenerator::new(1);
        assert_ne!(tokens.token(), tokens.token());
    }

    #[test]
    fn image_hash_is_bare_token() {
        let mut tokens = TokenGenerator::new(3);
        let hash = tokens.image_hash();
        assert_eq!(hash.len(), 40);
        assert!(!hash.contains(':'));
    }
}
