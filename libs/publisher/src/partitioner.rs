// ═══════════════════════════════════════════════════════════════
//  Hash partitioner
// ═══════════════════════════════════════════════════════════════

/// FNV-1a (32 bit) по ключу, остаток от числа партиций. Сообщения без
/// ключа уходят в случайную партицию.
pub struct HashPartitioner {
    rng: Rng,
}

impl HashPartitioner {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }

    /// Выбрать партицию из `partitions` (id в порядке возрастания).
    /// None если у topic'а нет партиций.
    pub fn partition(&mut self, key: Option<&[u8]>, partitions: &[i32]) -> Option<i32> {
        if partitions.is_empty() {
            return None;
        }
        let n = partitions.len();
        let idx = match key {
            Some(key) => {
                let p = (fnv1a_32(key) as i32) % n as i32;
                p.unsigned_abs() as usize
            }
            None => self.rng.next_intn(n),
        };
        Some(partitions[idx])
    }
}

fn fnv1a_32(key: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c9dc5;
    const PRIME: u32 = 0x01000193;
    key.iter()
        .fold(OFFSET_BASIS, |hash, byte| (hash ^ u32::from(*byte)).wrapping_mul(PRIME))
}

// ═══════════════════════════════════════════════════════════════
//  RNG (xorshift64)
// ═══════════════════════════════════════════════════════════════

struct Rng {
    state: u64,
}

impl Rng {
    /// seed 0 = текущее время.
    fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64
                | 1 // ensure non-zero
        } else {
            seed
        };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    fn next_intn(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9cf968);
    }

    #[test]
    fn keyed_is_deterministic() {
        let partitions = [0, 1, 2, 3, 4];
        let mut a = HashPartitioner::new(1);
        let mut b = HashPartitioner::new(99);
        for key in [&b"issue-1"[..], b"issue-2", b"", b"\xff\xfe"] {
            let pa = a.partition(Some(key), &partitions);
            assert_eq!(pa, b.partition(Some(key), &partitions));
            assert_eq!(pa, a.partition(Some(key), &partitions));
        }
    }

    #[test]
    fn keyed_negative_hash_is_folded() {
        // fnv1a("a") = 0xe40c292c, отрицательный как i32.
        let partitions = [10, 11, 12];
        let expected = ((0xe40c292cu32 as i32) % 3).unsigned_abs() as usize;
        let mut p = HashPartitioner::new(1);
        assert_eq!(p.partition(Some(b"a"), &partitions), Some(partitions[expected]));
    }

    #[test]
    fn unkeyed_stays_in_range() {
        let partitions = [3, 5, 8];
        let mut p = HashPartitioner::new(42);
        for _ in 0..100 {
            let got = p.partition(None, &partitions).unwrap();
            assert!(partitions.contains(&got));
        }
    }

    #[test]
    fn no_partitions() {
        let mut p = HashPartitioner::new(1);
        assert_eq!(p.partition(None, &[]), None);
        assert_eq!(p.partition(Some(b"k"), &[]), None);
    }
}
