use std::fmt;

use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5ce1_7a3e_0f1b_9d27;

/// Stable 128-bit digest of a compiled timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimelineFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl fmt::Display for TimelineFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    /// Hash a JSON value; object keys are visited in sorted order.
    pub(crate) fn write_json(&mut self, v: &serde_json::Value) {
        use serde_json::Value;
        match v {
            Value::Null => self.write_u8(0),
            Value::Bool(x) => {
                self.write_u8(1);
                self.write_u8(u8::from(*x));
            }
            Value::Number(n) => {
                self.write_u8(2);
                self.write_str(&n.to_string());
            }
            Value::String(s) => {
                self.write_u8(3);
                self.write_str(s);
            }
            Value::Array(items) => {
                self.write_u8(4);
                self.write_u64(items.len() as u64);
                for item in items {
                    self.write_json(item);
                }
            }
            Value::Object(map) => {
                self.write_u8(5);
                let mut keys = map.keys().collect::<Vec<_>>();
                keys.sort();
                self.write_u64(keys.len() as u64);
                for k in keys {
                    self.write_str(k);
                    self.write_json(&map[k]);
                }
            }
        }
    }

    pub(crate) fn finish(self) -> TimelineFingerprint {
        let v = self.inner.digest128();
        TimelineFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
