use crc32fast::Hasher;

/// Generate a document id from a scene name using CRC32
pub fn get_document_id(name: &str) -> String {
    let mut buff = String::from(name);
    if !name.starts_with("scene://") {
        buff = format!("scene://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for scene nodes within a document
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String, // Document ID (CRC32)
    count: u32,   // Sequential counter
}

impl IDGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_document_id(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past an id minted by this seed, so that ids
    /// loaded from a saved scene are never handed out again.
    pub fn observe(&mut self, id: &str) {
        let Some(rest) = id.strip_prefix(self.seed.as_str()) else {
            return;
        };
        let Some(number) = rest.strip_prefix('-') else {
            return;
        };
        if let Ok(n) = number.parse::<u32>() {
            self.count = self.count.max(n);
        }
    }

    /// Get document ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("landing");
        let id2 = get_document_id("landing");

        // Same name always generates same ID
        assert_eq!(id1, id2);

        // Different names generate different IDs
        let id3 = get_document_id("checkout");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::new("test");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id3.ends_with("-3"));

        let seed = gen.seed();
        assert!(id1.starts_with(seed));
        assert!(id3.starts_with(seed));
    }

    #[test]
    fn test_observe_skips_loaded_ids() {
        let mut gen = IDGenerator::from_seed("abc".to_string());
        gen.observe("abc-41");
        gen.observe("abc-7");
        gen.observe("other-99");
        gen.observe("abc-not-a-number");

        assert_eq!(gen.new_id(), "abc-42");
    }
}
