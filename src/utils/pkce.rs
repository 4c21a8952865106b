use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};

pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

pub fn generate() -> PkcePair {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);

    let verifier = hex::encode(bytes);
    let challenge = challenge_for(&verifier);

    PkcePair {
        verifier,
        challenge,
    }
}

/// S256 code challenge: unpadded base64url of the verifier's SHA-256.
pub fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_is_unpadded_base64url_sha256() {
        assert_eq!(
            challenge_for("dBjftJeZ4CVP-mJ92K9TXbtRJcNKfCXUm7sDcZVfUpw"),
            "GFIETRHnuYVFZm3IghGNYsXxZxYbFudGUhhtomdRV6M"
        );
    }

    #[test]
    fn generated_pair_is_consistent() {
        let pair = generate();

        assert_eq!(pair.verifier.len(), 64);
        assert!(pair.verifier.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(pair.challenge, challenge_for(&pair.verifier));
        assert_ne!(generate().verifier, pair.verifier);
    }
}
