use std::{
    error::Error,
    fs::File,
    path::Path,
};

use merkleproof::{
    verify,
    Digest,
    MerkleTree,
    Proof,
    Sha256Hasher,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, thiserror::Error)]
enum TestError {
    #[error("Test failed {0}: {1}")]
    Failed(String, String),
    #[error("Failed to decode encoded value")]
    DecodingError,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
enum Encoding {
    Hex,
    #[serde(rename = "utf-8")]
    Utf8,
}

#[derive(Serialize, Deserialize, Clone)]
struct EncodedValue {
    value: String,
    encoding: Encoding,
}

impl EncodedValue {
    fn into_bytes(self) -> Result<Vec<u8>, TestError> {
        match self.encoding {
            Encoding::Hex => {
                hex::decode(self.value).map_err(|_| TestError::DecodingError)
            }
            Encoding::Utf8 => Ok(self.value.into_bytes()),
        }
    }
}

/// A proof in wire format, the leaf it is checked for, and the expected
/// outcome. When `leaves` is present the tree is rebuilt and must produce the
/// same root and the same encoded proof.
#[derive(Serialize, Deserialize)]
struct ProofTest {
    name: String,
    #[allow(dead_code)]
    description: String,
    #[serde(default)]
    leaves: Option<Vec<EncodedValue>>,
    root: EncodedValue,
    proof: EncodedValue,
    data: EncodedValue,
    expected_verification: bool,
    #[serde(default)]
    expected_error: Option<String>,
}

impl ProofTest {
    fn execute(self) -> Result<(), TestError> {
        let root = Digest::from(self.root.into_bytes()?);
        let encoded_proof = self.proof.into_bytes()?;
        let data = self.data.into_bytes()?;
        let hasher = Sha256Hasher::new();

        if let Some(leaves) = self.leaves {
            let leaves = leaves
                .into_iter()
                .map(EncodedValue::into_bytes)
                .collect::<Result<Vec<_>, _>>()?;
            check_tree(&self.name, hasher, &leaves, &root, &encoded_proof)?;
        }

        let outcome = Proof::from_bytes(&encoded_proof)
            .and_then(|proof| verify(&data, &proof, &root, &hasher));

        match (outcome, self.expected_error) {
            (Ok(verification), None) => {
                let expected_verification = self.expected_verification;
                if verification != expected_verification {
                    return Err(TestError::Failed(
                        self.name,
                        format!(
                            "Verification {verification} does not match expected verification {expected_verification}",
                        ),
                    ))
                }
                Ok(())
            }
            (Err(error), Some(expected_error)) => {
                let error = error.to_string();
                if error != expected_error {
                    return Err(TestError::Failed(
                        self.name,
                        format!(
                            "Error \"{error}\" does not match expected error \"{expected_error}\"",
                        ),
                    ))
                }
                Ok(())
            }
            (Ok(verification), Some(expected_error)) => Err(TestError::Failed(
                self.name,
                format!(
                    "Verification {verification} where error \"{expected_error}\" was expected",
                ),
            )),
            (Err(error), None) => Err(TestError::Failed(self.name, error.to_string())),
        }
    }
}

// The tree rebuilt from `leaves` must commit to `root` and encode the same proof.
fn check_tree(
    name: &str,
    hasher: Sha256Hasher,
    leaves: &[Vec<u8>],
    root: &Digest,
    encoded_proof: &[u8],
) -> Result<(), TestError> {
    let failed = |reason: String| TestError::Failed(name.to_string(), reason);

    let tree = MerkleTree::new(hasher, leaves).map_err(|e| failed(e.to_string()))?;
    if tree.root() != root {
        return Err(failed(format!(
            "Root {} does not match expected root {root}",
            tree.root()
        )))
    }

    let proof = Proof::from_bytes(encoded_proof).map_err(|e| failed(e.to_string()))?;
    let regenerated = tree
        .prove(proof.leaf_index())
        .and_then(|proof| proof.to_bytes())
        .map_err(|e| failed(e.to_string()))?;
    if regenerated != encoded_proof {
        return Err(failed(format!(
            "Proof {} does not match expected proof {}",
            hex::encode(regenerated),
            hex::encode(encoded_proof)
        )))
    }
    Ok(())
}

fn test(path: &Path) -> datatest_stable::Result<()> {
    let data_file = File::open(path)?;
    let test: ProofTest = serde_yaml::from_reader(data_file)?;
    test.execute().map_err(|e| Box::new(e) as Box<dyn Error>)
}

datatest_stable::harness!(test, "./tests-data-binary/fixtures", r"^.*\.yaml$");
