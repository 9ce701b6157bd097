use chaosperm::{decompose, ChaosKey};
use serde::Serialize;

const TEST_VECTOR_KEYS: [&str; 4] = [
    "logistic:3.99@0.1",
    "chebyshev:3@0.25",
    "tent:1.99@0.1",
    "tent:1.99@0.37",
];
const TEST_VECTOR_SIZES: [usize; 3] = [1, 10, 64];
const TEST_VECTOR_OUTPUT_FILE: &str = "test_vectors/permutation_vectors.json";

#[derive(Serialize)]
struct TestVector {
    key: String,
    size: usize,
    permutation: Vec<usize>,
    order: String,
    keystream: String,
}

fn main() -> anyhow::Result<()> {
    println!("Generating test vectors...");
    let mut test_vectors = Vec::new();
    for compact in TEST_VECTOR_KEYS {
        let key: ChaosKey = compact.parse()?;
        for size in TEST_VECTOR_SIZES {
            let perm = key.permutation(size)?;
            test_vectors.push(TestVector {
                key: key.to_string(),
                size,
                order: decompose(&perm).order().to_string(),
                permutation: perm.into_vec(),
                keystream: hex::encode(key.keystream(size)?),
            });
        }
    }
    let test_vectors_json = serde_json::to_string_pretty(&test_vectors)?;
    println!("{}", test_vectors_json);
    std::fs::create_dir_all("test_vectors")?;
    std::fs::write(TEST_VECTOR_OUTPUT_FILE, test_vectors_json)?;
    println!("Test vectors written to {}", TEST_VECTOR_OUTPUT_FILE);
    Ok(())
}
