use chaosperm::{decompose, ChaosKey, ChaoticMap, ImageBuffer, ImageCipher, ImageKey, TextCipher};

fn main() -> chaosperm::Result<()> {
    let key = ChaosKey::new(ChaoticMap::logistic(), 0.1);
    let perm = key.permutation(10)?;
    println!("Key: {key}");
    println!("Permutation: {perm}");
    println!("Order: {}", decompose(&perm).order());

    let cipher = TextCipher::new(key);
    let message = "Hello, world!";
    let ciphertext = cipher.encrypt(message)?;
    println!("Message: {message}");
    println!("Ciphertext: {ciphertext}");
    println!("Decrypted: {}", cipher.decrypt(&ciphertext)?);

    let image = ImageBuffer::from_rows(&[[1u8, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]])?;
    let cipher = ImageCipher::new(ImageKey {
        rows: Some(ChaosKey::new(ChaoticMap::tent(), 0.2)),
        columns: Some(ChaosKey::new(ChaoticMap::logistic(), 0.3)),
        pixels: Some(ChaosKey::new(ChaoticMap::chebyshev(), 0.45)),
    });
    let encrypted = cipher.encrypt(&image)?;
    println!("Image: {}", hex::encode(image.as_bytes()));
    println!("Encrypted image: {}", hex::encode(encrypted.as_bytes()));
    println!("Decrypted image: {}", hex::encode(cipher.decrypt(&encrypted)?.as_bytes()));
    Ok(())
}
