//! Spatial image cipher
//! ====================
//! Relabels pixel coordinates with two independent permutations: rows by
//! `perm_row` over `0..height`, columns by `perm_col` over `0..width`.
//!
//! * encrypt: `out[perm_row[i], perm_col[j], c] = img[i, j, c]`
//! * decrypt: `out[i, j, c] = img[perm_row[i], perm_col[j], c]`
//!
//! Both directions are written as a gather `out[i, j] = img[rows[i], cols[j]]`
//! (encrypt gathers through the inverse permutations), so every output row is
//! produced independently; with the `parallel` feature rows are filled by
//! Rayon.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::permutation::{check_len, Permutation};
use crate::raster::ImageBuffer;

pub fn encrypt(
    image: &ImageBuffer,
    perm_col: &Permutation,
    perm_row: &Permutation,
) -> Result<ImageBuffer> {
    check_axes(image, perm_col, perm_row)?;
    Ok(gather(image, &perm_row.inverse(), &perm_col.inverse()))
}

pub fn decrypt(
    image: &ImageBuffer,
    perm_col: &Permutation,
    perm_row: &Permutation,
) -> Result<ImageBuffer> {
    check_axes(image, perm_col, perm_row)?;
    Ok(gather(image, perm_row, perm_col))
}

fn check_axes(image: &ImageBuffer, perm_col: &Permutation, perm_row: &Permutation) -> Result<()> {
    check_len(perm_row.len(), image.height())?;
    check_len(perm_col.len(), image.width())
}

/// `out[i, j] = image[rows[i], cols[j]]` for whole pixels.
fn gather(image: &ImageBuffer, rows: &Permutation, cols: &Permutation) -> ImageBuffer {
    let channels = image.channels();
    let stride = image.width() * channels;
    let mut out = image.clone();

    let fill_row = |(i, out_row): (usize, &mut [u8])| {
        let src = image.row(rows[i]);
        for (j, out_px) in out_row.chunks_exact_mut(channels).enumerate() {
            let o = cols[j] * channels;
            out_px.copy_from_slice(&src[o..o + channels]);
        }
    };

    #[cfg(feature = "parallel")]
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(fill_row);
    #[cfg(not(feature = "parallel"))]
    out.as_bytes_mut()
        .chunks_mut(stride)
        .enumerate()
        .for_each(fill_row);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChaosError;
    use crate::key::ChaosKey;
    use crate::map::ChaoticMap;
    use pretty_assertions::assert_eq;

    fn perm(v: Vec<usize>) -> Permutation {
        Permutation::from_vec(v).unwrap()
    }

    #[test]
    fn swaps_columns_of_two_by_two() {
        let img = ImageBuffer::from_rows(&[[1u8, 2], [3, 4]]).unwrap();
        let out = encrypt(&img, &perm(vec![1, 0]), &Permutation::identity(2)).unwrap();
        assert_eq!(out, ImageBuffer::from_rows(&[[2u8, 1], [4, 3]]).unwrap());
    }

    #[test]
    fn moves_rows_forward() {
        // row i goes to perm_row[i]
        let img = ImageBuffer::from_rows(&[[1u8], [2], [3]]).unwrap();
        let out = encrypt(&img, &Permutation::identity(1), &perm(vec![2, 0, 1])).unwrap();
        assert_eq!(out.as_bytes(), &[2, 3, 1]);
        let back = decrypt(&out, &Permutation::identity(1), &perm(vec![2, 0, 1])).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn keeps_channels_together() {
        let img = ImageBuffer::new(1, 3, 3, (1..=9).collect()).unwrap();
        let out = encrypt(&img, &perm(vec![2, 0, 1]), &Permutation::identity(1)).unwrap();
        assert_eq!(out.as_bytes(), &[4, 5, 6, 7, 8, 9, 1, 2, 3]);
    }

    #[test]
    fn decrypt_is_encrypt_with_inverses() {
        let img = ImageBuffer::new(5, 7, 2, (0..70).collect()).unwrap();
        let rows = ChaosKey::new(ChaoticMap::logistic(), 0.1).permutation(5).unwrap();
        let cols = ChaosKey::new(ChaoticMap::tent(), 0.2).permutation(7).unwrap();
        let enc = encrypt(&img, &cols, &rows).unwrap();
        assert_eq!(
            decrypt(&enc, &cols, &rows).unwrap(),
            encrypt(&enc, &cols.inverse(), &rows.inverse()).unwrap()
        );
    }

    #[test]
    fn round_trip_with_generated_axes() {
        let samples = (0..31 * 17 * 3).map(|v| (v * 7 % 256) as u8).collect();
        let img = ImageBuffer::new(31, 17, 3, samples).unwrap();
        let rows = ChaosKey::new(ChaoticMap::chebyshev(), 0.3).permutation(31).unwrap();
        let cols = ChaosKey::new(ChaoticMap::logistic(), 0.7).permutation(17).unwrap();
        let enc = encrypt(&img, &cols, &rows).unwrap();
        assert_ne!(enc, img);
        assert_eq!(decrypt(&enc, &cols, &rows).unwrap(), img);
    }

    #[test]
    fn axis_length_mismatch() {
        let img = ImageBuffer::zeroed(2, 3, 1).unwrap();
        assert_eq!(
            encrypt(&img, &Permutation::identity(2), &Permutation::identity(2)),
            Err(ChaosError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        );
    }
}
