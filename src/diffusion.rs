//! Pixel diffusion cipher
//! ======================
//! XORs every sample against a keystream byte drawn from a chaotic orbit.
//!
//! * Burn-in: `DIFFUSION_TRANSIENT` (1000) discarded steps from the seed.
//! * Then one step per `(pixel, channel)` in raster order, quantised with
//!   [`ChaoticMap::quantize`].
//! * The keystream depends only on `(map, seed)`, so applying the cipher
//!   twice with the same key restores the input.
//! * An orbit that collapses onto a fixed point or a short cycle is rejected
//!   with [`ChaosError::DegenerateSequence`], as for permutations.
//!
//! Each byte depends on the previous map state, so the keystream is always
//! produced sequentially. The XOR over a materialised keystream has no such
//! dependency and runs on Rayon under the `parallel` feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ChaosError, Result};
use crate::map::ChaoticMap;
use crate::permutation::detect_degenerate;
use crate::raster::ImageBuffer;

/// Burn-in length used by the pixel stage.
pub const DIFFUSION_TRANSIENT: usize = 1000;

#[cfg(feature = "parallel")]
const PAR_CHUNK: usize = 64 * 1024;

/// `len` keystream bytes for `(map, seed)` with the standard burn-in.
pub fn keystream(map: ChaoticMap, seed: f64, len: usize) -> Result<Vec<u8>> {
    keystream_with_transient(map, seed, DIFFUSION_TRANSIENT, len)
}

pub fn keystream_with_transient(
    map: ChaoticMap,
    seed: f64,
    transient: usize,
    len: usize,
) -> Result<Vec<u8>> {
    map.validate_seed(seed)?;
    let orbit: Vec<f64> = map.trajectory(seed).burn_in(transient).take(len).collect();
    detect_degenerate(map, &orbit)?;
    Ok(orbit.into_iter().map(|x| map.quantize(x)).collect())
}

/// XORs `keystream` into `samples` in place. Self-inverse.
pub fn xor_in_place(samples: &mut [u8], keystream: &[u8]) -> Result<()> {
    if samples.len() != keystream.len() {
        return Err(ChaosError::LengthMismatch {
            expected: keystream.len(),
            actual: samples.len(),
        });
    }

    #[cfg(feature = "parallel")]
    samples
        .par_chunks_mut(PAR_CHUNK)
        .zip(keystream.par_chunks(PAR_CHUNK))
        .for_each(|(s, k)| xor_chunk(s, k));
    #[cfg(not(feature = "parallel"))]
    xor_chunk(samples, keystream);

    Ok(())
}

#[inline(always)]
fn xor_chunk(samples: &mut [u8], keystream: &[u8]) {
    for (s, k) in samples.iter_mut().zip(keystream) {
        *s ^= k;
    }
}

/// Applies the diffusion cipher with the standard burn-in. Calling it again
/// with the same `(map, seed)` undoes it.
pub fn apply(image: &ImageBuffer, map: ChaoticMap, seed: f64) -> Result<ImageBuffer> {
    apply_with_transient(image, map, seed, DIFFUSION_TRANSIENT)
}

pub fn apply_with_transient(
    image: &ImageBuffer,
    map: ChaoticMap,
    seed: f64,
    transient: usize,
) -> Result<ImageBuffer> {
    let stream = keystream_with_transient(map, seed, transient, image.len())?;
    let mut out = image.clone();
    xor_in_place(out.as_bytes_mut(), &stream)?;
    Ok(out)
}
