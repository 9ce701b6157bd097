//! Composed image cipher.
//!
//! Encryption runs the spatial remap first and the pixel diffusion second;
//! decryption must undo them in the opposite order. Each stage is invertible
//! on its own, but the composition only inverts in reverse, and getting it
//! wrong produces garbage without any error, so the ordering lives here and
//! nowhere else.

use tracing::{debug, trace};

use crate::diffusion;
use crate::error::Result;
use crate::key::{ChaosKey, ImageKey};
use crate::permutation::Permutation;
use crate::raster::ImageBuffer;
use crate::spatial;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageCipher {
    key: ImageKey,
}

impl ImageCipher {
    pub fn new(key: ImageKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &ImageKey {
        &self.key
    }

    /// Row and column permutations for an image of this shape.
    pub fn permutations(&self, image: &ImageBuffer) -> Result<(Permutation, Permutation)> {
        let rows = ImageKey::axis_permutation(self.key.rows.as_ref(), image.height())?;
        let cols = ImageKey::axis_permutation(self.key.columns.as_ref(), image.width())?;
        Ok((rows, cols))
    }

    pub fn encrypt(&self, image: &ImageBuffer) -> Result<ImageBuffer> {
        debug!(
            height = image.height(),
            width = image.width(),
            channels = image.channels(),
            spatial = self.key.is_spatial(),
            diffusion = self.key.pixels.is_some(),
            "encrypting image"
        );
        let mut out = self.remap(image, spatial::encrypt)?;
        if let Some(pixels) = &self.key.pixels {
            out = diffuse(&out, pixels)?;
        }
        Ok(out)
    }

    pub fn decrypt(&self, image: &ImageBuffer) -> Result<ImageBuffer> {
        debug!(
            height = image.height(),
            width = image.width(),
            channels = image.channels(),
            spatial = self.key.is_spatial(),
            diffusion = self.key.pixels.is_some(),
            "decrypting image"
        );
        let mut out = match &self.key.pixels {
            Some(pixels) => diffuse(image, pixels)?,
            None => image.clone(),
        };
        out = self.remap(&out, spatial::decrypt)?;
        Ok(out)
    }

    fn remap(
        &self,
        image: &ImageBuffer,
        stage: fn(&ImageBuffer, &Permutation, &Permutation) -> Result<ImageBuffer>,
    ) -> Result<ImageBuffer> {
        if !self.key.is_spatial() {
            return Ok(image.clone());
        }
        let (rows, cols) = self.permutations(image)?;
        if rows.is_identity() && cols.is_identity() {
            trace!("both axis permutations are the identity, skipping remap");
            return Ok(image.clone());
        }
        stage(image, &cols, &rows)
    }
}

fn diffuse(image: &ImageBuffer, key: &ChaosKey) -> Result<ImageBuffer> {
    trace!(map = %key.map, transient = key.transient, "pixel diffusion");
    diffusion::apply_with_transient(image, key.map, key.seed, key.transient)
}
