//! chaosperm
//! =========
//! Chaotic maps turned into **permutations**, and permutation/diffusion
//! ciphers for text and images built on them.
//!
//! ## Building blocks
//! * [`ChaoticMap`]: Logistic, Chebyshev and Tent recurrences, one tagged enum.
//! * [`PermutationGenerator`]: burn-in, sample `N` values, rank them into a
//!   bijection of `0..N` (stable tie-break, `O(N log N)`).
//! * [`cycles`]: cycle decomposition and multiplicative order.
//! * [`text`]: symbol `i` moves to `perm[i]`; decryption uses the inverse.
//! * [`spatial`]: independent row and column permutations over an image.
//! * [`diffusion`]: XOR with a byte keystream quantised from the orbit.
//! * [`ImageCipher`]: spatial remap then diffusion, undone in reverse.
//!
//! ```
//! use chaosperm::{ChaosKey, ChaoticMap, ImageBuffer, ImageCipher, ImageKey};
//!
//! let image = ImageBuffer::from_rows(&[[1u8, 2, 3], [4, 5, 6]]).unwrap();
//! let key = ImageKey {
//!     rows: Some(ChaosKey::new(ChaoticMap::logistic(), 0.1)),
//!     columns: Some(ChaosKey::new(ChaoticMap::tent(), 0.2)),
//!     pixels: Some(ChaosKey::new(ChaoticMap::chebyshev(), 0.3)),
//! };
//! let cipher = ImageCipher::new(key);
//! let encrypted = cipher.encrypt(&image).unwrap();
//! assert_eq!(cipher.decrypt(&encrypted).unwrap(), image);
//! ```
//!
//! Every operation is a pure function of its inputs: the same key always
//! gives the same permutation and keystream, which is what decryption relies
//! on. Independent generations can run concurrently; enable the `parallel`
//! feature to let Rayon apply keystreams, fill remapped rows and run sweeps.
//!
//! ---
//! **Security NOTE:** this is a didactic chaos-based cipher. It makes no
//! strength claims and offers no authentication or key management.

pub mod analysis;
pub mod cycles;
pub mod diffusion;
pub mod error;
pub mod key;
pub mod map;
pub mod permutation;
pub mod pipeline;
pub mod raster;
pub mod spatial;
pub mod text;

pub use cycles::{decompose, order, CycleDecomposition};
pub use error::{ChaosError, Result};
pub use key::{ChaosKey, ImageKey};
pub use map::{ChaoticMap, Trajectory};
pub use permutation::{generate, Permutation, PermutationGenerator, DEFAULT_TRANSIENT};
pub use pipeline::ImageCipher;
pub use raster::ImageBuffer;
pub use text::TextCipher;
