//! DCT-based perceptual hashing
//!
//! The image is shrunk to a `HASH_SIZE` x `HASH_SIZE` grayscale grid, run
//! through an orthonormal 2-D DCT-II, and the lowest `HASH_BLOCK` x `HASH_BLOCK`
//! frequencies are thresholded against the mean of their 63 AC terms. Bits are
//! packed row-major, most significant bit first, so coefficient (0, 0) lands in
//! bit 63. Changing any of this invalidates stored fingerprints.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::config::{HASH_BLOCK, HASH_SIZE};

static DCT_BASIS: OnceLock<Array2<f64>> = OnceLock::new();

/// Raised when a file cannot be decoded as an image. Recoverable: the entry
/// is skipped.
#[derive(Debug, thiserror::Error)]
#[error("cannot decode {}: {source}", path.display())]
pub struct DecodeError {
	pub path: PathBuf,
	#[source]
	pub source: image::ImageError,
}

/// 64-bit perceptual fingerprint compared by Hamming distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptualHash(u64);

impl PerceptualHash {
	pub fn from_bits(bits: u64) -> Self {
		Self(bits)
	}

	pub fn bits(&self) -> u64 {
		self.0
	}

	/// Fingerprint an already decoded image
	pub fn compute(img: &DynamicImage) -> Self {
		let side = HASH_SIZE as u32;
		let gray = img.resize_exact(side, side, FilterType::Triangle).to_luma8();
		let pixels = Array2::from_shape_fn((HASH_SIZE, HASH_SIZE), |(y, x)| {
			f64::from(gray.get_pixel(x as u32, y as u32)[0])
		});

		// Only the low-frequency rows of the basis are needed:
		// (B x N) . (N x N) . (N x B) gives the top-left B x B coefficients.
		let low = dct_basis().slice(s![..HASH_BLOCK, ..]);
		let coeffs = low.dot(&pixels).dot(&low.t());

		let ac_terms = (HASH_BLOCK * HASH_BLOCK - 1) as f64;
		let mean = (coeffs.sum() - coeffs[[0, 0]]) / ac_terms;

		let bits = coeffs
			.iter()
			.fold(0u64, |acc, &c| (acc << 1) | u64::from(c > mean));
		Self(bits)
	}

	/// Decode and fingerprint an image file
	pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
		let img = image::open(path).map_err(|source| DecodeError {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(Self::compute(&img))
	}

	pub fn distance(&self, other: &Self) -> usize {
		super::distance::hash_distance(self.0, other.0)
	}
}

impl std::fmt::Display for PerceptualHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:016x}", self.0)
	}
}

/// Orthonormal DCT-II basis, row `k` holds frequency `k`.
fn dct_basis() -> &'static Array2<f64> {
	DCT_BASIS.get_or_init(|| {
		let n = HASH_SIZE as f64;
		Array2::from_shape_fn((HASH_SIZE, HASH_SIZE), |(k, x)| {
			let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
			scale * (PI * (2.0 * x as f64 + 1.0) * k as f64 / (2.0 * n)).cos()
		})
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{GrayImage, Luma};

	fn pattern(width: u32, height: u32, offset: u8) -> DynamicImage {
		let img = GrayImage::from_fn(width, height, |x, y| {
			let fx = x as f64 / width as f64;
			let fy = y as f64 / height as f64;
			let v = 110.0 + 60.0 * (fx * 2.0 * PI).sin() * (fy * PI).cos();
			Luma([v as u8 + offset])
		});
		DynamicImage::ImageLuma8(img)
	}

	#[test]
	fn basis_is_orthonormal() {
		let basis = dct_basis();
		let identity = basis.dot(&basis.t());
		for ((i, j), v) in identity.indexed_iter() {
			let expected = if i == j { 1.0 } else { 0.0 };
			assert!((v - expected).abs() < 1e-9, "({i}, {j}) = {v}");
		}
	}

	#[test]
	fn black_image_hashes_to_zero() {
		let img = DynamicImage::ImageLuma8(GrayImage::new(64, 48));
		assert_eq!(PerceptualHash::compute(&img).bits(), 0);
	}

	#[test]
	fn rehashing_is_stable() {
		let img = pattern(120, 80, 0);
		let a = PerceptualHash::compute(&img);
		let b = PerceptualHash::compute(&img);
		assert_eq!(a.distance(&b), 0);
	}

	#[test]
	fn brightness_shift_is_tolerated() {
		let a = PerceptualHash::compute(&pattern(96, 96, 0));
		let b = PerceptualHash::compute(&pattern(96, 96, 20));
		assert!(a.distance(&b) <= 8, "distance {}", a.distance(&b));
	}

	#[test]
	fn mirrored_gradient_differs() {
		let left = GrayImage::from_fn(64, 64, |x, _| Luma([(x * 4) as u8]));
		let right = GrayImage::from_fn(64, 64, |x, _| Luma([((63 - x) * 4) as u8]));
		let a = PerceptualHash::compute(&DynamicImage::ImageLuma8(left));
		let b = PerceptualHash::compute(&DynamicImage::ImageLuma8(right));
		assert!(a.distance(&b) > 0);
	}

	#[test]
	fn display_is_fixed_width_hex() {
		assert_eq!(PerceptualHash::from_bits(0xab).to_string(), "00000000000000ab");
	}

	#[test]
	fn undecodable_file_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.png");
		std::fs::write(&path, b"definitely not a png").unwrap();
		let err = PerceptualHash::from_path(&path).unwrap_err();
		assert_eq!(err.path, path);
	}
}
