use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use photon_rs::transform::{resize, SamplingFilter};
use photon_rs::PhotonImage;

use crate::error::KoraError;

/// Equivalente servidor del resize por canvas: decodifica, acota dimensiones
/// manteniendo la proporción y recomprime a JPEG. Devuelve base64 pelado.
pub fn compress_photo(
	photo_base64: &str,
	max_width: u32,
	max_height: u32,
	quality: u8,
) -> Result<String, KoraError> {
	let bytes = STANDARD
		.decode(strip_data_url(photo_base64))
		.map_err(|e| KoraError::Image(e.to_string()))?;
	if bytes.is_empty() {
		return Err(KoraError::Image(String::from("imagen vacía")));
	}

	let img = PhotonImage::new_from_byteslice(bytes);
	let width = img.get_width();
	let height = img.get_height();
	let (new_width, new_height) = scaled_dimensions(width, height, max_width, max_height);

	let resized = if (new_width, new_height) != (width, height) {
		resize(&img, new_width, new_height, SamplingFilter::Lanczos3)
	} else {
		img
	};

	Ok(STANDARD.encode(resized.get_bytes_jpeg(quality)))
}

/// Primero se acota el ancho y después el alto, igual que el canvas original
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
	let mut w = width as f64;
	let mut h = height as f64;

	if w > max_width as f64 {
		h = h * max_width as f64 / w;
		w = max_width as f64;
	}
	if h > max_height as f64 {
		w = w * max_height as f64 / h;
		h = max_height as f64;
	}

	(w.round().max(1.0) as u32, h.round().max(1.0) as u32)
}

/// Tamaño decodificado aproximado de un payload base64, para el control previo al envío
pub fn estimate_decoded_size(base64_payload: &str) -> usize {
	base64_payload.len() * 3 / 4
}

pub fn strip_data_url(image: &str) -> &str {
	if image.starts_with("data:") {
		image.split_once(',').map(|(_, data)| data).unwrap_or(image)
	} else {
		image
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// PNG de 1x1 válido
	const TINY_PNG: &str =
		"iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

	#[test]
	fn width_capped_before_height() {
		// 4000x2000: el ancho manda y el alto queda dentro del límite
		assert_eq!(scaled_dimensions(4000, 2000, 1920, 1080), (1920, 960));
		// 2000x4000: se acota el ancho y después el alto vuelve a acotar
		assert_eq!(scaled_dimensions(2000, 4000, 1920, 1080), (540, 1080));
		// dentro de los límites no se toca
		assert_eq!(scaled_dimensions(800, 600, 1920, 1080), (800, 600));
	}

	#[test]
	fn estimate_matches_three_quarters() {
		assert_eq!(estimate_decoded_size("QUJDRA=="), 6);
		assert_eq!(estimate_decoded_size(""), 0);
	}

	#[test]
	fn strip_data_url_variants() {
		assert_eq!(strip_data_url("QUJD"), "QUJD");
		assert_eq!(strip_data_url("data:image/png;base64,QUJD"), "QUJD");
	}

	#[test]
	fn compress_accepts_bare_and_prefixed_base64() {
		let out = compress_photo(TINY_PNG, 1920, 1080, 80).unwrap();
		assert!(!out.is_empty());

		let prefixed = format!("data:image/png;base64,{}", TINY_PNG);
		let out = compress_photo(&prefixed, 1920, 1080, 80).unwrap();
		assert!(!out.is_empty());
	}

	#[test]
	fn compress_rejects_garbage() {
		assert!(compress_photo("no-es-base64!!!", 1920, 1080, 80).is_err());
	}
}
