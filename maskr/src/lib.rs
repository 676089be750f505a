use std::{fs, path::Path};

use anyhow::{Context, Result};
use libmask::{BitMap, Channel, Encoder, Fragment};
use tracing::{debug, info, instrument};

fn open_mask(image_file: &Path, channel: Channel, origin: (i32, i32)) -> Result<BitMap> {
    let img = image::open(image_file)
        .with_context(|| format!("Failed to open image {}", image_file.display()))?;
    let bitmap = BitMap::from_image(&img, channel, origin)?;
    debug!("Read {}x{} mask", bitmap.width(), bitmap.height());
    Ok(bitmap)
}

/// Encodes one channel of an image into an instruction stream file, returning the number of
/// instructions written
#[instrument]
pub fn image_to_mask(
    image_file: &Path,
    output_name: &Path,
    channel: Channel,
    origin: (i32, i32),
) -> Result<usize> {
    let bitmap = open_mask(image_file, channel, origin)?;

    let mut stream = Vec::new();
    let instructions = Encoder::default()
        .encode(&bitmap, &mut stream)
        .context("Encode mask")?;
    debug!("Encoded {instructions} instructions");

    info!("Writing mask stream to {}", output_name.display());
    fs::write(output_name, &stream)?;
    info!(
        "Successfully wrote {} bytes to {}",
        stream.len(),
        output_name.display()
    );
    Ok(instructions)
}

/// Redraws an instruction stream file as a grayscale image, returning the number of
/// instructions read
#[instrument]
pub fn mask_to_image(
    mask_file: &Path,
    output_name: &Path,
    size: (u16, u16),
    origin: (i32, i32),
) -> Result<usize> {
    let stream = fs::read(mask_file)
        .with_context(|| format!("Failed to read mask {}", mask_file.display()))?;
    debug!("Read {} bytes of mask stream", stream.len());

    let mut bitmap = BitMap::at(size.0, size.1, origin).context("Mask placement")?;
    let instructions = libmask::decode_into(&stream, &mut bitmap).context("Decode mask")?;

    info!("Writing mask image to {}", output_name.display());
    bitmap.to_gray_image().save(output_name)?;
    Ok(instructions)
}

/// Lists the fragments an image channel decomposes into, in stream order
#[instrument]
pub fn inspect_image(
    image_file: &Path,
    channel: Channel,
    origin: (i32, i32),
) -> Result<Vec<Fragment>> {
    let bitmap = open_mask(image_file, channel, origin)?;
    Ok(libmask::extract_fragments(&bitmap)?)
}
