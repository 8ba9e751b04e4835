use anyhow::{Result, Context, anyhow};
use crate::core::geometry::point::Point2i;
use crate::core::spectrum::RGBSpectrum;
use byteorder::{LittleEndian, ReadBytesExt, BigEndian, WriteBytesExt};
use std::path::Path;
use rayon::prelude::*;
use crate::core::pbrt::{Float, to_byte, gamma_correct};
use crate::core::fileutil::has_extension_ci;
use log::{info, debug};
use exr::prelude::{read_first_rgba_layer_from_file, write_rgb_file};
use image::codecs::hdr::{HdrDecoder, HdrEncoder};
use image::{ImageFormat, Rgb};
use enum_dispatch::enum_dispatch;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Seek, Write};
use std::fs::File;

/// Number of leading bytes inspected when sniffing a file's format.
const HEADER_LENGTH: usize = 16;

const EXR_MAGIC: [u8; 4] = [0x76, 0x2f, 0x31, 0x01];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScalarType {
    /// 8 bit data rescaled to [0, 1]
    UnsignedChar,
    /// High dynamic range data stored as is
    Float
}

#[derive(Debug, Clone)]
pub struct Image {
    pub resolution  : Point2i,
    pub pixels      : Vec<RGBSpectrum>,
    pub scalar_type : ScalarType
}

impl Image {
    /// Fails on an empty resolution or a pixel count that does not match it.
    pub fn new(resolution: Point2i, pixels: Vec<RGBSpectrum>, scalar_type: ScalarType) -> Result<Self> {
        if resolution.x <= 0 || resolution.y <= 0 {
            return Err(anyhow!("Invalid image resolution {} X {}", resolution.x, resolution.y));
        }

        if resolution.x.checked_mul(resolution.y) != Some(pixels.len() as isize) {
            return Err(anyhow!(
                "Image resolution {} X {} does not match {} pixels",
                resolution.x, resolution.y, pixels.len()));
        }

        Ok(Self { resolution, pixels, scalar_type })
    }

    pub fn width(&self) -> usize { self.resolution.x as usize }
    pub fn height(&self) -> usize { self.resolution.y as usize }

    pub fn get(&self, x: usize, y: usize) -> RGBSpectrum {
        self.pixels[y * self.width() + x]
    }

    /// Smallest and largest luminance in the image.
    pub fn luminance_range(&self) -> (Float, Float) {
        self.pixels
            .par_iter()
            .map(|p| { let y = p.y(); (y, y) })
            .reduce(
                || (Float::INFINITY, Float::NEG_INFINITY),
                |a, b| (a.0.min(b.0), a.1.max(b.1)))
    }
}

#[enum_dispatch]
pub trait ImageReader {
    fn description(&self) -> &'static str;

    fn extensions(&self) -> &'static [&'static str];

    /// Whether the leading bytes of a file identify this reader's format.
    fn can_read_header(&self, header: &[u8]) -> bool;

    fn read(&self, name: &Path) -> Result<Image>;

    fn matches_extension(&self, name: &Path) -> bool {
        self.extensions().iter().any(|ext| has_extension_ci(name, ext))
    }
}

#[enum_dispatch(ImageReader)]
#[derive(Debug, Clone)]
pub enum ImageReaders {
    HdrReader,
    ExrReader,
    PfmReader,
    LdrReader
}

/// Picks an [`ImageReader`] for a file, looking at its content first and
/// falling back to its extension.
pub struct ImageReaderFactory;

impl ImageReaderFactory {
    pub fn readers() -> Vec<ImageReaders> {
        vec![
            HdrReader.into(),
            ExrReader.into(),
            PfmReader.into(),
            LdrReader.into()
        ]
    }

    /// Returns `None` when the file cannot be opened or no reader applies.
    pub fn create_image_reader<P: AsRef<Path>>(name: P) -> Option<ImageReaders> {
        let name = name.as_ref();
        let header = match read_header(name) {
            Ok(h) => h,
            Err(e) => {
                debug!("Unable to open \"{}\": {}", name.display(), e);
                return None;
            }
        };
        let readers = Self::readers();

        if let Some(r) = readers.iter().find(|r| r.can_read_header(&header)) {
            debug!("Selected {} reader for \"{}\" from file content", r.description(), name.display());
            return Some(r.clone());
        }

        let reader = readers.into_iter().find(|r| r.matches_extension(name));

        if let Some(ref r) = reader {
            debug!("Selected {} reader for \"{}\" from extension", r.description(), name.display());
        }

        reader
    }
}

pub fn read_image<P: AsRef<Path>>(name: P) -> Result<Image> {
    let name = name.as_ref();
    let reader = ImageReaderFactory::create_image_reader(name)
        .with_context(|| format!("No reader found for image \"{}\"", name.display()))?;

    reader.read(name)
}

fn read_header(name: &Path) -> std::io::Result<Vec<u8>> {
    let f = File::open(name)?;
    let mut header = Vec::with_capacity(HEADER_LENGTH);
    f.take(HEADER_LENGTH as u64).read_to_end(&mut header)?;

    Ok(header)
}

#[derive(Debug, Copy, Clone)]
pub struct HdrReader;

impl ImageReader for HdrReader {
    fn description(&self) -> &'static str { "Radiance HDR" }

    fn extensions(&self) -> &'static [&'static str] { &["hdr", "pic"] }

    fn can_read_header(&self, header: &[u8]) -> bool {
        header.starts_with(b"#?RADIANCE") || header.starts_with(b"#?RGBE")
    }

    fn read(&self, name: &Path) -> Result<Image> {
        let f = File::open(name)
            .with_context(|| format!("Unable to open HDR file \"{}\"", name.display()))?;
        let decoder = HdrDecoder::new(BufReader::new(f))
            .with_context(|| format!("Error reading HDR header \"{}\"", name.display()))?;
        let meta = decoder.metadata();
        let data = decoder.read_image_hdr()
            .with_context(|| format!("Error decoding HDR file \"{}\"", name.display()))?;

        let pixels = data
            .par_iter()
            .map(|p| RGBSpectrum::rgb(p[0], p[1], p[2]))
            .collect::<Vec<_>>();
        let res = Point2i::new(meta.width as isize, meta.height as isize);

        info!("Read HDR image {} ({} X {})", name.display(), res.x, res.y);

        Image::new(res, pixels, ScalarType::Float)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ExrReader;

struct ExrPixels {
    pixels: Vec<RGBSpectrum>,
    width : usize
}

impl ImageReader for ExrReader {
    fn description(&self) -> &'static str { "OpenEXR" }

    fn extensions(&self) -> &'static [&'static str] { &["exr"] }

    fn can_read_header(&self, header: &[u8]) -> bool {
        header.starts_with(&EXR_MAGIC)
    }

    fn read(&self, name: &Path) -> Result<Image> {
        let image = read_first_rgba_layer_from_file(
            name,
            |resolution, _| {
                let width = resolution.width();
                let height = resolution.height();

                ExrPixels { pixels: vec![RGBSpectrum::default(); width * height], width }
            },
            |storage: &mut ExrPixels, pos, (r, g, b, _a): (f32, f32, f32, f32)| {
                storage.pixels[pos.y() * storage.width + pos.x()] = RGBSpectrum::rgb(r, g, b);
            }
        ).with_context(|| format!("Error reading exr image \"{}\"", name.display()))?;

        let storage = image.layer_data.channel_data.pixels;
        let width = storage.width;
        let height = if width == 0 { 0 } else { storage.pixels.len() / width };
        let res = Point2i::new(width as isize, height as isize);

        info!("Read EXR image {} ({} X {})", name.display(), width, height);

        Image::new(res, storage.pixels, ScalarType::Float)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct PfmReader;

fn is_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\n' || c == b'\t' || c == b'\r'
}

fn read_word<R: BufRead>(f: &mut R) -> Result<String> {
    let mut s = String::new();
    let mut buf = [0_u8; 1];

    loop {
        match f.read_exact(&mut buf) {
            Ok(_) => {
                if is_whitespace(buf[0]) {
                    if s.is_empty() { continue; }
                    break;
                }
                s.push(buf[0] as char);
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof =>
                break,
            Err(e) => return Err(anyhow!("error reading word: {}", e))
        }
    }

    Ok(s)
}

impl ImageReader for PfmReader {
    fn description(&self) -> &'static str { "PFM" }

    fn extensions(&self) -> &'static [&'static str] { &["pfm"] }

    fn can_read_header(&self, header: &[u8]) -> bool {
        header.len() > 2 &&
            (header.starts_with(b"PF") || header.starts_with(b"Pf")) &&
            is_whitespace(header[2])
    }

    fn read(&self, name: &Path) -> Result<Image> {
        let fail = || anyhow!("Error reading PFM file \"{}\"", name.display());

        let f = File::open(name)
            .with_context(|| format!("Unable to open PFM file \"{}\"", name.display()))?;
        let file_len = f.metadata()
            .with_context(|| format!("Unable to open PFM file \"{}\"", name.display()))?
            .len();
        let mut r = BufReader::new(f);

        // read either "Pf" or "PF"
        let nchannels: usize = match read_word(&mut r)?.as_str() {
            "Pf" => 1,
            "PF" => 3,
            _ => return Err(fail())
        };

        let width = read_word(&mut r)?.parse::<usize>().map_err(|_| fail())?;
        let height = read_word(&mut r)?.parse::<usize>().map_err(|_| fail())?;
        let scale = read_word(&mut r)?.parse::<Float>().map_err(|_| fail())?;

        // Negative scale means little endian data
        let file_little_endian = scale < 0.0;

        // The header must not claim more samples than the file holds
        let n = nchannels
            .checked_mul(width)
            .and_then(|n| n.checked_mul(height))
            .ok_or_else(fail)?;
        let remaining = file_len.saturating_sub(r.stream_position().map_err(|_| fail())?);

        if n == 0 || (n as u64).checked_mul(4).map_or(true, |bytes| bytes > remaining) {
            return Err(fail());
        }

        let mut data = vec![0.0; n];

        // Rows are stored bottom to top
        for y in (0..height).rev() {
            let start = y * nchannels * width;
            let end = start + nchannels * width;

            let res = if file_little_endian {
                r.read_f32_into::<LittleEndian>(&mut data[start..end])
            } else {
                r.read_f32_into::<BigEndian>(&mut data[start..end])
            };

            res.map_err(|_| fail())?;
        }

        if scale.abs() != 1.0 {
            for f in data.iter_mut() {
                *f *= scale.abs();
            }
        }

        let pixels = if nchannels == 1 {
            data.iter().map(|n| RGBSpectrum::new(*n)).collect()
        } else {
            data.chunks(3)
                .map(|rgb| RGBSpectrum::rgb(rgb[0], rgb[1], rgb[2]))
                .collect()
        };
        let res = Point2i::new(width as isize, height as isize);

        Image::new(res, pixels, ScalarType::Float)
    }
}

/// PNG, JPEG, TGA and BMP through the `image` crate.
#[derive(Debug, Copy, Clone)]
pub struct LdrReader;

impl ImageReader for LdrReader {
    fn description(&self) -> &'static str { "8-bit" }

    fn extensions(&self) -> &'static [&'static str] { &["png", "jpg", "jpeg", "tga", "bmp"] }

    fn can_read_header(&self, header: &[u8]) -> bool {
        matches!(
            image::guess_format(header),
            Ok(ImageFormat::Png) | Ok(ImageFormat::Jpeg) | Ok(ImageFormat::Bmp))
    }

    fn read(&self, name: &Path) -> Result<Image> {
        // The format comes from the content so misnamed files still decode
        let buf = image::io::Reader::open(name)
            .and_then(|r| r.with_guessed_format())
            .with_context(|| format!("Unable to open image \"{}\"", name.display()))?
            .decode()
            .with_context(|| format!("Error reading image \"{}\"", name.display()))?
            .to_rgb8();
        let (width, height) = buf.dimensions();
        let res = Point2i::new(width as isize, height as isize);

        let pixels = buf
            .into_raw()
            .par_chunks(3)
            .map(|p| {
                RGBSpectrum::rgb(
                    p[0] as Float / 255.0,
                    p[1] as Float / 255.0,
                    p[2] as Float / 255.0)
            })
            .collect::<Vec<_>>();

        info!("Read {} image {} ({} X {})", self.description(), name.display(), width, height);

        Image::new(res, pixels, ScalarType::UnsignedChar)
    }
}

/// Write linear RGB data, picking the format from the extension. 8-bit formats
/// are gamma corrected before quantization.
pub fn write_image<P: AsRef<Path>>(name: P, rgb: &[Float], res: &Point2i) -> Result<()> {
    let name = name.as_ref();
    assert_eq!(rgb.len(), 3 * (res.x * res.y) as usize);

    if has_extension_ci(name, "png") || has_extension_ci(name, "tga") {
        write_image_png_tga(name, rgb, res)
    } else if has_extension_ci(name, "exr") {
        write_image_exr(name, rgb, res)
    } else if has_extension_ci(name, "pfm") {
        write_image_pfm(name, rgb, res)
    } else if has_extension_ci(name, "hdr") {
        write_image_hdr(name, rgb, res)
    } else {
        Err(anyhow!("Unsupported file format \"{}\"", name.display()))
    }
}

fn write_image_exr(name: &Path, rgb: &[Float], res: &Point2i) -> Result<()> {
    let width = res.x as usize;

    write_rgb_file(
        name,
        width,
        res.y as usize,
        |x, y| {
            let o = 3 * (y * width + x);
            (rgb[o], rgb[o + 1], rgb[o + 2])
        }
    )
        .with_context(|| format!("Error writing exr image \"{}\"", name.display()))
}

fn write_image_hdr(name: &Path, rgb: &[Float], res: &Point2i) -> Result<()> {
    let f = File::create(name)
        .with_context(|| format!("Unable to open output HDR file \"{}\"", name.display()))?;
    let data = rgb
        .chunks(3)
        .map(|p| Rgb([p[0].max(0.0), p[1].max(0.0), p[2].max(0.0)]))
        .collect::<Vec<_>>();

    HdrEncoder::new(BufWriter::new(f))
        .encode(&data, res.x as usize, res.y as usize)
        .with_context(|| format!("Error writing HDR file \"{}\"", name.display()))
}

fn write_image_pfm(name: &Path, rgb: &[Float], res: &Point2i) -> Result<()> {
    let width = res.x as usize;
    let height = res.y as usize;
    let mut f = File::create(name)
        .with_context(|| format!("Unable to open output PFM file \"{}\"", name.display()))?;

    let mut buf = Vec::new();

    // only write 3 channel PFMs here
    buf.extend_from_slice(b"PF\n");

    // write the width and height which must be positive
    buf.extend_from_slice(format!("{} {}\n", width, height).as_bytes());

    // write the scale, which encodes endianness
    buf.extend_from_slice(b"-1\n");

    // The raster is grouped by row, with the rows ordered bottom to top
    for y in (0..height).rev() {
        for v in &rgb[y * width * 3..(y + 1) * width * 3] {
            buf.write_f32::<LittleEndian>(*v)?;
        }
    }

    f.write_all(&buf).with_context(||
        format!("Error writing PFM file \"{}\"", name.display()))
}

fn write_image_png_tga(name: &Path, rgb: &[Float], res: &Point2i) -> Result<()> {
    let buf = rgb.iter().map(|v| to_byte(gamma_correct(*v))).collect::<Vec<_>>();

    image::save_buffer(
        name,
        &buf,
        res.x as u32,
        res.y as u32,
        image::ColorType::Rgb8
    )
        .with_context(|| format!("Error writing image \"{}\"", name.display()))
}
